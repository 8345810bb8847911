//! Tests for interface enumeration through the vnstat database directory

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use crate::collectors::vnstat::collector::{
        StatsProvider, VnstatCollector, normalize_interface_names, parse_database_dir,
    };
    use crate::collectors::vnstat::errors::CollectionError;
    use crate::collectors::vnstat::tests::ScriptedRunner;

    fn showconfig(dir: &std::path::Path) -> String {
        format!(
            "# vnStat 2.10 config file\n\nInterface \"\"\n\n# location of the database directory\nDatabaseDir \"{}\"\n\nLocale \"-\"\n",
            dir.display()
        )
    }

    #[test]
    fn test_parse_database_dir_quoted() {
        let config = "Interface \"eth0\"\nDatabaseDir \"/var/lib/vnstat\"\nMonthRotate 1\n";
        assert_eq!(parse_database_dir(config), Some(PathBuf::from("/var/lib/vnstat")));
    }

    #[test]
    fn test_parse_database_dir_bare_and_indented() {
        let config = "   DatabaseDir   /srv/vnstat  \n";
        assert_eq!(parse_database_dir(config), Some(PathBuf::from("/srv/vnstat")));
    }

    #[test]
    fn test_parse_database_dir_ignores_similar_keys() {
        assert_eq!(parse_database_dir("DatabaseDirectory \"/tmp\"\n"), None);
        assert_eq!(parse_database_dir("DatabaseDir \"\"\n"), None);
        assert_eq!(parse_database_dir(""), None);
    }

    #[test]
    fn test_normalize_interface_names() {
        let names = normalize_interface_names(vec![" eth0\n", "", "   ", "wlan0", ".eth0", "eth0"]);
        assert_eq!(names, vec!["eth0".to_string(), "wlan0".to_string()]);
    }

    #[tokio::test]
    async fn test_list_interfaces_reads_database_dir() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["eth0", "wlan0", ".eth0", "tun0"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let runner = ScriptedRunner::new().respond("--showconfig", &showconfig(dir.path()));
        let collector = VnstatCollector::with_runner("vnstat", vec![], runner);

        let names = collector.list_interfaces().await.unwrap();
        assert_eq!(names, vec!["eth0", "tun0", "wlan0"]);
        assert!(names.iter().all(|n| !n.trim().is_empty()));
    }

    #[tokio::test]
    async fn test_list_interfaces_sqlite_database_asks_vnstat() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("vnstat.db"), b"").unwrap();

        let runner = ScriptedRunner::new()
            .respond("--showconfig", &showconfig(dir.path()))
            .respond("--dbiflist 1", "eth0\nwg0\n\n");
        let collector = VnstatCollector::with_runner("vnstat", vec![], runner);

        let names = collector.list_interfaces().await.unwrap();
        assert_eq!(names, vec!["eth0", "wg0"]);
    }

    #[tokio::test]
    async fn test_list_interfaces_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new().respond("--showconfig", &showconfig(dir.path()));
        let collector = VnstatCollector::with_runner("vnstat", vec![], runner);

        assert!(collector.list_interfaces().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_interfaces_missing_database_dir_entry() {
        let runner = ScriptedRunner::new().respond("--showconfig", "Interface \"eth0\"\n");
        let collector = VnstatCollector::with_runner("vnstat", vec![], runner);

        let err = collector.list_interfaces().await.unwrap_err();
        assert!(matches!(err, CollectionError::MalformedOutput { .. }));
    }

    #[tokio::test]
    async fn test_list_interfaces_unreadable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let runner = ScriptedRunner::new().respond("--showconfig", &showconfig(&missing));
        let collector = VnstatCollector::with_runner("vnstat", vec![], runner);

        match collector.list_interfaces().await {
            Err(CollectionError::DatabaseUnavailable { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
