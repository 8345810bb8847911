//! Formatting utilities for transfer volumes
//!
//! Used for log lines and CLI output; JSON responses always carry raw byte
//! counts.

/// Bytes in one gibibyte
pub const GIB: u64 = 1024 * 1024 * 1024;

/// Formats byte values with binary unit prefixes
///
/// # Examples
///
/// ```
/// use vnstat_watcher::formatting::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 B");
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1024), "1.00 KiB");
/// assert_eq!(format_bytes(1048576), "1.00 MiB");
/// assert_eq!(format_bytes(1073741824), "1.00 GiB");
/// assert_eq!(format_bytes(1099511627776), "1.00 TiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    let value = bytes as f64;
    if value < 1024.0 {
        format!("{bytes} B")
    } else if value < 1024.0 * 1024.0 {
        format!("{:.2} KiB", value / 1024.0)
    } else if value < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.2} MiB", value / (1024.0 * 1024.0))
    } else if value < 1024.0 * 1024.0 * 1024.0 * 1024.0 {
        format!("{:.2} GiB", value / (1024.0 * 1024.0 * 1024.0))
    } else {
        format!("{:.2} TiB", value / (1024.0 * 1024.0 * 1024.0 * 1024.0))
    }
}

/// Converts a limit given in GiB to bytes, saturating at `u64::MAX`
pub fn gib_to_bytes(gib: u64) -> u64 {
    gib.saturating_mul(GIB)
}

/// Share of `limit` already used, as a percentage
pub fn percent_of(used: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 100.0;
    }
    used as f64 / limit as f64 * 100.0
}
