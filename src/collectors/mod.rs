pub mod vnstat;

pub use vnstat::{CollectionError, StatsProvider, VnstatCollector};
