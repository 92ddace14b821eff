//! Network ingestion: configuration, CSV feeds and the network builder

mod builder;
pub mod config;
pub mod csv_feed;
pub mod records;

pub use builder::{LoadSummary, NetworkBuilder, load_network};
pub use config::{ModeRates, NetworkConfig, Schedules, ServiceSchedule};
pub use csv_feed::{read_feed, read_feed_from};
pub use records::{FeedKind, FeedSource, IngestRecord};
