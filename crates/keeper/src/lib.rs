pub mod config;
pub mod error;
pub mod keeper;
pub mod snapshot;

pub use config::{create_example_config, AuctionConfig, KeeperConfig, RetryConfig};
pub use error::{KeeperError, KeeperResult};
pub use keeper::{AuctionReport, AuctionStatus, Keeper};
pub use snapshot::SnapshotReader;
