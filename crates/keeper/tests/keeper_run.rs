//! Keeper driven from a configuration file on disk.

use setkit_keeper::{create_example_config, AuctionStatus, Keeper, KeeperConfig};

const START: u64 = 1_700_000_000;

#[test]
fn test_example_config_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keeper.toml");
    let path = path.to_str().unwrap();

    create_example_config(path).unwrap();
    let config = KeeperConfig::load(path).unwrap();
    assert_eq!(config.network, "localnet");
    assert_eq!(config.auctions.len(), 1);
    assert_eq!(config.auctions[0].auction_start_time, START);
}

#[test]
fn test_invalid_config_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keeper.toml");
    std::fs::write(&path, "network = \"localnet\"\n").unwrap();
    assert!(KeeperConfig::load(path.to_str().unwrap()).is_err());

    assert!(KeeperConfig::load("/nonexistent/keeper.toml").is_err());
}

#[tokio::test]
async fn test_alert_writes_quote() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("keeper.toml");
    let quotes_path = dir.path().join("quotes.jsonl");

    create_example_config(config_path.to_str().unwrap()).unwrap();
    let mut config = KeeperConfig::load(config_path.to_str().unwrap()).unwrap();
    config.quote_output = Some(quotes_path.to_str().unwrap().to_string());

    let mut keeper = Keeper::new(config, false).unwrap();

    let reports = keeper.poll_at(START + 20_000).await.unwrap();
    assert_eq!(reports[0].status, AuctionStatus::Open);
    assert!(!quotes_path.exists());

    let reports = keeper.poll_at(START + 80_000).await.unwrap();
    assert_eq!(reports[0].status, AuctionStatus::AlertPriceReached);

    // Second poll above the alert price does not write again
    keeper.poll_at(START + 90_000).await.unwrap();

    let written = std::fs::read_to_string(&quotes_path).unwrap();
    assert_eq!(written.lines().count(), 1);
    assert!(written.contains("\"fail_deadline\""));
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("keeper.toml");
    let quotes_path = dir.path().join("quotes.jsonl");

    create_example_config(config_path.to_str().unwrap()).unwrap();
    let mut config = KeeperConfig::load(config_path.to_str().unwrap()).unwrap();
    config.quote_output = Some(quotes_path.to_str().unwrap().to_string());

    let mut keeper = Keeper::new(config, true).unwrap();
    let reports = keeper.poll_at(START + 80_000).await.unwrap();
    assert_eq!(reports[0].status, AuctionStatus::AlertPriceReached);
    assert!(!quotes_path.exists());
}
