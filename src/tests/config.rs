use crate::config::{ProviderOptions, SyncConfig};
use crate::types::BlockNumber;

fn base_config() -> SyncConfig {
    SyncConfig {
        snapshot_service_url: String::new(),
        chain_id: 1,
        world_contract_address: vec![0x01],
        world_contract_abi: "[]".into(),
        provider_options: ProviderOptions::default(),
        initial_block_number: BlockNumber(0),
    }
}

#[test]
fn empty_url_means_no_snapshot_service() {
    let config = base_config();
    assert!(!config.has_snapshot_service());
    assert!(config.validate().is_ok());
}

#[test]
fn non_empty_url_means_snapshot_service_present() {
    let mut config = base_config();
    config.snapshot_service_url = "https://snapshots.example".into();
    assert!(config.has_snapshot_service());
    assert!(config.validate().is_ok());
}

#[test]
fn whitespace_only_url_fails_validation() {
    let mut config = base_config();
    config.snapshot_service_url = "   ".into();
    assert!(config.validate().is_err());
}

#[test]
fn empty_contract_address_fails_validation() {
    let mut config = base_config();
    config.world_contract_address = Vec::new();
    assert!(config.validate().is_err());
}
