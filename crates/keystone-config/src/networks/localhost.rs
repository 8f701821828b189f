use crate::config::{AccountsSource, MnemonicSpec, NetworkOverlay};

use super::DEVELOPMENT_CHAIN_ID;

/// Create the loopback development node preset
pub fn localhost_preset() -> NetworkOverlay {
    NetworkOverlay {
        rpc_url: Some("http://127.0.0.1:8545".to_string()),
        chain_id: Some(DEVELOPMENT_CHAIN_ID),
        accounts: Some(AccountsSource::Mnemonic(MnemonicSpec::default())),
        live: Some(false),
        ..Default::default()
    }
}
