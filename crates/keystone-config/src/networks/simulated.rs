use crate::config::{AccountsSource, MnemonicSpec, NetworkOverlay};

use super::DEVELOPMENT_CHAIN_ID;

/// Create the in-process simulated network preset
pub fn simulated_preset() -> NetworkOverlay {
    NetworkOverlay {
        chain_id: Some(DEVELOPMENT_CHAIN_ID),
        accounts: Some(AccountsSource::Mnemonic(MnemonicSpec::default())),
        live: Some(false),
        persist_deployments: Some(false),
        ..Default::default()
    }
}
