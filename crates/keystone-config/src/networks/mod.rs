//! Built-in network presets
//!
//! These networks exist in every configuration. A `[networks.<name>]` entry with the
//! same name is layered on top of the preset rather than replacing it.

pub mod localhost;
pub mod simulated;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::NetworkOverlay;

/// Chain id used by the in-process development chain.
pub const DEVELOPMENT_CHAIN_ID: u64 = 31337;

/// Publicly known mnemonic funded on development chains.
pub const DEVELOPMENT_MNEMONIC: &str =
    "test test test test test test test test test test test junk";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinNetwork {
    /// In-process chain started by the toolchain itself
    Simulated,
    /// Development node listening on the loopback interface
    Localhost,
}

impl BuiltinNetwork {
    pub const ALL: [BuiltinNetwork; 2] = [BuiltinNetwork::Simulated, BuiltinNetwork::Localhost];

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinNetwork::Simulated => "simulated",
            BuiltinNetwork::Localhost => "localhost",
        }
    }

    pub fn preset(&self) -> NetworkOverlay {
        match self {
            BuiltinNetwork::Simulated => simulated::simulated_preset(),
            BuiltinNetwork::Localhost => localhost::localhost_preset(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|network| network.name() == name)
    }
}

impl fmt::Display for BuiltinNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Preset for `name`, if it names a built-in network.
pub fn preset_for(name: &str) -> Option<NetworkOverlay> {
    BuiltinNetwork::from_name(name).map(|network| network.preset())
}

pub use localhost::localhost_preset;
pub use simulated::simulated_preset;
