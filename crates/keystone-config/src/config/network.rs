use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Environment variable read for mnemonic-derived accounts when none is named.
pub const DEFAULT_MNEMONIC_ENV: &str = "MNEMONIC";

/// BIP-44 path used by EVM wallets.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0";

pub const DEFAULT_ACCOUNT_COUNT: u32 = 20;

/// Network settings as declared in a configuration document.
///
/// Every field is optional so that one overlay can be layered over another; the
/// `[defaults]` section and each `[networks.<name>]` entry share this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkOverlay {
    /// JSON-RPC endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    /// Environment variable whose value replaces `rpc_url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url_env: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts: Option<AccountsSource>,

    /// Transactions have real, non-reversible effect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<bool>,

    /// Deployment records are written to durable storage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_deployments: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,

    /// Fixed gas price in wei; disables estimation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u64>,

    /// Factor applied to the estimated gas price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_multiplier: Option<f64>,
}

impl NetworkOverlay {
    /// Layer `overlay` on top of `self`. Fields set in `overlay` replace the base value
    /// wholesale; nested values (tags, accounts) are never merged.
    pub fn layered_with(&self, overlay: &NetworkOverlay) -> NetworkOverlay {
        NetworkOverlay {
            rpc_url: overlay.rpc_url.clone().or_else(|| self.rpc_url.clone()),
            rpc_url_env: overlay
                .rpc_url_env
                .clone()
                .or_else(|| self.rpc_url_env.clone()),
            chain_id: overlay.chain_id.or(self.chain_id),
            accounts: overlay.accounts.clone().or_else(|| self.accounts.clone()),
            live: overlay.live.or(self.live),
            persist_deployments: overlay.persist_deployments.or(self.persist_deployments),
            tags: overlay.tags.clone().or_else(|| self.tags.clone()),
            gas_price: overlay.gas_price.or(self.gas_price),
            gas_multiplier: overlay.gas_multiplier.or(self.gas_multiplier),
        }
    }
}

/// Where a network's signing accounts come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum AccountsSource {
    /// Unfunded; simulation only
    #[serde(rename = "none")]
    Empty,

    /// Ordered list of environment variables, each holding one private key
    PrivateKeys { env: Vec<String> },

    /// Accounts derived from a mnemonic phrase
    Mnemonic(MnemonicSpec),
}

impl AccountsSource {
    pub fn is_empty(&self) -> bool {
        matches!(self, AccountsSource::Empty)
            || matches!(self, AccountsSource::PrivateKeys { env } if env.is_empty())
    }

    /// Number of accounts the source provides; `None` for empty sources.
    pub fn declared_count(&self) -> Option<u32> {
        match self {
            AccountsSource::Empty => None,
            AccountsSource::PrivateKeys { env } if env.is_empty() => None,
            AccountsSource::PrivateKeys { env } => {
                Some(u32::try_from(env.len()).unwrap_or(u32::MAX))
            }
            AccountsSource::Mnemonic(spec) => Some(spec.count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MnemonicSpec {
    /// Environment variable holding the phrase
    #[serde(default = "default_mnemonic_env")]
    pub env: String,

    #[serde(default = "default_derivation_path")]
    pub path: String,

    #[serde(default)]
    pub initial_index: u32,

    /// Number of accounts derived
    #[serde(default = "default_account_count")]
    pub count: u32,

    /// Environment variable holding an optional BIP-39 passphrase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase_env: Option<String>,
}

impl Default for MnemonicSpec {
    fn default() -> Self {
        Self {
            env: default_mnemonic_env(),
            path: default_derivation_path(),
            initial_index: 0,
            count: DEFAULT_ACCOUNT_COUNT,
            passphrase_env: None,
        }
    }
}

fn default_mnemonic_env() -> String {
    DEFAULT_MNEMONIC_ENV.to_string()
}

fn default_derivation_path() -> String {
    DEFAULT_DERIVATION_PATH.to_string()
}

fn default_account_count() -> u32 {
    DEFAULT_ACCOUNT_COUNT
}

/// A network after all overlays have been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkProfile {
    pub name: String,
    pub rpc_url: Option<String>,
    pub rpc_url_env: Option<String>,
    pub chain_id: Option<u64>,
    pub accounts: AccountsSource,
    pub live: bool,
    pub persist_deployments: bool,
    pub tags: BTreeSet<String>,
    pub gas_price: Option<u64>,
    pub gas_multiplier: Option<f64>,
}

impl NetworkProfile {
    /// Fill every field left unset by the overlay chain.
    ///
    /// Networks are not live unless declared so, and persist deployments exactly when
    /// they are live unless told otherwise.
    pub fn from_overlay(name: impl Into<String>, overlay: NetworkOverlay) -> Self {
        let live = overlay.live.unwrap_or(false);
        Self {
            name: name.into(),
            rpc_url: overlay.rpc_url,
            rpc_url_env: overlay.rpc_url_env,
            chain_id: overlay.chain_id,
            accounts: overlay.accounts.unwrap_or(AccountsSource::Empty),
            live,
            persist_deployments: overlay.persist_deployments.unwrap_or(live),
            tags: overlay.tags.unwrap_or_default(),
            gas_price: overlay.gas_price,
            gas_multiplier: overlay.gas_multiplier,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether an RPC endpoint is declared, literally or through the environment.
    pub fn declares_rpc(&self) -> bool {
        self.rpc_url.as_deref().is_some_and(|url| !url.trim().is_empty())
            || self.rpc_url_env.is_some()
    }

    pub fn gas_policy(&self) -> GasPolicy {
        match (self.gas_price, self.gas_multiplier) {
            (Some(price), _) => GasPolicy::Fixed { price },
            (None, Some(multiplier)) => GasPolicy::Estimated { multiplier },
            (None, None) => GasPolicy::default(),
        }
    }
}

/// How the broadcaster prices transactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GasPolicy {
    /// Explicit price in wei; no estimation
    Fixed { price: u64 },
    /// Estimated price scaled by `multiplier`
    Estimated { multiplier: f64 },
}

impl Default for GasPolicy {
    fn default() -> Self {
        GasPolicy::Estimated { multiplier: 1.0 }
    }
}
