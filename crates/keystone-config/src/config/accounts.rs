use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position in the active network's derived account list.
pub type AccountIndex = u32;

/// A semantic account slot such as `deployer` or `treasury`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedAccountRole {
    /// Index used on every network without an override
    #[serde(rename = "default")]
    pub default_index: AccountIndex,

    /// Per-network indices, keyed by network name or decimal chain id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, AccountIndex>,
}

impl NamedAccountRole {
    pub fn new(default_index: AccountIndex) -> Self {
        Self {
            default_index,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_override(mut self, key: impl Into<String>, index: AccountIndex) -> Self {
        self.overrides.insert(key.into(), index);
        self
    }

    /// Index on `network`. A name override wins over a chain id override.
    pub fn index_for(&self, network: &str, chain_id: Option<u64>) -> AccountIndex {
        if let Some(index) = self.overrides.get(network) {
            return *index;
        }

        chain_id
            .and_then(|id| self.overrides.get(&id.to_string()))
            .copied()
            .unwrap_or(self.default_index)
    }
}

/// A role as written in a document: either a bare index or a full table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleEntry {
    Index(AccountIndex),
    Full(NamedAccountRole),
}

impl From<RoleEntry> for NamedAccountRole {
    fn from(entry: RoleEntry) -> Self {
        match entry {
            RoleEntry::Index(index) => NamedAccountRole::new(index),
            RoleEntry::Full(role) => role,
        }
    }
}
