use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::config::PathRole;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Malformed configuration: {0}")]
    MalformedConfig(String),

    #[error("Unknown account role: {0}")]
    UnknownRole(String),

    #[error("Unknown path role: {0}")]
    UnknownPathRole(String),

    #[error("Configuration resolution failed: {0}")]
    Resolution(ValidationErrors),
}

impl ConfigError {
    /// Violations carried by a failed resolution; empty for every other error.
    pub fn violations(&self) -> &[ValidationError] {
        match self {
            ConfigError::Resolution(errors) => errors.as_slice(),
            _ => &[],
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A single violation found while resolving a configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Invalid network name: {0:?}")]
    InvalidNetworkName(String),

    #[error("Network '{network}' requires environment variable {variable}")]
    MissingCredential { network: String, variable: String },

    #[error("Network '{network}' declares an empty secret reference")]
    EmptySecretReference { network: String },

    #[error("Chain id {chain_id} is shared by live networks: {}", .networks.join(", "))]
    ChainIdConflict { chain_id: u64, networks: Vec<String> },

    #[error("Live network '{0}' has no RPC url")]
    MissingRpcUrl(String),

    #[error("Live network '{0}' has no chain id")]
    MissingChainId(String),

    #[error("Network '{0}' declares chain id 0")]
    InvalidChainId(String),

    #[error("Network '{network}' has an invalid RPC url: {reason}")]
    InvalidRpcUrl { network: String, reason: String },

    #[error("Network '{0}' declares a gas price of 0")]
    InvalidGasPrice(String),

    #[error("Network '{network}' declares an invalid gas multiplier {multiplier}")]
    InvalidGasMultiplier { network: String, multiplier: f64 },

    #[error("Network '{0}' derives zero accounts from its mnemonic")]
    InvalidAccountCount(String),

    #[error("Invalid account role name: {0:?}")]
    InvalidRoleName(String),

    #[error("Role '{role}' overrides unknown network '{key}'")]
    UnknownOverrideNetwork { role: String, key: String },

    #[error("Role '{role}' resolves to index {index} but network '{network}' provides {available} accounts")]
    AccountIndexOutOfRange {
        role: String,
        network: String,
        index: u32,
        available: u32,
    },

    #[error("Invalid compiler version '{version}': {reason}")]
    InvalidCompilerVersion { version: String, reason: String },

    #[error("Compiler {version} enables the optimizer with 0 runs")]
    InvalidOptimizerRuns { version: String },

    #[error("Path for '{0}' is empty")]
    EmptyPath(PathRole),

    #[error("ABI export path is empty")]
    EmptyAbiExportPath,

    #[error("Test timeout must be greater than 0")]
    InvalidTestTimeout,
}

/// Every violation found during one resolution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

/// Non-fatal findings attached to a successful resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// Optimizer runs were set while the optimizer is disabled; the runs value is ignored.
    InvalidOptimizerSettings { version: String, runs: u32 },

    /// Several roles share one account on a live network.
    SharedAccountIndex {
        network: String,
        index: u32,
        roles: Vec<String>,
    },

    /// A live network without accounts can only be used for read-only simulation.
    EmptyAccountsOnLiveNetwork { network: String },

    /// An explicit gas price disables estimation, so the multiplier never applies.
    GasMultiplierIgnored { network: String },

    /// Contracts listed in both `only` and `except` of the ABI export.
    AbiFilterOverlap { contracts: Vec<String> },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::InvalidOptimizerSettings { version, runs } => write!(
                f,
                "Compiler {} sets {} optimizer runs while the optimizer is disabled; runs ignored",
                version, runs
            ),
            ValidationWarning::SharedAccountIndex {
                network,
                index,
                roles,
            } => write!(
                f,
                "Roles {} share account index {} on live network '{}'",
                roles.join(", "),
                index,
                network
            ),
            ValidationWarning::EmptyAccountsOnLiveNetwork { network } => write!(
                f,
                "Live network '{}' has no accounts and is usable for simulation only",
                network
            ),
            ValidationWarning::GasMultiplierIgnored { network } => write!(
                f,
                "Network '{}' sets an explicit gas price; gas multiplier ignored",
                network
            ),
            ValidationWarning::AbiFilterOverlap { contracts } => write!(
                f,
                "ABI export lists {} in both only and except",
                contracts.join(", ")
            ),
        }
    }
}
