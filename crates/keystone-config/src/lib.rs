//! Keystone Deployment Configuration
//!
//! This crate loads a declarative contract toolchain configuration, merges the
//! per-network overlays and resolves one active network into an immutable view for the
//! compiler, the deployment broadcaster and the test runner.

pub mod config;
pub mod error;
pub mod loader;
pub mod networks;
pub mod resolved;
pub mod resolver;
pub mod secret;
pub mod utils;

// Re-exports for convenience
pub use config::*;
pub use loader::*;
pub use utils::ConfigUtils;

// Re-export main types
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationErrors, ValidationWarning};
pub use resolved::{ResolvedAccounts, ResolvedConfig, ResolvedNetwork, RpcEndpoint};
pub use resolver::ConfigResolver;
pub use secret::Secret;

// Re-export built-in networks
pub use networks::{BuiltinNetwork, DEVELOPMENT_CHAIN_ID, DEVELOPMENT_MNEMONIC};
