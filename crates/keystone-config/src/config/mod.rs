//! Configuration structures and types
pub mod accounts;
pub mod compiler;
pub mod network;
pub mod paths;
pub mod raw;
pub mod tooling;

// Re-export main config types
pub use accounts::{AccountIndex, NamedAccountRole, RoleEntry};
pub use compiler::{CompilerProfile, OptimizerSettings, ResolvedCompiler, DEFAULT_OPTIMIZER_RUNS};
pub use network::{AccountsSource, GasPolicy, MnemonicSpec, NetworkOverlay, NetworkProfile};
pub use paths::{PathLayout, PathRole, ResolvedPaths};
pub use raw::{CompilerEntry, ConfigDocument, PathsEntry, RawConfig};
pub use tooling::{AbiExportSettings, LicenseIdentifierSettings, TestRunnerSettings};
