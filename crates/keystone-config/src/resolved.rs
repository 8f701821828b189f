use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::config::{
    AbiExportSettings, AccountIndex, GasPolicy, LicenseIdentifierSettings, PathRole,
    ResolvedCompiler, ResolvedPaths, TestRunnerSettings,
};
use crate::error::{ConfigError, ConfigResult, ValidationWarning};
use crate::secret::Secret;

/// Fully merged and validated configuration scoped to one active network.
///
/// Built by [`ConfigResolver::resolve_network`](crate::ConfigResolver::resolve_network)
/// and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub(crate) root: PathBuf,
    pub(crate) network: ResolvedNetwork,
    pub(crate) named_accounts: BTreeMap<String, AccountIndex>,
    pub(crate) compilers: Vec<ResolvedCompiler>,
    pub(crate) compiler_overrides: BTreeMap<String, ResolvedCompiler>,
    pub(crate) paths: ResolvedPaths,
    pub(crate) abi_export: Option<AbiExportSettings>,
    pub(crate) test: TestRunnerSettings,
    pub(crate) license_identifier: LicenseIdentifierSettings,
    pub(crate) warnings: Vec<ValidationWarning>,
}

/// The active network as the deployment broadcaster sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedNetwork {
    pub name: String,
    pub chain_id: Option<u64>,
    pub rpc: Option<RpcEndpoint>,
    pub accounts: ResolvedAccounts,
    pub live: bool,
    pub persist_deployments: bool,
    pub tags: BTreeSet<String>,
    pub gas: GasPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RpcEndpoint {
    /// Written in the configuration document
    Literal { url: String },
    /// Read from the environment; may embed provider credentials
    Environment { variable: String, url: Secret },
}

impl RpcEndpoint {
    pub fn url(&self) -> &str {
        match self {
            RpcEndpoint::Literal { url } => url,
            RpcEndpoint::Environment { url, .. } => url.expose(),
        }
    }
}

/// Account material for the signing collaborator. Nothing is derived here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedAccounts {
    #[serde(rename = "none")]
    Empty,
    PrivateKeys { keys: Vec<Secret> },
    Mnemonic {
        phrase: Secret,
        passphrase: Option<Secret>,
        path: String,
        initial_index: u32,
        count: u32,
        /// The phrase is the public development mnemonic
        development: bool,
    },
}

impl ResolvedConfig {
    /// Concrete account index for `role` on the active network.
    pub fn lookup_account(&self, role: &str) -> ConfigResult<AccountIndex> {
        self.named_accounts
            .get(role)
            .copied()
            .ok_or_else(|| ConfigError::UnknownRole(role.to_string()))
    }

    /// Absolute directory for a logical role name such as `"sources"`.
    pub fn lookup_path(&self, role: &str) -> ConfigResult<&Path> {
        let role: PathRole = role.parse()?;
        Ok(self.path(role))
    }

    pub fn path(&self, role: PathRole) -> &Path {
        self.paths.get(role)
    }

    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn network(&self) -> &ResolvedNetwork {
        &self.network
    }

    pub fn named_accounts(&self) -> &BTreeMap<String, AccountIndex> {
        &self.named_accounts
    }

    pub fn compilers(&self) -> &[ResolvedCompiler] {
        &self.compilers
    }

    pub fn primary_compiler(&self) -> &ResolvedCompiler {
        // Loading rejects documents without compilers
        &self.compilers[0]
    }

    /// Compiler settings for one source file, falling back to the primary compiler.
    pub fn compiler_for(&self, source: &str) -> &ResolvedCompiler {
        self.compiler_overrides
            .get(source)
            .unwrap_or_else(|| self.primary_compiler())
    }

    pub fn compiler_overrides(&self) -> &BTreeMap<String, ResolvedCompiler> {
        &self.compiler_overrides
    }

    pub fn abi_export(&self) -> Option<&AbiExportSettings> {
        self.abi_export.as_ref()
    }

    pub fn test(&self) -> &TestRunnerSettings {
        &self.test
    }

    pub fn license_identifier(&self) -> &LicenseIdentifierSettings {
        &self.license_identifier
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.network.tags.contains(tag)
    }

    /// Directory receiving deployment records for the active network, if it keeps any.
    pub fn deployments_dir(&self) -> Option<PathBuf> {
        self.network
            .persist_deployments
            .then(|| self.path(PathRole::Deployments).join(&self.network.name))
    }
}
