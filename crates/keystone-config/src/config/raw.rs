use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};
use crate::networks::{self, BuiltinNetwork};

use super::*;

/// Configuration document exactly as written on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigDocument {
    /// Global default profile inherited by every network
    pub defaults: NetworkOverlay,

    pub networks: BTreeMap<String, NetworkOverlay>,

    pub named_accounts: BTreeMap<String, RoleEntry>,

    pub compilers: Vec<CompilerEntry>,

    /// Dedicated compiler settings for individual source files
    pub compiler_overrides: BTreeMap<String, CompilerEntry>,

    pub paths: Option<PathsEntry>,

    pub abi_export: Option<AbiExportSettings>,

    pub test: TestRunnerSettings,

    pub license_identifier: LicenseIdentifierSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerEntry {
    pub version: Option<String>,
    pub optimizer: OptimizerSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsEntry {
    pub sources: Option<PathBuf>,
    pub tests: Option<PathBuf>,
    pub artifacts: Option<PathBuf>,
    pub cache: Option<PathBuf>,
    pub deploy: Option<PathBuf>,
    pub deployments: Option<PathBuf>,
    pub imports: Option<PathBuf>,
}

impl CompilerEntry {
    fn into_profile(self, location: &str) -> ConfigResult<CompilerProfile> {
        let version = self
            .version
            .ok_or_else(|| ConfigError::MalformedConfig(format!("{}.version is required", location)))?;
        Ok(CompilerProfile {
            version,
            optimizer: self.optimizer,
        })
    }
}

impl PathsEntry {
    fn into_layout(self) -> ConfigResult<PathLayout> {
        let sources = self
            .sources
            .ok_or_else(|| ConfigError::MalformedConfig("paths.sources is required".to_string()))?;

        let mut layout = PathLayout::with_sources(sources);
        if let Some(tests) = self.tests {
            layout.tests = tests;
        }
        if let Some(artifacts) = self.artifacts {
            layout.artifacts = artifacts;
        }
        if let Some(cache) = self.cache {
            layout.cache = cache;
        }
        if let Some(deploy) = self.deploy {
            layout.deploy = deploy;
        }
        if let Some(deployments) = self.deployments {
            layout.deployments = deployments;
        }
        if let Some(imports) = self.imports {
            layout.imports = imports;
        }
        Ok(layout)
    }
}

/// Structurally complete but unvalidated configuration.
///
/// Never mutated by resolution, so one handle can back any number of
/// [`ConfigResolver::resolve_network`](crate::ConfigResolver::resolve_network) calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RawConfig {
    /// Absolute directory every relative path is resolved against
    pub root: PathBuf,
    pub defaults: NetworkOverlay,
    pub networks: BTreeMap<String, NetworkOverlay>,
    pub named_accounts: BTreeMap<String, NamedAccountRole>,
    /// Never empty; the first entry is the primary compiler
    pub compilers: Vec<CompilerProfile>,
    pub compiler_overrides: BTreeMap<String, CompilerProfile>,
    pub paths: PathLayout,
    pub abi_export: Option<AbiExportSettings>,
    pub test: TestRunnerSettings,
    pub license_identifier: LicenseIdentifierSettings,
}

impl RawConfig {
    /// Check structural completeness of a parsed document.
    pub fn from_document(document: ConfigDocument, root: impl Into<PathBuf>) -> ConfigResult<Self> {
        let root = std::path::absolute(root.into())?;

        let paths = document
            .paths
            .ok_or_else(|| ConfigError::MalformedConfig("paths.sources is required".to_string()))?
            .into_layout()?;

        if document.compilers.is_empty() {
            return Err(ConfigError::MalformedConfig(
                "at least one compiler must be declared".to_string(),
            ));
        }

        let compilers = document
            .compilers
            .into_iter()
            .enumerate()
            .map(|(i, entry)| entry.into_profile(&format!("compilers[{}]", i)))
            .collect::<ConfigResult<Vec<_>>>()?;

        let compiler_overrides = document
            .compiler_overrides
            .into_iter()
            .map(|(source, entry)| {
                let profile = entry.into_profile(&format!("compiler_overrides.\"{}\"", source))?;
                Ok((source, profile))
            })
            .collect::<ConfigResult<BTreeMap<_, _>>>()?;

        let named_accounts = document
            .named_accounts
            .into_iter()
            .map(|(name, entry)| (name, entry.into()))
            .collect();

        Ok(Self {
            root,
            defaults: document.defaults,
            networks: document.networks,
            named_accounts,
            compilers,
            compiler_overrides,
            paths,
            abi_export: document.abi_export,
            test: document.test,
            license_identifier: document.license_identifier,
        })
    }

    /// Declared networks plus the built-in presets.
    pub fn network_names(&self) -> BTreeSet<String> {
        BuiltinNetwork::ALL
            .iter()
            .map(|network| network.name().to_string())
            .chain(self.networks.keys().cloned())
            .collect()
    }

    pub fn contains_network(&self, name: &str) -> bool {
        self.networks.contains_key(name) || BuiltinNetwork::from_name(name).is_some()
    }

    /// Merge one network: declared overlay > built-in preset > `[defaults]`.
    pub fn profile(&self, name: &str) -> Option<NetworkProfile> {
        if !self.contains_network(name) {
            return None;
        }

        let mut merged = self.defaults.clone();
        if let Some(preset) = networks::preset_for(name) {
            merged = merged.layered_with(&preset);
        }
        if let Some(overlay) = self.networks.get(name) {
            merged = merged.layered_with(overlay);
        }
        Some(NetworkProfile::from_overlay(name, merged))
    }

    /// Merge every network.
    pub fn profiles(&self) -> BTreeMap<String, NetworkProfile> {
        self.network_names()
            .into_iter()
            .filter_map(|name| self.profile(&name).map(|profile| (name, profile)))
            .collect()
    }

    pub fn networks_with_tag(&self, tag: &str) -> Vec<String> {
        self.profiles()
            .into_values()
            .filter(|profile| profile.has_tag(tag))
            .map(|profile| profile.name)
            .collect()
    }

    pub fn primary_compiler(&self) -> &CompilerProfile {
        &self.compilers[0]
    }
}
