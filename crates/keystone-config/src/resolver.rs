//! Network resolution
//!
//! Turns a [`RawConfig`] plus an environment source into a [`ResolvedConfig`] scoped to
//! one active network. Every violation is collected before failing, and the raw
//! configuration is only ever borrowed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::paths::resolve_against;
use crate::config::{
    AccountIndex, AccountsSource, CompilerProfile, ConfigDocument, NetworkProfile, RawConfig,
    ResolvedCompiler,
};
use crate::error::{ConfigError, ConfigResult, ValidationError, ValidationWarning};
use crate::loader::{ConfigValidator, EnvSource, ValidationReport};
use crate::networks::DEVELOPMENT_MNEMONIC;
use crate::resolved::{ResolvedAccounts, ResolvedConfig, ResolvedNetwork, RpcEndpoint};
use crate::secret::Secret;

/// Entry point for loading and resolving configurations.
pub struct ConfigResolver;

impl ConfigResolver {
    /// Structural load of a parsed document. Relative paths resolve against `root`.
    pub fn load(document: ConfigDocument, root: impl Into<PathBuf>) -> ConfigResult<RawConfig> {
        RawConfig::from_document(document, root)
    }

    /// Merge, validate and resolve `network` against `env`.
    pub fn resolve_network<E: EnvSource + ?Sized>(
        raw: &RawConfig,
        network: &str,
        env: &E,
    ) -> ConfigResult<ResolvedConfig> {
        let active = raw.profile(network).ok_or_else(|| {
            ConfigError::Resolution(vec![ValidationError::UnknownNetwork(network.to_string())].into())
        })?;

        let _span = tracing::debug_span!("resolve_network", network).entered();
        tracing::debug!(live = active.live, chain_id = ?active.chain_id, "Merged network profile");

        let profiles = raw.profiles();
        let mut report = ConfigValidator::validate(raw, &profiles);

        let rpc = Self::resolve_rpc(&active, env, &mut report);
        let accounts = Self::resolve_accounts(&active, env, &mut report);
        let named_accounts = Self::resolve_roles(raw, &active, &mut report);
        for warning in ConfigValidator::network_warnings(&active) {
            report.warn(warning);
        }
        let (compilers, compiler_overrides) = Self::resolve_compilers(raw, &mut report);

        let warnings = report.into_result().map_err(ConfigError::Resolution)?;
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        let abi_export = raw.abi_export.clone().map(|mut abi| {
            abi.path = resolve_against(&raw.root, &abi.path);
            abi
        });

        let resolved = ResolvedConfig {
            root: raw.root.clone(),
            network: ResolvedNetwork {
                gas: active.gas_policy(),
                name: active.name,
                chain_id: active.chain_id,
                rpc,
                accounts,
                live: active.live,
                persist_deployments: active.persist_deployments,
                tags: active.tags,
            },
            named_accounts,
            compilers,
            compiler_overrides,
            paths: raw.paths.resolve(&raw.root),
            abi_export,
            test: raw.test.clone(),
            license_identifier: raw.license_identifier.clone(),
            warnings,
        };

        tracing::info!(
            network = %resolved.network.name,
            live = resolved.network.live,
            warnings = resolved.warnings.len(),
            "Resolved network configuration"
        );
        Ok(resolved)
    }

    /// Index of `role` on the resolved network.
    pub fn lookup_account(resolved: &ResolvedConfig, role: &str) -> ConfigResult<AccountIndex> {
        resolved.lookup_account(role)
    }

    /// Absolute directory for a logical path role.
    pub fn lookup_path<'a>(resolved: &'a ResolvedConfig, role: &str) -> ConfigResult<&'a Path> {
        resolved.lookup_path(role)
    }

    fn resolve_rpc<E: EnvSource + ?Sized>(
        profile: &NetworkProfile,
        env: &E,
        report: &mut ValidationReport,
    ) -> Option<RpcEndpoint> {
        let literal = profile
            .rpc_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| RpcEndpoint::Literal {
                url: url.to_string(),
            });

        let variable = match profile.rpc_url_env.as_deref().map(str::trim) {
            Some(variable) if !variable.is_empty() => variable,
            _ => return literal,
        };

        match env.lookup(variable) {
            Some(url) => {
                if let Err(reason) = ConfigValidator::check_rpc_url(&url) {
                    report.error(ValidationError::InvalidRpcUrl {
                        network: profile.name.clone(),
                        reason,
                    });
                }
                Some(RpcEndpoint::Environment {
                    variable: variable.to_string(),
                    url: Secret::new(url.trim()),
                })
            }
            None if literal.is_some() => {
                tracing::debug!(variable, "RPC override not set, using declared url");
                literal
            }
            None if profile.live => {
                report.error(ValidationError::MissingCredential {
                    network: profile.name.clone(),
                    variable: variable.to_string(),
                });
                None
            }
            None => None,
        }
    }

    fn resolve_accounts<E: EnvSource + ?Sized>(
        profile: &NetworkProfile,
        env: &E,
        report: &mut ValidationReport,
    ) -> ResolvedAccounts {
        let mut missing = |variable: &str| {
            report.error(ValidationError::MissingCredential {
                network: profile.name.clone(),
                variable: variable.to_string(),
            });
        };

        match &profile.accounts {
            AccountsSource::Empty => ResolvedAccounts::Empty,
            AccountsSource::PrivateKeys { env: variables } => {
                let mut keys = Vec::with_capacity(variables.len());
                for variable in variables.iter().filter(|v| !v.trim().is_empty()) {
                    match env.lookup(variable) {
                        Some(key) => keys.push(Secret::new(key.trim())),
                        None => missing(variable),
                    }
                }
                ResolvedAccounts::PrivateKeys { keys }
            }
            AccountsSource::Mnemonic(spec) => {
                let (phrase, development) = match env.lookup(&spec.env) {
                    Some(phrase) => (Secret::new(phrase.trim()), false),
                    None if !profile.live => {
                        tracing::debug!(
                            variable = %spec.env,
                            "Mnemonic not set, using the development mnemonic"
                        );
                        (Secret::new(DEVELOPMENT_MNEMONIC), true)
                    }
                    None => {
                        missing(&spec.env);
                        (Secret::new(String::new()), false)
                    }
                };

                let passphrase = match spec.passphrase_env.as_deref().map(str::trim) {
                    Some(variable) if !variable.is_empty() => match env.lookup(variable) {
                        Some(passphrase) => Some(Secret::new(passphrase)),
                        None if profile.live => {
                            missing(variable);
                            None
                        }
                        None => None,
                    },
                    _ => None,
                };

                ResolvedAccounts::Mnemonic {
                    phrase,
                    passphrase,
                    path: spec.path.clone(),
                    initial_index: spec.initial_index,
                    count: spec.count,
                    development,
                }
            }
        }
    }

    fn resolve_roles(
        raw: &RawConfig,
        profile: &NetworkProfile,
        report: &mut ValidationReport,
    ) -> BTreeMap<String, AccountIndex> {
        let available = profile.accounts.declared_count();
        let mut resolved = BTreeMap::new();
        let mut by_index: BTreeMap<AccountIndex, Vec<String>> = BTreeMap::new();

        for (role, spec) in &raw.named_accounts {
            let index = spec.index_for(&profile.name, profile.chain_id);

            if let Some(available) = available.filter(|available| index >= *available) {
                report.error(ValidationError::AccountIndexOutOfRange {
                    role: role.clone(),
                    network: profile.name.clone(),
                    index,
                    available,
                });
            }

            by_index.entry(index).or_default().push(role.clone());
            resolved.insert(role.clone(), index);
        }

        if profile.live {
            for (index, roles) in by_index.into_iter().filter(|(_, roles)| roles.len() > 1) {
                report.warn(ValidationWarning::SharedAccountIndex {
                    network: profile.name.clone(),
                    index,
                    roles,
                });
            }
        }

        resolved
    }

    fn resolve_compilers(
        raw: &RawConfig,
        report: &mut ValidationReport,
    ) -> (Vec<ResolvedCompiler>, BTreeMap<String, ResolvedCompiler>) {
        let mut resolve = |profile: &CompilerProfile| match profile.resolve() {
            Ok((compiler, warning)) => {
                if let Some(warning) = warning {
                    report.warn(warning);
                }
                Some(compiler)
            }
            Err(error) => {
                report.error(error);
                None
            }
        };

        let compilers = raw.compilers.iter().filter_map(&mut resolve).collect();
        let overrides = raw
            .compiler_overrides
            .iter()
            .filter_map(|(source, profile)| resolve(profile).map(|c| (source.clone(), c)))
            .collect();

        (compilers, overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MapEnv;

    fn raw(source: &str) -> RawConfig {
        ConfigResolver::load(toml::from_str(source).unwrap(), "/work/project").unwrap()
    }

    const BASE: &str = r#"
        [[compilers]]
        version = "0.8.3"
        optimizer = { enabled = true, runs = 200 }

        [paths]
        sources = "contracts"

        [named_accounts]
        deployer = 0
        treasury = { default = 1, overrides = { staging = 0 } }

        [networks.local]
        rpc_url = "http://127.0.0.1:8545"

        [networks.staging]
        rpc_url = "https://data-seed-prebsc-1-s1.binance.org:8545"
        chain_id = 97
        live = true
        accounts = { kind = "mnemonic", env = "STAGING_MNEMONIC", count = 5 }
    "#;

    #[test]
    fn test_unknown_network_is_reported_alone() {
        let raw = raw(BASE);
        let err = ConfigResolver::resolve_network(&raw, "unknown-net", &MapEnv::new()).unwrap_err();
        assert_eq!(
            err.violations(),
            &[ValidationError::UnknownNetwork("unknown-net".to_string())]
        );
    }

    #[test]
    fn test_development_mnemonic_only_off_live_networks() {
        let raw = raw(BASE);
        let resolved = ConfigResolver::resolve_network(&raw, "simulated", &MapEnv::new()).unwrap();
        match &resolved.network().accounts {
            ResolvedAccounts::Mnemonic {
                phrase, development, ..
            } => {
                assert!(*development);
                assert_eq!(phrase.expose(), DEVELOPMENT_MNEMONIC);
            }
            other => panic!("unexpected accounts: {:?}", other),
        }

        let err = ConfigResolver::resolve_network(&raw, "staging", &MapEnv::new()).unwrap_err();
        assert!(err.violations().contains(&ValidationError::MissingCredential {
            network: "staging".to_string(),
            variable: "STAGING_MNEMONIC".to_string(),
        }));
    }

    #[test]
    fn test_shared_index_warning_on_live_network() {
        let raw = raw(BASE);
        let env = MapEnv::new().with("STAGING_MNEMONIC", "word ".repeat(12));
        let resolved = ConfigResolver::resolve_network(&raw, "staging", &env).unwrap();
        assert_eq!(resolved.lookup_account("treasury").unwrap(), 0);
        assert_eq!(
            resolved.warnings(),
            &[ValidationWarning::SharedAccountIndex {
                network: "staging".to_string(),
                index: 0,
                roles: vec!["deployer".to_string(), "treasury".to_string()],
            }]
        );

        let local = ConfigResolver::resolve_network(&raw, "local", &env).unwrap();
        assert!(local.warnings().is_empty());
    }

    #[test]
    fn test_index_beyond_declared_accounts() {
        let source = format!("{}\n{}", BASE, "[named_accounts.operator]\ndefault = 7");
        let raw = raw(&source);
        let env = MapEnv::new().with("STAGING_MNEMONIC", "word ".repeat(12));
        let err = ConfigResolver::resolve_network(&raw, "staging", &env).unwrap_err();
        assert!(err
            .violations()
            .contains(&ValidationError::AccountIndexOutOfRange {
                role: "operator".to_string(),
                network: "staging".to_string(),
                index: 7,
                available: 5,
            }));

        // `local` has no accounts; indices are not bounded
        assert!(ConfigResolver::resolve_network(&raw, "local", &env).is_ok());
    }

    #[test]
    fn test_rpc_override_from_environment() {
        let source = BASE.replace(
            "chain_id = 97",
            "chain_id = 97\n        rpc_url_env = \"STAGING_RPC_URL\"",
        );
        let raw = raw(&source);
        let env = MapEnv::new()
            .with("STAGING_MNEMONIC", "word ".repeat(12))
            .with("STAGING_RPC_URL", "https://rpc.example.org/v1/secret-key");

        let resolved = ConfigResolver::resolve_network(&raw, "staging", &env).unwrap();
        let rpc = resolved.network().rpc.as_ref().unwrap();
        assert_eq!(rpc.url(), "https://rpc.example.org/v1/secret-key");
        assert!(!format!("{:?}", rpc).contains("secret-key"));

        // Unset override falls back to the declared url
        let env = MapEnv::new().with("STAGING_MNEMONIC", "word ".repeat(12));
        let resolved = ConfigResolver::resolve_network(&raw, "staging", &env).unwrap();
        assert!(matches!(
            resolved.network().rpc,
            Some(RpcEndpoint::Literal { .. })
        ));
    }

    #[test]
    fn test_private_keys_require_every_variable() {
        let source = format!(
            "{}\n{}",
            BASE,
            r#"
            [networks.bsc]
            rpc_url = "https://bsc-dataseed.binance.org"
            chain_id = 56
            live = true
            accounts = { kind = "private_keys", env = ["BSC_KEY_0", "BSC_KEY_1"] }
            "#
        );
        let raw = raw(&source);
        let env = MapEnv::new().with("BSC_KEY_0", "0xabc");
        let err = ConfigResolver::resolve_network(&raw, "bsc", &env).unwrap_err();
        assert_eq!(
            err.violations(),
            &[ValidationError::MissingCredential {
                network: "bsc".to_string(),
                variable: "BSC_KEY_1".to_string(),
            }]
        );
    }

    #[test]
    fn test_compiler_overrides_resolved() {
        let source = format!(
            "{}\n{}",
            BASE,
            r#"
            [compiler_overrides."contracts/Legacy.sol"]
            version = "0.6.12"
            optimizer = { enabled = false, runs = 50 }
            "#
        );
        let raw = raw(&source);
        let resolved = ConfigResolver::resolve_network(&raw, "local", &MapEnv::new()).unwrap();
        let legacy = resolved.compiler_for("contracts/Legacy.sol");
        assert_eq!(legacy.version, semver::Version::new(0, 6, 12));
        assert_eq!(legacy.optimizer_runs, None);
        assert_eq!(
            resolved.compiler_for("contracts/Token.sol").version,
            semver::Version::new(0, 8, 3)
        );
        assert!(matches!(
            resolved.warnings(),
            [ValidationWarning::InvalidOptimizerSettings { runs: 50, .. }]
        ));
    }

    #[test]
    fn test_raw_config_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RawConfig>();
        assert_send_sync::<ResolvedConfig>();
    }
}
