use std::collections::BTreeMap;

use crate::config::{AccountsSource, GasPolicy, NetworkProfile, PathRole, RawConfig};
use crate::error::{ValidationError, ValidationErrors, ValidationWarning};
use crate::resolved::{ResolvedAccounts, ResolvedConfig, RpcEndpoint};

/// URL schemes a JSON-RPC endpoint may use.
const RPC_SCHEMES: &[&str] = &["http", "https", "ws", "wss"];

/// Violations and warnings gathered in one validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn warn(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Warnings when no violation was recorded, otherwise every violation.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(ValidationErrors::new(self.errors))
        }
    }
}

/// Configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Checks that hold for the whole configuration, whichever network is active.
    pub fn validate(raw: &RawConfig, profiles: &BTreeMap<String, NetworkProfile>) -> ValidationReport {
        let mut report = ValidationReport::new();

        for profile in profiles.values() {
            Self::validate_profile(profile, &mut report);
        }
        Self::validate_chain_ids(profiles, &mut report);
        Self::validate_roles(raw, profiles, &mut report);
        Self::validate_paths(raw, &mut report);
        Self::validate_tooling(raw, &mut report);

        report
    }

    fn validate_profile(profile: &NetworkProfile, report: &mut ValidationReport) {
        let name = &profile.name;

        if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
            report.error(ValidationError::InvalidNetworkName(name.clone()));
        }

        match profile.chain_id {
            Some(0) => report.error(ValidationError::InvalidChainId(name.clone())),
            None if profile.live => report.error(ValidationError::MissingChainId(name.clone())),
            _ => {}
        }

        if profile.live && !profile.declares_rpc() {
            report.error(ValidationError::MissingRpcUrl(name.clone()));
        }

        if let Some(url) = profile.rpc_url.as_deref().filter(|url| !url.trim().is_empty()) {
            if let Err(reason) = Self::check_rpc_url(url) {
                report.error(ValidationError::InvalidRpcUrl {
                    network: name.clone(),
                    reason,
                });
            }
        }

        if matches!(profile.rpc_url_env.as_deref(), Some(var) if var.trim().is_empty()) {
            report.error(ValidationError::EmptySecretReference {
                network: name.clone(),
            });
        }

        if profile.gas_price == Some(0) {
            report.error(ValidationError::InvalidGasPrice(name.clone()));
        }

        if let Some(multiplier) = profile.gas_multiplier {
            if !multiplier.is_finite() || multiplier <= 0.0 {
                report.error(ValidationError::InvalidGasMultiplier {
                    network: name.clone(),
                    multiplier,
                });
            }
        }

        Self::validate_accounts_source(profile, report);
    }

    fn validate_accounts_source(profile: &NetworkProfile, report: &mut ValidationReport) {
        let empty_reference = |var: &str| var.trim().is_empty();

        let has_empty_reference = match &profile.accounts {
            AccountsSource::Empty => false,
            AccountsSource::PrivateKeys { env } => env.iter().any(|var| empty_reference(var)),
            AccountsSource::Mnemonic(spec) => {
                if spec.count == 0 {
                    report.error(ValidationError::InvalidAccountCount(profile.name.clone()));
                }
                empty_reference(&spec.env)
                    || spec.passphrase_env.as_deref().is_some_and(empty_reference)
            }
        };

        if has_empty_reference {
            report.error(ValidationError::EmptySecretReference {
                network: profile.name.clone(),
            });
        }
    }

    /// Live networks must not share a chain id
    fn validate_chain_ids(profiles: &BTreeMap<String, NetworkProfile>, report: &mut ValidationReport) {
        let mut by_chain: BTreeMap<u64, Vec<String>> = BTreeMap::new();
        for profile in profiles.values().filter(|profile| profile.live) {
            if let Some(chain_id) = profile.chain_id {
                by_chain.entry(chain_id).or_default().push(profile.name.clone());
            }
        }

        for (chain_id, networks) in by_chain {
            if networks.len() > 1 {
                report.error(ValidationError::ChainIdConflict { chain_id, networks });
            }
        }
    }

    fn validate_roles(
        raw: &RawConfig,
        profiles: &BTreeMap<String, NetworkProfile>,
        report: &mut ValidationReport,
    ) {
        for (role, spec) in &raw.named_accounts {
            if role.trim().is_empty() {
                report.error(ValidationError::InvalidRoleName(role.clone()));
            }

            for key in spec.overrides.keys() {
                let known_name = profiles.contains_key(key);
                let known_chain = key.parse::<u64>().is_ok_and(|id| {
                    profiles.values().any(|profile| profile.chain_id == Some(id))
                });

                if !known_name && !known_chain {
                    report.error(ValidationError::UnknownOverrideNetwork {
                        role: role.clone(),
                        key: key.clone(),
                    });
                }
            }
        }
    }

    fn validate_paths(raw: &RawConfig, report: &mut ValidationReport) {
        for role in PathRole::ALL {
            if raw.paths.get(role).as_os_str().is_empty() {
                report.error(ValidationError::EmptyPath(role));
            }
        }
    }

    fn validate_tooling(raw: &RawConfig, report: &mut ValidationReport) {
        if let Some(abi) = &raw.abi_export {
            if abi.path.as_os_str().is_empty() {
                report.error(ValidationError::EmptyAbiExportPath);
            }

            let overlap = abi.overlapping_filters();
            if !overlap.is_empty() {
                report.warn(ValidationWarning::AbiFilterOverlap { contracts: overlap });
            }
        }

        if raw.test.timeout_ms == 0 {
            report.error(ValidationError::InvalidTestTimeout);
        }
    }

    /// Warnings that only matter for the network being activated.
    pub fn network_warnings(profile: &NetworkProfile) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if profile.gas_price.is_some() && profile.gas_multiplier.is_some() {
            warnings.push(ValidationWarning::GasMultiplierIgnored {
                network: profile.name.clone(),
            });
        }

        if profile.live && profile.accounts.is_empty() {
            warnings.push(ValidationWarning::EmptyAccountsOnLiveNetwork {
                network: profile.name.clone(),
            });
        }

        warnings
    }

    /// Check that `url` is an absolute URL with an RPC scheme.
    pub fn check_rpc_url(url: &str) -> Result<(), String> {
        let parsed = url::Url::parse(url.trim()).map_err(|e| e.to_string())?;

        if !RPC_SCHEMES.contains(&parsed.scheme()) {
            return Err(format!("unsupported scheme '{}'", parsed.scheme()));
        }
        if parsed.host_str().is_none() {
            return Err("missing host".to_string());
        }
        Ok(())
    }

    /// Generate a configuration report
    pub fn generate_report(config: &ResolvedConfig) -> String {
        let network = config.network();
        let mut report = String::new();

        report.push_str("Keystone Configuration Report\n");
        report.push_str("=============================\n\n");

        report.push_str(&format!("Network: {}\n", network.name));
        report.push_str(&format!(
            "  Chain Id: {}\n",
            network
                .chain_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "N/A".to_string())
        ));
        report.push_str(&format!(
            "  RPC: {}\n",
            match &network.rpc {
                Some(RpcEndpoint::Literal { url }) => url.clone(),
                Some(RpcEndpoint::Environment { variable, .. }) => format!("${}", variable),
                None => "N/A".to_string(),
            }
        ));
        report.push_str(&format!("  Live: {}\n", network.live));
        report.push_str(&format!(
            "  Persist Deployments: {}\n",
            network.persist_deployments
        ));
        if !network.tags.is_empty() {
            let tags: Vec<&str> = network.tags.iter().map(String::as_str).collect();
            report.push_str(&format!("  Tags: {}\n", tags.join(", ")));
        }
        report.push_str(&format!("  Gas: {}\n", describe_gas(network.gas)));
        report.push_str(&format!("  Accounts: {}\n\n", describe_accounts(&network.accounts)));

        if !config.named_accounts().is_empty() {
            report.push_str("Named Accounts:\n");
            for (role, index) in config.named_accounts() {
                report.push_str(&format!("  {}: {}\n", role, index));
            }
            report.push('\n');
        }

        report.push_str("Compilers:\n");
        for compiler in config.compilers() {
            report.push_str(&format!(
                "  {} (optimizer: {})\n",
                compiler.version,
                match compiler.optimizer_runs {
                    Some(runs) if compiler.optimizer_enabled => format!("{} runs", runs),
                    _ => "off".to_string(),
                }
            ));
        }
        for (source, compiler) in config.compiler_overrides() {
            report.push_str(&format!("  {} -> {}\n", source, compiler.version));
        }
        report.push('\n');

        report.push_str("Paths:\n");
        for (role, path) in config.paths().iter() {
            report.push_str(&format!("  {}: {}\n", role, path.display()));
        }

        if !config.warnings().is_empty() {
            report.push_str("\nWarnings:\n");
            for warning in config.warnings() {
                report.push_str(&format!("  - {}\n", warning));
            }
        }

        report
    }
}

fn describe_gas(gas: GasPolicy) -> String {
    match gas {
        GasPolicy::Fixed { price } => format!("fixed {} wei", price),
        GasPolicy::Estimated { multiplier } => format!("estimated x{}", multiplier),
    }
}

fn describe_accounts(accounts: &ResolvedAccounts) -> String {
    match accounts {
        ResolvedAccounts::Empty => "none (simulation only)".to_string(),
        ResolvedAccounts::PrivateKeys { keys } => format!("{} private key(s)", keys.len()),
        ResolvedAccounts::Mnemonic {
            path,
            count,
            development,
            ..
        } => format!(
            "mnemonic {} x{}{}",
            path,
            count,
            if *development { " (development)" } else { "" }
        ),
    }
}
