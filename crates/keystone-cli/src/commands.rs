//! CLI subcommand implementations.

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;

use keystone_config::{
    ConfigLoader, ConfigResolver, ConfigUtils, ConfigValidator, ProcessEnv, RawConfig,
    ResolvedConfig,
};

use crate::OutputFormat;

fn load(config: Option<&Path>) -> Result<RawConfig> {
    ConfigLoader::new()
        .load_from(config)
        .context("failed to load configuration")
}

fn resolve_one(config: Option<&Path>, network: &str) -> Result<ResolvedConfig> {
    let raw = load(config)?;
    ConfigResolver::resolve_network(&raw, network, &ProcessEnv)
        .with_context(|| format!("failed to resolve network '{network}'"))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn resolve(config: Option<&Path>, network: &str, format: OutputFormat) -> Result<()> {
    let resolved = resolve_one(config, network)?;
    match format {
        OutputFormat::Text => print!("{}", ConfigValidator::generate_report(&resolved)),
        OutputFormat::Json => print_json(&resolved)?,
    }
    Ok(())
}

pub fn accounts(config: Option<&Path>, network: &str, format: OutputFormat) -> Result<()> {
    let resolved = resolve_one(config, network)?;
    match format {
        OutputFormat::Text => {
            for (role, index) in resolved.named_accounts() {
                println!("{role}: {index}");
            }
        }
        OutputFormat::Json => print_json(resolved.named_accounts())?,
    }
    Ok(())
}

pub fn paths(config: Option<&Path>, network: &str, format: OutputFormat) -> Result<()> {
    let resolved = resolve_one(config, network)?;
    match format {
        OutputFormat::Text => {
            for (role, path) in resolved.paths().iter() {
                println!("{role}: {}", path.display());
            }
        }
        OutputFormat::Json => print_json(resolved.paths())?,
    }
    Ok(())
}

pub fn check(config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let raw = load(config)?;

    let mut failed = 0usize;
    let mut results = Vec::new();
    for network in raw.network_names() {
        match ConfigResolver::resolve_network(&raw, &network, &ProcessEnv) {
            Ok(resolved) => {
                let warnings: Vec<String> =
                    resolved.warnings().iter().map(ToString::to_string).collect();
                if format == OutputFormat::Text {
                    println!("ok      {network} ({} warning(s))", warnings.len());
                    for warning in &warnings {
                        println!("          - {warning}");
                    }
                }
                results.push(json!({ "network": network, "ok": true, "warnings": warnings }));
            }
            Err(e) => {
                failed += 1;
                let errors: Vec<String> = match e.violations() {
                    [] => vec![e.to_string()],
                    violations => violations.iter().map(ToString::to_string).collect(),
                };
                if format == OutputFormat::Text {
                    println!("failed  {network}");
                    for error in &errors {
                        println!("          - {error}");
                    }
                }
                results.push(json!({ "network": network, "ok": false, "errors": errors }));
            }
        }
    }

    if format == OutputFormat::Json {
        print_json(&results)?;
    }

    anyhow::ensure!(failed == 0, "{failed} network(s) failed to resolve");
    Ok(())
}

pub fn template(output: Option<&Path>) -> Result<()> {
    let template = ConfigUtils::generate_template();
    match output {
        Some(path) => {
            anyhow::ensure!(
                !path.exists(),
                "refusing to overwrite existing file {}",
                path.display()
            );
            std::fs::write(path, template)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote configuration template");
        }
        None => print!("{template}"),
    }
    Ok(())
}
