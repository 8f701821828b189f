use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ABI export performed after compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AbiExportSettings {
    /// Output directory, relative to the configuration root
    pub path: PathBuf,

    /// Remove stale files before exporting
    pub clear: bool,

    /// Write every ABI into `path` without mirroring the source tree
    pub flat: bool,

    /// Contract name patterns to include (empty includes all)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub only: Vec<String>,

    /// Contract name patterns to skip
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub except: Vec<String>,
}

impl Default for AbiExportSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("abi"),
            clear: false,
            flat: false,
            only: Vec::new(),
            except: Vec::new(),
        }
    }
}

impl AbiExportSettings {
    /// Entries listed in both `only` and `except`.
    pub fn overlapping_filters(&self) -> Vec<String> {
        let mut overlap: Vec<String> = self
            .only
            .iter()
            .filter(|name| self.except.contains(name))
            .cloned()
            .collect();
        overlap.sort();
        overlap.dedup();
        overlap
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestRunnerSettings {
    /// Per-test timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for TestRunnerSettings {
    fn default() -> Self {
        Self { timeout_ms: 20_000 }
    }
}

/// License header maintenance on compiled sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LicenseIdentifierSettings {
    /// Replace existing identifiers
    pub overwrite: bool,

    pub run_on_compile: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_filters() {
        let settings = AbiExportSettings {
            only: vec!["Token".to_string(), "Vault".to_string()],
            except: vec!["Vault".to_string(), "Mock".to_string()],
            ..Default::default()
        };
        assert_eq!(settings.overlapping_filters(), vec!["Vault".to_string()]);
        assert!(AbiExportSettings::default().overlapping_filters().is_empty());
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let settings: AbiExportSettings = toml::from_str("flat = true").unwrap();
        assert!(settings.flat);
        assert_eq!(settings.path, PathBuf::from("abi"));

        let test: TestRunnerSettings = toml::from_str("").unwrap();
        assert_eq!(test.timeout_ms, 20_000);
    }
}
