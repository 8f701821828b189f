use std::path::{Path, PathBuf};

use crate::{ConfigError, ConfigResult};

/// Starter configuration written by `keystone template`.
const TEMPLATE: &str = include_str!("../configs/template.toml");

/// Configuration utility functions
pub struct ConfigUtils;

impl ConfigUtils {
    /// Find configuration file in standard locations
    pub fn find_config_file(filename: &str) -> ConfigResult<PathBuf> {
        Self::search_paths()
            .into_iter()
            .find_map(|dir| Self::find_in(&dir, filename))
            .ok_or_else(|| {
                ConfigError::FileNotFound(format!(
                    "Configuration file '{}' not found in standard locations",
                    filename
                ))
            })
    }

    /// Directories searched, in order, when no explicit path is given.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("."), PathBuf::from("config")];
        paths.push(default_config_dir());
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            paths.push(dir);
        }
        paths
    }

    fn find_in(dir: &Path, filename: &str) -> Option<PathBuf> {
        let exact = dir.join(filename);
        if exact.is_file() {
            return Some(exact);
        }

        ["toml", "json"]
            .iter()
            .map(|ext| dir.join(format!("{}.{}", filename, ext)))
            .find(|candidate| candidate.is_file())
    }

    /// Generate a minimal configuration template
    pub fn generate_template() -> &'static str {
        TEMPLATE
    }
}

/// Per-user configuration directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("keystone"))
        .unwrap_or_else(|| PathBuf::from(".keystone"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{ConfigFormat, ConfigLoader, MapEnv};
    use crate::ConfigResolver;
    use tempfile::tempdir;

    #[test]
    fn test_template_resolves_for_simulated() {
        let raw = ConfigLoader::new()
            .load_str(ConfigUtils::generate_template(), ConfigFormat::Toml, "/work")
            .unwrap();
        let resolved = ConfigResolver::resolve_network(&raw, "simulated", &MapEnv::new()).unwrap();
        assert_eq!(resolved.lookup_account("deployer").unwrap(), 0);
    }

    #[test]
    fn test_find_in_tries_extensions() {
        let dir = tempdir().unwrap();
        assert!(ConfigUtils::find_in(dir.path(), "keystone").is_none());

        std::fs::write(dir.path().join("keystone.json"), "{}").unwrap();
        assert_eq!(
            ConfigUtils::find_in(dir.path(), "keystone"),
            Some(dir.path().join("keystone.json"))
        );
    }
}
