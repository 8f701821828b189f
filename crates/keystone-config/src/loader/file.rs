use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ConfigDocument, RawConfig};
use crate::{ConfigError, ConfigResult};

use super::ConfigFormat;

/// File-based configuration loader
pub struct FileLoader;

impl FileLoader {
    /// Load configuration from a TOML file
    pub fn load_toml<P: AsRef<Path>>(path: P) -> ConfigResult<RawConfig> {
        Self::load_with_format(path.as_ref(), ConfigFormat::Toml)
    }

    /// Load configuration from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> ConfigResult<RawConfig> {
        Self::load_with_format(path.as_ref(), ConfigFormat::Json)
    }

    /// Auto-detect file format and load configuration
    pub fn load_auto<P: AsRef<Path>>(path: P) -> ConfigResult<RawConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => {
                let format = ConfigFormat::from_extension(ext).ok_or_else(|| {
                    ConfigError::InvalidFormat(format!("Unsupported file extension: {}", ext))
                })?;
                Self::load_with_format(path, format)
            }
            None => {
                // Try TOML first, then JSON
                match Self::load_toml(path) {
                    Ok(config) => Ok(config),
                    Err(ConfigError::Toml(_)) => Self::load_json(path),
                    Err(e) => Err(e),
                }
            }
        }
    }

    fn load_with_format(path: &Path, format: ConfigFormat) -> ConfigResult<RawConfig> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.display().to_string()),
            _ => ConfigError::Io(e),
        })?;

        let document: ConfigDocument = format.parse(&content)?;
        let root = Self::config_root(path)?;

        tracing::debug!(path = %path.display(), root = %root.display(), "Loaded configuration document");
        RawConfig::from_document(document, root)
    }

    /// Directory containing `path`, made absolute.
    fn config_root(path: &Path) -> ConfigResult<PathBuf> {
        let absolute = std::path::absolute(path)?;
        Ok(absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(absolute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
        [[compilers]]
        version = "0.8.3"

        [paths]
        sources = "contracts"
    "#;

    #[test]
    fn test_load_toml_sets_root() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keystone.toml");
        fs::write(&path, CONFIG).unwrap();

        let raw = FileLoader::load_auto(&path).unwrap();
        assert_eq!(raw.root, std::path::absolute(dir.path()).unwrap());
    }

    #[test]
    fn test_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keystone.json");
        fs::write(
            &path,
            r#"{"compilers": [{"version": "0.8.3"}], "paths": {"sources": "src"}}"#,
        )
        .unwrap();

        let raw = FileLoader::load_auto(&path).unwrap();
        assert_eq!(raw.paths.sources, PathBuf::from("src"));
    }

    #[test]
    fn test_extensionless_falls_back_to_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keystone");
        fs::write(
            &path,
            r#"{"compilers": [{"version": "0.8.3"}], "paths": {"sources": "src"}}"#,
        )
        .unwrap();

        assert!(FileLoader::load_auto(&path).is_ok());
    }

    #[test]
    fn test_missing_and_unsupported_files() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            FileLoader::load_auto(dir.path().join("absent.toml")),
            Err(ConfigError::FileNotFound(_))
        ));

        let path = dir.path().join("keystone.yaml");
        fs::write(&path, "paths: {}").unwrap();
        assert!(matches!(
            FileLoader::load_auto(&path),
            Err(ConfigError::InvalidFormat(_))
        ));
    }
}
