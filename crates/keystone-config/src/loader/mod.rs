//! Configuration loading and environment handling

pub mod env;
pub mod file;
pub mod validation;

pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use file::FileLoader;
pub use validation::{ConfigValidator, ValidationReport};

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::config::{ConfigDocument, RawConfig};
use crate::utils::ConfigUtils;
use crate::ConfigResult;

/// Serialization formats accepted for configuration documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> ConfigResult<T> {
        match self {
            ConfigFormat::Toml => Ok(toml::from_str(content)?),
            ConfigFormat::Json => Ok(serde_json::from_str(content)?),
        }
    }
}

/// Main configuration loader
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// File name searched for when no explicit path is given
    pub const DEFAULT_FILE_STEM: &'static str = "keystone";

    pub fn new() -> Self {
        Self
    }

    /// Load a document held in memory; relative paths resolve against `root`.
    pub fn load_str(
        &self,
        content: &str,
        format: ConfigFormat,
        root: impl Into<PathBuf>,
    ) -> ConfigResult<RawConfig> {
        let document: ConfigDocument = format.parse(content)?;
        self.load_document(document, root)
    }

    /// Structural load of an already parsed document.
    pub fn load_document(
        &self,
        document: ConfigDocument,
        root: impl Into<PathBuf>,
    ) -> ConfigResult<RawConfig> {
        RawConfig::from_document(document, root)
    }

    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<RawConfig> {
        FileLoader::load_auto(path)
    }

    /// Load `path` when given, otherwise search the standard locations.
    pub fn load_from<P: AsRef<Path>>(&self, path: Option<P>) -> ConfigResult<RawConfig> {
        match path {
            Some(path) => self.load_file(path),
            None => {
                let found = ConfigUtils::find_config_file(Self::DEFAULT_FILE_STEM)?;
                tracing::debug!(path = %found.display(), "Found configuration file");
                self.load_file(found)
            }
        }
    }
}
