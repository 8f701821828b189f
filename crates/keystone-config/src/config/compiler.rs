use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationWarning};

/// Runs assumed when the optimizer is enabled without an explicit count.
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;

/// Compiler settings as declared in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerProfile {
    pub version: String,

    #[serde(default)]
    pub optimizer: OptimizerSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerSettings {
    pub enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs: Option<u32>,
}

/// Compiler settings handed to the compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCompiler {
    pub version: Version,
    pub optimizer_enabled: bool,
    /// Only present when the optimizer is enabled
    pub optimizer_runs: Option<u32>,
}

impl CompilerProfile {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            optimizer: OptimizerSettings::default(),
        }
    }

    pub fn with_optimizer(mut self, enabled: bool, runs: Option<u32>) -> Self {
        self.optimizer = OptimizerSettings { enabled, runs };
        self
    }

    /// Parse the version and normalize optimizer settings.
    ///
    /// Runs set on a disabled optimizer are dropped and reported as a warning.
    pub fn resolve(
        &self,
    ) -> Result<(ResolvedCompiler, Option<ValidationWarning>), ValidationError> {
        let version = Version::parse(self.version.trim()).map_err(|e| {
            ValidationError::InvalidCompilerVersion {
                version: self.version.clone(),
                reason: e.to_string(),
            }
        })?;

        match (self.optimizer.enabled, self.optimizer.runs) {
            (true, Some(0)) => Err(ValidationError::InvalidOptimizerRuns {
                version: self.version.clone(),
            }),
            (true, runs) => Ok((
                ResolvedCompiler {
                    version,
                    optimizer_enabled: true,
                    optimizer_runs: Some(runs.unwrap_or(DEFAULT_OPTIMIZER_RUNS)),
                },
                None,
            )),
            (false, runs) => {
                let warning = runs.map(|runs| ValidationWarning::InvalidOptimizerSettings {
                    version: self.version.clone(),
                    runs,
                });
                Ok((
                    ResolvedCompiler {
                        version,
                        optimizer_enabled: false,
                        optimizer_runs: None,
                    },
                    warning,
                ))
            }
        }
    }
}
