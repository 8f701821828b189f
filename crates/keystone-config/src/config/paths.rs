use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;

/// Logical directory roles understood by the toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathRole {
    Sources,
    Tests,
    Artifacts,
    Cache,
    Deploy,
    Deployments,
    Imports,
}

impl PathRole {
    pub const ALL: [PathRole; 7] = [
        PathRole::Sources,
        PathRole::Tests,
        PathRole::Artifacts,
        PathRole::Cache,
        PathRole::Deploy,
        PathRole::Deployments,
        PathRole::Imports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PathRole::Sources => "sources",
            PathRole::Tests => "tests",
            PathRole::Artifacts => "artifacts",
            PathRole::Cache => "cache",
            PathRole::Deploy => "deploy",
            PathRole::Deployments => "deployments",
            PathRole::Imports => "imports",
        }
    }
}

impl fmt::Display for PathRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathRole {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownPathRole(s.to_string()))
    }
}

/// Directory layout relative to the configuration root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathLayout {
    pub sources: PathBuf,
    pub tests: PathBuf,
    pub artifacts: PathBuf,
    pub cache: PathBuf,
    pub deploy: PathBuf,
    pub deployments: PathBuf,
    pub imports: PathBuf,
}

impl PathLayout {
    /// Layout with conventional directory names for everything but `sources`.
    pub fn with_sources(sources: impl Into<PathBuf>) -> Self {
        Self {
            sources: sources.into(),
            tests: PathBuf::from("test"),
            artifacts: PathBuf::from("artifacts"),
            cache: PathBuf::from("cache"),
            deploy: PathBuf::from("deploy"),
            deployments: PathBuf::from("deployments"),
            imports: PathBuf::from("imports"),
        }
    }

    pub fn get(&self, role: PathRole) -> &Path {
        match role {
            PathRole::Sources => &self.sources,
            PathRole::Tests => &self.tests,
            PathRole::Artifacts => &self.artifacts,
            PathRole::Cache => &self.cache,
            PathRole::Deploy => &self.deploy,
            PathRole::Deployments => &self.deployments,
            PathRole::Imports => &self.imports,
        }
    }

    /// Resolve every role against `root`.
    pub fn resolve(&self, root: &Path) -> ResolvedPaths {
        let at = |role| resolve_against(root, self.get(role));
        ResolvedPaths(PathLayout {
            sources: at(PathRole::Sources),
            tests: at(PathRole::Tests),
            artifacts: at(PathRole::Artifacts),
            cache: at(PathRole::Cache),
            deploy: at(PathRole::Deploy),
            deployments: at(PathRole::Deployments),
            imports: at(PathRole::Imports),
        })
    }
}

/// Absolute locations for every [`PathRole`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedPaths(PathLayout);

impl ResolvedPaths {
    pub fn get(&self, role: PathRole) -> &Path {
        self.0.get(role)
    }

    /// Every role with its directory, in [`PathRole::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (PathRole, &Path)> + '_ {
        PathRole::ALL.into_iter().map(move |role| (role, self.get(role)))
    }
}

/// Join `path` onto `root` unless it is already absolute, then drop `.` and `..`
/// components lexically.
pub fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    normalize(&joined)
}

fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
