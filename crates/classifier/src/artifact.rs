//! Resolved build artifacts supplied by the host build.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A resolved artifact: the project's own output or a runtime dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub group_id: String,
    pub artifact_id: String,
    /// Location of the resolved file; `None` when the build produced nothing.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Artifact {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            file: Some(file.into()),
        }
    }

    /// `groupId:artifactId`, the identifier dependency rules match against.
    pub fn id(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    pub fn file_name(&self) -> Option<String> {
        self.file
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().to_string())
    }
}

/// The part of the host build the classifier reads from.
pub trait ResolvedProject {
    /// Directory relative source paths are resolved against.
    fn base_dir(&self) -> &Path;

    /// The project's own build output.
    fn artifact(&self) -> Option<&Artifact>;

    /// Runtime dependencies in resolution order.
    fn dependencies(&self) -> &[Artifact];
}

/// A project whose artifacts are known up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticProject {
    pub base_dir: PathBuf,
    pub artifact: Option<Artifact>,
    pub dependencies: Vec<Artifact>,
}

impl StaticProject {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifact = Some(artifact);
        self
    }

    pub fn with_dependency(mut self, artifact: Artifact) -> Self {
        self.dependencies.push(artifact);
        self
    }
}

impl ResolvedProject for StaticProject {
    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    fn dependencies(&self) -> &[Artifact] {
        &self.dependencies
    }
}

/// Resolve `path` against `base_dir` unless it is already absolute.
pub fn resolve_against(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_id_and_file_name() {
        let artifact = Artifact::new("org.slf4j", "slf4j-api", "/repo/slf4j-api-2.0.9.jar");
        assert_eq!(artifact.id(), "org.slf4j:slf4j-api");
        assert_eq!(artifact.file_name().as_deref(), Some("slf4j-api-2.0.9.jar"));
    }

    #[test]
    fn test_unresolved_artifact_has_no_file_name() {
        let artifact = Artifact {
            group_id: "g".to_string(),
            artifact_id: "a".to_string(),
            file: None,
        };
        assert_eq!(artifact.file_name(), None);
    }

    #[test]
    fn test_resolve_against() {
        let base = Path::new("/work/project");
        assert_eq!(
            resolve_against(base, Path::new("src/dist")),
            PathBuf::from("/work/project/src/dist")
        );
        assert_eq!(
            resolve_against(base, Path::new("/etc/app")),
            PathBuf::from("/etc/app")
        );
    }
}
