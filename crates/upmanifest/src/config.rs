//! Build configuration file and its conversion into a [`BuildPlan`].

use crate::validation::{self, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use upmanifest_classifier::artifact::resolve_against;
use upmanifest_classifier::{
    Artifact, DependencyRule, FileRule, Placement, RuleSet, StaticProject, TreeRule,
};
use upmanifest_common::{Error, Os, Result};

/// Manifest file name used when none is configured.
pub const DEFAULT_CONFIG_NAME: &str = "config.xml";

/// Output directory, relative to the project base directory, used when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "target";

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_config_name() -> String {
    DEFAULT_CONFIG_NAME.to_string()
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn yes() -> bool {
    true
}

/// The YAML build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_config_name")]
    pub config_name: String,
    pub base_uri: Option<String>,
    pub base_path: Option<String>,
    #[serde(default)]
    pub project: ProjectConfig,
    /// Absent and empty are different: an empty list drops every dependency.
    pub dependency_sets: Option<Vec<DependencySetConfig>>,
    #[serde(default)]
    pub files: Vec<FileConfig>,
    #[serde(default)]
    pub file_sets: Vec<FileSetConfig>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub dynamic_properties: BTreeMap<String, String>,
    pub update_handler: Option<String>,
    pub launcher: Option<String>,
}

/// Resolved artifacts handed over by the host build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    pub artifact: Option<Artifact>,
    #[serde(default)]
    pub dependencies: Vec<Artifact>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            artifact: None,
            dependencies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySetConfig {
    pub includes: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
    #[serde(alias = "path")]
    pub output_directory: Option<String>,
    #[serde(default = "yes")]
    pub classpath: bool,
    #[serde(default)]
    pub modulepath: bool,
    #[serde(default)]
    pub ignore_boot_conflict: bool,
    pub os: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub source: PathBuf,
    #[serde(alias = "path")]
    pub output_directory: Option<String>,
    #[serde(default)]
    pub classpath: bool,
    #[serde(default)]
    pub modulepath: bool,
    #[serde(default)]
    pub ignore_boot_conflict: bool,
    pub os: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSetConfig {
    pub directory: PathBuf,
    #[serde(alias = "path")]
    pub output_directory: Option<String>,
    pub includes: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
    #[serde(default = "yes")]
    pub use_default_excludes: bool,
    #[serde(default)]
    pub classpath: bool,
    #[serde(default)]
    pub modulepath: bool,
    #[serde(default)]
    pub ignore_boot_conflict: bool,
    pub os: Option<String>,
    pub comment: Option<String>,
}

/// Values given on the command line. They win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_uri: Option<String>,
    pub base_path: Option<String>,
    pub config_name: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub launcher: Option<String>,
}

/// Everything one invocation needs, validated.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub base_uri: String,
    pub base_path: String,
    pub output_file: PathBuf,
    pub project: StaticProject,
    pub rules: RuleSet,
    pub properties: BTreeMap<String, String>,
    pub dynamic_properties: BTreeMap<String, String>,
    pub update_handler: Option<String>,
    pub launcher: Option<String>,
}

impl BuildConfig {
    /// Parse YAML text, checking it against the configuration schema first.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_yaml::from_str(text)?;
        let value = if value.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            value
        };

        let result = validation::validate_config_value(&value)?;
        if !result.valid {
            return Err(Error::Config(result.error_summary()));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Load a configuration file. A relative project base directory is taken
    /// relative to the file's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&text)?;

        let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.project.base_dir = resolve_against(config_dir, &config.project.base_dir);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(base_uri) = overrides.base_uri {
            self.base_uri = Some(base_uri);
        }
        if let Some(base_path) = overrides.base_path {
            self.base_path = Some(base_path);
        }
        if let Some(config_name) = overrides.config_name {
            self.config_name = config_name;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(launcher) = overrides.launcher {
            self.launcher = Some(launcher);
        }
    }

    /// Check the configuration, returning every problem found.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.base_uri.as_deref().map_or(true, str::is_empty) {
            result.add_error(ValidationError::MissingField("base_uri"));
        }
        if self.base_path.as_deref().map_or(true, str::is_empty) {
            result.add_error(ValidationError::MissingField("base_path"));
        }
        if self.config_name.is_empty() {
            result.add_error(ValidationError::MissingField("config_name"));
        }

        let declared_os = self
            .dependency_sets
            .iter()
            .flatten()
            .map(|set| &set.os)
            .chain(self.files.iter().map(|file| &file.os))
            .chain(self.file_sets.iter().map(|set| &set.os))
            .flatten();
        for os in declared_os {
            if let Err(err) = Os::from_short_name(os) {
                result.add_error(ValidationError::Rule(err.to_string()));
            }
        }

        if matches!(&self.dependency_sets, Some(sets) if sets.is_empty()) {
            result.add_warning(
                "dependency_sets is empty: only the project artifact will be included".to_string(),
            );
        }

        for set in &self.file_sets {
            let directory = resolve_against(&self.project.base_dir, &set.directory);
            if !directory.exists() {
                result.add_warning(format!(
                    "Source directory {} does not exist and will be skipped",
                    directory.display()
                ));
            }
        }

        result
    }

    /// Validate and convert into a [`BuildPlan`].
    pub fn into_plan(self) -> Result<BuildPlan> {
        let result = self.validate();
        if !result.valid {
            return Err(Error::Config(result.error_summary()));
        }

        let rules = RuleSet {
            dependency_sets: self
                .dependency_sets
                .map(|sets| {
                    sets.into_iter()
                        .map(DependencySetConfig::into_rule)
                        .collect::<Result<Vec<_>>>()
                })
                .transpose()?,
            files: self
                .files
                .into_iter()
                .map(FileConfig::into_rule)
                .collect::<Result<Vec<_>>>()?,
            file_sets: self
                .file_sets
                .into_iter()
                .map(FileSetConfig::into_rule)
                .collect::<Result<Vec<_>>>()?,
        };

        let base_dir = self.project.base_dir;
        let resolve_file = |mut artifact: Artifact| {
            artifact.file = artifact.file.map(|file| resolve_against(&base_dir, &file));
            artifact
        };
        let project = StaticProject {
            artifact: self.project.artifact.map(resolve_file),
            dependencies: self.project.dependencies.into_iter().map(resolve_file).collect(),
            base_dir: base_dir.clone(),
        };

        let output_file = resolve_against(&base_dir, &self.output_dir).join(&self.config_name);

        Ok(BuildPlan {
            base_uri: self.base_uri.unwrap_or_default(),
            base_path: self.base_path.unwrap_or_default(),
            output_file,
            project,
            rules,
            properties: self.properties,
            dynamic_properties: self.dynamic_properties,
            update_handler: self.update_handler,
            launcher: self.launcher,
        })
    }
}

fn parse_os(os: Option<String>) -> Result<Option<Os>> {
    os.as_deref().map(Os::from_short_name).transpose()
}

impl DependencySetConfig {
    fn into_rule(self) -> Result<DependencyRule> {
        Ok(DependencyRule {
            includes: self.includes,
            excludes: self.excludes,
            placement: Placement {
                output_directory: self.output_directory,
                classpath: self.classpath,
                modulepath: self.modulepath,
                ignore_boot_conflict: self.ignore_boot_conflict,
                os: parse_os(self.os)?,
                comment: self.comment,
            },
        })
    }
}

impl FileConfig {
    fn into_rule(self) -> Result<FileRule> {
        Ok(FileRule {
            source: self.source,
            placement: Placement {
                output_directory: self.output_directory,
                classpath: self.classpath,
                modulepath: self.modulepath,
                ignore_boot_conflict: self.ignore_boot_conflict,
                os: parse_os(self.os)?,
                comment: self.comment,
            },
        })
    }
}

impl FileSetConfig {
    fn into_rule(self) -> Result<TreeRule> {
        Ok(TreeRule {
            directory: self.directory,
            includes: self.includes,
            excludes: self.excludes,
            use_default_excludes: self.use_default_excludes,
            placement: Placement {
                output_directory: self.output_directory,
                classpath: self.classpath,
                modulepath: self.modulepath,
                ignore_boot_conflict: self.ignore_boot_conflict,
                os: parse_os(self.os)?,
                comment: self.comment,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
base_uri: https://example.com/app/
base_path: ${user.dir}/app
project:
  base_dir: /work
  artifact: { group_id: com.example, artifact_id: app, file: target/app-1.0.jar }
  dependencies:
    - { group_id: org.slf4j, artifact_id: slf4j-api, file: /repo/slf4j-api-2.0.9.jar }
dependency_sets:
  - includes: ["org.slf4j:slf4j-api"]
    path: lib
    modulepath: true
files:
  - source: src/main/config/settings.json
    output_directory: cfg
    os: linux
file_sets:
  - directory: src/dist
    excludes: ["**/*.bak"]
properties:
  app.name: demo
dynamic_properties:
  app.home: ${user.home}/demo
launcher: com.example.Main
"#;

    #[test]
    fn test_parse_full_config() {
        let config = BuildConfig::from_yaml(FULL).unwrap();
        assert_eq!(config.config_name, "config.xml");
        assert_eq!(config.output_dir, PathBuf::from("target"));

        let sets = config.dependency_sets.as_ref().unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].output_directory.as_deref(), Some("lib"));
        assert!(sets[0].classpath);
        assert!(sets[0].modulepath);

        assert!(!config.files[0].classpath);
        assert!(config.file_sets[0].use_default_excludes);
    }

    #[test]
    fn test_into_plan() {
        let plan = BuildConfig::from_yaml(FULL).unwrap().into_plan().unwrap();

        assert_eq!(plan.output_file, PathBuf::from("/work/target/config.xml"));
        assert_eq!(
            plan.project.artifact.as_ref().unwrap().file,
            Some(PathBuf::from("/work/target/app-1.0.jar"))
        );
        assert_eq!(
            plan.project.dependencies[0].file,
            Some(PathBuf::from("/repo/slf4j-api-2.0.9.jar"))
        );

        let rules = plan.rules.dependency_sets.unwrap();
        assert_eq!(rules[0].includes, Some(vec!["org.slf4j:slf4j-api".to_string()]));
        assert_eq!(rules[0].placement.output_directory.as_deref(), Some("lib"));
        assert_eq!(plan.rules.files[0].placement.os, Some(Os::Linux));
        assert_eq!(plan.rules.file_sets[0].excludes, Some(vec!["**/*.bak".to_string()]));
        assert_eq!(plan.launcher.as_deref(), Some("com.example.Main"));
    }

    #[test]
    fn test_absent_and_empty_dependency_sets_differ() {
        let absent = BuildConfig::from_yaml("base_uri: u\nbase_path: p\n").unwrap();
        assert!(absent.into_plan().unwrap().rules.dependency_sets.is_none());

        let empty =
            BuildConfig::from_yaml("base_uri: u\nbase_path: p\ndependency_sets: []\n").unwrap();
        assert!(empty.validate().warnings.iter().any(|w| w.contains("dependency_sets")));
        assert_eq!(empty.into_plan().unwrap().rules.dependency_sets, Some(Vec::new()));
    }

    #[test]
    fn test_missing_base_uri_rejected() {
        let config = BuildConfig::from_yaml("base_path: p\n").unwrap();
        let err = config.into_plan().unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("base_uri")));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = BuildConfig::from_yaml(FULL).unwrap();
        config.apply_overrides(Overrides {
            base_uri: Some("https://cdn.example.com/".to_string()),
            config_name: Some("update.xml".to_string()),
            launcher: Some("com.example.Other".to_string()),
            ..Default::default()
        });

        let plan = config.into_plan().unwrap();
        assert_eq!(plan.base_uri, "https://cdn.example.com/");
        assert_eq!(plan.base_path, "${user.dir}/app");
        assert_eq!(plan.output_file, PathBuf::from("/work/target/update.xml"));
        assert_eq!(plan.launcher.as_deref(), Some("com.example.Other"));
    }

    #[test]
    fn test_unknown_os_rejected_by_schema() {
        let err = BuildConfig::from_yaml("files:\n  - source: a.txt\n    os: beos\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_file_without_source_rejected() {
        let err = BuildConfig::from_yaml("files:\n  - output_directory: cfg\n").unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("source")));
    }

    #[test]
    fn test_empty_mapping() {
        let config = BuildConfig::from_yaml("{}").unwrap();
        assert!(!config.validate().valid);
    }
}
