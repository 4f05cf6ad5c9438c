//! Matching and placement rules for dependencies, single files and trees.
//!
//! Rules are plain values. They are produced by the configuration layer once
//! the user input has been validated and are never changed afterwards.

use std::path::PathBuf;
use upmanifest_common::Os;

/// Where and how a matched file lands in the descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    /// Prefix of the destination path; `None` places files at the root.
    pub output_directory: Option<String>,
    pub classpath: bool,
    pub modulepath: bool,
    pub ignore_boot_conflict: bool,
    pub os: Option<Os>,
    pub comment: Option<String>,
}

impl Placement {
    /// Placement used for dependencies when no rule is configured.
    pub fn dependency_default() -> Self {
        Self {
            classpath: true,
            ..Default::default()
        }
    }
}

/// Selects resolved dependencies by `groupId:artifactId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRule {
    pub includes: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
    pub placement: Placement,
}

impl Default for DependencyRule {
    fn default() -> Self {
        Self {
            includes: None,
            excludes: None,
            placement: Placement::dependency_default(),
        }
    }
}

impl DependencyRule {
    /// An explicit include list decides alone; otherwise everything not
    /// excluded matches.
    pub fn matches(&self, id: &str) -> bool {
        match (&self.includes, &self.excludes) {
            (Some(includes), _) => includes.iter().any(|include| include == id),
            (None, Some(excludes)) => !excludes.iter().any(|exclude| exclude == id),
            (None, None) => true,
        }
    }
}

/// A single declared file. The rule is its own match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRule {
    pub source: PathBuf,
    pub placement: Placement,
}

/// A directory tree filtered by Ant-style patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRule {
    pub directory: PathBuf,
    pub includes: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
    pub use_default_excludes: bool,
    pub placement: Placement,
}

impl TreeRule {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            includes: None,
            excludes: None,
            use_default_excludes: true,
            placement: Placement::default(),
        }
    }
}

/// Every rule declared for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    /// `None` includes every dependency with default placement. `Some` routes
    /// each dependency through the first matching rule and drops the rest.
    pub dependency_sets: Option<Vec<DependencyRule>>,
    pub files: Vec<FileRule>,
    pub file_sets: Vec<TreeRule>,
}

/// First rule, in declaration order, that matches `id`.
pub fn first_match<'r>(rules: &'r [DependencyRule], id: &str) -> Option<&'r DependencyRule> {
    rules.iter().find(|rule| rule.matches(id))
}
