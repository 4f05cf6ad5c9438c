//! Turns artifacts, declared files and scanned trees into descriptor entries.

use crate::artifact::{resolve_against, Artifact, ResolvedProject};
use crate::metadata::MetadataResolver;
use crate::rules::{first_match, DependencyRule, FileRule, Placement, RuleSet, TreeRule};
use crate::scanner::TreeScanner;
use std::path::Path;
use tracing::{debug, warn};
use upmanifest_common::{Error, Os, Result};
use upmanifest_descriptor::FileEntry;

/// Outcome for a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Include(FileEntry),
    /// No rule selected the candidate. This is not an error.
    Omit,
}

impl Classification {
    pub fn into_entry(self) -> Option<FileEntry> {
        match self {
            Classification::Include(entry) => Some(entry),
            Classification::Omit => None,
        }
    }
}

/// Where the OS restriction of an entry comes from when its rule sets none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OsFallback {
    FromFilename,
    Unrestricted,
}

/// Classification pass over every candidate of one invocation.
pub struct Classifier<'a> {
    resolver: &'a dyn MetadataResolver,
    scanner: &'a dyn TreeScanner,
}

impl<'a> Classifier<'a> {
    pub fn new(resolver: &'a dyn MetadataResolver, scanner: &'a dyn TreeScanner) -> Self {
        Self { resolver, scanner }
    }

    /// Entries for the whole project, in descriptor order: own artifact,
    /// dependencies, declared files, then trees.
    pub fn classify(
        &self,
        project: &dyn ResolvedProject,
        rules: &RuleSet,
    ) -> Result<Vec<FileEntry>> {
        let mut entries = Vec::new();

        if let Some(artifact) = project.artifact() {
            entries.extend(self.classify_project_artifact(artifact)?.into_entry());
        }

        for artifact in project.dependencies() {
            let classification =
                self.classify_dependency(artifact, rules.dependency_sets.as_deref())?;
            entries.extend(classification.into_entry());
        }

        for rule in &rules.files {
            entries.push(self.classify_file(rule, project.base_dir())?);
        }

        for rule in &rules.file_sets {
            entries.extend(self.classify_tree(rule, project.base_dir())?);
        }

        Ok(entries)
    }

    /// The project's own artifact bypasses dependency rules.
    pub fn classify_project_artifact(&self, artifact: &Artifact) -> Result<Classification> {
        self.artifact_entry(artifact, &Placement::dependency_default())
    }

    /// Route a dependency through `rules`.
    ///
    /// Without rules every dependency is kept with the default placement.
    /// With rules the first match decides, and a dependency no rule matches
    /// is omitted.
    pub fn classify_dependency(
        &self,
        artifact: &Artifact,
        rules: Option<&[DependencyRule]>,
    ) -> Result<Classification> {
        let Some(rules) = rules else {
            return self.artifact_entry(artifact, &Placement::dependency_default());
        };

        let id = artifact.id();
        match first_match(rules, &id) {
            Some(rule) => self.artifact_entry(artifact, &rule.placement),
            None => {
                debug!("No dependency set selects {}", id);
                Ok(Classification::Omit)
            }
        }
    }

    /// A declared file always yields exactly one entry.
    pub fn classify_file(&self, rule: &FileRule, base_dir: &Path) -> Result<FileEntry> {
        let source = resolve_against(base_dir, &rule.source);
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                Error::Config(format!("File source {} has no file name", source.display()))
            })?;

        debug!("Adding {}", source.display());
        self.entry(&source, &file_name, &rule.placement, OsFallback::Unrestricted)
    }

    /// One entry per scanned file, keeping the sub-path below the tree root.
    ///
    /// A missing directory is skipped with a warning.
    pub fn classify_tree(&self, rule: &TreeRule, base_dir: &Path) -> Result<Vec<FileEntry>> {
        let directory = resolve_against(base_dir, &rule.directory);
        if !directory.exists() {
            warn!(
                "Specified source directory {} does not exist.",
                directory.display()
            );
            return Ok(Vec::new());
        }

        let includes = rule.includes.as_deref().unwrap_or_default();
        let excludes = rule.excludes.as_deref().unwrap_or_default();
        let relative_paths =
            self.scanner
                .scan(&directory, includes, excludes, rule.use_default_excludes)?;

        let mut entries = Vec::with_capacity(relative_paths.len());
        for relative in relative_paths {
            let source = directory.join(&relative);
            debug!("Adding {}", source.display());
            let entry = self.entry(&source, &relative, &rule.placement, OsFallback::Unrestricted)?;
            entries.push(entry);
        }
        Ok(entries)
    }

    fn artifact_entry(&self, artifact: &Artifact, placement: &Placement) -> Result<Classification> {
        let (Some(file), Some(file_name)) = (artifact.file.as_deref(), artifact.file_name()) else {
            debug!("Artifact {} has no resolved file", artifact.id());
            return Ok(Classification::Omit);
        };

        debug!("Adding {}", file.display());
        let entry = self.entry(file, &file_name, placement, OsFallback::FromFilename)?;
        Ok(Classification::Include(entry))
    }

    fn entry(
        &self,
        source: &Path,
        relative: &str,
        placement: &Placement,
        fallback: OsFallback,
    ) -> Result<FileEntry> {
        let metadata = self.resolver.read(source)?;
        let os = placement.os.or_else(|| match fallback {
            OsFallback::FromFilename => self.detect_os(source),
            OsFallback::Unrestricted => None,
        });

        Ok(FileEntry {
            path: destination(placement.output_directory.as_deref(), relative),
            metadata,
            os,
            classpath: placement.classpath,
            modulepath: placement.modulepath,
            ignore_boot_conflict: placement.ignore_boot_conflict,
            comment: placement.comment.clone(),
        })
    }

    fn detect_os(&self, source: &Path) -> Option<Os> {
        let file_name = source.file_name()?.to_string_lossy();
        self.resolver.os_from_filename(&file_name)
    }
}

/// Join an output directory and a relative path with `/`.
pub fn destination(output_directory: Option<&str>, relative: &str) -> String {
    let relative = relative.replace('\\', "/");
    let relative = relative.trim_start_matches('/');

    let prefix = output_directory
        .map(|dir| dir.replace('\\', "/"))
        .unwrap_or_default();
    let prefix = prefix.trim_end_matches('/');

    if prefix.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", prefix, relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::StaticProject;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use upmanifest_descriptor::FileMetadata;

    /// Metadata derived from the path alone, recording every lookup.
    #[derive(Default)]
    struct FakeResolver {
        reads: RefCell<Vec<PathBuf>>,
    }

    impl MetadataResolver for FakeResolver {
        fn read(&self, path: &Path) -> Result<FileMetadata> {
            self.reads.borrow_mut().push(path.to_path_buf());
            Ok(FileMetadata {
                size: path.as_os_str().len() as u64,
                checksum: format!("sum:{}", path.display()),
            })
        }
    }

    /// Arguments of one `scan` call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct ScanCall {
        root: PathBuf,
        includes: Vec<String>,
        excludes: Vec<String>,
        use_default_excludes: bool,
    }

    /// Canned trees keyed by root, recording every scan.
    #[derive(Default)]
    struct FakeScanner {
        trees: HashMap<PathBuf, Vec<String>>,
        calls: RefCell<Vec<ScanCall>>,
    }

    impl TreeScanner for FakeScanner {
        fn scan(
            &self,
            root: &Path,
            includes: &[String],
            excludes: &[String],
            use_default_excludes: bool,
        ) -> Result<Vec<String>> {
            self.calls.borrow_mut().push(ScanCall {
                root: root.to_path_buf(),
                includes: includes.to_vec(),
                excludes: excludes.to_vec(),
                use_default_excludes,
            });
            Ok(self.trees.get(root).cloned().unwrap_or_default())
        }
    }

    fn ids(list: &[&str]) -> Option<Vec<String>> {
        Some(list.iter().map(|s| s.to_string()).collect())
    }

    fn paths(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.path.as_str()).collect()
    }

    fn project() -> StaticProject {
        StaticProject::new("/work")
            .with_artifact(Artifact::new("com.example", "app", "/work/target/app-1.0.jar"))
            .with_dependency(Artifact::new("g", "a", "/repo/a-1.0.jar"))
            .with_dependency(Artifact::new("g", "b", "/repo/b-2.0-linux.jar"))
            .with_dependency(Artifact::new("g", "c", "/repo/c-3.0.jar"))
    }

    #[test]
    fn test_dependencies_without_rules() {
        let resolver = FakeResolver::default();
        let scanner = FakeScanner::default();
        let classifier = Classifier::new(&resolver, &scanner);

        let entries = classifier.classify(&project(), &RuleSet::default()).unwrap();

        assert_eq!(
            paths(&entries),
            vec!["app-1.0.jar", "a-1.0.jar", "b-2.0-linux.jar", "c-3.0.jar"]
        );
        for entry in &entries {
            assert!(entry.classpath);
            assert!(!entry.modulepath);
            assert!(!entry.ignore_boot_conflict);
            assert_eq!(entry.comment, None);
        }
        assert_eq!(entries[2].os, Some(Os::Linux));
        assert_eq!(entries[1].os, None);
    }

    #[test]
    fn test_include_rule_sets_output_directory() {
        let resolver = FakeResolver::default();
        let scanner = FakeScanner::default();
        let classifier = Classifier::new(&resolver, &scanner);
        let rules = vec![DependencyRule {
            includes: ids(&["g:a"]),
            placement: Placement {
                output_directory: Some("lib".to_string()),
                ..Placement::dependency_default()
            },
            ..Default::default()
        }];

        let artifact = Artifact::new("g", "a", "/repo/a-1.0.jar");
        let entry = classifier
            .classify_dependency(&artifact, Some(&rules))
            .unwrap()
            .into_entry()
            .unwrap();

        assert_eq!(entry.path, "lib/a-1.0.jar");
        assert!(entry.classpath);
    }

    #[test]
    fn test_first_matching_rule_wins_and_unmatched_dropped() {
        let resolver = FakeResolver::default();
        let scanner = FakeScanner::default();
        let classifier = Classifier::new(&resolver, &scanner);
        let rules = RuleSet {
            dependency_sets: Some(vec![
                DependencyRule {
                    includes: ids(&["g:b"]),
                    placement: Placement {
                        output_directory: Some("natives".to_string()),
                        classpath: false,
                        modulepath: true,
                        comment: Some("platform".to_string()),
                        ..Default::default()
                    },
                    ..Default::default()
                },
                DependencyRule {
                    excludes: ids(&["g:c"]),
                    placement: Placement {
                        output_directory: Some("lib".to_string()),
                        os: Some(Os::Windows),
                        ..Placement::dependency_default()
                    },
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };

        let entries = classifier.classify(&project(), &rules).unwrap();

        assert_eq!(
            paths(&entries),
            vec!["app-1.0.jar", "lib/a-1.0.jar", "natives/b-2.0-linux.jar"]
        );

        let own = &entries[0];
        assert!(own.classpath);
        assert_eq!(own.os, None);

        let a = &entries[1];
        assert_eq!(a.os, Some(Os::Windows));
        assert!(a.classpath);

        let b = &entries[2];
        assert!(!b.classpath);
        assert!(b.modulepath);
        assert_eq!(b.os, Some(Os::Linux));
        assert_eq!(b.comment.as_deref(), Some("platform"));

        // g:c matched neither rule and was never read
        assert!(!resolver
            .reads
            .borrow()
            .iter()
            .any(|p| p.ends_with("c-3.0.jar")));
    }

    #[test]
    fn test_empty_rule_list_drops_dependencies_but_keeps_own_artifact() {
        let resolver = FakeResolver::default();
        let scanner = FakeScanner::default();
        let classifier = Classifier::new(&resolver, &scanner);
        let rules = RuleSet {
            dependency_sets: Some(Vec::new()),
            ..Default::default()
        };

        let entries = classifier.classify(&project(), &rules).unwrap();
        assert_eq!(paths(&entries), vec!["app-1.0.jar"]);
    }

    #[test]
    fn test_unresolved_dependency_skipped() {
        let resolver = FakeResolver::default();
        let scanner = FakeScanner::default();
        let classifier = Classifier::new(&resolver, &scanner);
        let artifact = Artifact {
            group_id: "g".to_string(),
            artifact_id: "pom-only".to_string(),
            file: None,
        };

        let classification = classifier.classify_dependency(&artifact, None).unwrap();
        assert_eq!(classification, Classification::Omit);
    }

    #[test]
    fn test_file_rule() {
        let resolver = FakeResolver::default();
        let scanner = FakeScanner::default();
        let classifier = Classifier::new(&resolver, &scanner);
        let rule = FileRule {
            source: PathBuf::from("src/main/config/settings-linux.json"),
            placement: Placement {
                output_directory: Some("cfg".to_string()),
                ..Default::default()
            },
        };

        let entry = classifier.classify_file(&rule, Path::new("/work")).unwrap();

        assert_eq!(entry.path, "cfg/settings-linux.json");
        assert!(!entry.classpath);
        assert!(!entry.modulepath);
        assert!(!entry.ignore_boot_conflict);
        // explicit files never get an OS from their name
        assert_eq!(entry.os, None);
        assert_eq!(
            resolver.reads.borrow().as_slice(),
            &[PathBuf::from("/work/src/main/config/settings-linux.json")]
        );
    }

    #[test]
    fn test_file_rule_with_os() {
        let resolver = FakeResolver::default();
        let scanner = FakeScanner::default();
        let classifier = Classifier::new(&resolver, &scanner);
        let rule = FileRule {
            source: PathBuf::from("/abs/launcher.exe"),
            placement: Placement {
                os: Some(Os::Windows),
                ignore_boot_conflict: true,
                comment: Some("launcher".to_string()),
                ..Default::default()
            },
        };

        let entry = classifier.classify_file(&rule, Path::new("/work")).unwrap();
        assert_eq!(entry.path, "launcher.exe");
        assert_eq!(entry.os, Some(Os::Windows));
        assert!(entry.ignore_boot_conflict);
        assert_eq!(entry.comment.as_deref(), Some("launcher"));
    }

    #[test]
    fn test_tree_rule_keeps_sub_paths() {
        let temp = tempfile::tempdir().unwrap();
        let dist = temp.path().join("dist");
        std::fs::create_dir_all(&dist).unwrap();

        let resolver = FakeResolver::default();
        let mut scanner = FakeScanner::default();
        scanner
            .trees
            .insert(dist.clone(), vec!["a.txt".to_string(), "sub/b.txt".to_string()]);
        let classifier = Classifier::new(&resolver, &scanner);

        let mut rule = TreeRule::new("dist");
        rule.placement = Placement {
            output_directory: Some("res".to_string()),
            modulepath: true,
            os: Some(Os::Mac),
            ..Default::default()
        };

        let entries = classifier.classify_tree(&rule, temp.path()).unwrap();

        assert_eq!(paths(&entries), vec!["res/a.txt", "res/sub/b.txt"]);
        for entry in &entries {
            assert_eq!(entry.os, Some(Os::Mac));
            assert!(entry.modulepath);
            assert!(!entry.classpath);
        }
        assert_eq!(
            resolver.reads.borrow().as_slice(),
            &[dist.join("a.txt"), dist.join("sub/b.txt")]
        );
    }

    #[test]
    fn test_tree_rule_patterns_reach_scanner() {
        let temp = tempfile::tempdir().unwrap();
        let dist = temp.path().join("dist");
        std::fs::create_dir_all(&dist).unwrap();

        let resolver = FakeResolver::default();
        let scanner = FakeScanner::default();
        let classifier = Classifier::new(&resolver, &scanner);

        classifier
            .classify_tree(&TreeRule::new("dist"), temp.path())
            .unwrap();

        let mut filtered = TreeRule::new("dist");
        filtered.includes = ids(&["**/*.txt"]);
        filtered.excludes = ids(&["tmp/"]);
        filtered.use_default_excludes = false;
        classifier.classify_tree(&filtered, temp.path()).unwrap();

        assert_eq!(
            scanner.calls.borrow().as_slice(),
            &[
                ScanCall {
                    root: dist.clone(),
                    includes: vec![],
                    excludes: vec![],
                    use_default_excludes: true,
                },
                ScanCall {
                    root: dist.clone(),
                    includes: vec!["**/*.txt".to_string()],
                    excludes: vec!["tmp/".to_string()],
                    use_default_excludes: false,
                },
            ]
        );
    }

    #[test]
    fn test_missing_tree_directory_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let resolver = FakeResolver::default();
        let scanner = FakeScanner::default();
        let classifier = Classifier::new(&resolver, &scanner);

        let entries = classifier
            .classify_tree(&TreeRule::new("does-not-exist"), temp.path())
            .unwrap();
        assert!(entries.is_empty());
        assert!(scanner.calls.borrow().is_empty());
    }

    #[test]
    fn test_destination() {
        assert_eq!(destination(None, "a.jar"), "a.jar");
        assert_eq!(destination(Some(""), "a.jar"), "a.jar");
        assert_eq!(destination(Some("lib"), "a.jar"), "lib/a.jar");
        assert_eq!(destination(Some("lib/"), "a.jar"), "lib/a.jar");
        assert_eq!(destination(Some("lib\\ext"), "sub\\a.jar"), "lib/ext/sub/a.jar");
    }
}
