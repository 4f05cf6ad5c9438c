//! Directory tree scanning with Ant-style include/exclude patterns.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path};
use tracing::{trace, warn};
use upmanifest_common::{Error, Result};
use walkdir::WalkDir;

/// Pattern used when a tree rule declares no includes.
pub const DEFAULT_INCLUDES: &[&str] = &["**"];

/// Files nobody wants to ship: editor leftovers and VCS metadata.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    // Temporary and backup files
    "**/*~",
    "**/#*#",
    "**/.#*",
    "**/%*%",
    "**/._*",
    // CVS
    "**/CVS",
    "**/CVS/**",
    "**/.cvsignore",
    // RCS
    "**/RCS",
    "**/RCS/**",
    // SCCS
    "**/SCCS",
    "**/SCCS/**",
    // Visual SourceSafe
    "**/vssver.scc",
    // MKS
    "**/project.pj",
    // Subversion
    "**/.svn",
    "**/.svn/**",
    // GNU Arch
    "**/.arch-ids",
    "**/.arch-ids/**",
    // Bazaar
    "**/.bzr",
    "**/.bzr/**",
    // Surround SCM
    "**/.MySCMServerInfo",
    // Mac
    "**/.DS_Store",
    // Serena Dimensions
    "**/.metadata",
    "**/.metadata/**",
    // Mercurial
    "**/.hg",
    "**/.hg/**",
    "**/.hgignore",
    // Git
    "**/.git",
    "**/.git/**",
    "**/.gitignore",
    "**/.gitattributes",
    // BitKeeper
    "**/BitKeeper",
    "**/BitKeeper/**",
    "**/ChangeSet",
    "**/ChangeSet/**",
    // darcs
    "**/_darcs",
    "**/_darcs/**",
    "**/.darcsrepo",
    "**/.darcsrepo/**",
    "**/-darcs-backup*",
    "**/.darcs-temp-mail",
];

/// Lists the files of a tree that a tree rule selects.
pub trait TreeScanner {
    /// Relative, `/` separated paths of the regular files under `root` that
    /// match one of `includes` and none of `excludes`.
    fn scan(
        &self,
        root: &Path,
        includes: &[String],
        excludes: &[String],
        use_default_excludes: bool,
    ) -> Result<Vec<String>>;
}

/// Walks the tree on disk, visiting directory entries sorted by name.
///
/// Symbolic links are followed. A link that points back at one of its own
/// ancestors is reported and not entered again.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobTreeScanner;

impl TreeScanner for GlobTreeScanner {
    fn scan(
        &self,
        root: &Path,
        includes: &[String],
        excludes: &[String],
        use_default_excludes: bool,
    ) -> Result<Vec<String>> {
        let include_set = if includes.is_empty() {
            compile_globset(DEFAULT_INCLUDES.iter().copied())?
        } else {
            compile_globset(includes.iter().map(String::as_str))?
        };

        let mut exclude_patterns: Vec<&str> = excludes.iter().map(String::as_str).collect();
        if use_default_excludes {
            exclude_patterns.extend_from_slice(DEFAULT_EXCLUDES);
        }
        let exclude_set = compile_globset(exclude_patterns)?;

        let mut matched = Vec::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.loop_ancestor().is_some() => {
                    warn!("Skipping symbolic link loop: {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(Error::Scan {
                        root: root.to_path_buf(),
                        reason: e.to_string(),
                    })
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(relative) = relative_path(root, entry.path()) else {
                continue;
            };
            if !include_set.is_match(&relative) || exclude_set.is_match(&relative) {
                trace!("Not selected: {}", relative);
                continue;
            }
            matched.push(relative);
        }

        Ok(matched)
    }
}

/// Translate Ant conventions into glob syntax: `\` becomes `/` and a trailing
/// `/` stands for everything below that directory.
///
/// Only `*`, `?` and `**` are wildcards in Ant patterns, so brackets and
/// braces are matched literally.
fn normalize_pattern(pattern: &str) -> String {
    let mut normalized = String::with_capacity(pattern.len());
    for c in pattern.trim().chars() {
        match c {
            '\\' => normalized.push('/'),
            '[' | ']' | '{' | '}' => {
                normalized.push('[');
                normalized.push(c);
                normalized.push(']');
            }
            _ => normalized.push(c),
        }
    }
    if normalized.ends_with('/') {
        normalized.push_str("**");
    }
    normalized
}

fn compile_globset<'p, I>(patterns: I) -> Result<GlobSet>
where
    I: IntoIterator<Item = &'p str>,
{
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(&normalize_pattern(pattern))
            .literal_separator(true)
            .build()
            .map_err(|e| Error::Pattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| Error::Pattern {
        pattern: "<set>".to_string(),
        reason: e.to_string(),
    })
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
