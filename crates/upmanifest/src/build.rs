//! Descriptor generation for one invocation.

use crate::config::{BuildConfig, BuildPlan, Overrides};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use upmanifest_classifier::{Classifier, MetadataResolver, TreeScanner};
use upmanifest_classifier::{FsMetadataResolver, GlobTreeScanner};
use upmanifest_descriptor::{write_descriptor, Descriptor, DescriptorBuilder};

/// Classify everything the plan declares and assemble the descriptor.
pub fn assemble(
    plan: &BuildPlan,
    resolver: &dyn MetadataResolver,
    scanner: &dyn TreeScanner,
) -> Result<Descriptor> {
    let entries = Classifier::new(resolver, scanner)
        .classify(&plan.project, &plan.rules)
        .context("Failed to classify project files")?;

    let mut builder = DescriptorBuilder::new(&plan.base_uri, &plan.base_path);
    builder.files(entries);

    for (key, value) in &plan.properties {
        builder.property(key, value);
    }
    for (key, value) in &plan.dynamic_properties {
        builder.dynamic_property(key, value);
    }
    if let Some(ref handler) = plan.update_handler {
        builder.update_handler(handler);
    }
    if let Some(ref launcher) = plan.launcher {
        builder.launcher(launcher);
    }

    debug!("Descriptor has {} files", builder.len());
    Ok(builder.build())
}

/// Write the descriptor to `path`, creating parent directories, and return
/// the absolute path of the written file.
pub fn write_manifest(descriptor: &Descriptor, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating directory {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Error creating file {}", path.display()))?;
    write_descriptor(descriptor, BufWriter::new(file))
        .with_context(|| format!("Error writing file {}", path.display()))?;

    let absolute = std::fs::canonicalize(path)
        .with_context(|| format!("Error resolving {}", path.display()))?;
    info!("Created {}", absolute.display());
    Ok(absolute)
}

/// Run a plan against the filesystem.
pub fn run_plan(plan: &BuildPlan) -> Result<PathBuf> {
    let descriptor = assemble(plan, &FsMetadataResolver, &GlobTreeScanner)?;
    write_manifest(&descriptor, &plan.output_file)
}

/// Load a configuration file, apply command-line overrides and build.
///
/// Configuration problems are reported before anything is written.
pub fn run(config_path: &Path, overrides: Overrides) -> Result<PathBuf> {
    let mut config = BuildConfig::load(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    config.apply_overrides(overrides);
    let plan = config.into_plan()?;
    run_plan(&plan)
}
