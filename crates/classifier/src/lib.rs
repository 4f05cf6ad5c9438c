//! Classification of build outputs into update descriptor entries.
//!
//! Candidates come from three places: resolved dependency artifacts
//! ([`ResolvedProject`]), single declared files ([`FileRule`]) and scanned
//! directory trees ([`TreeRule`]). The [`Classifier`] picks the governing rule
//! for each one and produces the ordered entry list of a descriptor.

pub mod artifact;
pub mod metadata;
pub mod pipeline;
pub mod rules;
pub mod scanner;

pub use artifact::{Artifact, ResolvedProject, StaticProject};
pub use metadata::{FsMetadataResolver, MetadataResolver};
pub use pipeline::{Classification, Classifier};
pub use rules::{DependencyRule, FileRule, Placement, RuleSet, TreeRule};
pub use scanner::{GlobTreeScanner, TreeScanner};

