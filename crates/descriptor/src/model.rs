//! Descriptor types.

use serde::{Deserialize, Serialize};
use upmanifest_common::Os;

/// Integrity metadata of a source file, computed once when the entry is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Size in bytes.
    pub size: u64,
    /// Hex encoded SHA256 digest.
    pub checksum: String,
}

/// One file distributed by the update runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Destination path relative to the base path, always `/` separated.
    pub path: String,
    pub metadata: FileMetadata,
    /// Platform restriction; `None` means every platform.
    pub os: Option<Os>,
    pub classpath: bool,
    pub modulepath: bool,
    pub ignore_boot_conflict: bool,
    pub comment: Option<String>,
}

/// A key/value pair of the `properties` or `dynamicProperties` sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The complete update descriptor.
///
/// Only [`DescriptorBuilder`](crate::DescriptorBuilder) creates descriptors;
/// once built they are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    pub(crate) base_uri: String,
    pub(crate) base_path: String,
    pub(crate) properties: Vec<Property>,
    pub(crate) dynamic_properties: Vec<Property>,
    pub(crate) update_handler: Option<String>,
    pub(crate) launcher: Option<String>,
    pub(crate) files: Vec<FileEntry>,
}

impl Descriptor {
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Properties resolved by the runtime when the update runs.
    pub fn dynamic_properties(&self) -> &[Property] {
        &self.dynamic_properties
    }

    pub fn update_handler(&self) -> Option<&str> {
        self.update_handler.as_deref()
    }

    pub fn launcher(&self) -> Option<&str> {
        self.launcher.as_deref()
    }

    /// Entries in insertion order.
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }
}
