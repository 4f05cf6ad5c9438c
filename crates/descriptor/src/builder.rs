//! Incremental construction of a [`Descriptor`].

use crate::model::{Descriptor, FileEntry, Property};
use tracing::trace;

/// Accumulates entries and global fields in call order.
///
/// Nothing is sorted or deduplicated: two entries with the same path are
/// both kept.
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    descriptor: Descriptor,
}

impl DescriptorBuilder {
    pub fn new(base_uri: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            descriptor: Descriptor {
                base_uri: base_uri.into(),
                base_path: base_path.into(),
                properties: Vec::new(),
                dynamic_properties: Vec::new(),
                update_handler: None,
                launcher: None,
                files: Vec::new(),
            },
        }
    }

    /// Append a file entry.
    pub fn file(&mut self, entry: FileEntry) -> &mut Self {
        trace!("Descriptor entry #{}: {}", self.descriptor.files.len(), entry.path);
        self.descriptor.files.push(entry);
        self
    }

    /// Append several file entries, keeping their order.
    pub fn files<I>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = FileEntry>,
    {
        for entry in entries {
            self.file(entry);
        }
        self
    }

    pub fn property(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.descriptor.properties.push(Property::new(key, value));
        self
    }

    pub fn dynamic_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.descriptor
            .dynamic_properties
            .push(Property::new(key, value));
        self
    }

    pub fn update_handler(&mut self, class_name: impl Into<String>) -> &mut Self {
        self.descriptor.update_handler = Some(class_name.into());
        self
    }

    pub fn launcher(&mut self, class_name: impl Into<String>) -> &mut Self {
        self.descriptor.launcher = Some(class_name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.descriptor.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptor.files.is_empty()
    }

    /// Finish the descriptor.
    pub fn build(self) -> Descriptor {
        self.descriptor
    }
}
