//! Update descriptor model and serialization.
//!
//! A [`Descriptor`] is the in-memory form of the manifest consumed by the
//! auto-update runtime. It is assembled once through a [`DescriptorBuilder`]
//! and rendered to XML by the [`writer`] module.

pub mod builder;
pub mod model;
pub mod writer;

pub use builder::DescriptorBuilder;
pub use model::{Descriptor, FileEntry, FileMetadata, Property};
pub use writer::{to_xml_bytes, to_xml_string, write_descriptor};
