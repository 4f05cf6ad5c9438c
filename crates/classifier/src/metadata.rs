//! Integrity metadata for source files.

use std::path::Path;
use tracing::trace;
use upmanifest_common::{hash, Error, Os, Result};
use upmanifest_descriptor::FileMetadata;

/// Produces the metadata block of a descriptor entry.
pub trait MetadataResolver {
    /// Size and checksum of the file at `path`.
    fn read(&self, path: &Path) -> Result<FileMetadata>;

    /// Platform implied by a file name such as `lib-1.0-linux.jar`.
    fn os_from_filename(&self, filename: &str) -> Option<Os> {
        Os::from_filename(filename)
    }
}

/// Reads metadata straight from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMetadataResolver;

impl MetadataResolver for FsMetadataResolver {
    fn read(&self, path: &Path) -> Result<FileMetadata> {
        let (checksum, size) = hash::sha256_file(path).map_err(|source| Error::Metadata {
            path: path.to_path_buf(),
            source,
        })?;
        trace!("{} size={} sha256={}", path.display(), size, checksum);
        Ok(FileMetadata { size, checksum })
    }
}
