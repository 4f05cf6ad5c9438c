//! Common utilities and types shared across upmanifest crates.

pub mod error;
pub mod hash;
pub mod os;

pub use error::{Error, Result};
pub use os::Os;
