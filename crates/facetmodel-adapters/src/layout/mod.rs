//! Layout sources: per-type member overrides installed at layout precedence.

pub mod file;
pub mod memory;

pub use file::{FileLayoutSource, LAYOUT_SUFFIX};
pub use memory::InMemoryLayoutSource;
