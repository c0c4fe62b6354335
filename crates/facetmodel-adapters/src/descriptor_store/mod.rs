//! Descriptor sources that do not touch the filesystem.

pub mod memory;

pub use memory::InMemoryDescriptorSource;
