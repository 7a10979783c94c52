//! Struct Descriptor Loading
//!
//! This crate provides functionality for loading the descriptor files
//! produced by the struct extraction front end, expanding input globs, and
//! gating the run on the diagnostics the front end reported.

pub mod error;
pub mod file;
pub mod glob;
pub mod loader;

// Re-export commonly used types at the crate root
pub use error::{LoadError, LoadResult};
pub use file::{DescriptorFile, FileFormat, RawStruct};
pub use glob::{expand_inputs, is_pattern};
pub use loader::{DescriptorLoader, DescriptorSource};

// Re-export cinspect_types for convenience
pub use cinspect_types;
