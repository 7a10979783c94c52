//! Struct Descriptor Definitions
//!
//! This crate contains the raw descriptors handed over by the struct
//! extraction front end: structs, their fields, generation options, source
//! locations and parser diagnostics. It provides pure data structures without
//! any file I/O, type resolution or code generation logic.

pub mod diagnostic;
pub mod types;

// Re-export commonly used types at the crate root
pub use diagnostic::*;
pub use types::*;
