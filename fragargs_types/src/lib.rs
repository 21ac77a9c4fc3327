//! Class Model Type Definitions
//!
//! This crate contains the core data structures describing the compile-time
//! symbol table that the fragargs generator walks: classes, fields, methods,
//! constructors, modifiers, annotations and Java type references.
//! It provides pure data structures without any file I/O or code generation logic.

pub mod class;
pub mod modifiers;
pub mod types;

// Re-export commonly used types at the crate root
pub use class::*;
pub use modifiers::*;
pub use types::*;
