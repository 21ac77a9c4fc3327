pub mod analysis;
pub mod codegen;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod processor;

pub use config::ProcessorOptions;
pub use diagnostics::{Diagnostic, Diagnostics, Level};
pub use error::{LoadError, ProcessingError};
pub use processor::{ProcessingOutput, Processor};
