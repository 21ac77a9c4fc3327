pub mod java;
pub mod java_gen;
pub mod writer;

pub use java::{GeneratedUnit, JavaCodeGenerator, JavaCodeGeneratorOptions, GENERATED_HEADER};
pub use java_gen::DispatchEntry;
pub use writer::{JavaWriter, SourceEmitter};
