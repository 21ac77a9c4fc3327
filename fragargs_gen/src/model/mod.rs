pub mod file;
pub mod index;
pub mod loader;
pub mod platform;

pub use file::{ClassModelFile, ModelHeader};
pub use index::{ClassIndex, TypeBounds};
pub use loader::ModelLoader;
pub use platform::Platform;
