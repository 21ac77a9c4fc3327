use fragargs_types::ClassDef;
use serde_derive::{Deserialize, Serialize};

/* Optional header of a class model file */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ModelHeader {
  #[serde(default)]
  pub description: Option<String>,
  /* Paths of further model files, relative to this file or an include directory */
  #[serde(default)]
  pub imports: Vec<String>,
}

/* One YAML class model file */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ClassModelFile {
  #[serde(default)]
  pub model: ModelHeader,
  #[serde(default)]
  pub classes: Vec<ClassDef>,
}

impl ClassModelFile {
  pub fn imports(&self) -> &[String] {
    &self.model.imports
  }

  pub fn description(&self) -> Option<&str> {
    self.model.description.as_deref()
  }
}
