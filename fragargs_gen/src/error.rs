/* Error types for model loading and per-class processing */

use std::path::PathBuf;
use thiserror::Error;

/* A failure attached to one element of the class model (`com.x.Foo` or `com.x.Foo#field`) */
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessingError {
  #[error(
    "A field with the name '{variable}' already exists in class {existing_class} (field '{existing_field}'). \
     The field '{field}' in class {class} clashes with it; rename one of them"
  )]
  DuplicateVariableName {
    element: String,
    variable: String,
    field: String,
    class: String,
    existing_field: String,
    existing_class: String,
  },

  #[error(
    "The bundle key '{key}' used by field '{field}' in class {class} is already used by field \
     '{existing_field}' in class {existing_class}. Use @Arg(key = \"...\") to choose a different key"
  )]
  DuplicateKey {
    element: String,
    key: String,
    field: String,
    class: String,
    existing_field: String,
    existing_class: String,
  },

  #[error(
    "Don't know how to put {field_type} in a Bundle (field '{field}' in class {class}). \
     This type is not supported by default; supply a custom codec with @Arg(bundler = ...)"
  )]
  UnsupportedType {
    element: String,
    field: String,
    class: String,
    field_type: String,
  },

  #[error(
    "The @Arg annotated field '{field}' in class {class} is not accessible from the generated builder. \
     Hence a corresponding non-private setter method must be provided called '{signature}'. \
     Please add a setter method for this field!"
  )]
  MissingSetter {
    element: String,
    field: String,
    class: String,
    signature: String,
  },

  #[error("{message}")]
  InvalidBundler { element: String, message: String },

  #[error("{message}")]
  Structural { element: String, message: String },

  #[error("Unable to write {path}: {message}")]
  Io {
    element: String,
    path: String,
    message: String,
  },
}

impl ProcessingError {
  pub fn structural(element: impl Into<String>, message: impl Into<String>) -> Self {
    ProcessingError::Structural {
      element: element.into(),
      message: message.into(),
    }
  }

  pub fn invalid_bundler(element: impl Into<String>, message: impl Into<String>) -> Self {
    ProcessingError::InvalidBundler {
      element: element.into(),
      message: message.into(),
    }
  }

  /* The element the diagnostic is reported against */
  pub fn element(&self) -> &str {
    match self {
      ProcessingError::DuplicateVariableName { element, .. }
      | ProcessingError::DuplicateKey { element, .. }
      | ProcessingError::UnsupportedType { element, .. }
      | ProcessingError::MissingSetter { element, .. }
      | ProcessingError::InvalidBundler { element, .. }
      | ProcessingError::Structural { element, .. }
      | ProcessingError::Io { element, .. } => element,
    }
  }
}

/* Failures while reading class model files */
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {}: {source}", .path.display())]
  Yaml {
    path: PathBuf,
    #[source]
    source: serde_yml::Error,
  },

  #[error("import '{import}' not found relative to '{}' or in include directories", .base.display())]
  ImportNotFound { import: String, base: PathBuf },

  #[error("class {name} is defined in both {} and {}", .first.display(), .second.display())]
  DuplicateClass {
    name: String,
    first: PathBuf,
    second: PathBuf,
  },

  #[error("invalid class {name} in {}: {reason}", .path.display())]
  InvalidClass {
    name: String,
    path: PathBuf,
    reason: String,
  },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn element_is_reported_for_every_variant() {
    let err = ProcessingError::structural("com.example.A#mCount", "bad");
    assert_eq!(err.element(), "com.example.A#mCount");
    assert_eq!(err.to_string(), "bad");

    let err = ProcessingError::MissingSetter {
      element: "com.example.A#token".to_string(),
      field: "token".to_string(),
      class: "A".to_string(),
      signature: "setToken(java.lang.String)".to_string(),
    };
    assert_eq!(err.element(), "com.example.A#token");
    assert!(err.to_string().contains("setToken(java.lang.String)"));
  }
}
