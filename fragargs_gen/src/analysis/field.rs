use crate::analysis::classify::PayloadKind;
use fragargs_types::{TypeRef, Visibility};
use serde_derive::Serialize;

/// Strips a single hungarian (`mCount`) or underscore (`_count`) marker and
/// lowercases the following letter. Any other name is returned unchanged.
pub fn variable_name(name: &str) -> String {
  let mut chars = name.chars();
  let (Some(marker), Some(next)) = (chars.next(), chars.next()) else {
    return name.to_string();
  };
  let stripped = (marker == 'm' && next.is_ascii_uppercase())
    || (marker == '_' && next.is_ascii_alphabetic());
  if !stripped {
    return name.to_string();
  }
  let mut variable = next.to_ascii_lowercase().to_string();
  variable.push_str(chars.as_str());
  variable
}

/* One `@Arg` field occurrence in a controller hierarchy */
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedField {
  pub name: String,
  /* Qualified name of the declaring class */
  pub class_name: String,
  pub class_package: String,
  /* Declared type with the controller's bindings for inherited type variables applied */
  pub field_type: TypeRef,
  pub visibility: Visibility,
  pub key: String,
  pub required: bool,
  pub bundler: Option<String>,
  pub payload: Option<PayloadKind>,
  pub setter: Option<String>,
  pub bundler_var: Option<String>,
}

impl PartialEq for AnnotatedField {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
  }
}

impl Eq for AnnotatedField {}

impl AnnotatedField {
  pub fn variable_name(&self) -> String {
    variable_name(&self.name)
  }

  pub fn simple_class_name(&self) -> &str {
    self.class_name.rsplit('.').next().unwrap_or(&self.class_name)
  }

  /* `com.example.DetailFragment#mCount` */
  pub fn element(&self) -> String {
    format!("{}#{}", self.class_name, self.name)
  }

  pub fn is_primitive(&self) -> bool {
    self.field_type.is_primitive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_hungarian_and_underscore_markers() {
    assert_eq!(variable_name("mCount"), "count");
    assert_eq!(variable_name("mA"), "a");
    assert_eq!(variable_name("_label"), "label");
    assert_eq!(variable_name("_Label"), "label");
    assert_eq!(variable_name("_x"), "x");
  }

  #[test]
  fn keeps_other_names() {
    assert_eq!(variable_name("m"), "m");
    assert_eq!(variable_name("mcount"), "mcount");
    assert_eq!(variable_name("note"), "note");
    assert_eq!(variable_name("isEnabled"), "isEnabled");
    assert_eq!(variable_name("_"), "_");
    assert_eq!(variable_name("_1"), "_1");
  }

  #[test]
  fn equality_is_by_name() {
    let field = AnnotatedField {
      name: "mCount".to_string(),
      class_name: "com.example.A".to_string(),
      class_package: "com.example".to_string(),
      field_type: TypeRef::parse("int").unwrap(),
      visibility: Visibility::Package,
      key: "count".to_string(),
      required: true,
      bundler: None,
      payload: None,
      setter: None,
      bundler_var: None,
    };
    let mut other = field.clone();
    other.class_name = "com.example.B".to_string();
    other.key = "total".to_string();
    assert_eq!(field, other);
    assert_eq!(field.element(), "com.example.A#mCount");
    assert_eq!(field.simple_class_name(), "A");
  }
}
