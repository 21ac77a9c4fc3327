use crate::analysis::field::AnnotatedField;
use crate::error::ProcessingError;
use crate::model::index::TypeBounds;
use fragargs_types::{ClassDef, TypeParam, TypeRef, Visibility};
use indexmap::IndexMap;
use serde_derive::Serialize;
use std::collections::BTreeMap;

/* A `set*` method seen while scanning the hierarchy */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetterCandidate {
  pub name: String,
  pub class_name: String,
  pub class_package: String,
  pub visibility: Visibility,
  pub parameters: Vec<TypeRef>,
}

/// Everything known about one controller class once its hierarchy has been
/// scanned: the partitioned `@Arg` fields, the bundle keys they claim, the
/// custom codecs they use and the setters available to the builder.
#[derive(Debug, Clone, Serialize)]
pub struct FragmentModel {
  pub qualified_name: String,
  pub simple_name: String,
  pub package: String,
  pub binary_name: String,
  /* Simple names of enclosing classes, outermost first */
  pub enclosing: Vec<String>,
  pub type_parameters: Vec<TypeParam>,
  pub inherited: bool,
  /* Keyed by derived variable name, which keeps both sets sorted */
  required: BTreeMap<String, AnnotatedField>,
  optional: BTreeMap<String, AnnotatedField>,
  /* bundle key -> variable name */
  keys: IndexMap<String, String>,
  /* codec class -> generated field name, in first-use order */
  bundlers: IndexMap<String, String>,
  setters: IndexMap<String, SetterCandidate>,
}

impl FragmentModel {
  pub fn new(class: &ClassDef, inherited: bool) -> Self {
    Self {
      qualified_name: class.name.clone(),
      simple_name: class.simple_name().to_string(),
      package: class.package().to_string(),
      binary_name: class.binary_name(),
      enclosing: class.enclosing_names().iter().map(|n| n.to_string()).collect(),
      type_parameters: class.type_parameters.clone(),
      inherited,
      required: BTreeMap::new(),
      optional: BTreeMap::new(),
      keys: IndexMap::new(),
      bundlers: IndexMap::new(),
      setters: IndexMap::new(),
    }
  }

  pub fn add_required(&mut self, field: AnnotatedField) -> Result<(), ProcessingError> {
    self.add(field, true)
  }

  pub fn add_optional(&mut self, field: AnnotatedField) -> Result<(), ProcessingError> {
    self.add(field, false)
  }

  fn add(&mut self, mut field: AnnotatedField, required: bool) -> Result<(), ProcessingError> {
    let variable = field.variable_name();

    if let Some(existing) = self.field(&variable) {
      return Err(ProcessingError::DuplicateVariableName {
        element: field.element(),
        variable,
        field: field.name.clone(),
        class: field.class_name.clone(),
        existing_field: existing.name.clone(),
        existing_class: existing.class_name.clone(),
      });
    }

    if let Some(owner) = self.field_for_key(&field.key) {
      return Err(ProcessingError::DuplicateKey {
        element: field.element(),
        key: field.key.clone(),
        field: field.name.clone(),
        class: field.class_name.clone(),
        existing_field: owner.name.clone(),
        existing_class: owner.class_name.clone(),
      });
    }

    if let Some(bundler) = &field.bundler {
      field.bundler_var = Some(self.register_bundler(bundler));
    }

    self.keys.insert(field.key.clone(), variable.clone());
    if required {
      self.required.insert(variable, field);
    } else {
      self.optional.insert(variable, field);
    }
    Ok(())
  }

  fn register_bundler(&mut self, class: &str) -> String {
    if let Some(var) = self.bundlers.get(class) {
      return var.clone();
    }
    let var = format!("bundler{}", self.bundlers.len() + 1);
    self.bundlers.insert(class.to_string(), var.clone());
    var
  }

  pub fn field(&self, variable: &str) -> Option<&AnnotatedField> {
    self.required.get(variable).or_else(|| self.optional.get(variable))
  }

  pub fn field_for_key(&self, key: &str) -> Option<&AnnotatedField> {
    self.keys.get(key).and_then(|variable| self.field(variable))
  }

  pub fn required_fields(&self) -> impl Iterator<Item = &AnnotatedField> {
    self.required.values()
  }

  pub fn optional_fields(&self) -> impl Iterator<Item = &AnnotatedField> {
    self.optional.values()
  }

  /* Required and optional fields merged, sorted by variable name */
  pub fn fields_sorted(&self) -> Vec<&AnnotatedField> {
    let mut merged: Vec<(&String, &AnnotatedField)> =
      self.required.iter().chain(self.optional.iter()).collect();
    merged.sort_by(|a, b| a.0.cmp(b.0));
    merged.into_iter().map(|(_, field)| field).collect()
  }

  pub fn field_count(&self) -> usize {
    self.required.len() + self.optional.len()
  }

  pub fn bundlers(&self) -> impl Iterator<Item = (&String, &String)> {
    self.bundlers.iter()
  }

  /// Remembers a setter. For a name seen twice the more visible method wins;
  /// on equal visibility the first one (nearest to the leaf) is kept. Private
  /// methods are never candidates.
  pub fn register_setter_candidate(&mut self, candidate: SetterCandidate) {
    if candidate.visibility == Visibility::Private {
      return;
    }
    if let Some(existing) = self.setters.get(&candidate.name) {
      if existing.visibility >= candidate.visibility {
        return;
      }
    }
    self.setters.insert(candidate.name.clone(), candidate);
  }

  pub fn setter_candidate(&self, name: &str) -> Option<&SetterCandidate> {
    self.setters.get(name)
  }

  pub fn assign_setter(&mut self, variable: &str, setter: String) {
    if let Some(field) = self.required.get_mut(variable) {
      field.setter = Some(setter);
    } else if let Some(field) = self.optional.get_mut(variable) {
      field.setter = Some(setter);
    }
  }

  /* `DetailFragmentBuilder`, or `Outer$$InnerBuilder` for nested controllers */
  pub fn builder_name(&self) -> String {
    let mut name = String::new();
    for outer in &self.enclosing {
      name.push_str(outer);
      name.push_str("$$");
    }
    name.push_str(&self.simple_name);
    name.push_str("Builder");
    name
  }

  pub fn qualified_builder_name(&self) -> String {
    if self.package.is_empty() {
      self.builder_name()
    } else {
      format!("{}.{}", self.package, self.builder_name())
    }
  }

  pub fn is_generic(&self) -> bool {
    !self.type_parameters.is_empty()
  }

  pub fn type_variable_names(&self) -> Vec<String> {
    self.type_parameters.iter().map(|p| p.name.clone()).collect()
  }

  /* `<P extends android.os.Parcelable & java.io.Serializable, T>`, empty when not generic */
  pub fn type_parameters_declaration(&self) -> String {
    if self.type_parameters.is_empty() {
      return String::new();
    }
    let params: Vec<String> = self
      .type_parameters
      .iter()
      .map(|param| {
        if param.bounds.is_empty() {
          param.name.clone()
        } else {
          let bounds: Vec<String> = param.bounds.iter().map(|b| b.to_string()).collect();
          format!("{} extends {}", param.name, bounds.join(" & "))
        }
      })
      .collect();
    format!("<{}>", params.join(", "))
  }

  pub fn type_bounds(&self) -> TypeBounds {
    self
      .type_parameters
      .iter()
      .map(|param| (param.name.clone(), param.bounds.clone()))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use fragargs_types::Modifier;

  fn model() -> FragmentModel {
    let mut class = ClassDef::new("com.example.Outer.DetailFragment");
    class.package = Some("com.example".to_string());
    class.modifiers = vec![Modifier::Public, Modifier::Static];
    class.type_parameters = vec![
      TypeParam {
        name: "P".to_string(),
        bounds: vec![
          TypeRef::declared("android.os.Parcelable"),
          TypeRef::declared("java.io.Serializable"),
        ],
      },
      TypeParam {
        name: "T".to_string(),
        bounds: Vec::new(),
      },
    ];
    FragmentModel::new(&class, true)
  }

  fn field(name: &str, class: &str, key: &str) -> AnnotatedField {
    AnnotatedField {
      name: name.to_string(),
      class_name: class.to_string(),
      class_package: "com.example".to_string(),
      field_type: TypeRef::declared("java.lang.String"),
      visibility: Visibility::Package,
      key: key.to_string(),
      required: true,
      bundler: None,
      payload: None,
      setter: None,
      bundler_var: None,
    }
  }

  #[test]
  fn naming_of_nested_generic_controller() {
    let model = model();
    assert_eq!(model.builder_name(), "Outer$$DetailFragmentBuilder");
    assert_eq!(model.qualified_builder_name(), "com.example.Outer$$DetailFragmentBuilder");
    assert_eq!(model.binary_name, "com.example.Outer$DetailFragment");
    assert_eq!(
      model.type_parameters_declaration(),
      "<P extends android.os.Parcelable & java.io.Serializable, T>"
    );
    assert_eq!(model.type_bounds()["P"].len(), 2);
  }

  #[test]
  fn duplicate_variable_name_names_both_fields() {
    let mut model = model();
    model.add_required(field("mCount", "com.example.Child", "count")).unwrap();
    let err = model
      .add_optional(field("count", "com.example.Base", "total"))
      .unwrap_err();
    match err {
      ProcessingError::DuplicateVariableName {
        field,
        class,
        existing_field,
        existing_class,
        ..
      } => {
        assert_eq!(field, "count");
        assert_eq!(class, "com.example.Base");
        assert_eq!(existing_field, "mCount");
        assert_eq!(existing_class, "com.example.Child");
      }
      other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(model.field_count(), 1);
  }

  #[test]
  fn duplicate_key_names_both_fields() {
    let mut model = model();
    model.add_required(field("label", "com.example.Child", "title")).unwrap();
    let err = model
      .add_required(field("heading", "com.example.Base", "title"))
      .unwrap_err();
    assert!(matches!(
      err,
      ProcessingError::DuplicateKey { ref existing_field, ref field, .. }
        if existing_field == "label" && field == "heading"
    ));
  }

  #[test]
  fn partitions_and_sorts_by_variable_name() {
    let mut model = model();
    model.add_optional(field("note", "com.example.A", "note")).unwrap();
    model.add_required(field("mLabel", "com.example.A", "label")).unwrap();
    model.add_required(field("count", "com.example.A", "count")).unwrap();

    let required: Vec<&str> = model.required_fields().map(|f| f.name.as_str()).collect();
    assert_eq!(required, vec!["count", "mLabel"]);
    let all: Vec<&str> = model.fields_sorted().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(all, vec!["count", "mLabel", "note"]);
  }

  #[test]
  fn bundlers_registered_once_in_first_use_order() {
    let mut model = model();
    let mut a = field("a", "com.example.A", "a");
    a.bundler = Some("com.example.DateBundler".to_string());
    let mut b = field("b", "com.example.A", "b");
    b.bundler = Some("com.example.UriBundler".to_string());
    let mut c = field("c", "com.example.A", "c");
    c.bundler = Some("com.example.DateBundler".to_string());
    model.add_required(a).unwrap();
    model.add_optional(b).unwrap();
    model.add_required(c).unwrap();

    let bundlers: Vec<(&str, &str)> = model
      .bundlers()
      .map(|(class, var)| (class.as_str(), var.as_str()))
      .collect();
    assert_eq!(
      bundlers,
      vec![("com.example.DateBundler", "bundler1"), ("com.example.UriBundler", "bundler2")]
    );
    assert_eq!(model.field("c").unwrap().bundler_var.as_deref(), Some("bundler1"));
  }

  #[test]
  fn setter_candidates_prefer_visibility_then_first_seen() {
    let mut model = model();
    let candidate = |class: &str, visibility| SetterCandidate {
      name: "setCount".to_string(),
      class_name: class.to_string(),
      class_package: "com.example".to_string(),
      visibility,
      parameters: vec![TypeRef::parse("int").unwrap()],
    };

    model.register_setter_candidate(candidate("com.example.Leaf", Visibility::Private));
    assert!(model.setter_candidate("setCount").is_none());

    model.register_setter_candidate(candidate("com.example.Leaf", Visibility::Protected));
    model.register_setter_candidate(candidate("com.example.Mid", Visibility::Package));
    model.register_setter_candidate(candidate("com.example.Base", Visibility::Package));
    let chosen = model.setter_candidate("setCount").unwrap();
    assert_eq!(chosen.class_name, "com.example.Mid");

    model.register_setter_candidate(candidate("com.example.Root", Visibility::Public));
    assert_eq!(model.setter_candidate("setCount").unwrap().class_name, "com.example.Root");
  }
}
