/* Setter Resolver: fields the builder cannot assign directly go through a setter */

use crate::analysis::field::AnnotatedField;
use crate::analysis::fragment::{FragmentModel, SetterCandidate};
use crate::error::ProcessingError;
use fragargs_types::Visibility;

/// Private fields always need a setter. Other non-public fields need one when
/// declared outside the controller's package, where the generated builder
/// lives.
pub fn needs_setter(field: &AnnotatedField, model: &FragmentModel) -> bool {
  match field.visibility {
    Visibility::Private => true,
    Visibility::Public => false,
    Visibility::Package | Visibility::Protected => field.class_package != model.package,
  }
}

fn capitalize(name: &str) -> String {
  let mut chars = name.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

fn matches_prefix(name: &str, prefix: &str) -> bool {
  name
    .strip_prefix(prefix)
    .and_then(|rest| rest.chars().next())
    .map(|c| c.is_ascii_uppercase())
    .unwrap_or(false)
}

/* Method names tried in order for `field` */
pub fn setter_names(field: &AnnotatedField) -> Vec<String> {
  let mut names = vec![format!("set{}", capitalize(&field.variable_name()))];

  if matches_prefix(&field.name, "m") {
    names.push(format!("set{}", field.name));
    names.push(format!("set{}", capitalize(&field.name)));
  }
  if matches_prefix(&field.name, "is") {
    names.push(format!("set{}", &field.name[2..]));
  }

  names.dedup();
  names
}

fn is_callable_from(candidate: &SetterCandidate, package: &str) -> bool {
  match candidate.visibility {
    Visibility::Public => true,
    Visibility::Private => false,
    Visibility::Package | Visibility::Protected => candidate.class_package == package,
  }
}

/// Finds the setter the injector calls for `field`: one parameter whose type is
/// exactly the field's type, callable from the builder's package.
pub fn resolve_setter(field: &AnnotatedField, model: &FragmentModel) -> Result<String, ProcessingError> {
  let names = setter_names(field);

  for name in &names {
    let Some(candidate) = model.setter_candidate(name) else {
      continue;
    };
    if candidate.parameters.len() == 1
      && candidate.parameters[0] == field.field_type
      && is_callable_from(candidate, &model.package)
    {
      return Ok(name.clone());
    }
  }

  Err(ProcessingError::MissingSetter {
    element: field.element(),
    field: field.name.clone(),
    class: field.simple_class_name().to_string(),
    signature: format!("{}({})", names[0], field.field_type),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use fragargs_types::{ClassDef, TypeRef};

  fn model() -> FragmentModel {
    FragmentModel::new(&ClassDef::new("com.example.DetailFragment"), true)
  }

  fn field(name: &str, visibility: Visibility, package: &str) -> AnnotatedField {
    AnnotatedField {
      name: name.to_string(),
      class_name: format!("{}.BaseFragment", package),
      class_package: package.to_string(),
      field_type: TypeRef::declared("java.lang.String"),
      visibility,
      key: name.to_string(),
      required: true,
      bundler: None,
      payload: None,
      setter: None,
      bundler_var: None,
    }
  }

  fn setter(name: &str, visibility: Visibility, package: &str, param: &str) -> SetterCandidate {
    SetterCandidate {
      name: name.to_string(),
      class_name: format!("{}.BaseFragment", package),
      class_package: package.to_string(),
      visibility,
      parameters: vec![TypeRef::parse(param).unwrap()],
    }
  }

  #[test]
  fn setter_requirement_by_visibility_and_package() {
    let model = model();
    assert!(needs_setter(&field("token", Visibility::Private, "com.example"), &model));
    assert!(!needs_setter(&field("token", Visibility::Package, "com.example"), &model));
    assert!(!needs_setter(&field("token", Visibility::Protected, "com.example"), &model));
    assert!(needs_setter(&field("token", Visibility::Protected, "com.base"), &model));
    assert!(needs_setter(&field("token", Visibility::Package, "com.base"), &model));
    assert!(!needs_setter(&field("token", Visibility::Public, "com.base"), &model));
  }

  #[test]
  fn candidate_names() {
    let names = setter_names(&field("mTitle", Visibility::Private, "com.example"));
    assert_eq!(names, vec!["setTitle", "setmTitle", "setMTitle"]);

    let names = setter_names(&field("isEnabled", Visibility::Private, "com.example"));
    assert_eq!(names, vec!["setIsEnabled", "setEnabled"]);

    let names = setter_names(&field("_count", Visibility::Private, "com.example"));
    assert_eq!(names, vec!["setCount"]);
  }

  #[test]
  fn resolves_first_matching_candidate() {
    let mut model = model();
    model.register_setter_candidate(setter("setMTitle", Visibility::Package, "com.example", "java.lang.String"));
    let title = field("mTitle", Visibility::Private, "com.example");
    assert_eq!(resolve_setter(&title, &model).unwrap(), "setMTitle");

    model.register_setter_candidate(setter("setTitle", Visibility::Public, "com.example", "java.lang.String"));
    assert_eq!(resolve_setter(&title, &model).unwrap(), "setTitle");
  }

  #[test]
  fn wrong_type_or_inaccessible_setters_do_not_match() {
    let mut model = model();
    model.register_setter_candidate(setter("setToken", Visibility::Public, "com.example", "java.lang.CharSequence"));
    model.register_setter_candidate(setter("setSecret", Visibility::Protected, "com.base", "java.lang.String"));

    let err = resolve_setter(&field("token", Visibility::Private, "com.example"), &model).unwrap_err();
    assert!(matches!(
      err,
      ProcessingError::MissingSetter { ref signature, .. } if signature == "setToken(java.lang.String)"
    ));
    assert!(resolve_setter(&field("secret", Visibility::Private, "com.base"), &model).is_err());
  }
}
