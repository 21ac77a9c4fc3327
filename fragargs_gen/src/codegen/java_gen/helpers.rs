use crate::model::ClassIndex;
use fragargs_types::{TypeRef, WildcardBound};
use std::collections::{BTreeMap, BTreeSet};

/* Quote and escape `value` as a Java string literal */
pub fn java_string_literal(value: &str) -> String {
  let mut literal = String::with_capacity(value.len() + 2);
  literal.push('"');
  for c in value.chars() {
    match c {
      '"' => literal.push_str("\\\""),
      '\\' => literal.push_str("\\\\"),
      '\n' => literal.push_str("\\n"),
      '\r' => literal.push_str("\\r"),
      '\t' => literal.push_str("\\t"),
      c if (c as u32) < 0x20 => literal.push_str(&format!("\\u{:04x}", c as u32)),
      c => literal.push(c),
    }
  }
  literal.push('"');
  literal
}

/* `@com.example.Keep` from either `com.example.Keep` or `@com.example.Keep` */
pub fn annotation_literal(name: &str) -> String {
  if name.starts_with('@') {
    name.to_string()
  } else {
    format!("@{}", name)
  }
}

/// Renders type references relative to the package a unit is generated in.
///
/// Imported types and top-level `java.lang` types are written by simple name.
/// A class the index places in the unit's own package loses the package
/// prefix. Everything else, including classes the index does not know, is
/// written fully qualified.
#[derive(Debug, Clone)]
pub struct TypeRenderer<'a> {
  package: String,
  index: &'a ClassIndex,
  /* qualified name -> simple name */
  imported: BTreeMap<String, String>,
  /* same-package classes that may be missing from the index */
  local: BTreeSet<String>,
}

impl<'a> TypeRenderer<'a> {
  pub fn new(package: &str, index: &'a ClassIndex) -> Self {
    Self {
      package: package.to_string(),
      index,
      imported: BTreeMap::new(),
      local: BTreeSet::new(),
    }
  }

  /* Marks `qualified` as a member of the unit's package */
  pub fn declare_local(&mut self, qualified: &str) {
    self.local.insert(qualified.to_string());
  }

  fn in_unit_package(&self, qualified: &str) -> bool {
    if self.local.contains(qualified) {
      return true;
    }
    self
      .index
      .get(qualified)
      .is_some_and(|class| class.package() == self.package)
  }

  pub fn import(&mut self, qualified: &str) {
    let simple = qualified.rsplit('.').next().unwrap_or(qualified).to_string();
    self.imported.insert(qualified.to_string(), simple);
  }

  /* Sorted import list */
  pub fn imports(&self) -> Vec<String> {
    self.imported.keys().cloned().collect()
  }

  pub fn name(&self, qualified: &str) -> String {
    if let Some(simple) = self.imported.get(qualified) {
      return simple.clone();
    }
    if let Some(rest) = qualified.strip_prefix("java.lang.") {
      if !rest.contains('.') {
        return rest.to_string();
      }
    }
    if self.package.is_empty() || !self.in_unit_package(qualified) {
      return qualified.to_string();
    }
    match qualified.strip_prefix(&format!("{}.", self.package)) {
      /* an import of the same simple name would shadow it */
      Some(rest) if !self.shadowed(rest) => rest.to_string(),
      _ => qualified.to_string(),
    }
  }

  fn shadowed(&self, relative: &str) -> bool {
    let first = relative.split('.').next().unwrap_or(relative);
    self.imported.values().any(|simple| simple == first)
  }

  pub fn render(&self, ty: &TypeRef) -> String {
    match ty {
      TypeRef::Primitive(prim) => prim.keyword().to_string(),
      TypeRef::Void => "void".to_string(),
      TypeRef::Variable(name) => name.clone(),
      TypeRef::Array(element) => format!("{}[]", self.render(element)),
      TypeRef::Wildcard(None) => "?".to_string(),
      TypeRef::Wildcard(Some(WildcardBound::Extends(bound))) => {
        format!("? extends {}", self.render(bound))
      }
      TypeRef::Wildcard(Some(WildcardBound::Super(bound))) => {
        format!("? super {}", self.render(bound))
      }
      TypeRef::Declared { name, args } => {
        let mut rendered = self.name(name);
        if !args.is_empty() {
          let args: Vec<String> = args.iter().map(|a| self.render(a)).collect();
          rendered.push('<');
          rendered.push_str(&args.join(", "));
          rendered.push('>');
        }
        rendered
      }
    }
  }
}
