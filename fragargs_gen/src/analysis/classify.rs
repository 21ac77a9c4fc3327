/* Type Classifier: maps a field's static type to the bundle operation storing it */

use crate::model::index::{ClassIndex, TypeBounds};
use crate::model::platform::Platform;
use fragargs_types::{PrimitiveType, TypeRef};
use serde_derive::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScalarKind {
  String,
  Int,
  Long,
  Double,
  Short,
  Float,
  Byte,
  Boolean,
  Char,
  CharSequence,
  Bundle,
  Parcelable,
}

impl ScalarKind {
  pub fn operation(&self) -> &'static str {
    match self {
      ScalarKind::String => "String",
      ScalarKind::Int => "Int",
      ScalarKind::Long => "Long",
      ScalarKind::Double => "Double",
      ScalarKind::Short => "Short",
      ScalarKind::Float => "Float",
      ScalarKind::Byte => "Byte",
      ScalarKind::Boolean => "Boolean",
      ScalarKind::Char => "Char",
      ScalarKind::CharSequence => "CharSequence",
      ScalarKind::Bundle => "Bundle",
      ScalarKind::Parcelable => "Parcelable",
    }
  }

  /* Boxed scalars and bundles have no array accessor on the container */
  pub fn has_array_form(&self) -> bool {
    !matches!(self, ScalarKind::Bundle)
  }

  fn from_primitive(prim: PrimitiveType) -> Self {
    match prim {
      PrimitiveType::Boolean => ScalarKind::Boolean,
      PrimitiveType::Byte => ScalarKind::Byte,
      PrimitiveType::Short => ScalarKind::Short,
      PrimitiveType::Int => ScalarKind::Int,
      PrimitiveType::Long => ScalarKind::Long,
      PrimitiveType::Char => ScalarKind::Char,
      PrimitiveType::Float => ScalarKind::Float,
      PrimitiveType::Double => ScalarKind::Double,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PayloadKind {
  Scalar(ScalarKind),
  Array(ScalarKind),
  StringArrayList,
  IntegerArrayList,
  CharSequenceArrayList,
  ParcelableArrayList,
  SparseParcelableArray,
  Serializable,
}

impl PayloadKind {
  /* Suffix of the container's `put`/`get` methods */
  pub fn operation(&self) -> String {
    match self {
      PayloadKind::Scalar(kind) => kind.operation().to_string(),
      PayloadKind::Array(kind) => format!("{}Array", kind.operation()),
      PayloadKind::StringArrayList => "StringArrayList".to_string(),
      PayloadKind::IntegerArrayList => "IntegerArrayList".to_string(),
      PayloadKind::CharSequenceArrayList => "CharSequenceArrayList".to_string(),
      PayloadKind::ParcelableArrayList => "ParcelableArrayList".to_string(),
      PayloadKind::SparseParcelableArray => "SparseParcelableArray".to_string(),
      PayloadKind::Serializable => "Serializable".to_string(),
    }
  }

  /* The generic getter returns `Serializable`, which must be cast back */
  pub fn needs_cast(&self) -> bool {
    matches!(self, PayloadKind::Serializable)
  }
}

impl fmt::Display for PayloadKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.operation())
  }
}

pub struct TypeClassifier<'a> {
  index: &'a ClassIndex,
  platform: &'a Platform,
}

impl<'a> TypeClassifier<'a> {
  pub fn new(index: &'a ClassIndex, platform: &'a Platform) -> Self {
    Self { index, platform }
  }

  /* Exact names first, so `Integer` maps to `Int` instead of falling through to Serializable */
  fn table_lookup(&self, ty: &TypeRef) -> Option<ScalarKind> {
    match ty {
      TypeRef::Primitive(prim) => Some(ScalarKind::from_primitive(*prim)),
      TypeRef::Declared { name, args } if args.is_empty() => match name.as_str() {
        "java.lang.String" => Some(ScalarKind::String),
        "java.lang.Integer" => Some(ScalarKind::Int),
        "java.lang.Long" => Some(ScalarKind::Long),
        "java.lang.Double" => Some(ScalarKind::Double),
        "java.lang.Short" => Some(ScalarKind::Short),
        "java.lang.Float" => Some(ScalarKind::Float),
        "java.lang.Byte" => Some(ScalarKind::Byte),
        "java.lang.Boolean" => Some(ScalarKind::Boolean),
        "java.lang.Character" => Some(ScalarKind::Char),
        "java.lang.CharSequence" => Some(ScalarKind::CharSequence),
        other if other == self.platform.bundle_class => Some(ScalarKind::Bundle),
        other if other == self.platform.parcelable_class => Some(ScalarKind::Parcelable),
        _ => None,
      },
      _ => None,
    }
  }

  fn array_lookup(&self, element: &TypeRef) -> Option<ScalarKind> {
    let kind = self.table_lookup(element)?;
    let boxed = matches!(element, TypeRef::Declared { .. })
      && !matches!(
        kind,
        ScalarKind::String | ScalarKind::CharSequence | ScalarKind::Parcelable
      );
    if boxed || !kind.has_array_form() {
      return None;
    }
    Some(kind)
  }

  fn list_of(&self, element: TypeRef) -> TypeRef {
    TypeRef::declared_with(&self.platform.array_list_class, vec![element])
  }

  /// Picks the storage strategy for `ty`, or `None` if the container cannot
  /// hold it. `bounds` are the upper bounds of the controller's type variables.
  pub fn classify(&self, ty: &TypeRef, bounds: &TypeBounds) -> Option<PayloadKind> {
    if let Some(kind) = self.table_lookup(ty) {
      return Some(PayloadKind::Scalar(kind));
    }
    if let TypeRef::Array(element) = ty {
      if let Some(kind) = self.array_lookup(element) {
        return Some(PayloadKind::Array(kind));
      }
    }

    let parcelable = TypeRef::declared(&self.platform.parcelable_class);
    let structural = [
      (self.list_of(TypeRef::declared("java.lang.String")), PayloadKind::StringArrayList),
      (self.list_of(TypeRef::declared("java.lang.Integer")), PayloadKind::IntegerArrayList),
      (
        self.list_of(TypeRef::declared("java.lang.CharSequence")),
        PayloadKind::CharSequenceArrayList,
      ),
      (
        self.list_of(TypeRef::wildcard_extends(parcelable.clone())),
        PayloadKind::ParcelableArrayList,
      ),
      (
        TypeRef::declared_with(
          &self.platform.sparse_array_class,
          vec![TypeRef::wildcard_extends(parcelable.clone())],
        ),
        PayloadKind::SparseParcelableArray,
      ),
      (parcelable, PayloadKind::Scalar(ScalarKind::Parcelable)),
      (
        TypeRef::declared(&self.platform.serializable_class),
        PayloadKind::Serializable,
      ),
    ];

    structural
      .into_iter()
      .find(|(target, _)| self.index.is_assignable(ty, target, bounds))
      .map(|(_, kind)| kind)
  }
}
