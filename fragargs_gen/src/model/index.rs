/* Class index: the read-only symbol table with subtype and assignability queries */

use crate::model::platform::Platform;
use fragargs_types::{ClassDef, ClassKind, Modifier, PrimitiveType, TypeParam, TypeRef, WildcardBound};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

pub const OBJECT: &str = "java.lang.Object";

/* Upper bounds of the type variables in scope, by variable name */
pub type TypeBounds = HashMap<String, Vec<TypeRef>>;

#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
  classes: IndexMap<String, ClassDef>,
}

impl ClassIndex {
  pub fn new() -> Self {
    Self {
      classes: IndexMap::new(),
    }
  }

  /* An index pre-populated with the JDK and Android types the classifier relies on */
  pub fn with_platform(platform: &Platform) -> Self {
    let mut index = Self::new();
    for class in builtin_classes(platform) {
      index.insert(class);
    }
    index
  }

  /* Replaces any existing definition of the same name */
  pub fn insert(&mut self, class: ClassDef) -> Option<ClassDef> {
    self.classes.insert(class.name.clone(), class)
  }

  pub fn get(&self, name: &str) -> Option<&ClassDef> {
    self.classes.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.classes.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.classes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.classes.is_empty()
  }

  pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
    self.classes.values()
  }

  fn direct_supertypes(&self, class: &ClassDef) -> Vec<TypeRef> {
    let mut supertypes = Vec::new();
    match &class.superclass {
      Some(superclass) => supertypes.push(superclass.clone()),
      None if class.kind == ClassKind::Class && class.name != OBJECT => {
        supertypes.push(TypeRef::declared(OBJECT))
      }
      None => {}
    }
    supertypes.extend(class.interfaces.iter().cloned());
    supertypes
  }

  /* True if `sub` is `sup` or inherits from it through superclasses or interfaces */
  pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
    if sup == OBJECT {
      return true;
    }
    self.supertype_as(&TypeRef::declared(sub), sup).is_some()
  }

  /// Views `ty` as an instance of `target`, substituting type arguments along the
  /// way. `ArrayList<String>` viewed as `java.util.List` yields `List<String>`.
  /// A raw source type yields a raw view.
  pub fn supertype_as(&self, ty: &TypeRef, target: &str) -> Option<TypeRef> {
    let mut visited = HashSet::new();
    self.supertype_as_inner(ty, target, &mut visited)
  }

  fn supertype_as_inner(&self, ty: &TypeRef, target: &str, visited: &mut HashSet<String>) -> Option<TypeRef> {
    let TypeRef::Declared { name, args } = ty else {
      return None;
    };
    if name == target {
      return Some(ty.clone());
    }
    if !visited.insert(name.clone()) {
      return None;
    }
    let class = self.get(name)?;

    let raw = args.is_empty() && !class.type_parameters.is_empty();
    let bindings: HashMap<String, TypeRef> = class
      .type_parameters
      .iter()
      .zip(args.iter())
      .map(|(param, arg)| (param.name.clone(), arg.clone()))
      .collect();

    for supertype in self.direct_supertypes(class) {
      let supertype = if raw { erase(&supertype) } else { supertype.substitute(&bindings) };
      if let Some(found) = self.supertype_as_inner(&supertype, target, visited) {
        return Some(found);
      }
    }
    None
  }

  /// Java assignment compatibility of `from` to `to`.
  ///
  /// Covers boxing of primitives, supertypes with type-argument substitution,
  /// raw types, wildcard containment and type variables through `bounds`.
  /// Type arguments are otherwise invariant.
  pub fn is_assignable(&self, from: &TypeRef, to: &TypeRef, bounds: &TypeBounds) -> bool {
    match (from, to) {
      (TypeRef::Void, _) | (_, TypeRef::Void) => false,
      (TypeRef::Wildcard(_), _) | (_, TypeRef::Wildcard(_)) => false,
      (TypeRef::Primitive(a), TypeRef::Primitive(b)) => a == b,
      (TypeRef::Primitive(prim), _) => {
        self.is_assignable(&TypeRef::declared(boxed_name(*prim)), to, bounds)
      }
      (_, TypeRef::Primitive(_)) => false,
      _ if is_object(to) => true,
      (TypeRef::Variable(a), TypeRef::Variable(b)) if a == b => true,
      (TypeRef::Variable(name), _) => bounds
        .get(name)
        .map(|upper| upper.iter().any(|bound| self.is_assignable(bound, to, bounds)))
        .unwrap_or(false),
      (_, TypeRef::Variable(_)) => false,
      (TypeRef::Array(from_elem), TypeRef::Array(to_elem)) => match (from_elem.as_ref(), to_elem.as_ref()) {
        (TypeRef::Primitive(a), TypeRef::Primitive(b)) => a == b,
        (TypeRef::Primitive(_), _) | (_, TypeRef::Primitive(_)) => false,
        (a, b) => self.is_assignable(a, b, bounds),
      },
      (TypeRef::Array(_), TypeRef::Declared { name, args }) => {
        args.is_empty() && (name == "java.lang.Cloneable" || name == "java.io.Serializable")
      }
      (TypeRef::Declared { .. }, TypeRef::Declared { name: target, args: target_args }) => {
        let Some(view) = self.supertype_as(from, target) else {
          return false;
        };
        if target_args.is_empty() {
          return true;
        }
        let TypeRef::Declared { args: view_args, .. } = &view else {
          return false;
        };
        /* Raw to parameterized is an unchecked but legal conversion */
        if view_args.is_empty() {
          return true;
        }
        view_args.len() == target_args.len()
          && view_args
            .iter()
            .zip(target_args.iter())
            .all(|(source, target)| self.type_argument_contains(target, source, bounds))
      }
      _ => false,
    }
  }

  /* Type argument containment: does `target` admit `source`? */
  fn type_argument_contains(&self, target: &TypeRef, source: &TypeRef, bounds: &TypeBounds) -> bool {
    match target {
      TypeRef::Wildcard(None) => true,
      TypeRef::Wildcard(Some(WildcardBound::Extends(bound))) => match source {
        TypeRef::Wildcard(Some(WildcardBound::Extends(inner))) => self.is_assignable(inner, bound, bounds),
        TypeRef::Wildcard(_) => is_object(bound),
        other => self.is_assignable(other, bound, bounds),
      },
      TypeRef::Wildcard(Some(WildcardBound::Super(bound))) => match source {
        TypeRef::Wildcard(Some(WildcardBound::Super(inner))) => self.is_assignable(bound, inner, bounds),
        TypeRef::Wildcard(_) => false,
        other => self.is_assignable(bound, other, bounds),
      },
      exact => exact == source,
    }
  }
}

fn is_object(ty: &TypeRef) -> bool {
  matches!(ty, TypeRef::Declared { name, args } if name == OBJECT && args.is_empty())
}

fn erase(ty: &TypeRef) -> TypeRef {
  match ty {
    TypeRef::Declared { name, .. } => TypeRef::declared(name),
    other => other.clone(),
  }
}

pub fn boxed_name(prim: PrimitiveType) -> &'static str {
  match prim {
    PrimitiveType::Boolean => "java.lang.Boolean",
    PrimitiveType::Byte => "java.lang.Byte",
    PrimitiveType::Short => "java.lang.Short",
    PrimitiveType::Int => "java.lang.Integer",
    PrimitiveType::Long => "java.lang.Long",
    PrimitiveType::Char => "java.lang.Character",
    PrimitiveType::Float => "java.lang.Float",
    PrimitiveType::Double => "java.lang.Double",
  }
}

fn builtin_type(source: &str, params: &[String]) -> TypeRef {
  TypeRef::parse(source)
    .map(|t| t.normalize(params))
    .unwrap_or_else(|_| TypeRef::declared(source))
}

fn builtin(
  name: &str,
  kind: ClassKind,
  params: &[&str],
  superclass: Option<&str>,
  interfaces: &[&str],
  extra_modifiers: &[Modifier],
) -> ClassDef {
  let mut class = ClassDef::new(name);
  class.kind = kind;
  class.modifiers = vec![Modifier::Public];
  class.modifiers.extend_from_slice(extra_modifiers);
  class.type_parameters = params
    .iter()
    .map(|p| TypeParam {
      name: p.to_string(),
      bounds: Vec::new(),
    })
    .collect();
  let names = class.type_parameter_names();
  class.superclass = superclass.map(|s| builtin_type(s, &names));
  class.interfaces = interfaces.iter().map(|i| builtin_type(i, &names)).collect();
  class
}

fn builtin_classes(platform: &Platform) -> Vec<ClassDef> {
  use ClassKind::{Class, Interface};

  let serializable = platform.serializable_class.as_str();
  let parcelable = platform.parcelable_class.as_str();
  let none_bundler_iface = format!("{}<java.lang.Object>", platform.args_bundler_interface);

  let mut classes = vec![
    builtin(OBJECT, Class, &[], None, &[], &[]),
    builtin(serializable, Interface, &[], None, &[], &[]),
    builtin("java.lang.Cloneable", Interface, &[], None, &[], &[]),
    builtin("java.lang.CharSequence", Interface, &[], None, &[], &[]),
    builtin("java.lang.Comparable", Interface, &["T"], None, &[], &[]),
    builtin("java.lang.Iterable", Interface, &["T"], None, &[], &[]),
    builtin(
      "java.lang.String",
      Class,
      &[],
      None,
      &[serializable, "java.lang.Comparable<java.lang.String>", "java.lang.CharSequence"],
      &[Modifier::Final],
    ),
    builtin("java.lang.Number", Class, &[], None, &[serializable], &[Modifier::Abstract]),
  ];

  for boxed in ["Integer", "Long", "Short", "Byte", "Float", "Double"] {
    let comparable = format!("java.lang.Comparable<java.lang.{}>", boxed);
    classes.push(builtin(
      &format!("java.lang.{}", boxed),
      Class,
      &[],
      Some("java.lang.Number"),
      &[comparable.as_str()],
      &[Modifier::Final],
    ));
  }
  for boxed in ["Boolean", "Character"] {
    let comparable = format!("java.lang.Comparable<java.lang.{}>", boxed);
    classes.push(builtin(
      &format!("java.lang.{}", boxed),
      Class,
      &[],
      None,
      &[serializable, comparable.as_str()],
      &[Modifier::Final],
    ));
  }

  classes.extend([
    builtin("java.util.Collection", Interface, &["E"], None, &["java.lang.Iterable<E>"], &[]),
    builtin("java.util.List", Interface, &["E"], None, &["java.util.Collection<E>"], &[]),
    builtin("java.util.RandomAccess", Interface, &[], None, &[], &[]),
    builtin(
      "java.util.AbstractCollection",
      Class,
      &["E"],
      None,
      &["java.util.Collection<E>"],
      &[Modifier::Abstract],
    ),
    builtin(
      "java.util.AbstractList",
      Class,
      &["E"],
      Some("java.util.AbstractCollection<E>"),
      &["java.util.List<E>"],
      &[Modifier::Abstract],
    ),
    builtin(
      &platform.array_list_class,
      Class,
      &["E"],
      Some("java.util.AbstractList<E>"),
      &["java.util.List<E>", "java.util.RandomAccess", "java.lang.Cloneable", serializable],
      &[],
    ),
    builtin("java.util.Map", Interface, &["K", "V"], None, &[], &[]),
    builtin(
      "java.util.HashMap",
      Class,
      &["K", "V"],
      None,
      &["java.util.Map<K, V>", "java.lang.Cloneable", serializable],
      &[],
    ),
    builtin(parcelable, Interface, &[], None, &[], &[]),
    builtin("android.os.BaseBundle", Class, &[], None, &[], &[]),
    builtin(
      &platform.bundle_class,
      Class,
      &[],
      Some("android.os.BaseBundle"),
      &["java.lang.Cloneable", parcelable],
      &[Modifier::Final],
    ),
    builtin(
      &platform.sparse_array_class,
      Class,
      &["E"],
      None,
      &["java.lang.Cloneable"],
      &[],
    ),
    builtin(&platform.args_bundler_interface, Interface, &["T"], None, &[], &[]),
    builtin(
      &platform.none_bundler_class,
      Class,
      &[],
      None,
      &[none_bundler_iface.as_str()],
      &[],
    ),
  ]);

  for base in &platform.fragment_base_types {
    classes.push(builtin(base, Class, &[], None, &[], &[]));
  }
  for annotation_package in ["android.support.annotation", "androidx.annotation"] {
    for name in ["NonNull", "Nullable"] {
      classes.push(builtin(
        &format!("{}.{}", annotation_package, name),
        Interface,
        &[],
        None,
        &[],
        &[],
      ));
    }
  }

  classes
}
