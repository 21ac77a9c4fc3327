/* Field Collector: walks a controller and its superclasses and builds its model */

use crate::analysis::classify::{PayloadKind, TypeClassifier};
use crate::analysis::field::{variable_name, AnnotatedField};
use crate::analysis::fragment::{FragmentModel, SetterCandidate};
use crate::analysis::setter::{needs_setter, resolve_setter};
use crate::diagnostics::Diagnostics;
use crate::error::ProcessingError;
use crate::model::index::{ClassIndex, TypeBounds, OBJECT};
use crate::model::platform::Platform;
use fragargs_types::{AnnotationDef, ClassDef, ClassKind, Modifier, TypeParam, TypeRef, Visibility};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/* Type arguments a subclass supplies for its superclass's type parameters */
type Bindings = HashMap<String, TypeRef>;

pub struct FieldCollector<'a> {
  index: &'a ClassIndex,
  platform: &'a Platform,
  classifier: TypeClassifier<'a>,
}

impl<'a> FieldCollector<'a> {
  pub fn new(index: &'a ClassIndex, platform: &'a Platform) -> Self {
    Self {
      index,
      platform,
      classifier: TypeClassifier::new(index, platform),
    }
  }

  /// Whether superclasses are scanned too. `FragmentWithArgs(inherited)`
  /// decides; the deprecated `FragmentArgsInherited(value)` is honoured when
  /// the former is absent. Unmarked classes scan their superclasses.
  pub fn scan_inherited(&self, class: &ClassDef, diagnostics: &mut Diagnostics) -> bool {
    if let Some(marker) = class.annotation(&self.platform.fragment_with_args_annotation) {
      return marker.bool_value("inherited").unwrap_or(true);
    }
    if let Some(marker) = class.annotation(&self.platform.inherited_annotation) {
      diagnostics.warning(
        format!(
          "@FragmentArgsInherited is deprecated. Use @FragmentWithArgs(inherited = ...) on {} instead",
          class.simple_name()
        ),
        Some(&class.name),
      );
      return marker.bool_value("value").unwrap_or(true);
    }
    true
  }

  /// Builds the model of one controller, nearest class first.
  ///
  /// Structural problems and collisions are reported to `diagnostics` and the
  /// offending field is skipped. Unsupported types, invalid codecs and missing
  /// setters abort the class with an error.
  pub fn collect(&self, class: &ClassDef, diagnostics: &mut Diagnostics) -> Result<FragmentModel, ProcessingError> {
    let inherited = self.scan_inherited(class, diagnostics);
    let mut model = FragmentModel::new(class, inherited);
    let bounds = model.type_bounds();

    let mut visited = HashSet::new();
    let mut current: Option<(&ClassDef, Bindings)> = Some((class, Bindings::new()));
    while let Some((level, bindings)) = current.take() {
      if !visited.insert(level.name.clone()) {
        break;
      }
      debug!("scanning {} for @Arg fields", level.name);
      self.scan_fields(level, &bindings, &bounds, &mut model, diagnostics)?;
      self.scan_setters(level, &bindings, &mut model);

      if !inherited {
        break;
      }
      current = self.next_level(level, &bindings);
    }

    self.resolve_setters(&mut model)?;
    debug!(
      "{}: {} field(s), {} custom bundler(s)",
      model.qualified_name,
      model.field_count(),
      model.bundlers().count()
    );
    Ok(model)
  }

  /* The superclass to scan next, with its type parameters bound */
  fn next_level(&self, class: &ClassDef, bindings: &Bindings) -> Option<(&'a ClassDef, Bindings)> {
    let superclass = class.superclass.as_ref()?.substitute(bindings);
    let TypeRef::Declared { name, args } = &superclass else {
      return None;
    };
    if self.platform.is_base_type(name) || self.platform.is_platform_package(name) {
      return None;
    }
    let parent = self.index.get(name)?;

    let next = parent
      .type_parameters
      .iter()
      .enumerate()
      .map(|(i, param)| {
        let bound = args.get(i).cloned().unwrap_or_else(|| erasure(param));
        (param.name.clone(), bound)
      })
      .collect();
    Some((parent, next))
  }

  fn scan_fields(
    &self,
    level: &ClassDef,
    bindings: &Bindings,
    bounds: &TypeBounds,
    model: &mut FragmentModel,
    diagnostics: &mut Diagnostics,
  ) -> Result<(), ProcessingError> {
    for def in &level.fields {
      let Some(arg) = def.annotation(&self.platform.arg_annotation) else {
        continue;
      };
      let element = format!("{}#{}", level.name, def.name);

      if def.has_modifier(Modifier::Static) || def.has_modifier(Modifier::Final) {
        diagnostics.report(&ProcessingError::structural(
          &element,
          format!(
            "@Arg fields must not be static or final ({}.{})",
            level.simple_name(),
            def.name
          ),
        ));
        continue;
      }

      let field_type = def.field_type.substitute(bindings);
      let bundler = self.validate_bundler(arg, level.package(), &element)?;

      let payload = match bundler {
        Some(_) => None,
        None => {
          let kind = self.classifier.classify(&field_type, bounds).ok_or_else(|| {
            ProcessingError::UnsupportedType {
              element: element.clone(),
              field: def.name.clone(),
              class: level.simple_name().to_string(),
              field_type: field_type.to_string(),
            }
          })?;
          if kind == PayloadKind::Serializable {
            diagnostics.warning(
              format!(
                "{}.{} will be stored as Serializable",
                level.simple_name(),
                def.name
              ),
              Some(&element),
            );
          }
          Some(kind)
        }
      };

      let key = arg
        .str_value("key")
        .filter(|key| !key.is_empty())
        .map(|key| key.to_string())
        .unwrap_or_else(|| variable_name(&def.name));
      let required = arg.bool_value("required").unwrap_or(true);

      debug!(
        "  {} -> key '{}', {}, {}",
        def.name,
        key,
        if required { "required" } else { "optional" },
        payload
          .map(|p| p.operation())
          .or_else(|| bundler.clone())
          .unwrap_or_default()
      );

      let field = AnnotatedField {
        name: def.name.clone(),
        class_name: level.name.clone(),
        class_package: level.package().to_string(),
        field_type,
        visibility: def.visibility(),
        key,
        required,
        bundler,
        payload,
        setter: None,
        bundler_var: None,
      };

      let added = if required {
        model.add_required(field)
      } else {
        model.add_optional(field)
      };
      if let Err(err) = added {
        diagnostics.report(&err);
      }
    }
    Ok(())
  }

  fn scan_setters(&self, level: &ClassDef, bindings: &Bindings, model: &mut FragmentModel) {
    for method in &level.methods {
      if !method.name.starts_with("set") || method.modifiers.contains(&Modifier::Static) {
        continue;
      }
      model.register_setter_candidate(SetterCandidate {
        name: method.name.clone(),
        class_name: level.name.clone(),
        class_package: level.package().to_string(),
        visibility: method.visibility(),
        parameters: method
          .parameters
          .iter()
          .map(|p| p.param_type.substitute(bindings))
          .collect(),
      });
    }
  }

  fn resolve_setters(&self, model: &mut FragmentModel) -> Result<(), ProcessingError> {
    let mut assignments = Vec::new();
    for field in model.fields_sorted() {
      if needs_setter(field, model) {
        let setter = resolve_setter(field, model)?;
        debug!("  {} is assigned through {}()", field.name, setter);
        assignments.push((field.variable_name(), setter));
      }
    }
    for (variable, setter) in assignments {
      model.assign_setter(&variable, setter);
    }
    Ok(())
  }

  fn is_none_bundler(&self, name: &str) -> bool {
    let none = self.platform.none_bundler_class.as_str();
    name == none || (!name.contains('.') && none.rsplit('.').next() == Some(name))
  }

  /* A simple codec name denotes a class of the declaring package when the model has one */
  fn qualify_bundler(&self, name: &str, package: &str) -> String {
    if !name.contains('.') && !package.is_empty() {
      let candidate = format!("{}.{}", package, name);
      if self.index.contains(&candidate) {
        return candidate;
      }
    }
    name.to_string()
  }

  /* Returns the codec class of `@Arg(bundler = ...)`, or `None` for default resolution */
  fn validate_bundler(
    &self,
    arg: &AnnotationDef,
    package: &str,
    element: &str,
  ) -> Result<Option<String>, ProcessingError> {
    let Some(name) = arg.str_value("bundler").filter(|name| !name.is_empty()) else {
      return Ok(None);
    };
    let name = self.qualify_bundler(name, package);
    let name = name.as_str();
    if self.is_none_bundler(name) {
      return Ok(None);
    }

    let Some(codec) = self.index.get(name) else {
      return Err(ProcessingError::invalid_bundler(
        element,
        format!("The bundler class {} is unknown. Add it to the class model", name),
      ));
    };
    if codec.kind == ClassKind::Interface || codec.is_abstract() {
      return Err(ProcessingError::invalid_bundler(
        element,
        format!("The {} must be a concrete class to be a valid ArgsBundler", name),
      ));
    }
    if codec.visibility() != Visibility::Public {
      return Err(ProcessingError::invalid_bundler(
        element,
        format!("The {} must be a public class to be a valid ArgsBundler", name),
      ));
    }
    if codec.is_nested() && !codec.has_modifier(Modifier::Static) {
      return Err(ProcessingError::invalid_bundler(
        element,
        format!("The {} must be a static class to be a valid ArgsBundler", name),
      ));
    }
    if !codec.has_public_no_arg_constructor() {
      return Err(ProcessingError::invalid_bundler(
        element,
        format!(
          "The {} must provide a public empty default constructor to be a valid ArgsBundler",
          name
        ),
      ));
    }
    let interface = &self.platform.args_bundler_interface;
    if self.index.contains(interface) && !self.index.is_subtype(name, interface) {
      return Err(ProcessingError::invalid_bundler(
        element,
        format!("The {} must implement {}", name, interface),
      ));
    }

    Ok(Some(name.to_string()))
  }
}

fn erasure(param: &TypeParam) -> TypeRef {
  param
    .bounds
    .first()
    .cloned()
    .unwrap_or_else(|| TypeRef::declared(OBJECT))
}
