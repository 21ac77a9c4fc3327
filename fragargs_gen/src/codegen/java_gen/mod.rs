pub mod builder;
pub mod dispatch;
pub mod helpers;
pub mod inject;

pub use builder::emit_builder_class;
pub use dispatch::{emit_dispatch_class, DispatchEntry};
pub use helpers::{annotation_literal, java_string_literal, TypeRenderer};
pub use inject::emit_inject_method;

use crate::analysis::{AnnotatedField, FragmentModel};
use crate::model::{ClassIndex, Platform};
use fragargs_types::TypeRef;

/// Per-builder emission state: the model being rendered and how names are
/// written inside its unit.
pub struct BuilderContext<'a> {
  pub model: &'a FragmentModel,
  pub platform: &'a Platform,
  pub types: TypeRenderer<'a>,
  /* Rendered `@NonNull` / `@Nullable` when support annotations are on */
  pub support: Option<(String, String)>,
  pub builder_annotations: Vec<String>,
}

impl<'a> BuilderContext<'a> {
  pub fn new(
    model: &'a FragmentModel,
    platform: &'a Platform,
    index: &'a ClassIndex,
    support_package: Option<&str>,
    builder_annotations: &[String],
  ) -> Self {
    let mut types = TypeRenderer::new(&model.package, index);
    types.import(&platform.bundle_class);
    if model.enclosing.is_empty() {
      types.declare_local(&model.qualified_name);
    } else {
      types.import(&model.qualified_name);
    }

    let support = support_package.map(|package| {
      let non_null = format!("{}.NonNull", package);
      let nullable = format!("{}.Nullable", package);
      types.import(&non_null);
      types.import(&nullable);
      (format!("@{}", types.name(&non_null)), format!("@{}", types.name(&nullable)))
    });

    Self {
      model,
      platform,
      types,
      support,
      builder_annotations: builder_annotations.iter().map(|a| annotation_literal(a)).collect(),
    }
  }

  pub fn render(&self, ty: &TypeRef) -> String {
    self.types.render(ty)
  }

  pub fn controller(&self) -> String {
    self.types.name(&self.model.qualified_name)
  }

  pub fn bundle(&self) -> String {
    self.types.name(&self.platform.bundle_class)
  }

  /* `DetailFragmentBuilder<P, T>` */
  pub fn builder_type(&self) -> String {
    let name = self.model.builder_name();
    if self.model.is_generic() {
      format!("{}<{}>", name, self.model.type_variable_names().join(", "))
    } else {
      name
    }
  }

  /* Type parameter declaration followed by a space, for method signatures */
  pub fn method_type_parameters(&self) -> String {
    let declaration = self.model.type_parameters_declaration();
    if declaration.is_empty() { declaration } else { format!("{} ", declaration) }
  }

  /* Annotations for methods returning a value that is never null */
  pub fn non_null_return(&self) -> Vec<String> {
    self.support.iter().map(|(non_null, _)| non_null.clone()).collect()
  }

  /* `@NonNull String label`, `int count` */
  pub fn parameter(&self, field: &AnnotatedField) -> String {
    let ty = self.render(&field.field_type);
    let var = field.variable_name();
    match &self.support {
      Some((non_null, nullable)) if !field.is_primitive() => {
        let annotation = if field.required { non_null } else { nullable };
        format!("{} {} {}", annotation, ty, var)
      }
      _ => format!("{} {}", ty, var),
    }
  }
}
