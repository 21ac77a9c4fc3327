/* One processing run: candidates -> models -> generated units */

use crate::analysis::{FieldCollector, FragmentModel};
use crate::codegen::{DispatchEntry, GeneratedUnit, JavaCodeGenerator, JavaCodeGeneratorOptions};
use crate::config::ProcessorOptions;
use crate::diagnostics::Diagnostics;
use crate::error::ProcessingError;
use crate::model::ClassIndex;
use fragargs_types::{ClassDef, Modifier};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct ProcessingOutput {
  pub units: Vec<GeneratedUnit>,
  pub models: Vec<FragmentModel>,
  /* controller binary name -> dispatch target */
  pub dispatch: BTreeMap<String, DispatchEntry>,
  pub diagnostics: Diagnostics,
}

impl ProcessingOutput {
  pub fn unit(&self, qualified_name: &str) -> Option<&GeneratedUnit> {
    self.units.iter().find(|u| u.qualified_name == qualified_name)
  }

  /// Writes every unit below `out_dir`, one directory per package segment.
  /// Stops at the first failure.
  pub fn write_units(&self, out_dir: &Path) -> Result<Vec<PathBuf>, ProcessingError> {
    let mut written = Vec::with_capacity(self.units.len());
    for unit in &self.units {
      let path = out_dir.join(unit.relative_path());
      let io_error = |err: std::io::Error| ProcessingError::Io {
        element: unit.qualified_name.clone(),
        path: path.display().to_string(),
        message: err.to_string(),
      };
      if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
      }
      std::fs::write(&path, &unit.source).map_err(io_error)?;
      debug!("wrote {}", path.display());
      written.push(path);
    }
    Ok(written)
  }
}

pub struct Processor<'a> {
  index: &'a ClassIndex,
  options: &'a ProcessorOptions,
}

impl<'a> Processor<'a> {
  pub fn new(index: &'a ClassIndex, options: &'a ProcessorOptions) -> Self {
    Self { index, options }
  }

  pub fn run(&self) -> ProcessingOutput {
    let mut diagnostics = Diagnostics::new(self.options.log_warnings);
    let support_annotations = self.check_support_annotations(&mut diagnostics);
    let generator = JavaCodeGenerator::new(JavaCodeGeneratorOptions {
      support_annotations,
      support_annotations_package: self.options.support_annotations_package.clone(),
      builder_annotations: self.options.builder_annotations.clone(),
      platform: self.options.platform.clone(),
    });

    self.check_arg_owners(&mut diagnostics);

    let mut units = Vec::new();
    let mut models = Vec::new();
    let mut dispatch = BTreeMap::new();

    for class in self.candidates(&mut diagnostics) {
      let errors_before = diagnostics.error_count();
      match self.process_class(class, &mut diagnostics) {
        Ok(Some(model)) if diagnostics.error_count() == errors_before => {
          let (unit, entry) = generator.synthesize(&model, self.index);
          units.push(unit);
          dispatch.insert(model.binary_name.clone(), entry);
          models.push(model);
        }
        Ok(Some(model)) => debug!("discarding builder for {} after errors", model.qualified_name),
        Ok(None) => {}
        Err(err) => diagnostics.report(&err),
      }
    }

    if !self.options.library && !dispatch.is_empty() {
      units.push(generator.emit_dispatch(&dispatch));
    }

    info!(
      "processed {} controller(s), generated {} unit(s)",
      models.len(),
      units.len()
    );

    ProcessingOutput {
      units,
      models,
      dispatch,
      diagnostics,
    }
  }

  fn check_support_annotations(&self, diagnostics: &mut Diagnostics) -> bool {
    if !self.options.support_annotations {
      return false;
    }
    let non_null = format!("{}.NonNull", self.options.support_annotations_package);
    if self.index.contains(&non_null) {
      return true;
    }
    diagnostics.warning(
      format!(
        "{} is not available, builders are generated without support annotations. \
         Add the support annotations library or set {}=false",
        non_null,
        crate::config::OPTION_SUPPORT_ANNOTATIONS
      ),
      None,
    );
    false
  }

  fn is_controller(&self, name: &str) -> bool {
    self
      .options
      .platform
      .fragment_base_types
      .iter()
      .any(|base| self.index.is_subtype(name, base))
  }

  fn declares_args(&self, class: &ClassDef) -> bool {
    let arg = &self.options.platform.arg_annotation;
    class.fields.iter().any(|f| f.annotation(arg).is_some())
  }

  /* `Arg` is only meaningful inside controller classes */
  fn check_arg_owners(&self, diagnostics: &mut Diagnostics) {
    let arg = &self.options.platform.arg_annotation;
    for class in self.index.classes() {
      if self.is_controller(&class.name) {
        continue;
      }
      for field in class.fields.iter().filter(|f| f.annotation(arg).is_some()) {
        diagnostics.report(&ProcessingError::structural(
          format!("{}#{}", class.name, field.name),
          format!(
            "@Arg can only be used on fields in subclasses of Fragment. {} is not a Fragment",
            class.simple_name()
          ),
        ));
      }
    }
  }

  /* Marked classes and classes declaring `Arg` fields, in qualified-name order */
  fn candidates(&self, diagnostics: &mut Diagnostics) -> Vec<&'a ClassDef> {
    let platform = &self.options.platform;
    let mut candidates: Vec<&'a ClassDef> = Vec::new();

    for class in self.index.classes() {
      let marked = class.annotation(&platform.fragment_with_args_annotation).is_some()
        || class.annotation(&platform.inherited_annotation).is_some();
      if marked {
        candidates.push(class);
        continue;
      }
      if self.declares_args(class) && self.is_controller(&class.name) {
        if !class.is_abstract() {
          diagnostics.warning(
            format!(
              "{} declares @Arg fields but is not annotated with @FragmentWithArgs",
              class.simple_name()
            ),
            Some(&class.name),
          );
        }
        candidates.push(class);
      }
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    candidates
  }

  fn process_class(
    &self,
    class: &ClassDef,
    diagnostics: &mut Diagnostics,
  ) -> Result<Option<FragmentModel>, ProcessingError> {
    if !self.is_controller(&class.name) {
      return Err(ProcessingError::structural(
        &class.name,
        format!(
          "@FragmentWithArgs can only be used on subclasses of Fragment. {} is not a Fragment",
          class.simple_name()
        ),
      ));
    }

    if class.is_abstract() {
      diagnostics.note(
        format!("{} is abstract, no builder is generated for it", class.simple_name()),
        Some(&class.name),
      );
      return Ok(None);
    }

    if class.is_nested() {
      if !class.has_modifier(Modifier::Static) {
        return Err(ProcessingError::structural(
          &class.name,
          format!(
            "Nested fragment {} must be static to generate a builder for it",
            class.simple_name()
          ),
        ));
      }
      if class.has_modifier(Modifier::Private) {
        return Err(ProcessingError::structural(
          &class.name,
          format!(
            "Nested fragment {} must not be private to generate a builder for it",
            class.simple_name()
          ),
        ));
      }
    } else if class.has_modifier(Modifier::Private) {
      return Err(ProcessingError::structural(
        &class.name,
        format!("Fragment {} must not be private", class.simple_name()),
      ));
    }

    let collector = FieldCollector::new(self.index, &self.options.platform);
    let model = collector.collect(class, diagnostics)?;
    Ok(Some(model))
  }
}
