/* Analyze command - show the controller models without writing any code */

use super::common::{finish, load_index, load_options};
use fragargs_gen::analysis::FragmentModel;
use fragargs_gen::codegen::DispatchEntry;
use fragargs_gen::diagnostics::Diagnostic;
use fragargs_gen::Processor;
use serde_derive::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Serialize)]
struct AnalysisReport<'a> {
  models: &'a [FragmentModel],
  dispatch: &'a BTreeMap<String, DispatchEntry>,
  diagnostics: &'a [Diagnostic],
}

/* Execute the analyze command */
pub fn run(
  files: Vec<PathBuf>,
  include_dirs: Vec<PathBuf>,
  config: Option<PathBuf>,
  raw_options: Vec<String>,
  json: bool,
) -> anyhow::Result<()> {
  let options = load_options(config.as_deref(), &raw_options, false)?;
  let index = load_index(&files, include_dirs, &options.platform)?;
  let mut output = Processor::new(&index, &options).run();

  if json {
    let report = AnalysisReport {
      models: &output.models,
      dispatch: &output.dispatch,
      diagnostics: output.diagnostics.entries(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_models(&output.models);
  }

  finish(&mut output.diagnostics)
}

fn print_models(models: &[FragmentModel]) {
  for model in models {
    println!("{} -> {}", model.qualified_name, model.qualified_builder_name());
    if !model.inherited {
      println!("  (superclasses not scanned)");
    }
    for field in model.fields_sorted() {
      let storage = match (&field.bundler, &field.payload) {
        (Some(bundler), _) => format!("via {}", bundler),
        (None, Some(payload)) => format!("put{}", payload.operation()),
        (None, None) => "unsupported".to_string(),
      };
      let assignment = match &field.setter {
        Some(setter) => format!("{}()", setter),
        None => format!("field {}", field.name),
      };
      println!(
        "  {:<9} {:<24} key '{}' {} -> {}",
        if field.required { "required" } else { "optional" },
        field.field_type.to_string(),
        field.key,
        storage,
        assignment
      );
    }
    for (class, var) in model.bundlers() {
      println!("  bundler {} = {}", var, class);
    }
    println!();
  }
}
