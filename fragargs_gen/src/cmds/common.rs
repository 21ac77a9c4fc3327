/* Common steps shared between the analyze and codegen commands */

use anyhow::Context;
use fragargs_gen::diagnostics::Diagnostics;
use fragargs_gen::model::{ClassIndex, ModelLoader, Platform};
use fragargs_gen::ProcessorOptions;
use std::path::{Path, PathBuf};
use tracing::info;

/* Options file first, then `-A key=value` overrides, then dedicated flags */
pub fn load_options(
  config: Option<&Path>,
  raw_options: &[String],
  library: bool,
) -> anyhow::Result<ProcessorOptions> {
  let mut options = match config {
    Some(path) => ProcessorOptions::load(path)?,
    None => ProcessorOptions::default(),
  };
  options.apply_options(raw_options.iter().map(|o| o.as_str()))?;
  if library {
    options.library = true;
  }
  Ok(options)
}

/* Load every model file with its imports and build the class index */
pub fn load_index(
  files: &[PathBuf],
  include_dirs: Vec<PathBuf>,
  platform: &Platform,
) -> anyhow::Result<ClassIndex> {
  let mut loader = ModelLoader::new(include_dirs);
  for file in files {
    loader
      .load_file_with_imports(file)
      .with_context(|| format!("failed to load class model {}", file.display()))?;
  }
  info!(
    "loaded {} class(es) from {} file(s) (including imports)",
    loader.class_count(),
    loader.loaded_file_count()
  );
  Ok(loader.into_index(platform))
}

/* Flush diagnostics to the log; any error fails the command */
pub fn finish(diagnostics: &mut Diagnostics) -> anyhow::Result<()> {
  let errors = diagnostics.error_count();
  let warnings = diagnostics.warning_count();
  diagnostics.flush();
  if errors > 0 {
    anyhow::bail!("{} error(s) reported", errors);
  }
  if warnings > 0 {
    info!("finished with {} warning(s)", warnings);
  }
  Ok(())
}
