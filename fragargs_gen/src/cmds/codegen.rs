/* Codegen command - generate builders and the dispatch class from class models */

use super::common::{finish, load_index, load_options};
use fragargs_gen::Processor;
use std::path::PathBuf;
use tracing::{debug, info};

/* Execute the codegen command */
pub fn run(
  files: Vec<PathBuf>,
  include_dirs: Vec<PathBuf>,
  config: Option<PathBuf>,
  raw_options: Vec<String>,
  library: bool,
  output_dir: PathBuf,
) -> anyhow::Result<()> {
  let options = load_options(config.as_deref(), &raw_options, library)?;
  debug!("processor options: {:?}", options);

  let index = load_index(&files, include_dirs, &options.platform)?;
  let mut output = Processor::new(&index, &options).run();

  match output.write_units(&output_dir) {
    Ok(written) => {
      for path in &written {
        debug!("  - {}", path.display());
      }
      info!("wrote {} file(s) to {}", written.len(), output_dir.display());
    }
    Err(err) => output.diagnostics.report(&err),
  }

  finish(&mut output.diagnostics)
}
