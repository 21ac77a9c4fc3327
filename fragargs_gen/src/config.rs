/* Processor options: YAML file, then javac-style `-A key=value` overrides */

use crate::model::platform::Platform;
use anyhow::Context;
use serde_derive::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

pub const OPTION_LIBRARY: &str = "fragmentArgsLib";
pub const OPTION_LOG_WARNINGS: &str = "fragmentArgsLogWarnings";
pub const OPTION_SUPPORT_ANNOTATIONS: &str = "fragmentArgsSupportAnnotations";
pub const OPTION_BUILDER_ANNOTATIONS: &str = "fragmentArgsBuilderAnnotations";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ProcessorOptions {
  /* Library modules do not know every controller, so no dispatch class is written */
  pub library: bool,
  pub log_warnings: bool,
  pub support_annotations: bool,
  pub support_annotations_package: String,
  /* Annotations stamped on every generated builder, e.g. `androidx.annotation.Keep` */
  pub builder_annotations: Vec<String>,
  pub platform: Platform,
}

impl Default for ProcessorOptions {
  fn default() -> Self {
    Self {
      library: false,
      log_warnings: true,
      support_annotations: true,
      support_annotations_package: "android.support.annotation".to_string(),
      builder_annotations: Vec::new(),
      platform: Platform::default(),
    }
  }
}

impl ProcessorOptions {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let contents = std::fs::read_to_string(path)
      .with_context(|| format!("failed to read config {}", path.display()))?;
    let options: ProcessorOptions = serde_yml::from_str(&contents)
      .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(options)
  }

  /* Apply one `key=value` processor option; a bare key means `true` */
  pub fn apply_option(&mut self, raw: &str) -> anyhow::Result<()> {
    let (key, value) = match raw.split_once('=') {
      Some((key, value)) => (key.trim(), value.trim()),
      None => (raw.trim(), "true"),
    };

    match key {
      OPTION_LIBRARY => self.library = parse_bool(key, value)?,
      OPTION_LOG_WARNINGS => self.log_warnings = parse_bool(key, value)?,
      OPTION_SUPPORT_ANNOTATIONS => self.support_annotations = parse_bool(key, value)?,
      OPTION_BUILDER_ANNOTATIONS => {
        self.builder_annotations = value
          .split(',')
          .map(|a| a.trim())
          .filter(|a| !a.is_empty())
          .map(|a| a.to_string())
          .collect();
      }
      other => warn!("ignoring unrecognized processor option '{}'", other),
    }
    Ok(())
  }

  pub fn apply_options<'a>(&mut self, raw: impl IntoIterator<Item = &'a str>) -> anyhow::Result<()> {
    for option in raw {
      self.apply_option(option)?;
    }
    Ok(())
  }
}

fn parse_bool(key: &str, value: &str) -> anyhow::Result<bool> {
  match value.to_ascii_lowercase().as_str() {
    "true" | "1" | "yes" => Ok(true),
    "false" | "0" | "no" => Ok(false),
    _ => anyhow::bail!("option {} expects a boolean, got '{}'", key, value),
  }
}
