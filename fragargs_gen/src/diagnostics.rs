/* Deferred build diagnostics, flushed once every class has been attempted */

use crate::error::ProcessingError;
use serde_derive::Serialize;
use std::fmt;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Level {
  Error,
  Warning,
  Note,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
  pub level: Level,
  pub message: String,
  pub element: Option<String>,
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self.level {
      Level::Error => "error",
      Level::Warning => "warning",
      Level::Note => "note",
    };
    match &self.element {
      Some(element) => write!(f, "{}: {}: {}", label, element, self.message),
      None => write!(f, "{}: {}", label, self.message),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
  entries: Vec<Diagnostic>,
  warnings_enabled: bool,
}

impl Diagnostics {
  pub fn new(warnings_enabled: bool) -> Self {
    Self {
      entries: Vec::new(),
      warnings_enabled,
    }
  }

  fn push(&mut self, level: Level, message: String, element: Option<&str>) {
    self.entries.push(Diagnostic {
      level,
      message,
      element: element.map(|e| e.to_string()),
    });
  }

  pub fn error(&mut self, message: impl Into<String>, element: Option<&str>) {
    self.push(Level::Error, message.into(), element);
  }

  /* Dropped when warnings are disabled */
  pub fn warning(&mut self, message: impl Into<String>, element: Option<&str>) {
    if self.warnings_enabled {
      self.push(Level::Warning, message.into(), element);
    }
  }

  pub fn note(&mut self, message: impl Into<String>, element: Option<&str>) {
    self.push(Level::Note, message.into(), element);
  }

  pub fn report(&mut self, err: &ProcessingError) {
    self.push(Level::Error, err.to_string(), Some(err.element()));
  }

  pub fn entries(&self) -> &[Diagnostic] {
    &self.entries
  }

  pub fn has_errors(&self) -> bool {
    self.error_count() > 0
  }

  pub fn error_count(&self) -> usize {
    self.count(Level::Error)
  }

  pub fn warning_count(&self) -> usize {
    self.count(Level::Warning)
  }

  fn count(&self, level: Level) -> usize {
    self.entries.iter().filter(|d| d.level == level).count()
  }

  /* Log every pending diagnostic and hand them back */
  pub fn flush(&mut self) -> Vec<Diagnostic> {
    let drained: Vec<Diagnostic> = self.entries.drain(..).collect();
    for diagnostic in &drained {
      match diagnostic.level {
        Level::Error => error!("{}", diagnostic),
        Level::Warning => warn!("{}", diagnostic),
        Level::Note => info!("{}", diagnostic),
      }
    }
    drained
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn warnings_are_suppressible() {
    let mut diagnostics = Diagnostics::new(false);
    diagnostics.warning("stored as Serializable", Some("com.example.A#data"));
    diagnostics.note("abstract", None);
    assert_eq!(diagnostics.warning_count(), 0);
    assert_eq!(diagnostics.entries().len(), 1);
    assert!(!diagnostics.has_errors());
  }

  #[test]
  fn flush_drains_entries() {
    let mut diagnostics = Diagnostics::new(true);
    diagnostics.report(&ProcessingError::structural("com.example.A", "broken"));
    diagnostics.warning("careful", None);
    assert_eq!(diagnostics.error_count(), 1);

    let flushed = diagnostics.flush();
    assert_eq!(flushed.len(), 2);
    assert_eq!(flushed[0].to_string(), "error: com.example.A: broken");
    assert_eq!(flushed[1].to_string(), "warning: careful");
    assert!(diagnostics.entries().is_empty());
  }
}
