/* Structured Java source emission */

use std::fmt::Write;

const INDENT: &str = "    ";

/// Sink for generated source. Emission functions only talk to this trait, so
/// they never deal with braces or indentation themselves.
pub trait SourceEmitter {
  fn emit_comment(&mut self, text: &str);
  fn emit_package(&mut self, package: &str);
  fn emit_imports(&mut self, imports: &[String]);
  fn begin_type(&mut self, annotations: &[String], signature: &str);
  fn end_type(&mut self);
  fn emit_field(&mut self, declaration: &str);
  fn begin_method(&mut self, annotations: &[String], signature: &str);
  fn end_method(&mut self);
  fn begin_control_flow(&mut self, header: &str);
  fn end_control_flow(&mut self);
  fn emit_statement(&mut self, statement: &str);
  fn emit_empty_line(&mut self);
}

#[derive(Debug, Default)]
pub struct JavaWriter {
  output: String,
  indent: usize,
}

impl JavaWriter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn finish(self) -> String {
    self.output
  }

  fn line(&mut self, text: &str) {
    for _ in 0..self.indent {
      self.output.push_str(INDENT);
    }
    let _ = writeln!(self.output, "{}", text);
  }

  fn open(&mut self, header: &str) {
    self.line(&format!("{} {{", header));
    self.indent += 1;
  }

  fn close(&mut self) {
    self.indent = self.indent.saturating_sub(1);
    self.line("}");
  }
}

impl SourceEmitter for JavaWriter {
  fn emit_comment(&mut self, text: &str) {
    self.line(&format!("/* {} */", text));
  }

  fn emit_package(&mut self, package: &str) {
    if !package.is_empty() {
      self.line(&format!("package {};", package));
      self.output.push('\n');
    }
  }

  fn emit_imports(&mut self, imports: &[String]) {
    for import in imports {
      self.line(&format!("import {};", import));
    }
    if !imports.is_empty() {
      self.output.push('\n');
    }
  }

  fn begin_type(&mut self, annotations: &[String], signature: &str) {
    for annotation in annotations {
      self.line(annotation);
    }
    self.open(signature);
  }

  fn end_type(&mut self) {
    self.close();
  }

  fn emit_field(&mut self, declaration: &str) {
    self.line(&format!("{};", declaration));
  }

  fn begin_method(&mut self, annotations: &[String], signature: &str) {
    for annotation in annotations {
      self.line(annotation);
    }
    self.open(signature);
  }

  fn end_method(&mut self) {
    self.close();
  }

  fn begin_control_flow(&mut self, header: &str) {
    self.open(header);
  }

  fn end_control_flow(&mut self) {
    self.close();
  }

  fn emit_statement(&mut self, statement: &str) {
    self.line(&format!("{};", statement));
  }

  fn emit_empty_line(&mut self) {
    self.output.push('\n');
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn nests_blocks_with_four_space_indent() {
    let mut w = JavaWriter::new();
    w.emit_package("com.example");
    w.emit_imports(&["android.os.Bundle".to_string()]);
    w.begin_type(&["@Keep".to_string()], "public final class A");
    w.begin_method(&[], "public void run(int x)");
    w.begin_control_flow("if (x > 0)");
    w.emit_statement("return");
    w.end_control_flow();
    w.end_method();
    w.end_type();

    let expected = "package com.example;\n\nimport android.os.Bundle;\n\n@Keep\npublic final class A {\n    public void run(int x) {\n        if (x > 0) {\n            return;\n        }\n    }\n}\n";
    assert_eq!(w.finish(), expected);
  }
}
