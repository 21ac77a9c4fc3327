use crate::codegen::java_gen::helpers::java_string_literal;
use crate::codegen::writer::SourceEmitter;
use crate::model::Platform;
use serde_derive::Serialize;
use std::collections::BTreeMap;

/* One controller the dispatch class knows how to inject */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchEntry {
  /* Source name, `com.example.Outer.Inner` */
  pub controller: String,
  pub builder: String,
}

/// Emits the dispatch class. `entries` is keyed by controller binary name,
/// which is what `getClass().getName()` reports at runtime.
pub fn emit_dispatch_class(
  w: &mut dyn SourceEmitter,
  platform: &Platform,
  entries: &BTreeMap<String, DispatchEntry>,
) {
  let name = platform.injector_simple_name();

  w.begin_type(&[], &format!("public final class {}", name));

  w.emit_empty_line();
  w.begin_method(&[], &format!("private {}()", name));
  w.end_method();

  w.emit_empty_line();
  w.begin_method(&[], "public static void inject(Object target)");
  w.emit_statement("String targetName = target.getClass().getName()");
  for (binary_name, entry) in entries {
    w.begin_control_flow(&format!("if ({}.equals(targetName))", java_string_literal(binary_name)));
    w.emit_statement(&format!(
      "{}.injectArguments(({}) target)",
      entry.builder, entry.controller
    ));
    w.emit_statement("return");
    w.end_control_flow();
  }
  w.end_method();

  w.end_type();
}
