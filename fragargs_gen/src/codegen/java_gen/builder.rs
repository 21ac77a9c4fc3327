use crate::analysis::AnnotatedField;
use crate::codegen::java_gen::helpers::java_string_literal;
use crate::codegen::java_gen::inject::emit_inject_method;
use crate::codegen::java_gen::BuilderContext;
use crate::codegen::writer::SourceEmitter;

/* Store `value` under the field's key, through its codec when it has one */
pub fn emit_store(w: &mut dyn SourceEmitter, ctx: &BuilderContext, field: &AnnotatedField, value: &str) {
  let key = java_string_literal(&field.key);
  let guarded = !field.required && !field.is_primitive();
  if guarded {
    w.begin_control_flow(&format!("if ({} != null)", value));
  }

  match (&field.bundler_var, &field.payload) {
    (Some(bundler), _) => {
      w.emit_statement(&format!("{}.put({}, {}, mArguments)", bundler, key, value));
      let sentinel = java_string_literal(&ctx.platform.sentinel_key(&field.key));
      w.emit_statement(&format!("mArguments.putBoolean({}, true)", sentinel));
    }
    (None, Some(payload)) => {
      w.emit_statement(&format!("mArguments.put{}({}, {})", payload.operation(), key, value));
    }
    /* collected fields always carry one or the other */
    (None, None) => {}
  }

  if guarded {
    w.end_control_flow();
  }
}

fn emit_constructor(w: &mut dyn SourceEmitter, ctx: &BuilderContext) {
  let required: Vec<&AnnotatedField> = ctx.model.required_fields().collect();
  let params: Vec<String> = required.iter().map(|f| ctx.parameter(f)).collect();

  w.begin_method(&[], &format!("public {}({})", ctx.model.builder_name(), params.join(", ")));
  for field in &required {
    emit_store(w, ctx, field, &field.variable_name());
  }
  w.end_method();
}

fn emit_factory(w: &mut dyn SourceEmitter, ctx: &BuilderContext) {
  let required: Vec<&AnnotatedField> = ctx.model.required_fields().collect();
  let params: Vec<String> = required.iter().map(|f| ctx.parameter(f)).collect();
  let args: Vec<String> = required.iter().map(|f| f.variable_name()).collect();
  let controller = ctx.controller();

  w.begin_method(
    &ctx.non_null_return(),
    &format!(
      "public static {}{} new{}({})",
      ctx.method_type_parameters(),
      controller,
      ctx.model.simple_name,
      params.join(", ")
    ),
  );
  w.emit_statement(&format!("return new {}({}).build()", ctx.builder_type(), args.join(", ")));
  w.end_method();
}

fn emit_fluent_setter(w: &mut dyn SourceEmitter, ctx: &BuilderContext, field: &AnnotatedField) {
  let var = field.variable_name();
  w.begin_method(
    &ctx.non_null_return(),
    &format!("public {} {}({})", ctx.builder_type(), var, ctx.parameter(field)),
  );
  emit_store(w, ctx, field, &var);
  w.emit_statement("return this");
  w.end_method();
}

fn emit_build_methods(w: &mut dyn SourceEmitter, ctx: &BuilderContext) {
  let controller = ctx.controller();

  w.begin_method(&ctx.non_null_return(), &format!("public {} build()", controller));
  w.emit_statement(&format!("{} fragment = new {}()", controller, controller));
  w.emit_statement("fragment.setArguments(mArguments)");
  w.emit_statement("return fragment");
  w.end_method();

  w.emit_empty_line();
  let param = match &ctx.support {
    Some((non_null, _)) => format!("{} F fragment", non_null),
    None => "F fragment".to_string(),
  };
  w.begin_method(
    &ctx.non_null_return(),
    &format!("public <F extends {}> F build({})", controller, param),
  );
  w.emit_statement("fragment.setArguments(mArguments)");
  w.emit_statement("return fragment");
  w.end_method();
}

/// Emits the whole `<Simple>Builder` class for the context's model.
pub fn emit_builder_class(w: &mut dyn SourceEmitter, ctx: &BuilderContext) {
  let model = ctx.model;
  let bundle = ctx.bundle();

  w.begin_type(
    &ctx.builder_annotations,
    &format!("public final class {}{}", model.builder_name(), model.type_parameters_declaration()),
  );

  w.emit_empty_line();
  w.emit_field(&format!("private final {} mArguments = new {}()", bundle, bundle));
  for (class, var) in model.bundlers() {
    let codec = ctx.types.name(class);
    w.emit_field(&format!("private static final {} {} = new {}()", codec, var, codec));
  }

  w.emit_empty_line();
  emit_constructor(w, ctx);

  w.emit_empty_line();
  emit_factory(w, ctx);

  for field in model.optional_fields() {
    w.emit_empty_line();
    emit_fluent_setter(w, ctx, field);
  }

  w.emit_empty_line();
  w.begin_method(&ctx.non_null_return(), &format!("public {} buildBundle()", bundle));
  w.emit_statement(&format!("return new {}(mArguments)", bundle));
  w.end_method();

  w.emit_empty_line();
  emit_inject_method(w, ctx);

  w.emit_empty_line();
  emit_build_methods(w, ctx);

  w.end_type();
}
