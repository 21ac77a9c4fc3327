use crate::analysis::AnnotatedField;
use crate::codegen::java_gen::helpers::java_string_literal;
use crate::codegen::java_gen::BuilderContext;
use crate::codegen::writer::SourceEmitter;

const NO_ARGUMENTS: &str =
  "No arguments set. Have you set up this Fragment with the corresponding FragmentArgs Builder? ";

/* `args.containsKey("key")`, or the sentinel for codec-stored values */
fn presence_check(ctx: &BuilderContext, field: &AnnotatedField) -> String {
  match field.bundler_var {
    Some(_) => format!(
      "args.getBoolean({})",
      java_string_literal(&ctx.platform.sentinel_key(&field.key))
    ),
    None => format!("args.containsKey({})", java_string_literal(&field.key)),
  }
}

fn read_expression(ctx: &BuilderContext, field: &AnnotatedField) -> Option<String> {
  let key = java_string_literal(&field.key);
  match (&field.bundler_var, &field.payload) {
    (Some(bundler), _) => Some(format!("{}.get({}, args)", bundler, key)),
    (None, Some(payload)) if payload.needs_cast() => Some(format!(
      "({}) args.get{}({})",
      ctx.render(&field.field_type),
      payload.operation(),
      key
    )),
    (None, Some(payload)) => Some(format!("args.get{}({})", payload.operation(), key)),
    (None, None) => None,
  }
}

fn emit_assignment(w: &mut dyn SourceEmitter, ctx: &BuilderContext, field: &AnnotatedField, values: &mut usize) {
  let Some(read) = read_expression(ctx, field) else {
    return;
  };

  match &field.setter {
    Some(setter) => {
      let value = format!("value{}", values);
      *values += 1;
      w.emit_statement(&format!("{} {} = {}", ctx.render(&field.field_type), value, read));
      w.emit_statement(&format!("fragment.{}({})", setter, value));
    }
    None => w.emit_statement(&format!("fragment.{} = {}", field.name, read)),
  }
}

/// `injectArguments(fragment)`: validates presence of required keys, then
/// assigns every field in variable-name order.
pub fn emit_inject_method(w: &mut dyn SourceEmitter, ctx: &BuilderContext) {
  w.begin_method(
    &[],
    &format!(
      "public static final {}void injectArguments({} fragment)",
      ctx.method_type_parameters(),
      ctx.controller()
    ),
  );

  w.emit_statement(&format!("{} args = fragment.getArguments()", ctx.bundle()));
  w.begin_control_flow("if (args == null)");
  w.emit_statement(&format!("throw new IllegalStateException({})", java_string_literal(NO_ARGUMENTS)));
  w.end_control_flow();

  let mut values = 0;
  for field in ctx.model.fields_sorted() {
    w.emit_empty_line();
    let present = presence_check(ctx, field);
    if field.required {
      w.begin_control_flow(&format!("if (!{})", present));
      let message = format!("required argument {} is not set", field.key);
      w.emit_statement(&format!("throw new IllegalStateException({})", java_string_literal(&message)));
      w.end_control_flow();
      emit_assignment(w, ctx, field, &mut values);
    } else {
      w.begin_control_flow(&format!("if ({})", present));
      emit_assignment(w, ctx, field, &mut values);
      w.end_control_flow();
    }
  }

  w.end_method();
}
