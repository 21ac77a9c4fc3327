use crate::analysis::FragmentModel;
use crate::codegen::java_gen::{emit_builder_class, emit_dispatch_class, BuilderContext, DispatchEntry};
use crate::codegen::writer::{JavaWriter, SourceEmitter};
use crate::model::{ClassIndex, Platform};
use serde_derive::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const GENERATED_HEADER: &str = "Generated by fragargs-gen. Do not modify!";

/* One generated Java compilation unit */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedUnit {
  pub qualified_name: String,
  pub package: String,
  pub simple_name: String,
  pub source: String,
}

impl GeneratedUnit {
  /* `com/example/DetailFragmentBuilder.java` */
  pub fn relative_path(&self) -> PathBuf {
    let mut path = PathBuf::new();
    for segment in self.package.split('.').filter(|s| !s.is_empty()) {
      path.push(segment);
    }
    path.push(format!("{}.java", self.simple_name));
    path
  }
}

pub struct JavaCodeGeneratorOptions {
  pub support_annotations: bool,
  pub support_annotations_package: String,
  pub builder_annotations: Vec<String>,
  pub platform: Platform,
}

impl Default for JavaCodeGeneratorOptions {
  fn default() -> Self {
    Self {
      support_annotations: true,
      support_annotations_package: "android.support.annotation".to_string(),
      builder_annotations: Vec::new(),
      platform: Platform::default(),
    }
  }
}

pub struct JavaCodeGenerator {
  options: JavaCodeGeneratorOptions,
}

impl JavaCodeGenerator {
  pub fn new(options: JavaCodeGeneratorOptions) -> Self {
    Self { options }
  }

  /// Renders the builder unit for one controller model. `index` decides
  /// which referenced classes share the builder's package.
  pub fn emit_builder(&self, model: &FragmentModel, index: &ClassIndex) -> GeneratedUnit {
    let support = self
      .options
      .support_annotations
      .then_some(self.options.support_annotations_package.as_str());
    let ctx = BuilderContext::new(
      model,
      &self.options.platform,
      index,
      support,
      &self.options.builder_annotations,
    );

    let mut w = JavaWriter::new();
    w.emit_comment(GENERATED_HEADER);
    w.emit_package(&model.package);
    w.emit_imports(&ctx.types.imports());
    emit_builder_class(&mut w, &ctx);

    GeneratedUnit {
      qualified_name: model.qualified_builder_name(),
      package: model.package.clone(),
      simple_name: model.builder_name(),
      source: w.finish(),
    }
  }

  /* Builder unit plus the dispatch entry keyed by `model.binary_name` */
  pub fn synthesize(&self, model: &FragmentModel, index: &ClassIndex) -> (GeneratedUnit, DispatchEntry) {
    let entry = DispatchEntry {
      controller: model.qualified_name.clone(),
      builder: model.qualified_builder_name(),
    };
    (self.emit_builder(model, index), entry)
  }

  /// Renders the dispatch unit routing `inject(Object)` to every builder.
  pub fn emit_dispatch(&self, entries: &BTreeMap<String, DispatchEntry>) -> GeneratedUnit {
    let platform = &self.options.platform;

    let mut w = JavaWriter::new();
    w.emit_comment(GENERATED_HEADER);
    w.emit_package(platform.injector_package());
    emit_dispatch_class(&mut w, platform, entries);

    GeneratedUnit {
      qualified_name: platform.injector_class.clone(),
      package: platform.injector_package().to_string(),
      simple_name: platform.injector_simple_name().to_string(),
      source: w.finish(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::analysis::{AnnotatedField, PayloadKind, ScalarKind};
  use crate::codegen::java_gen::java_string_literal;
  use fragargs_types::{ClassDef, Modifier, TypeRef, Visibility};

  fn field(name: &str, ty: &str, key: &str, required: bool, payload: Option<PayloadKind>) -> AnnotatedField {
    AnnotatedField {
      name: name.to_string(),
      class_name: "com.example.DetailFragment".to_string(),
      class_package: "com.example".to_string(),
      field_type: TypeRef::parse(ty).unwrap(),
      visibility: Visibility::Package,
      key: key.to_string(),
      required,
      bundler: None,
      payload,
      setter: None,
      bundler_var: None,
    }
  }

  fn detail_model() -> FragmentModel {
    let mut class = ClassDef::new("com.example.DetailFragment");
    class.package = Some("com.example".to_string());
    class.modifiers = vec![Modifier::Public];
    let mut model = FragmentModel::new(&class, true);
    model
      .add_required(field("count", "int", "count", true, Some(PayloadKind::Scalar(ScalarKind::Int))))
      .unwrap();
    model
      .add_required(field(
        "mLabel",
        "java.lang.String",
        "label",
        true,
        Some(PayloadKind::Scalar(ScalarKind::String)),
      ))
      .unwrap();
    model
      .add_optional(field(
        "note",
        "java.lang.String",
        "note",
        false,
        Some(PayloadKind::Scalar(ScalarKind::String)),
      ))
      .unwrap();
    model
  }

  /* Index holding `(qualified name, package)` pairs */
  fn index_of(classes: &[(&str, &str)]) -> ClassIndex {
    let mut index = ClassIndex::new();
    for (name, package) in classes {
      let mut class = ClassDef::new(name);
      class.package = Some(package.to_string());
      index.insert(class);
    }
    index
  }

  fn plain_generator() -> JavaCodeGenerator {
    JavaCodeGenerator::new(JavaCodeGeneratorOptions {
      support_annotations: false,
      ..Default::default()
    })
  }

  #[test]
  fn builder_unit_for_count_label_note() {
    let unit = plain_generator().emit_builder(&detail_model(), &ClassIndex::new());
    assert_eq!(unit.qualified_name, "com.example.DetailFragmentBuilder");
    assert_eq!(unit.relative_path(), PathBuf::from("com/example/DetailFragmentBuilder.java"));

    let expected = r#"/* Generated by fragargs-gen. Do not modify! */
package com.example;

import android.os.Bundle;

public final class DetailFragmentBuilder {

    private final Bundle mArguments = new Bundle();

    public DetailFragmentBuilder(int count, String label) {
        mArguments.putInt("count", count);
        mArguments.putString("label", label);
    }

    public static DetailFragment newDetailFragment(int count, String label) {
        return new DetailFragmentBuilder(count, label).build();
    }

    public DetailFragmentBuilder note(String note) {
        if (note != null) {
            mArguments.putString("note", note);
        }
        return this;
    }

    public Bundle buildBundle() {
        return new Bundle(mArguments);
    }

    public static final void injectArguments(DetailFragment fragment) {
        Bundle args = fragment.getArguments();
        if (args == null) {
            throw new IllegalStateException("No arguments set. Have you set up this Fragment with the corresponding FragmentArgs Builder? ");
        }

        if (!args.containsKey("count")) {
            throw new IllegalStateException("required argument count is not set");
        }
        fragment.count = args.getInt("count");

        if (!args.containsKey("label")) {
            throw new IllegalStateException("required argument label is not set");
        }
        fragment.mLabel = args.getString("label");

        if (args.containsKey("note")) {
            fragment.note = args.getString("note");
        }
    }

    public DetailFragment build() {
        DetailFragment fragment = new DetailFragment();
        fragment.setArguments(mArguments);
        return fragment;
    }

    public <F extends DetailFragment> F build(F fragment) {
        fragment.setArguments(mArguments);
        return fragment;
    }
}
"#;
    assert_eq!(unit.source, expected);
  }

  #[test]
  fn support_annotations_mark_parameters_and_returns() {
    let unit = JavaCodeGenerator::new(JavaCodeGeneratorOptions::default())
      .emit_builder(&detail_model(), &ClassIndex::new());
    let source = &unit.source;
    assert!(source.contains("import android.support.annotation.NonNull;"));
    assert!(source.contains("import android.support.annotation.Nullable;"));
    assert!(source.contains("public DetailFragmentBuilder(int count, @NonNull String label) {"));
    assert!(source.contains("    @NonNull\n    public static DetailFragment newDetailFragment("));
    assert!(source.contains("    @NonNull\n    public DetailFragmentBuilder note(@Nullable String note) {"));
    assert!(source.contains("    @NonNull\n    public Bundle buildBundle() {"));
    assert!(source.contains("public <F extends DetailFragment> F build(@NonNull F fragment) {"));
  }

  #[test]
  fn private_field_goes_through_setter() {
    let mut class = ClassDef::new("com.example.TokenFragment");
    class.package = Some("com.example".to_string());
    let mut model = FragmentModel::new(&class, true);
    let mut token = field(
      "token",
      "java.lang.String",
      "token",
      true,
      Some(PayloadKind::Scalar(ScalarKind::String)),
    );
    token.visibility = Visibility::Private;
    model.add_required(token).unwrap();
    model.assign_setter("token", "setToken".to_string());

    let source = plain_generator().emit_builder(&model, &ClassIndex::new()).source;
    assert!(source.contains("        String value0 = args.getString(\"token\");\n        fragment.setToken(value0);\n"));
    assert!(!source.contains("fragment.token ="));
  }

  #[test]
  fn custom_codec_uses_sentinel() {
    let mut class = ClassDef::new("com.example.DateFragment");
    class.package = Some("com.example".to_string());
    let mut model = FragmentModel::new(&class, true);
    let mut date = field("date", "java.util.Date", "date", false, None);
    date.bundler = Some("com.example.bundler.DateBundler".to_string());
    model.add_optional(date).unwrap();

    let index = index_of(&[("com.example.bundler.DateBundler", "com.example.bundler")]);
    let source = plain_generator().emit_builder(&model, &index).source;
    assert!(source.contains(
      "private static final com.example.bundler.DateBundler bundler1 = new com.example.bundler.DateBundler();"
    ));
    let sentinel = java_string_literal(&Platform::default().sentinel_key("date"));
    assert!(source.contains(&format!(
      "        if (date != null) {{\n            bundler1.put(\"date\", date, mArguments);\n            mArguments.putBoolean({}, true);\n        }}\n",
      sentinel
    )));
    assert!(source.contains(&format!("        if (args.getBoolean({})) {{\n", sentinel)));
    assert!(source.contains("fragment.date = bundler1.get(\"date\", args);"));
    assert!(!source.contains("args.containsKey(\"date\")"));
  }

  #[test]
  fn serializable_read_is_cast() {
    let mut class = ClassDef::new("com.example.ItemFragment");
    class.package = Some("com.example".to_string());
    let mut model = FragmentModel::new(&class, true);
    model
      .add_required(field("item", "com.example.Item", "item", true, Some(PayloadKind::Serializable)))
      .unwrap();
    model
      .add_required(field(
        "user",
        "com.example.model.User",
        "user",
        true,
        Some(PayloadKind::Serializable),
      ))
      .unwrap();

    let index = index_of(&[
      ("com.example.Item", "com.example"),
      ("com.example.model.User", "com.example.model"),
    ]);
    let source = plain_generator().emit_builder(&model, &index).source;
    assert!(source.contains("mArguments.putSerializable(\"item\", item);"));
    assert!(source.contains("fragment.item = (Item) args.getSerializable(\"item\");"));
    assert!(source.contains("public ItemFragmentBuilder(Item item, com.example.model.User user) {"));
    assert!(source.contains("fragment.user = (com.example.model.User) args.getSerializable(\"user\");"));
  }

  #[test]
  fn classes_missing_from_the_index_stay_qualified() {
    let mut class = ClassDef::new("com.example.ItemFragment");
    class.package = Some("com.example".to_string());
    let mut model = FragmentModel::new(&class, true);
    model
      .add_required(field("item", "com.example.Item", "item", true, Some(PayloadKind::Serializable)))
      .unwrap();

    let source = plain_generator().emit_builder(&model, &ClassIndex::new()).source;
    assert!(source.contains("public ItemFragmentBuilder(com.example.Item item) {"));
    assert!(source.contains("fragment.item = (com.example.Item) args.getSerializable(\"item\");"));
    assert!(source.contains("public ItemFragment build() {"));
  }

  #[test]
  fn dispatch_branches_sorted_by_binary_name() {
    let mut entries = BTreeMap::new();
    entries.insert(
      "com.example.Outer$Inner".to_string(),
      DispatchEntry {
        controller: "com.example.Outer.Inner".to_string(),
        builder: "com.example.Outer$$InnerBuilder".to_string(),
      },
    );
    entries.insert(
      "com.example.A".to_string(),
      DispatchEntry {
        controller: "com.example.A".to_string(),
        builder: "com.example.ABuilder".to_string(),
      },
    );

    let unit = plain_generator().emit_dispatch(&entries);
    assert_eq!(unit.qualified_name, "com.hannesdorfmann.fragmentargs.AutoFragmentArgInjector");
    let source = &unit.source;
    assert!(source.contains("package com.hannesdorfmann.fragmentargs;"));
    assert!(source.contains("    private AutoFragmentArgInjector() {\n    }\n"));
    let first = source.find("\"com.example.A\".equals(targetName)").unwrap();
    let second = source.find("\"com.example.Outer$Inner\".equals(targetName)").unwrap();
    assert!(first < second);
    assert!(source.contains("com.example.Outer$$InnerBuilder.injectArguments((com.example.Outer.Inner) target);"));
  }
}
