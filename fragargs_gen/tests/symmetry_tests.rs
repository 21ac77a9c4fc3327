use fragargs_gen::{
  model::{ModelLoader, Platform},
  Processor, ProcessorOptions,
};
use std::path::Path;

const MIXED: &str = r#"
classes:
  - name: com.example.Item
    modifiers: [public]
    interfaces: [android.os.Parcelable]
  - name: com.example.Payload
    modifiers: [public]
    interfaces: [java.io.Serializable]
  - name: com.example.ItemBundler
    modifiers: [public]
    interfaces: ["com.hannesdorfmann.fragmentargs.bundler.ArgsBundler<com.example.Item>"]
  - name: com.example.MixedFragment
    modifiers: [public]
    superclass: androidx.fragment.app.Fragment
    annotations: [{ name: FragmentWithArgs }]
    fields:
      - name: count
        type: int
        annotations: [{ name: Arg }]
      - name: title
        type: String
        annotations: [{ name: Arg }]
      - name: scores
        type: "int[]"
        annotations: [{ name: Arg }]
      - name: items
        type: "java.util.ArrayList<Item>"
        annotations: [{ name: Arg }]
      - name: payload
        type: Payload
        annotations: [{ name: Arg, values: { required: false } }]
      - name: special
        type: Item
        annotations: [{ name: Arg, values: { bundler: com.example.ItemBundler } }]
"#;

fn mixed_source() -> String {
  let mut loader = ModelLoader::new(Vec::new());
  loader.load_str(MIXED, Path::new("mixed.yaml")).unwrap();
  let index = loader.into_index(&Platform::default());
  let options = ProcessorOptions {
    support_annotations: false,
    ..Default::default()
  };
  let output = Processor::new(&index, &options).run();
  output
    .unit("com.example.MixedFragmentBuilder")
    .expect("builder generated")
    .source
    .clone()
}

/* Store and retrieve use the same key and the same accessor family */
fn assert_symmetric(source: &str, key: &str, operation: &str) {
  let put = format!("mArguments.put{}(\"{}\", ", operation, key);
  let get = format!("args.get{}(\"{}\")", operation, key);
  assert!(source.contains(&put), "missing {} in\n{}", put, source);
  assert!(source.contains(&get), "missing {} in\n{}", get, source);
}

#[test]
fn primitive_string_and_array_round_trip() {
  let source = mixed_source();
  assert_symmetric(&source, "count", "Int");
  assert_symmetric(&source, "title", "String");
  assert_symmetric(&source, "scores", "IntArray");
}

#[test]
fn parcelable_list_round_trip() {
  let source = mixed_source();
  assert_symmetric(&source, "items", "ParcelableArrayList");
  assert!(source.contains("java.util.ArrayList<Item> items"));
}

#[test]
fn serializable_round_trip_is_cast_back() {
  let source = mixed_source();
  assert_symmetric(&source, "payload", "Serializable");
  assert!(source.contains("fragment.payload = (Payload) args.getSerializable(\"payload\");"));
}

#[test]
fn custom_codec_round_trip() {
  let source = mixed_source();
  assert!(source.contains("bundler1.put(\"special\", special, mArguments);"));
  assert!(source.contains("fragment.special = bundler1.get(\"special\", args);"));
  assert!(!source.contains("putParcelable(\"special\""));
}

#[test]
fn injector_visits_fields_in_variable_order() {
  let source = mixed_source();
  let order: Vec<usize> = ["count", "items", "payload", "scores", "special", "title"]
    .iter()
    .map(|name| {
      source
        .find(&format!("fragment.{} = ", name))
        .unwrap_or_else(|| panic!("no assignment for {}", name))
    })
    .collect();
  let mut sorted = order.clone();
  sorted.sort();
  assert_eq!(order, sorted);
}
