/* Names of the platform types and markers the generator talks about */

use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct Platform {
  /* Field marker */
  pub arg_annotation: String,
  /* Class marker, carries `inherited` */
  pub fragment_with_args_annotation: String,
  /* Deprecated class marker, carries `value` */
  pub inherited_annotation: String,
  /* Controller base classes; scanning never enters them */
  pub fragment_base_types: Vec<String>,
  pub bundle_class: String,
  pub parcelable_class: String,
  pub serializable_class: String,
  pub array_list_class: String,
  pub sparse_array_class: String,
  pub args_bundler_interface: String,
  pub none_bundler_class: String,
  /* Qualified name of the generated dispatch class */
  pub injector_class: String,
  /* Prefix of the boolean written next to every custom codec value */
  pub sentinel_prefix: String,
  pub platform_packages: Vec<String>,
}

impl Default for Platform {
  fn default() -> Self {
    Self {
      arg_annotation: "com.hannesdorfmann.fragmentargs.annotation.Arg".to_string(),
      fragment_with_args_annotation: "com.hannesdorfmann.fragmentargs.annotation.FragmentWithArgs"
        .to_string(),
      inherited_annotation: "com.hannesdorfmann.fragmentargs.annotation.FragmentArgsInherited"
        .to_string(),
      fragment_base_types: vec![
        "android.app.Fragment".to_string(),
        "android.support.v4.app.Fragment".to_string(),
        "androidx.fragment.app.Fragment".to_string(),
      ],
      bundle_class: "android.os.Bundle".to_string(),
      parcelable_class: "android.os.Parcelable".to_string(),
      serializable_class: "java.io.Serializable".to_string(),
      array_list_class: "java.util.ArrayList".to_string(),
      sparse_array_class: "android.util.SparseArray".to_string(),
      args_bundler_interface: "com.hannesdorfmann.fragmentargs.bundler.ArgsBundler".to_string(),
      none_bundler_class: "com.hannesdorfmann.fragmentargs.bundler.NoneArgsBundler".to_string(),
      injector_class: "com.hannesdorfmann.fragmentargs.AutoFragmentArgInjector".to_string(),
      sentinel_prefix:
        "com.hannesdorfmann.fragmentargs.custom.bundler.2b5b8d06-8d4b-4b7d-9be9-6f1e1c1b5f2a#"
          .to_string(),
      platform_packages: vec![
        "android.".to_string(),
        "androidx.".to_string(),
        "java.".to_string(),
        "javax.".to_string(),
      ],
    }
  }
}

impl Platform {
  pub fn is_base_type(&self, name: &str) -> bool {
    self.fragment_base_types.iter().any(|b| b == name)
  }

  pub fn is_platform_package(&self, name: &str) -> bool {
    self.platform_packages.iter().any(|p| name.starts_with(p.as_str()))
  }

  pub fn injector_package(&self) -> &str {
    self
      .injector_class
      .rsplit_once('.')
      .map(|(pkg, _)| pkg)
      .unwrap_or("")
  }

  pub fn injector_simple_name(&self) -> &str {
    self
      .injector_class
      .rsplit('.')
      .next()
      .unwrap_or(&self.injector_class)
  }

  /* The bundle key recording that a custom codec stored `key` */
  pub fn sentinel_key(&self, key: &str) -> String {
    format!("{}{}", self.sentinel_prefix, key)
  }
}
