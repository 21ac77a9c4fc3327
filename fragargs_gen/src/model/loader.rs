use crate::error::LoadError;
use crate::model::file::ClassModelFile;
use crate::model::index::ClassIndex;
use crate::model::platform::Platform;
use fragargs_types::{ClassDef, TypeRef, WildcardBound};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

struct LoadedClass {
  class: ClassDef,
  origin: PathBuf,
}

/* Loads class model files, follows their imports and builds the class index */
pub struct ModelLoader {
  /* Canonical paths already read; guards against import cycles */
  loaded_files: HashSet<PathBuf>,

  /* Include directories for searching imports */
  include_dirs: Vec<PathBuf>,

  classes: IndexMap<String, LoadedClass>,
}

impl ModelLoader {
  pub fn new(include_dirs: Vec<PathBuf>) -> Self {
    Self {
      loaded_files: HashSet::new(),
      include_dirs,
      classes: IndexMap::new(),
    }
  }

  /* Resolve an import relative to the importing file, then each include directory */
  fn resolve_import_path(&self, import: &str, base_file: &Path) -> Result<PathBuf, LoadError> {
    let candidates = base_file
      .parent()
      .map(|parent| parent.join(import))
      .into_iter()
      .chain(self.include_dirs.iter().map(|dir| dir.join(import)));

    for candidate in candidates {
      if candidate.exists() {
        return candidate.canonicalize().map_err(|source| LoadError::Io {
          path: candidate.clone(),
          source,
        });
      }
    }

    Err(LoadError::ImportNotFound {
      import: import.to_string(),
      base: base_file.to_path_buf(),
    })
  }

  /* Load a model file and, recursively, everything it imports */
  pub fn load_file_with_imports(&mut self, file_path: &Path) -> Result<(), LoadError> {
    let canonical = file_path.canonicalize().map_err(|source| LoadError::Io {
      path: file_path.to_path_buf(),
      source,
    })?;

    if self.loaded_files.contains(&canonical) {
      debug!("skipping already loaded model {}", file_path.display());
      return Ok(());
    }
    self.loaded_files.insert(canonical.clone());

    debug!("loading class model {}", file_path.display());
    let contents = std::fs::read_to_string(&canonical).map_err(|source| LoadError::Io {
      path: file_path.to_path_buf(),
      source,
    })?;

    self.load_contents(&contents, &canonical)
  }

  /* Load model text as if it had been read from `origin` */
  pub fn load_str(&mut self, contents: &str, origin: &Path) -> Result<(), LoadError> {
    self.load_contents(contents, origin)
  }

  fn load_contents(&mut self, contents: &str, origin: &Path) -> Result<(), LoadError> {
    let file: ClassModelFile = serde_yml::from_str(contents).map_err(|source| LoadError::Yaml {
      path: origin.to_path_buf(),
      source,
    })?;

    if let Some(description) = file.description() {
      debug!("  {}", description);
    }

    for import in file.imports() {
      debug!("  resolving import {}", import);
      let import_path = self.resolve_import_path(import, origin)?;
      self.load_file_with_imports(&import_path)?;
    }

    for class in file.classes {
      self.add_class(class, origin)?;
    }

    Ok(())
  }

  fn add_class(&mut self, class: ClassDef, origin: &Path) -> Result<(), LoadError> {
    if class.name.is_empty() {
      return Err(LoadError::InvalidClass {
        name: class.name,
        path: origin.to_path_buf(),
        reason: "class name must not be empty".to_string(),
      });
    }
    if let Some(package) = class.package.as_deref() {
      if !package.is_empty() && !class.name.starts_with(&format!("{}.", package)) {
        return Err(LoadError::InvalidClass {
          reason: format!("package '{}' is not a prefix of the class name", package),
          name: class.name,
          path: origin.to_path_buf(),
        });
      }
    }
    if let Some(existing) = self.classes.get(&class.name) {
      return Err(LoadError::DuplicateClass {
        name: class.name,
        first: existing.origin.clone(),
        second: origin.to_path_buf(),
      });
    }

    debug!("  class {}", class.name);
    self.classes.insert(
      class.name.clone(),
      LoadedClass {
        class,
        origin: origin.to_path_buf(),
      },
    );
    Ok(())
  }

  pub fn loaded_file_count(&self) -> usize {
    self.loaded_files.len()
  }

  pub fn class_count(&self) -> usize {
    self.classes.len()
  }

  /* Type parameters visible inside `name`: its own, then those of enclosing classes */
  fn type_parameters_in_scope(&self, name: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = self.classes.get(name).map(|loaded| &loaded.class);
    while let Some(class) = current {
      params.extend(class.type_parameter_names());
      current = class
        .enclosing_class()
        .and_then(|outer| self.classes.get(outer))
        .map(|loaded| &loaded.class);
    }
    params
  }

  /// Builds the class index: built-in platform types first, then every loaded
  /// class with its type references normalized. Loaded classes replace
  /// built-ins of the same name.
  pub fn into_index(self, platform: &Platform) -> ClassIndex {
    let mut index = ClassIndex::with_platform(platform);
    let known: HashSet<String> = self.classes.keys().cloned().collect();
    let scopes: Vec<Vec<String>> = self
      .classes
      .keys()
      .map(|name| self.type_parameters_in_scope(name))
      .collect();

    for (loaded, params) in self.classes.into_values().zip(scopes) {
      let mut class = loaded.class;
      normalize_class(&mut class, &params, &known);
      index.insert(class);
    }

    index
  }
}

fn normalize_class(class: &mut ClassDef, params: &[String], known: &HashSet<String>) {
  let package = class.package().to_string();
  let fix = |ty: &TypeRef| qualify(&ty.normalize(params), &package, known);

  class.superclass = class.superclass.as_ref().map(|s| fix(s));
  for interface in class.interfaces.iter_mut() {
    *interface = fix(interface);
  }
  for param in class.type_parameters.iter_mut() {
    for bound in param.bounds.iter_mut() {
      *bound = fix(bound);
    }
  }
  for constructor in class.constructors.iter_mut() {
    for param in constructor.parameters.iter_mut() {
      param.param_type = fix(&param.param_type);
    }
  }
  for field in class.fields.iter_mut() {
    field.field_type = fix(&field.field_type);
  }
  for method in class.methods.iter_mut() {
    for param in method.parameters.iter_mut() {
      param.param_type = fix(&param.param_type);
    }
    method.return_type = fix(&method.return_type);
  }
}

/* Qualify simple names that denote a loaded class of the same package */
fn qualify(ty: &TypeRef, package: &str, known: &HashSet<String>) -> TypeRef {
  match ty {
    TypeRef::Declared { name, args } => {
      let candidate = format!("{}.{}", package, name);
      let name = if !package.is_empty() && !name.contains('.') && known.contains(&candidate) {
        candidate
      } else {
        name.clone()
      };
      TypeRef::Declared {
        name,
        args: args.iter().map(|a| qualify(a, package, known)).collect(),
      }
    }
    TypeRef::Array(element) => TypeRef::Array(Box::new(qualify(element, package, known))),
    TypeRef::Wildcard(Some(WildcardBound::Extends(bound))) => TypeRef::Wildcard(Some(
      WildcardBound::Extends(Box::new(qualify(bound, package, known))),
    )),
    TypeRef::Wildcard(Some(WildcardBound::Super(bound))) => TypeRef::Wildcard(Some(
      WildcardBound::Super(Box::new(qualify(bound, package, known))),
    )),
    other => other.clone(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  #[test]
  fn follows_relative_imports_once() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
      dir.path().join("base.yaml"),
      "classes:\n  - name: com.example.BaseFragment\n    superclass: android.app.Fragment\n",
    )
    .unwrap();
    fs::write(
      dir.path().join("main.yaml"),
      "model:\n  imports: [base.yaml, base.yaml]\nclasses:\n  - name: com.example.DetailFragment\n    superclass: BaseFragment\n",
    )
    .unwrap();

    let mut loader = ModelLoader::new(Vec::new());
    loader.load_file_with_imports(&dir.path().join("main.yaml")).unwrap();
    assert_eq!(loader.loaded_file_count(), 2);
    assert_eq!(loader.class_count(), 2);

    let index = loader.into_index(&Platform::default());
    let detail = index.get("com.example.DetailFragment").unwrap();
    assert_eq!(
      detail.superclass,
      Some(TypeRef::declared("com.example.BaseFragment"))
    );
    assert!(index.is_subtype("com.example.DetailFragment", "android.app.Fragment"));
  }

  #[test]
  fn imports_fall_back_to_include_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let shared = tempfile::tempdir().unwrap();
    fs::write(
      shared.path().join("codecs.yaml"),
      "classes:\n  - name: com.shared.DateBundler\n    modifiers: [public]\n",
    )
    .unwrap();
    fs::write(dir.path().join("main.yaml"), "model:\n  imports: [codecs.yaml]\n").unwrap();

    let mut loader = ModelLoader::new(vec![shared.path().to_path_buf()]);
    loader.load_file_with_imports(&dir.path().join("main.yaml")).unwrap();
    assert_eq!(loader.class_count(), 1);

    let mut missing = ModelLoader::new(Vec::new());
    let err = missing
      .load_file_with_imports(&dir.path().join("main.yaml"))
      .unwrap_err();
    assert!(matches!(err, LoadError::ImportNotFound { .. }));
  }

  #[test]
  fn duplicate_classes_are_rejected() {
    let yaml = "classes:\n  - name: com.example.A\n  - name: com.example.A\n";
    let mut loader = ModelLoader::new(Vec::new());
    let err = loader.load_str(yaml, Path::new("inline.yaml")).unwrap_err();
    assert!(matches!(err, LoadError::DuplicateClass { ref name, .. } if name == "com.example.A"));
  }

  #[test]
  fn bad_type_syntax_is_a_parse_error() {
    let yaml = "classes:\n  - name: com.example.A\n    fields:\n      - name: x\n        type: \"java.util.List<int>\"\n";
    let mut loader = ModelLoader::new(Vec::new());
    let err = loader.load_str(yaml, Path::new("inline.yaml")).unwrap_err();
    assert!(matches!(err, LoadError::Yaml { .. }));
  }

  #[test]
  fn type_parameters_of_enclosing_classes_are_in_scope() {
    let yaml = r#"
classes:
  - name: com.example.Outer
    type-parameters:
      - name: T
  - name: com.example.Outer.Inner
    package: com.example
    type-parameters:
      - name: P
        bounds: [android.os.Parcelable]
    fields:
      - name: first
        type: T
      - name: second
        type: java.util.ArrayList<P>
      - name: label
        type: String
"#;
    let mut loader = ModelLoader::new(Vec::new());
    loader.load_str(yaml, Path::new("inline.yaml")).unwrap();
    let index = loader.into_index(&Platform::default());
    let inner = index.get("com.example.Outer.Inner").unwrap();
    assert_eq!(inner.fields[0].field_type, TypeRef::Variable("T".to_string()));
    assert_eq!(inner.fields[1].field_type.to_string(), "java.util.ArrayList<P>");
    assert!(matches!(
      &inner.fields[1].field_type,
      TypeRef::Declared { args, .. } if args[0] == TypeRef::Variable("P".to_string())
    ));
    assert_eq!(inner.fields[2].field_type, TypeRef::declared("java.lang.String"));
  }

  #[test]
  fn package_must_prefix_the_name() {
    let yaml = "classes:\n  - name: com.example.A\n    package: org.other\n";
    let mut loader = ModelLoader::new(Vec::new());
    let err = loader.load_str(yaml, Path::new("inline.yaml")).unwrap_err();
    assert!(matches!(err, LoadError::InvalidClass { .. }));
  }
}
