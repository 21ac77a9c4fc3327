use crate::modifiers::{Modifier, Visibility};
use crate::types::TypeRef;
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(untagged)]
#[serde(expecting = "expected boolean, integer, string or list annotation value")]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<AnnotationValue>),
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct AnnotationDef {
    pub name: String,
    #[serde(default)]
    pub values: BTreeMap<String, AnnotationValue>,
}

impl AnnotationDef {
    /// Matches either the qualified annotation name or its simple name.
    pub fn matches(&self, qualified: &str) -> bool {
        if self.name == qualified {
            return true;
        }
        !self.name.contains('.') && qualified.rsplit('.').next() == Some(self.name.as_str())
    }

    pub fn bool_value(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(AnnotationValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn str_value(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(AnnotationValue::Str(value)) => Some(value),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct TypeParam {
    pub name: String,
    #[serde(default)]
    pub bounds: Vec<TypeRef>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Parameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: TypeRef,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: TypeRef,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub annotations: Vec<AnnotationDef>,
}

impl FieldDef {
    pub fn annotation(&self, qualified: &str) -> Option<&AnnotationDef> {
        self.annotations.iter().find(|a| a.matches(qualified))
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::of(&self.modifiers)
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

fn void_type() -> TypeRef {
    TypeRef::Void
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct MethodDef {
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default = "void_type")]
    pub return_type: TypeRef,
}

impl MethodDef {
    pub fn visibility(&self) -> Visibility {
        Visibility::of(&self.modifiers)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ConstructorDef {
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
}

/// One class (or interface) of the compile-time symbol table.
///
/// `name` is the qualified source name. Nested classes spell out their
/// enclosing classes (`com.example.Outer.Inner`) and should set `package`,
/// since the package cannot be told apart from enclosing classes otherwise.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ClassDef {
    pub name: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParam>,
    #[serde(default)]
    pub superclass: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub annotations: Vec<AnnotationDef>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDef>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            package: None,
            kind: ClassKind::Class,
            modifiers: Vec::new(),
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            constructors: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn package(&self) -> &str {
        match &self.package {
            Some(package) => package,
            None => self.name.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or(""),
        }
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Simple names of the enclosing classes, outermost first.
    pub fn enclosing_names(&self) -> Vec<&str> {
        let package = self.package();
        let relative = if package.is_empty() {
            self.name.as_str()
        } else {
            self.name
                .strip_prefix(package)
                .and_then(|rest| rest.strip_prefix('.'))
                .unwrap_or(self.simple_name())
        };
        let mut segments: Vec<&str> = relative.split('.').collect();
        segments.pop();
        segments
    }

    pub fn is_nested(&self) -> bool {
        !self.enclosing_names().is_empty()
    }

    /// Qualified name of the directly enclosing class, if nested.
    pub fn enclosing_class(&self) -> Option<&str> {
        if self.is_nested() {
            self.name.rsplit_once('.').map(|(outer, _)| outer)
        } else {
            None
        }
    }

    /// The JVM binary name (`com.example.Outer$Inner`), as returned by `Class.getName()`.
    pub fn binary_name(&self) -> String {
        let mut binary = String::new();
        let package = self.package();
        if !package.is_empty() {
            binary.push_str(package);
            binary.push('.');
        }
        for outer in self.enclosing_names() {
            binary.push_str(outer);
            binary.push('$');
        }
        binary.push_str(self.simple_name());
        binary
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_abstract(&self) -> bool {
        self.has_modifier(Modifier::Abstract) || self.kind == ClassKind::Interface
    }

    pub fn visibility(&self) -> Visibility {
        Visibility::of(&self.modifiers)
    }

    pub fn annotation(&self, qualified: &str) -> Option<&AnnotationDef> {
        self.annotations.iter().find(|a| a.matches(qualified))
    }

    pub fn type_parameter_names(&self) -> Vec<String> {
        self.type_parameters.iter().map(|p| p.name.clone()).collect()
    }

    /// True if a public constructor without parameters exists. A class that
    /// declares no constructor gets the implicit one, which is public only
    /// when the class itself is public.
    pub fn has_public_no_arg_constructor(&self) -> bool {
        if self.constructors.is_empty() {
            return self.visibility() == Visibility::Public;
        }
        self.constructors
            .iter()
            .any(|c| c.parameters.is_empty() && Visibility::of(&c.modifiers) == Visibility::Public)
    }
}
