use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Simple names that resolve to `java.lang` without an import.
pub const JAVA_LANG_TYPES: &[&str] = &[
    "Object",
    "String",
    "CharSequence",
    "Boolean",
    "Byte",
    "Character",
    "Short",
    "Integer",
    "Long",
    "Float",
    "Double",
    "Number",
    "Cloneable",
    "Comparable",
    "Enum",
    "Iterable",
];

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn keyword(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Char => "char",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "boolean" => Some(PrimitiveType::Boolean),
            "byte" => Some(PrimitiveType::Byte),
            "short" => Some(PrimitiveType::Short),
            "int" => Some(PrimitiveType::Int),
            "long" => Some(PrimitiveType::Long),
            "char" => Some(PrimitiveType::Char),
            "float" => Some(PrimitiveType::Float),
            "double" => Some(PrimitiveType::Double),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum WildcardBound {
    Extends(Box<TypeRef>),
    Super(Box<TypeRef>),
}

/// A Java type as written in source: `int`, `java.lang.String[]`,
/// `java.util.ArrayList<? extends android.os.Parcelable>`, `P`.
///
/// In YAML a type is always a plain string and is parsed on load.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Primitive(PrimitiveType),
    Void,
    Declared { name: String, args: Vec<TypeRef> },
    Array(Box<TypeRef>),
    Variable(String),
    Wildcard(Option<WildcardBound>),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid type '{input}': {reason}")]
pub struct TypeParseError {
    pub input: String,
    pub reason: String,
}

impl TypeRef {
    pub fn declared(name: &str) -> Self {
        TypeRef::Declared {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    pub fn declared_with(name: &str, args: Vec<TypeRef>) -> Self {
        TypeRef::Declared {
            name: name.to_string(),
            args,
        }
    }

    pub fn array_of(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    pub fn wildcard_extends(bound: TypeRef) -> Self {
        TypeRef::Wildcard(Some(WildcardBound::Extends(Box::new(bound))))
    }

    pub fn parse(input: &str) -> Result<Self, TypeParseError> {
        let mut parser = TypeParser {
            input,
            chars: input.char_indices().peekable(),
        };
        let parsed = parser.parse_type(true)?;
        parser.skip_whitespace();
        if let Some(&(pos, _)) = parser.chars.peek() {
            return Err(parser.error(format!("unexpected trailing input at offset {}", pos)));
        }
        Ok(parsed)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    /// Qualified name of a declared type, ignoring type arguments.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            TypeRef::Declared { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Binds bare identifiers naming one of `type_params` to type variables and
    /// qualifies `java.lang` simple names.
    pub fn normalize(&self, type_params: &[String]) -> TypeRef {
        match self {
            TypeRef::Declared { name, args } => {
                if args.is_empty() && type_params.iter().any(|p| p == name) {
                    return TypeRef::Variable(name.clone());
                }
                let name = if !name.contains('.') && JAVA_LANG_TYPES.contains(&name.as_str()) {
                    format!("java.lang.{}", name)
                } else {
                    name.clone()
                };
                TypeRef::Declared {
                    name,
                    args: args.iter().map(|a| a.normalize(type_params)).collect(),
                }
            }
            TypeRef::Array(element) => TypeRef::Array(Box::new(element.normalize(type_params))),
            TypeRef::Wildcard(Some(WildcardBound::Extends(bound))) => TypeRef::Wildcard(Some(
                WildcardBound::Extends(Box::new(bound.normalize(type_params))),
            )),
            TypeRef::Wildcard(Some(WildcardBound::Super(bound))) => TypeRef::Wildcard(Some(
                WildcardBound::Super(Box::new(bound.normalize(type_params))),
            )),
            other => other.clone(),
        }
    }

    /// Replaces type variables by their bindings.
    pub fn substitute(&self, bindings: &HashMap<String, TypeRef>) -> TypeRef {
        match self {
            TypeRef::Variable(name) => bindings.get(name).cloned().unwrap_or_else(|| self.clone()),
            TypeRef::Declared { name, args } => TypeRef::Declared {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            TypeRef::Array(element) => TypeRef::Array(Box::new(element.substitute(bindings))),
            TypeRef::Wildcard(Some(WildcardBound::Extends(bound))) => TypeRef::Wildcard(Some(
                WildcardBound::Extends(Box::new(bound.substitute(bindings))),
            )),
            TypeRef::Wildcard(Some(WildcardBound::Super(bound))) => TypeRef::Wildcard(Some(
                WildcardBound::Super(Box::new(bound.substitute(bindings))),
            )),
            other => other.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(prim) => write!(f, "{}", prim.keyword()),
            TypeRef::Void => write!(f, "void"),
            TypeRef::Declared { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeRef::Array(element) => write!(f, "{}[]", element),
            TypeRef::Variable(name) => write!(f, "{}", name),
            TypeRef::Wildcard(None) => write!(f, "?"),
            TypeRef::Wildcard(Some(WildcardBound::Extends(bound))) => write!(f, "? extends {}", bound),
            TypeRef::Wildcard(Some(WildcardBound::Super(bound))) => write!(f, "? super {}", bound),
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

struct TypeParser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> TypeParser<'a> {
    fn error(&self, reason: String) -> TypeParseError {
        TypeParseError {
            input: self.input.to_string(),
            reason,
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if matches!(self.chars.peek(), Some((_, c)) if *c == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn identifier(&mut self) -> Result<String, TypeParseError> {
        self.skip_whitespace();
        let mut ident = String::new();
        while let Some((_, c)) = self.chars.peek() {
            let valid = if ident.is_empty() {
                c.is_alphabetic() || *c == '_' || *c == '$'
            } else {
                c.is_alphanumeric() || *c == '_' || *c == '$'
            };
            if !valid {
                break;
            }
            ident.push(*c);
            self.chars.next();
        }
        if ident.is_empty() {
            return Err(self.error("expected identifier".to_string()));
        }
        Ok(ident)
    }

    fn qualified_name(&mut self) -> Result<String, TypeParseError> {
        let mut name = self.identifier()?;
        while self.eat('.') {
            name.push('.');
            name.push_str(&self.identifier()?);
        }
        Ok(name)
    }

    fn parse_type(&mut self, allow_void: bool) -> Result<TypeRef, TypeParseError> {
        let name = self.qualified_name()?;

        let mut parsed = if let Some(prim) = PrimitiveType::from_keyword(&name) {
            TypeRef::Primitive(prim)
        } else if name == "void" {
            if !allow_void {
                return Err(self.error("void is not allowed here".to_string()));
            }
            TypeRef::Void
        } else {
            let mut args = Vec::new();
            if self.eat('<') {
                loop {
                    args.push(self.parse_type_argument()?);
                    if self.eat(',') {
                        continue;
                    }
                    if self.eat('>') {
                        break;
                    }
                    return Err(self.error("expected ',' or '>' in type arguments".to_string()));
                }
            }
            TypeRef::Declared { name, args }
        };

        while self.eat('[') {
            if !self.eat(']') {
                return Err(self.error("expected ']'".to_string()));
            }
            if parsed == TypeRef::Void {
                return Err(self.error("void cannot be an array element".to_string()));
            }
            parsed = TypeRef::Array(Box::new(parsed));
        }

        Ok(parsed)
    }

    fn parse_type_argument(&mut self) -> Result<TypeRef, TypeParseError> {
        if !self.eat('?') {
            let arg = self.parse_type(false)?;
            if arg.is_primitive() {
                return Err(self.error("primitive types cannot be type arguments".to_string()));
            }
            return Ok(arg);
        }

        self.skip_whitespace();
        if matches!(self.chars.peek(), Some((_, c)) if *c == ',' || *c == '>') {
            return Ok(TypeRef::Wildcard(None));
        }

        match self.identifier()?.as_str() {
            "extends" => Ok(TypeRef::Wildcard(Some(WildcardBound::Extends(Box::new(
                self.parse_type(false)?,
            ))))),
            "super" => Ok(TypeRef::Wildcard(Some(WildcardBound::Super(Box::new(
                self.parse_type(false)?,
            ))))),
            other => Err(self.error(format!("unexpected '{}' after '?'", other))),
        }
    }
}
