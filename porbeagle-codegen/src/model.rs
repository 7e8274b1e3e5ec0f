//! Declaration snapshot model.
//!
//! A [`Compilation`] is an immutable snapshot of the type declarations visible
//! to one generation pass. It is produced either by the Rust source frontend
//! ([`crate::source`]) or deserialized from JSON handed over by another host.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CodegenError;

/// A `::`-separated path naming a type, trait, derive or attribute.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifiedName(String);

impl QualifiedName {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Join a namespace and a trailing segment. An empty namespace yields the
    /// bare segment.
    pub fn join(namespace: &str, segment: &str) -> Self {
        if namespace.is_empty() {
            Self(segment.to_string())
        } else {
            Self(format!("{}::{}", namespace, segment))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QualifiedName {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for QualifiedName {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// A resolved type: its definition plus ordered generic arguments.
///
/// Non-path types (references, tuples, arrays, ...) carry their normalized
/// source text as `name` and no arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: QualifiedName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    pub fn named(name: impl Into<QualifiedName>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<QualifiedName>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Whether the unparameterized definition of this type is `definition`.
    pub fn is_instance_of(&self, definition: &QualifiedName) -> bool {
        &self.name == definition
    }
}

impl From<QualifiedName> for TypeRef {
    fn from(name: QualifiedName) -> Self {
        Self::named(name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(ToString::to_string).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

/// A positional argument of an attribute instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeArg {
    Int(i64),
    Str(String),
    Bool(bool),
    Type(TypeRef),
    Other(String),
}

impl fmt::Display for AttributeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeArg::Int(value) => write!(f, "{}", value),
            AttributeArg::Str(value) => write!(f, "{:?}", value),
            AttributeArg::Bool(value) => write!(f, "{}", value),
            AttributeArg::Type(ty) => write!(f, "{}", ty),
            AttributeArg::Other(text) => f.write_str(text),
        }
    }
}

/// An attribute attached to a declaration or member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInstance {
    /// Resolved attribute class, `None` when the frontend could not resolve it.
    pub class: Option<QualifiedName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<AttributeArg>,
}

impl AttributeInstance {
    pub fn marker(class: impl Into<QualifiedName>) -> Self {
        Self {
            class: Some(class.into()),
            args: Vec::new(),
        }
    }

    pub fn with_args(class: impl Into<QualifiedName>, args: Vec<AttributeArg>) -> Self {
        Self {
            class: Some(class.into()),
            args,
        }
    }

    pub fn is(&self, class: &QualifiedName) -> bool {
        self.class.as_ref() == Some(class)
    }
}

/// A named data member of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredMember {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeInstance>,
}

impl DeclaredMember {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeInstance) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attributes_of<'a>(
        &'a self,
        class: &'a QualifiedName,
    ) -> impl Iterator<Item = &'a AttributeInstance> + 'a {
        self.attributes.iter().filter(move |attr| attr.is(class))
    }
}

/// A named type declaration visible in the compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generics: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeInstance>,
    #[serde(default)]
    pub members: Vec<DeclaredMember>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeRef>,
}

impl TypeDeclaration {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            generics: Vec::new(),
            attributes: Vec::new(),
            members: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::join(&self.namespace, &self.name)
    }

    pub fn has_attribute(&self, class: &QualifiedName) -> bool {
        self.attributes.iter().any(|attr| attr.is(class))
    }
}

/// Immutable snapshot of every declaration one pass can see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compilation {
    #[serde(default)]
    pub declarations: Vec<TypeDeclaration>,
    /// Type definitions referenced by the compilation (dependencies).
    #[serde(default)]
    pub references: BTreeSet<QualifiedName>,
}

impl Compilation {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read a JSON snapshot from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CodegenError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
        Ok(Self::from_json(&json)?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Whether `name` is defined by a referenced crate or by the compilation
    /// itself.
    pub fn defines(&self, name: &QualifiedName) -> bool {
        self.references.contains(name)
            || self
                .declarations
                .iter()
                .any(|decl| &decl.qualified_name() == name)
    }
}

/// Output category of a declared member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", content = "index", rename_all = "snake_case")]
pub enum Category {
    Sticker,
    Embed,
    ActionRowSlot(u32),
    Ignored,
}

/// Members sharing one action-row index, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRowGroup {
    pub index: u32,
    pub members: Vec<String>,
}

/// One generated companion declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub file_name: String,
    pub source: QualifiedName,
    pub content: String,
}
