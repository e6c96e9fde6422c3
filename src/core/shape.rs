//! Purpose: Model the struct definitions the generator produces.
//! Exports: `FieldKind`, `Field`, `StructDef`.
//! Role: Shared vocabulary between inference and rendering.
//! Invariants: `Field::ident` is always a valid Rust identifier.
//! Invariants: Kind-to-type mapping is total; unknown shapes land on `Any`.

use crate::core::name::serialized_name;

/// The inferred shape of a single JSON value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    Uint,
    Float,
    String,
    /// A literal `null`; only an example, so the type stays open.
    Null,
    /// A nested object, rendered as a reference to its own struct.
    Struct(String),
    List(Box<FieldKind>),
    /// Conflicting or unknowable shapes; renders as `serde_json::Value`.
    Any,
}

impl FieldKind {
    /// The Rust type this kind renders as, before `Option<...>` wrapping.
    pub fn rust_type(&self) -> String {
        match self {
            FieldKind::Bool => "bool".to_string(),
            FieldKind::Int => "i64".to_string(),
            FieldKind::Uint => "u64".to_string(),
            FieldKind::Float => "f64".to_string(),
            FieldKind::String => "String".to_string(),
            FieldKind::Null => "Option<serde_json::Value>".to_string(),
            FieldKind::Struct(name) => name.clone(),
            FieldKind::List(elem) => format!("Vec<{}>", elem.rust_type()),
            FieldKind::Any => "serde_json::Value".to_string(),
        }
    }
}

/// One generated struct field.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// Original JSON object key, verbatim.
    pub key: String,
    /// Normalized Rust identifier (possibly `r#`-prefixed).
    pub ident: String,
    pub kind: FieldKind,
    /// Absent from at least one example; renders as `Option<...>`.
    pub optional: bool,
    /// Rendered example comment, without the `// Ex: ` prefix.
    pub example: Option<String>,
}

impl Field {
    /// A `#[serde(rename = ...)]` attribute is needed when the name serde
    /// would emit differs from the original key.
    pub fn needs_rename(&self) -> bool {
        serialized_name(&self.ident) != self.key
    }

    /// Field type as rendered, including the optional wrapper. `Null` is
    /// already optional by nature and is not double-wrapped.
    pub fn rust_type(&self) -> String {
        let base = self.kind.rust_type();
        if self.optional && !matches!(self.kind, FieldKind::Null) {
            format!("Option<{base}>")
        } else {
            base
        }
    }
}

/// One generated type definition: a struct, or a top-level alias when the
/// input document was an array.
#[derive(Clone, Debug, PartialEq)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<Field>,
    /// Set for top-level arrays: `pub type Name = Vec<Elem>;`.
    pub alias_of: Option<FieldKind>,
}

impl StructDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            alias_of: None,
        }
    }
}
