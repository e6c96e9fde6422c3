//! Purpose: Infer struct definitions from example JSON values.
//! Exports: `GenerateOptions`, `Generator`.
//! Role: The inference engine behind every surface (CLI, web, workbench).
//! Invariants: Struct order is parent-first, depth-first; field order is source order.
//! Invariants: Minted type and field names are unique within one run.
//! Invariants: Unknowable shapes degrade to `serde_json::Value`, never to an error.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::core::name::{field_name, type_name};
use crate::core::shape::{Field, FieldKind, StructDef};

/// Name used when an input name normalizes to nothing.
pub const FALLBACK_TYPE: &str = "Generated";
const FALLBACK_FIELD: &str = "field";

#[derive(Clone, Debug)]
pub struct GenerateOptions {
    /// Base type name override; otherwise derived from the input file.
    pub name: Option<String>,
    /// Order struct fields by identifier instead of source order.
    pub sort_fields: bool,
    /// Attach `// Ex: ...` comments showing the example values.
    pub value_comments: bool,
    /// Add `Default` to the derive list.
    pub derive_default: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            name: None,
            sort_fields: true,
            value_comments: false,
            derive_default: false,
        }
    }
}

pub struct Generator {
    options: GenerateOptions,
}

// Hands out unique type names; repeats get a numeric suffix.
struct Namer {
    taken: HashSet<String>,
}

impl Namer {
    fn new() -> Self {
        Self {
            taken: HashSet::new(),
        }
    }

    fn claim(&mut self, want: &str) -> String {
        if self.taken.insert(want.to_string()) {
            return want.to_string();
        }
        let mut n = 2usize;
        loop {
            let candidate = format!("{want}{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl Generator {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Parse zero or more whitespace-separated JSON documents and infer
    /// struct definitions for all of them. The first document takes
    /// `base_name`; later ones get a numeric suffix (`Name`, `Name2`, ...).
    /// Empty input yields an empty definition list.
    pub fn structs_from_str(&self, base_name: &str, input: &str) -> Result<Vec<StructDef>, Error> {
        let base = fallback(base_name, FALLBACK_TYPE);
        let mut namer = Namer::new();
        let mut defs = Vec::new();
        let mut index = 0usize;
        for doc in serde_json::Deserializer::from_str(input).into_iter::<Value>() {
            let value =
                doc.map_err(|err| Error::new(ErrorKind::Parse).with_message(err.to_string()))?;
            index += 1;
            let doc_name = if index == 1 {
                base.to_string()
            } else {
                format!("{base}{index}")
            };
            self.document(&doc_name, &value, &mut namer, &mut defs)?;
        }
        Ok(defs)
    }

    /// Infer struct definitions for one already-parsed document.
    pub fn structs_from_value(&self, name: &str, value: &Value) -> Result<Vec<StructDef>, Error> {
        let mut namer = Namer::new();
        let mut defs = Vec::new();
        self.document(fallback(name, FALLBACK_TYPE), value, &mut namer, &mut defs)?;
        Ok(defs)
    }

    fn document(
        &self,
        name: &str,
        value: &Value,
        namer: &mut Namer,
        out: &mut Vec<StructDef>,
    ) -> Result<(), Error> {
        match value {
            Value::Object(map) => {
                self.build_struct(name, map, namer, out)?;
                Ok(())
            }
            Value::Array(items) => {
                // A top-level array becomes a Vec alias over its element type.
                let alias_name = namer.claim(name);
                let idx = out.len();
                out.push(StructDef::new(alias_name.clone()));
                let refs: Vec<&Value> = items.iter().collect();
                let kind = self.list_kind(&format!("{alias_name}Item"), &refs, namer, out)?;
                out[idx].alias_of = Some(kind);
                Ok(())
            }
            _ => Err(Error::new(ErrorKind::Parse)
                .with_message("expecting either an array or an object")),
        }
    }

    // Mint a struct for one JSON object. The definition is pushed before its
    // children so output order stays parent-first.
    fn build_struct(
        &self,
        want_name: &str,
        entries: &Map<String, Value>,
        namer: &mut Namer,
        out: &mut Vec<StructDef>,
    ) -> Result<String, Error> {
        let claimed = namer.claim(fallback(want_name, FALLBACK_TYPE));
        let idx = out.len();
        out.push(StructDef::new(claimed.clone()));

        let mut fields = Vec::new();
        let mut idents = HashSet::new();
        for (key, value) in entries {
            let kind = self.value_kind(key, value, namer, out)?;
            fields.push(self.make_field(key, kind, false, self.example_for(value), &mut idents));
        }
        out[idx].fields = fields;
        Ok(claimed)
    }

    fn value_kind(
        &self,
        key: &str,
        value: &Value,
        namer: &mut Namer,
        out: &mut Vec<StructDef>,
    ) -> Result<FieldKind, Error> {
        Ok(match value {
            Value::Null => FieldKind::Null,
            Value::Bool(_) => FieldKind::Bool,
            Value::Number(n) => number_kind(n),
            Value::String(_) => FieldKind::String,
            Value::Object(map) => {
                let name = self.build_struct(&type_name(key), map, namer, out)?;
                FieldKind::Struct(name)
            }
            Value::Array(items) => {
                let refs: Vec<&Value> = items.iter().collect();
                self.list_kind(&type_name(key), &refs, namer, out)?
            }
        })
    }

    // Element type for a list of example values; returns the full `List(...)`
    // kind. `elem_name` is the PascalCase candidate for any minted struct.
    fn list_kind(
        &self,
        elem_name: &str,
        items: &[&Value],
        namer: &mut Namer,
        out: &mut Vec<StructDef>,
    ) -> Result<FieldKind, Error> {
        if items.is_empty() {
            debug!(name = elem_name, "empty array, defaulting element type to String");
            return Ok(FieldKind::List(Box::new(FieldKind::String)));
        }
        if items.iter().all(|v| v.is_object()) {
            let objects: Vec<&Map<String, Value>> =
                items.iter().filter_map(|v| v.as_object()).collect();
            let name = self.merge_objects(elem_name, &objects, namer, out)?;
            return Ok(FieldKind::List(Box::new(FieldKind::Struct(name))));
        }
        if items.iter().all(|v| v.is_array()) {
            let inner: Vec<&Value> = items
                .iter()
                .filter_map(|v| v.as_array())
                .flatten()
                .collect();
            let inner_kind = self.list_kind(elem_name, &inner, namer, out)?;
            return Ok(FieldKind::List(Box::new(inner_kind)));
        }

        // Scalars, possibly mixed. Containers and nulls inside a mixed list
        // carry no single element type and collapse to Any.
        let mut unified: Option<FieldKind> = None;
        for item in items {
            let kind = match item {
                Value::Bool(_) => FieldKind::Bool,
                Value::Number(n) => number_kind(n),
                Value::String(_) => FieldKind::String,
                Value::Null | Value::Object(_) | Value::Array(_) => FieldKind::Any,
            };
            unified = Some(match unified {
                None => kind,
                Some(prev) => unify(&prev, &kind),
            });
        }
        let elem = unified.unwrap_or(FieldKind::String);
        Ok(FieldKind::List(Box::new(elem)))
    }

    // One struct covering every element of an array of objects. A field
    // missing from some elements (or null in some) renders as Option; a field
    // whose examples disagree on shape degrades per `unify`.
    fn merge_objects(
        &self,
        elem_name: &str,
        objects: &[&Map<String, Value>],
        namer: &mut Namer,
        out: &mut Vec<StructDef>,
    ) -> Result<String, Error> {
        let claimed = namer.claim(fallback(elem_name, FALLBACK_TYPE));
        let idx = out.len();
        out.push(StructDef::new(claimed.clone()));

        // Union of keys, first-seen order.
        let mut order: Vec<&str> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for object in objects {
            for key in object.keys() {
                if seen.insert(key.as_str()) {
                    order.push(key.as_str());
                }
            }
        }

        let mut fields = Vec::new();
        let mut idents = HashSet::new();
        for key in order {
            let values: Vec<&Value> = objects.iter().filter_map(|o| o.get(key)).collect();
            let mut optional = values.len() < objects.len();
            let non_null: Vec<&Value> = values.iter().copied().filter(|v| !v.is_null()).collect();
            if non_null.len() < values.len() {
                optional = true;
            }

            let kind = if non_null.is_empty() {
                FieldKind::Null
            } else if non_null.iter().all(|v| v.is_object()) {
                let nested: Vec<&Map<String, Value>> =
                    non_null.iter().filter_map(|v| v.as_object()).collect();
                FieldKind::Struct(self.merge_objects(&type_name(key), &nested, namer, out)?)
            } else if non_null.iter().all(|v| v.is_array()) {
                // Unify element types across every instance of the array.
                let inner: Vec<&Value> = non_null
                    .iter()
                    .filter_map(|v| v.as_array())
                    .flatten()
                    .collect();
                self.list_kind(&type_name(key), &inner, namer, out)?
            } else {
                let mut unified: Option<FieldKind> = None;
                for value in &non_null {
                    let kind = match value {
                        Value::Bool(_) => FieldKind::Bool,
                        Value::Number(n) => number_kind(n),
                        Value::String(_) => FieldKind::String,
                        _ => FieldKind::Any,
                    };
                    unified = Some(match unified {
                        None => kind,
                        Some(prev) => unify(&prev, &kind),
                    });
                }
                unified.unwrap_or(FieldKind::Any)
            };

            let example = values.first().and_then(|v| self.example_for(v));
            fields.push(self.make_field(key, kind, optional, example, &mut idents));
        }
        out[idx].fields = fields;
        Ok(claimed)
    }

    fn make_field(
        &self,
        key: &str,
        kind: FieldKind,
        optional: bool,
        example: Option<String>,
        idents: &mut HashSet<String>,
    ) -> Field {
        let mut ident = field_name(key);
        if ident.is_empty() {
            ident = FALLBACK_FIELD.to_string();
        }
        if !idents.insert(ident.clone()) {
            let mut n = 2usize;
            loop {
                let candidate = format!("{ident}{n}");
                if idents.insert(candidate.clone()) {
                    ident = candidate;
                    break;
                }
                n += 1;
            }
        }
        Field {
            key: key.to_string(),
            ident,
            kind,
            optional,
            example,
        }
    }

    fn example_for(&self, value: &Value) -> Option<String> {
        if !self.options.value_comments {
            return None;
        }
        Some(example_string(value))
    }
}

fn number_kind(n: &serde_json::Number) -> FieldKind {
    if n.is_i64() {
        FieldKind::Int
    } else if n.is_u64() {
        FieldKind::Uint
    } else {
        FieldKind::Float
    }
}

// Common shape for two example kinds. Distinct numerics widen to Float;
// anything else that disagrees degrades to Any.
fn unify(a: &FieldKind, b: &FieldKind) -> FieldKind {
    use FieldKind::*;
    if a == b {
        return a.clone();
    }
    match (a, b) {
        (Int | Uint | Float, Int | Uint | Float) => Float,
        (List(x), List(y)) => List(Box::new(unify(x, y))),
        _ => Any,
    }
}

fn example_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else if let Some(f) = n.as_f64() {
                if f.is_finite() && f == f.trunc() {
                    format!("{f:.0}")
                } else {
                    format!("{f:.2}")
                }
            } else {
                n.to_string()
            }
        }
        Value::String(s) => format!("{s:?}"),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(example_string).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(_) => "object".to_string(),
    }
}

fn fallback<'a>(name: &'a str, default: &'a str) -> &'a str {
    if name.is_empty() { default } else { name }
}
