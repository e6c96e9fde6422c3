//! Purpose: Render inferred struct definitions as Rust source text.
//! Exports: `Renderer`.
//! Role: The output half of the generator; pure string building.
//! Invariants: Output is canonically formatted (4-space indent, one field per line).
//! Invariants: Rendering the same definitions with the same options is deterministic.

use crate::core::infer::GenerateOptions;
use crate::core::shape::{Field, StructDef};

pub struct Renderer<'a> {
    options: &'a GenerateOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a GenerateOptions) -> Self {
        Self { options }
    }

    /// Render a batch of definitions as paste-ready Rust source. Empty input
    /// renders as the empty string, with no import preamble.
    pub fn render(&self, defs: &[StructDef]) -> String {
        if defs.is_empty() {
            return String::new();
        }
        let mut blocks = vec!["use serde::{Deserialize, Serialize};".to_string()];
        for def in defs {
            blocks.push(self.render_def(def));
        }
        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }

    fn render_def(&self, def: &StructDef) -> String {
        if let Some(kind) = &def.alias_of {
            return format!("pub type {} = {};", def.name, kind.rust_type());
        }

        let mut out = format!("#[derive({})]\n", self.derives());
        if def.fields.is_empty() {
            out.push_str(&format!("pub struct {} {{}}", def.name));
            return out;
        }

        out.push_str(&format!("pub struct {} {{\n", def.name));
        let mut fields: Vec<&Field> = def.fields.iter().collect();
        if self.options.sort_fields {
            fields.sort_by_key(|f| f.ident.trim_start_matches("r#").to_ascii_lowercase());
        }
        for field in fields {
            if field.needs_rename() {
                out.push_str(&format!("    #[serde(rename = {:?})]\n", field.key));
            }
            out.push_str(&format!("    pub {}: {},", field.ident, field.rust_type()));
            if let Some(example) = &field.example {
                out.push_str(&format!(" // Ex: {example}"));
            }
            out.push('\n');
        }
        out.push('}');
        out
    }

    fn derives(&self) -> &'static str {
        if self.options.derive_default {
            "Debug, Clone, Default, Serialize, Deserialize"
        } else {
            "Debug, Clone, Serialize, Deserialize"
        }
    }
}
