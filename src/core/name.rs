//! Purpose: Turn arbitrary JSON keys and file names into Rust identifiers.
//! Exports: `type_name`, `field_name`, `serialized_name`, `name_from_file`.
//! Role: Pure string policy shared by inference and rendering.
//! Invariants: Outputs are valid Rust identifiers or the empty string.
//! Invariants: Keys that normalize to nothing return ""; callers pick the fallback.

use std::path::Path;

// Strict and reserved keywords through the 2024 edition; every entry can
// take the `r#` prefix.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override",
    "priv", "pub", "ref", "return", "static", "struct", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

// Keywords the `r#` prefix cannot rescue.
const UNRAWABLE: &[&str] = &["crate", "self", "super"];

/// PascalCase type name from a raw JSON key. Garbage-only input yields "".
/// A leading digit is prefixed with `N` so the result stays an identifier.
pub fn type_name(raw: &str) -> String {
    let mut out = String::new();
    for word in words(raw) {
        out.push_str(&cap_word(&word));
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'N');
    }
    out
}

/// snake_case field name from a raw JSON key. Garbage-only input yields "".
/// Keywords become raw identifiers; the unrescuable ones get a trailing `_`.
pub fn field_name(raw: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    for word in words(raw) {
        parts.push(word.to_ascii_lowercase());
    }
    let mut out = parts.join("_");
    if out.is_empty() {
        return out;
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if UNRAWABLE.contains(&out.as_str()) {
        out.push('_');
    } else if KEYWORDS.contains(&out.as_str()) {
        out.insert_str(0, "r#");
    }
    out
}

/// The name serde will put on the wire for a field identifier.
/// Raw identifiers serialize without their `r#` prefix.
pub fn serialized_name(ident: &str) -> &str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

/// Type name derived from an input file: directory and extension stripped,
/// the stem normalized (`test_file.json` -> `TestFile`).
pub fn name_from_file(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    type_name(&stem)
}

// Split a raw key into words: characters outside [A-Za-z0-9] are either
// separators (underscore, dot, dash, whitespace) or dropped outright, and
// camelCase boundaries inside the survivors start new words.
fn words(raw: &str) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            current.push(c);
        } else if matches!(c, '_' | '.' | '-') || c.is_whitespace() {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
        }
        // Anything else is garbage and vanishes without splitting the word.
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    let mut out = Vec::new();
    for chunk in chunks {
        split_camel(&chunk, &mut out);
    }
    out
}

// "userName" -> [user, Name]; "JSONData" -> [JSON, Data]; digits never split.
fn split_camel(chunk: &str, out: &mut Vec<String>) {
    let chars: Vec<char> = chunk.chars().collect();
    let mut start = 0;
    for i in 1..chars.len() {
        let prev = chars[i - 1];
        let c = chars[i];
        let lower_to_upper = prev.is_ascii_lowercase() && c.is_ascii_uppercase();
        let acronym_end = prev.is_ascii_uppercase()
            && c.is_ascii_uppercase()
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
        if lower_to_upper || acronym_end {
            out.push(chars[start..i].iter().collect());
            start = i;
        }
    }
    if start < chars.len() {
        out.push(chars[start..].iter().collect());
    }
}

// First letter uppercased, the rest lowered, except letters that follow a
// digit start a fresh capital ("2fa" -> "2Fa", "base64url" -> "Base64Url").
fn cap_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev: Option<char> = None;
    for c in word.chars() {
        let cap = match prev {
            None => true,
            Some(p) => p.is_ascii_digit() && c.is_ascii_alphabetic(),
        };
        if cap {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        prev = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn type_names_normalize() {
        let cases = [
            ("test", "Test"),
            ("testJSON", "TestJson"),
            ("this_is-a.test_name", "ThisIsATestName"),
            ("($@%)@$%)(@", ""),
            ("@t@e@s@t", "Test"),
            ("2fa", "N2Fa"),
            ("base64url", "Base64Url"),
            ("user name", "UserName"),
        ];
        for (raw, want) in cases {
            assert_eq!(type_name(raw), want, "raw: {raw:?}");
        }
    }

    #[test]
    fn field_names_normalize() {
        let cases = [
            ("userName", "user_name"),
            ("JSONData", "json_data"),
            ("API-Key", "api_key"),
            ("type", "r#type"),
            ("match", "r#match"),
            ("do", "r#do"),
            ("override", "r#override"),
            ("self", "self_"),
            ("crate", "crate_"),
            ("2fa", "_2fa"),
            ("($@%)", ""),
        ];
        for (raw, want) in cases {
            assert_eq!(field_name(raw), want, "raw: {raw:?}");
        }
    }

    #[test]
    fn serialized_name_strips_raw_prefix() {
        assert_eq!(serialized_name("r#type"), "type");
        assert_eq!(serialized_name("user_name"), "user_name");
    }

    #[test]
    fn file_names_become_type_names() {
        assert_eq!(name_from_file(Path::new("test_file.json")), "TestFile");
        assert_eq!(name_from_file(Path::new("dir/another.file.json")), "AnotherFile");
        assert_eq!(name_from_file(Path::new("samples/users.json")), "Users");
    }
}
