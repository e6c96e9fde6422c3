//! Purpose: Tokenize generated Rust source with optional ANSI colorization for CLI output.
//! Exports: `TokenClass`, `scan_line`, `colorize_rust`.
//! Role: Small, pure scanner shared by CLI emission and the workbench highlighter.
//! Invariants: When color is disabled, output is byte-identical to the input.
//! Invariants: `scan_line` spans concatenate back to exactly the scanned line.

// Conservative 8/16-color palette for broad terminal compatibility.
const COLOR_KEYWORD: &str = "35";
const COLOR_TYPE: &str = "36";
const COLOR_STRING: &str = "32";
const COLOR_NUMBER: &str = "33";
const COLOR_ATTRIBUTE: &str = "33";
const COLOR_COMMENT: &str = "90";

const KEYWORDS: &[&str] = &[
    "as", "crate", "enum", "fn", "impl", "let", "mod", "pub", "self", "struct", "super",
    "trait", "type", "use", "where",
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenClass {
    Keyword,
    TypeName,
    StringLit,
    Number,
    Attribute,
    Comment,
    Plain,
}

/// Split one line of Rust source into classified spans, left to right.
/// Spans cover the whole line; whitespace and punctuation land in `Plain`.
pub fn scan_line(line: &str) -> Vec<(TokenClass, &str)> {
    let bytes = line.as_bytes();
    let mut spans: Vec<(TokenClass, &str)> = Vec::new();
    let mut plain_start: Option<usize> = None;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        // Line comment: the rest of the line.
        if c == b'/' && bytes.get(i + 1) == Some(&b'/') {
            flush_plain(line, &mut spans, &mut plain_start, i);
            spans.push((TokenClass::Comment, &line[i..]));
            return spans;
        }
        // Attribute: `#[` through its closing bracket. A `]` inside a
        // string literal does not close the attribute.
        if c == b'#' && bytes.get(i + 1) == Some(&b'[') {
            flush_plain(line, &mut spans, &mut plain_start, i);
            let mut j = i + 2;
            while j < bytes.len() && bytes[j] != b']' {
                if bytes[j] == b'"' {
                    j += 1;
                    while j < bytes.len() && bytes[j] != b'"' {
                        if bytes[j] == b'\\' {
                            j += 1;
                        }
                        j += 1;
                    }
                }
                j += 1;
            }
            let end = (j + 1).min(bytes.len());
            spans.push((TokenClass::Attribute, &line[i..end]));
            i = end;
            continue;
        }
        // String literal, honoring escapes; unterminated runs to end of line.
        if c == b'"' {
            flush_plain(line, &mut spans, &mut plain_start, i);
            let mut j = i + 1;
            while j < bytes.len() {
                if bytes[j] == b'\\' {
                    j += 2;
                    continue;
                }
                if bytes[j] == b'"' {
                    j += 1;
                    break;
                }
                j += 1;
            }
            let end = j.min(bytes.len());
            spans.push((TokenClass::StringLit, &line[i..end]));
            i = end;
            continue;
        }
        if c.is_ascii_digit() {
            flush_plain(line, &mut spans, &mut plain_start, i);
            let mut j = i + 1;
            while j < bytes.len() && (bytes[j].is_ascii_digit() || bytes[j] == b'.' || bytes[j] == b'_') {
                j += 1;
            }
            spans.push((TokenClass::Number, &line[i..j]));
            i = j;
            continue;
        }
        if c.is_ascii_alphabetic() || c == b'_' {
            flush_plain(line, &mut spans, &mut plain_start, i);
            let mut j = i + 1;
            // Raw identifiers scan as one word.
            if c == b'r' && bytes.get(i + 1) == Some(&b'#') {
                j = i + 2;
            }
            while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_') {
                j += 1;
            }
            let word = &line[i..j];
            let class = classify_word(word);
            spans.push((class, word));
            i = j;
            continue;
        }
        if plain_start.is_none() {
            plain_start = Some(i);
        }
        i += 1;
    }
    flush_plain(line, &mut spans, &mut plain_start, bytes.len());
    spans
}

// Close out a pending plain run, if one is open, up to `end`.
fn flush_plain<'a>(
    line: &'a str,
    spans: &mut Vec<(TokenClass, &'a str)>,
    start: &mut Option<usize>,
    end: usize,
) {
    if let Some(s) = start.take() {
        spans.push((TokenClass::Plain, &line[s..end]));
    }
}

fn classify_word(word: &str) -> TokenClass {
    if word.starts_with("r#") {
        return TokenClass::Plain;
    }
    if KEYWORDS.contains(&word) {
        return TokenClass::Keyword;
    }
    if word.starts_with(|c: char| c.is_ascii_uppercase()) {
        return TokenClass::TypeName;
    }
    TokenClass::Plain
}

pub fn colorize_rust(source: &str, use_color: bool) -> String {
    if !use_color {
        return source.to_string();
    }
    let mut out = String::with_capacity(source.len());
    let mut first = true;
    for line in source.split('\n') {
        if !first {
            out.push('\n');
        }
        first = false;
        for (class, text) in scan_line(line) {
            push_colored(text, class, &mut out);
        }
    }
    out
}

fn push_colored(text: &str, class: TokenClass, out: &mut String) {
    let color = match class {
        TokenClass::Keyword => COLOR_KEYWORD,
        TokenClass::TypeName => COLOR_TYPE,
        TokenClass::StringLit => COLOR_STRING,
        TokenClass::Number => COLOR_NUMBER,
        TokenClass::Attribute => COLOR_ATTRIBUTE,
        TokenClass::Comment => COLOR_COMMENT,
        TokenClass::Plain => {
            out.push_str(text);
            return;
        }
    };
    out.push_str("\u{1b}[");
    out.push_str(color);
    out.push('m');
    out.push_str(text);
    out.push_str("\u{1b}[0m");
}
