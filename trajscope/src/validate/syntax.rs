//! Human-readable diagnosis of JSON parse errors.

use crate::validate::failure::{FailureKind, LoadFailure};

const SNIPPET_CHARS: usize = 60;

/// Diagnosed location and explanation of a parse error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SyntaxDiagnosis {
    pub(crate) line: Option<usize>,
    pub(crate) snippet: Option<String>,
    pub(crate) explanation: String,
}

pub(crate) fn diagnose(text: &str, err: &serde_json::Error) -> SyntaxDiagnosis {
    let raw = strip_location(&err.to_string());
    let line = (err.line() > 0).then_some(err.line());
    let offset = line.map(|l| byte_offset(text, l, err.column()));
    let at = offset.and_then(|o| text[o..].chars().next());
    SyntaxDiagnosis {
        line,
        snippet: offset.map(|o| snippet_around(text, o)),
        explanation: explain(&raw, at, err.classify()),
    }
}

pub(crate) fn invalid_format(text: &str, err: &serde_json::Error) -> LoadFailure {
    let d = diagnose(text, err);
    let mut message = d.explanation;
    if let Some(line) = d.line {
        message.push_str(&format!(" (line {line})"));
    }
    if let Some(snippet) = d.snippet.filter(|s| !s.trim().is_empty()) {
        message.push_str(&format!("\nNear: {snippet}"));
    }
    let mut suggestions = vec!["Open the file in an editor with JSON validation.".to_owned()];
    if let Some(line) = d.line {
        suggestions.push(format!("Look at line {line} and the one before it."));
    }
    suggestions.push("Re-export the run if the file was edited by hand.".to_owned());
    LoadFailure::new(
        FailureKind::InvalidFormat,
        "Invalid JSON",
        message,
        suggestions,
    )
}

fn strip_location(msg: &str) -> String {
    match msg.rfind(" at line ") {
        Some(i) => msg[..i].to_owned(),
        None => msg.to_owned(),
    }
}

fn explain(raw: &str, at: Option<char>, category: serde_json::error::Category) -> String {
    use serde_json::error::Category;

    if raw.contains("trailing comma")
        || (raw.starts_with("expected value") && matches!(at, Some('}' | ']')))
    {
        let which = if at == Some(']') {
            "bracket ']'"
        } else {
            "brace '}'"
        };
        return format!(
            "Unexpected closing {which}: there is probably a trailing comma or a missing value before it."
        );
    }
    if raw.starts_with("invalid type") {
        return format!("Type mismatch: a field holds the wrong kind of value ({raw}).");
    }
    if category == Category::Eof || raw.starts_with("EOF while parsing") {
        return "The document ends before every brace and bracket is closed.".to_owned();
    }
    if raw.starts_with("key must be a string") {
        return "Object keys must be double-quoted strings.".to_owned();
    }
    if let Some(rest) = raw.strip_prefix("expected ") {
        return format!("Syntax error: expected {rest}.");
    }
    format!("Syntax error: {raw}.")
}

/// Byte offset of 1-based `line` / `column`, clamped to the text and snapped to a char boundary.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let mut offset = 0usize;
    for (i, l) in text.split('\n').enumerate() {
        if i + 1 == line {
            offset += column.saturating_sub(1).min(l.len());
            break;
        }
        offset += l.len() + 1;
    }
    let mut o = offset.min(text.len());
    while !text.is_char_boundary(o) {
        o -= 1;
    }
    o
}

/// At most [`SNIPPET_CHARS`] characters centred on `offset`, newlines flattened.
fn snippet_around(text: &str, offset: usize) -> String {
    let half = SNIPPET_CHARS / 2;
    let before: Vec<char> = text[..offset].chars().rev().take(half).collect();
    let after = text[offset..].chars().take(SNIPPET_CHARS - before.len());
    before
        .into_iter()
        .rev()
        .chain(after)
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/validate/syntax.rs"]
mod tests;
