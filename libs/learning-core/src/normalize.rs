//! Canonicalization of persisted answer fields.
//!
//! Question rows were written by several generations of authoring scripts,
//! so the same logical value may arrive as a JSON number, a JSON-encoded
//! string, a quoted string or plain text. Nothing in here fails: values that
//! cannot be decoded are passed through untouched.

use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

/// Output of [`safe_parse`].
#[derive(Debug, Clone, PartialEq)]
pub struct SafeParsed {
    pub value: Value,
    /// False when the input was text that did not decode as JSON.
    pub parseable: bool,
}

/// Decode a value that may hold JSON-encoded text.
///
/// Strings are decoded once; on failure the original string is returned with
/// `parseable == false`. Non-string values are already structured.
pub fn safe_parse(value: &Value) -> SafeParsed {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(text.trim()) {
            Ok(decoded) => SafeParsed {
                value: decoded,
                parseable: true,
            },
            Err(_) => SafeParsed {
                value: value.clone(),
                parseable: false,
            },
        },
        other => SafeParsed {
            value: other.clone(),
            parseable: true,
        },
    }
}

/// Canonical comparison form of a string: NFKC, collapsed whitespace,
/// trimmed, lowercased.
pub fn normalize_str(text: &str) -> String {
    let composed: String = text.nfkc().collect();
    composed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Canonical comparison form of any JSON value.
///
/// `null` is the empty string; numbers and booleans use their JSON text.
pub fn normalize_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => normalize_str(text),
        other => normalize_str(&other.to_string()),
    }
}

const QUOTE_PAIRS: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’')];

/// Strip exactly one layer of matching surrounding quotes.
pub fn strip_quotes(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    QUOTE_PAIRS
        .iter()
        .find_map(|&(open, close)| trimmed.strip_prefix(open)?.strip_suffix(close))
}

/// Display text of an option entry.
///
/// Newer generators emit `{ "text": .. }` objects; `label` and `value` are
/// accepted as fallbacks.
pub fn option_text(option: &Value) -> String {
    match option {
        Value::String(text) => text.clone(),
        Value::Object(map) => ["text", "label", "value"]
            .iter()
            .find_map(|key| map.get(*key))
            .map(|inner| match inner {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| option.to_string()),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Decode an options field into a list. Anything but a list is empty.
pub fn extract_options(raw: &Value) -> Vec<Value> {
    match safe_parse(raw).value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Display texts of every option in order.
pub fn option_texts(options: &[Value]) -> Vec<String> {
    options.iter().map(option_text).collect()
}

/// Canonical form of a learner submission or stored free-text answer.
///
/// Decodes JSON-encoded text, reads option-style objects, normalizes and
/// drops one layer of surrounding quotes.
pub fn canonical_text(value: &Value) -> String {
    let decoded = safe_parse(value).value;
    let text = match &decoded {
        Value::Object(_) => normalize_str(&option_text(&decoded)),
        other => normalize_text(other),
    };
    match strip_quotes(&text) {
        Some(inner) => normalize_str(inner),
        None => text,
    }
}

/// True for `null` and whitespace-only strings.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}
