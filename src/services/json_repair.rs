//! Tolerant recovery of JSON from language-model output.
//!
//! Models asked for "only a JSON array" still wrap it in markdown fences,
//! prepend a sentence, use single quotes, leave trailing commas or stop
//! mid-object. [`repair_json`] accepts all of these and returns the first
//! JSON value it can recover.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Start positions tried per source before giving up.
const MAX_CANDIDATES: usize = 32;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```")
        .expect("CODE_FENCE is a valid regex pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonRepairError {
    #[error("response is empty")]
    Empty,
    #[error("no JSON value could be recovered from the response")]
    Unparseable,
}

/// Recovers a JSON value from `raw`, strict parse first.
pub fn repair_json(raw: &str) -> Result<Value, JsonRepairError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(JsonRepairError::Empty);
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let mut sources: Vec<&str> = CODE_FENCE
        .captures_iter(trimmed)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();
    sources.push(trimmed);

    let mut fallback = None;
    for source in sources {
        let starts = source
            .char_indices()
            .filter(|(_, c)| *c == '[' || *c == '{')
            .map(|(i, _)| i)
            .take(MAX_CANDIDATES);

        for start in starts {
            let repaired = repair_fragment(&source[start..]);
            if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
                if is_structured(&value) {
                    return Ok(value);
                }
                fallback.get_or_insert(value);
            }
        }
    }

    fallback.ok_or(JsonRepairError::Unparseable)
}

/// Object → one element, array → its elements, anything else → nothing.
pub fn normalize_questions(value: Value) -> Vec<Value> {
    match value {
        Value::Object(_) => vec![value],
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

fn is_structured(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => items.iter().any(Value::is_object),
        _ => false,
    }
}

/// Rewrites the value starting at the beginning of `text` into strict JSON.
/// Anything after the first complete top-level value is dropped.
fn repair_fragment(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut stack: Vec<char> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            out.push(c);
            i += 1;
            continue;
        }

        match c {
            '{' | '[' => {
                insert_missing_comma(&mut out, &stack);
                out.push(c);
                stack.push(if c == '{' { '}' } else { ']' });
                i += 1;
            }
            '}' | ']' => {
                if stack.contains(&c) {
                    while let Some(closer) = stack.pop() {
                        close_container(&mut out, closer);
                        if closer == c {
                            break;
                        }
                    }
                    if stack.is_empty() {
                        return out;
                    }
                }
                i += 1;
            }
            '"' | '\'' | '\u{201C}' | '\u{2018}' => {
                insert_missing_comma(&mut out, &stack);
                i = read_string(&chars, i, &mut out);
            }
            ',' => {
                if !matches!(last_significant(&out), Some(',') | Some('[') | Some('{') | None) {
                    out.push(',');
                }
                i += 1;
            }
            ':' => {
                out.push(':');
                i += 1;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                    i += 1;
                }
                i += 2;
            }
            c if c == '-' || c.is_ascii_digit() => {
                insert_missing_comma(&mut out, &stack);
                while i < chars.len()
                    && (chars[i].is_ascii_digit() || matches!(chars[i], '.' | '-' | '+' | 'e' | 'E'))
                {
                    out.push(chars[i]);
                    i += 1;
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                insert_missing_comma(&mut out, &stack);
                out.push_str(&bare_word(&word, next_significant(&chars, i) == Some(':')));
            }
            _ => {
                // Markdown residue and other stray characters.
                i += 1;
            }
        }
    }

    finish_truncated(&mut out, &mut stack);
    out
}

/// Reads a string opened at `chars[start]` and appends it as a JSON string
/// literal. Returns the index after the closing quote.
fn read_string(chars: &[char], start: usize, out: &mut String) -> usize {
    let closers: &[char] = match chars[start] {
        '\'' => &['\''],
        '\u{2018}' => &['\u{2019}', '\''],
        _ => &['"', '\u{201D}'],
    };

    out.push('"');
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];

        if c == '\\' {
            match chars.get(i + 1) {
                Some('\'') => out.push('\''),
                Some(&next) if matches!(next, '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u') => {
                    out.push('\\');
                    out.push(next);
                }
                Some(&next) => {
                    out.push_str("\\\\");
                    out.push(next);
                }
                None => out.push_str("\\\\"),
            }
            i += 2;
            continue;
        }

        // A quote only closes the string when structure follows it;
        // otherwise it is an unescaped quote inside the text.
        if closers.contains(&c) && closes_string(chars, i + 1) {
            out.push('"');
            return i + 1;
        }

        match c {
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
        i += 1;
    }

    out.push('"');
    chars.len()
}

fn closes_string(chars: &[char], from: usize) -> bool {
    match next_significant(chars, from) {
        None => true,
        Some(c) => matches!(c, ',' | ':' | '}' | ']' | '"'),
    }
}

fn bare_word(word: &str, is_key: bool) -> String {
    if is_key {
        return format!("\"{}\"", word);
    }
    match word.to_ascii_lowercase().as_str() {
        "true" => "true".to_string(),
        "false" => "false".to_string(),
        "null" | "none" | "nil" | "undefined" | "nan" => "null".to_string(),
        _ => format!("\"{}\"", word),
    }
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars[from.min(chars.len())..]
        .iter()
        .copied()
        .find(|c| !c.is_whitespace())
}

fn last_significant(out: &str) -> Option<char> {
    out.chars().rev().find(|c| !c.is_whitespace())
}

/// Adjacent values with nothing between them (`} {`, `"a" "b"`) get a comma.
fn insert_missing_comma(out: &mut String, stack: &[char]) {
    if stack.is_empty() {
        return;
    }
    if let Some(last) = last_significant(out) {
        if matches!(last, '}' | ']' | '"') || last.is_alphanumeric() {
            out.push(',');
        }
    }
}

fn close_container(out: &mut String, closer: char) {
    let kept = out.trim_end().len();
    out.truncate(kept);
    if out.ends_with(',') {
        out.pop();
    }
    if out.ends_with(':') {
        out.push_str("null");
    }
    out.push(closer);
}

fn finish_truncated(out: &mut String, stack: &mut Vec<char>) {
    while let Some(closer) = stack.pop() {
        close_container(out, closer);
    }
}
