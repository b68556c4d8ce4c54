//! Serialize the host environment back into dotenv format.

use std::collections::HashMap;

use crate::env;
use crate::error::Error;
use crate::store::trim_value;

/// Render the current host environment as dotenv text.
///
/// Values that parse as base-10 integers are emitted bare
/// (`PORT=8080`); everything else is double-quoted and escaped
/// (`GREETING="hello\!"`). Lines are sorted by their full rendered form,
/// so the output is deterministic regardless of environment ordering.
pub fn marshal() -> Result<String, Error> {
    Ok(render(env::snapshot()))
}

fn render(map: HashMap<String, String>) -> String {
    let mut lines: Vec<String> = map
        .into_iter()
        .map(|(key, value)| render_line(&key, trim_value(&value)))
        .collect();
    lines.sort();
    lines.join("\n")
}

fn render_line(key: &str, value: &str) -> String {
    match value.parse::<i64>() {
        Ok(int) => format!("{key}={int}"),
        Err(_) => format!("{key}=\"{}\"", escape(value)),
    }
}

/// Backslash-escape the characters that are unsafe inside a double-quoted
/// dotenv value. A single pass, so no escape output is ever re-escaped.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '!' => out.push_str("\\!"),
            '$' => out.push_str("\\$"),
            '`' => out.push_str("\\`"),
            _ => out.push(ch),
        }
    }
    out
}
