//! Placeholder substitution in response bodies.
//!
//! Every `:name` token inside any string value is replaced by the captured
//! parameter of that name, or left as-is when nothing was captured. This is
//! a blunt textual policy (`"user :userId"` is substituted too, not only
//! whole-value placeholders). Object keys and non-string values are never
//! touched, so the rendered body has the same shape as the stored one.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::routing::pattern::PathParams;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([A-Za-z0-9_]+)").expect("placeholder regex is valid"));

/// Render a stored body for the captured parameters.
pub fn render_body(body: &Value, params: &PathParams) -> Value {
    match body {
        Value::String(s) => Value::String(substitute(s, params)),
        Value::Array(items) => Value::Array(items.iter().map(|v| render_body(v, params)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), render_body(v, params)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn substitute(text: &str, params: &PathParams) -> String {
    if params.is_empty() || !text.contains(':') {
        return text.to_string();
    }
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| match params.get(&caps[1]) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}
