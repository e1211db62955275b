//! Recursive placeholder substitution over string templates and nested
//! structures. Used by the template materialization path and usable by
//! external notification templating, which formats whole trees of
//! strings at once.

use serde_json::Value;
use std::collections::HashMap;

/// Substitute `{name}` placeholders in a single string. Placeholders
/// without a matching argument are left untouched.
pub fn render_str(template: &str, args: &HashMap<String, String>) -> String {
    let mut out = template.to_string();
    for (key, value) in args {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

/// Apply [`render_str`] to every string reachable in a JSON tree,
/// descending through arrays and object values. Non-string leaves are
/// returned unchanged.
pub fn render_value(template: &Value, args: &HashMap<String, String>) -> Value {
    match template {
        Value::String(s) => Value::String(render_str(s, args)),
        Value::Array(items) => Value::Array(items.iter().map(|v| render_value(v, args)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), render_value(v, args)))
                .collect(),
        ),
        other => other.clone(),
    }
}
