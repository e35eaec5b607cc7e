//! Prune disabled entries from a schema config

use serde_json::Value;

fn is_disabled(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|object| object.get("enabled"))
        .is_some_and(|enabled| enabled == &Value::Bool(false))
}

/// Drop every object-valued entry whose `enabled` is `false`, at any depth
///
/// Entries without an `enabled` key are kept. Non-object values are returned
/// unchanged.
pub fn filter_disabled(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .filter(|(_, child)| !is_disabled(child))
                .map(|(key, child)| (key, filter_disabled(child)))
                .collect(),
        ),
        other => other,
    }
}
