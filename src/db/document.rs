use serde_json::{Map, Value};

use super::Document;

/// Merge `patch` into `target`.
///
/// A key like `communities.123` writes `target["communities"]["123"]`, creating the
/// intermediate maps. Objects are merged recursively, every other value overwrites.
pub fn merge_into(target: &mut Document, patch: Document) {
    for (key, value) in patch {
        let path: Vec<&str> = key.split('.').collect();
        set_path(target, &path, value);
    }
}

fn set_path(node: &mut Document, path: &[&str], value: Value) {
    match path {
        [] => {}
        [leaf] => merge_value(node, leaf, value),
        [head, rest @ ..] => {
            let child = node
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                set_path(child, rest, value);
            }
        }
    }
}

fn merge_value(node: &mut Document, key: &str, value: Value) {
    let Value::Object(incoming) = value else {
        node.insert(key.to_string(), value);
        return;
    };

    if let Some(Value::Object(existing)) = node.get_mut(key) {
        merge_into(existing, incoming);
        return;
    }

    let mut fresh = Map::new();
    merge_into(&mut fresh, incoming);
    node.insert(key.to_string(), Value::Object(fresh));
}

/// Read a dotted path.
pub fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = doc.get(segments.next()?)?;
    segments.try_fold(first, |value, segment| value.as_object()?.get(segment))
}
