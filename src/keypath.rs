use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Joins nesting levels in a flattened key path.
pub const SEPARATOR: char = '.';

/// One file's translations as dotted key path -> leaf value.
/// Insertion order is kept so rows and saved files follow the source order.
pub type FlatMap = IndexMap<String, Value>;

/// Flatten a nested JSON object into dotted key paths.
/// Objects are descended into; arrays, strings, numbers, booleans and null are leaves.
pub fn flatten(nested: &Map<String, Value>) -> FlatMap {
    let mut out = FlatMap::new();
    flatten_into(nested, "", &mut out);
    out
}

/// Like [`flatten`], but only for object roots.
pub fn flatten_value(root: &Value) -> Option<FlatMap> {
    root.as_object().map(flatten)
}

pub fn flatten_into(nested: &Map<String, Value>, prefix: &str, out: &mut FlatMap) {
    for (name, value) in nested {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}{SEPARATOR}{name}")
        };
        match value {
            Value::Object(child) => flatten_into(child, &key, out),
            leaf => {
                out.insert(key, leaf.clone());
            }
        }
    }
}

/// Rebuild the nested object described by a flat mapping.
///
/// Entries are applied in mapping order. When two paths disagree about the shape
/// (`a` is a leaf but `a.b` needs an object, or the other way round), the later
/// entry replaces whatever is in its way.
pub fn unflatten(flat: &FlatMap) -> Map<String, Value> {
    let mut root = Map::new();
    for (key, value) in flat {
        insert_path(&mut root, key, value.clone());
    }
    root
}

fn insert_path(root: &mut Map<String, Value>, key: &str, value: Value) {
    let mut node = root;
    let mut segments = key.split(SEPARATOR).peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            node.insert(segment.to_string(), value);
            return;
        }

        let slot = node
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(child) = slot else {
            return;
        };
        node = child;
    }
}

#[cfg(test)]
mod tests {
    use super::{FlatMap, flatten, flatten_value, unflatten};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn obj(v: Value) -> serde_json::Map<String, Value> {
        v.as_object().cloned().expect("test input is an object")
    }

    #[test]
    fn flatten_joins_nested_keys_with_dots() {
        let flat = flatten(&obj(json!({
            "menu": { "file": { "open": "Open", "save": "Save" } },
            "title": "Editor",
        })));

        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["menu.file.open", "menu.file.save", "title"]);
        assert_eq!(flat["menu.file.save"], json!("Save"));
    }

    #[test]
    fn flatten_treats_arrays_and_null_as_leaves() {
        let flat = flatten(&obj(json!({
            "days": ["Mon", "Tue"],
            "nested": { "items": [{ "a": 1 }] },
            "missing": null,
            "count": 3,
        })));

        assert_eq!(flat["days"], json!(["Mon", "Tue"]));
        assert_eq!(flat["nested.items"], json!([{ "a": 1 }]));
        assert_eq!(flat["missing"], Value::Null);
        assert_eq!(flat["count"], json!(3));
        assert!(flat.values().all(|v| !v.is_object()));
    }

    #[test]
    fn flatten_keys_are_unique_even_for_dotted_names() {
        // "a.b" as a literal name collides with a -> b; the later value wins.
        let flat = flatten(&obj(json!({ "a.b": "literal", "a": { "b": "nested" } })));
        assert_eq!(flat.len(), 1);
        assert_eq!(flat["a.b"], json!("nested"));
    }

    #[test]
    fn unflatten_restores_nesting_and_order() {
        let input = json!({
            "z": "last?",
            "greeting": { "morning": "Good morning", "night": "Good night" },
            "list": [1, 2, 3],
            "deep": { "er": { "est": true } },
        });
        let back = unflatten(&flatten(&obj(input.clone())));
        assert_eq!(Value::Object(back.clone()), input);

        let keys: Vec<&str> = back.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "greeting", "list", "deep"]);
    }

    #[test]
    fn unflatten_conflicts_resolve_last_write_wins() {
        let mut flat = FlatMap::new();
        flat.insert("a".to_string(), json!("leaf"));
        flat.insert("a.b".to_string(), json!("child"));
        assert_eq!(Value::Object(unflatten(&flat)), json!({ "a": { "b": "child" } }));

        let mut flat = FlatMap::new();
        flat.insert("a.b".to_string(), json!("child"));
        flat.insert("a".to_string(), json!("leaf"));
        assert_eq!(Value::Object(unflatten(&flat)), json!({ "a": "leaf" }));
    }

    #[test]
    fn empty_nested_objects_do_not_survive_a_round_trip() {
        let flat = flatten(&obj(json!({ "a": {}, "b": { "c": {} }, "d": "kept" })));
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["d"]);
        assert_eq!(Value::Object(unflatten(&flat)), json!({ "d": "kept" }));
    }

    #[test]
    fn flatten_value_rejects_non_object_roots() {
        assert!(flatten_value(&json!(["a"])).is_none());
        assert!(flatten_value(&json!("text")).is_none());
        assert_eq!(flatten_value(&json!({})), Some(FlatMap::new()));
    }
}
