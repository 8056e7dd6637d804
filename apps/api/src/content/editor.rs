//! Tree form editor — pure, snapshot-in / snapshot-out edits over section
//! trees.
//!
//! Every operation takes the current tree by reference and returns a freshly
//! built tree; the input snapshot is never mutated, so callers can keep old
//! snapshots around for undo or for diffing against the last saved state.
//!
//! Writes create missing intermediate objects on the way down. Array indexes
//! are strict: setting or removing an item past the current length is a
//! caller bug and fails with `IndexOutOfRange` — append via `add_item`, never
//! by writing one past the end.

use serde_json::{Map, Value};

use crate::content::path::EditPath;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeEditError {
    #[error("index {index} is out of range at '{path}' (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("segment '{segment}' of '{path}' cannot index into a {found}")]
    TypeMismatch {
        path: String,
        segment: String,
        found: &'static str,
    },

    #[error("path '{0}' does not exist")]
    MissingPath(String),
}

/// Sets the leaf addressed by `path` to `value`, creating intermediate empty
/// objects for missing segments. Total over well-formed paths into
/// object-shaped trees; only traversing through an existing scalar or
/// indexing an array out of range can fail.
pub fn set_field(tree: &Value, path: &EditPath, value: Value) -> Result<Value, TreeEditError> {
    let mut next = materialize_root(tree);
    {
        let (parents, leaf) = split_leaf(path);
        let parent = descend(&mut next, parents, path, true)?;
        write_leaf(parent, leaf, value, path)?;
    }
    Ok(next)
}

/// Replaces the element at `index` in the array addressed by `path`. The
/// array is created empty if absent, so an index into a just-created array
/// always fails — by design the editor appends first, then edits in place.
pub fn set_array_item(
    tree: &Value,
    path: &EditPath,
    index: usize,
    value: Value,
) -> Result<Value, TreeEditError> {
    let mut next = materialize_root(tree);
    {
        let items = array_at(&mut next, path, true)?;
        let len = items.len();
        let slot = items
            .get_mut(index)
            .ok_or_else(|| TreeEditError::IndexOutOfRange {
                path: path.to_string(),
                index,
                len,
            })?;
        *slot = value;
    }
    Ok(next)
}

/// Appends `item` to the array addressed by `path`, creating it if absent.
pub fn add_item(tree: &Value, path: &EditPath, item: Value) -> Result<Value, TreeEditError> {
    let mut next = materialize_root(tree);
    array_at(&mut next, path, true)?.push(item);
    Ok(next)
}

/// Removes the element at `index` from the array addressed by `path`.
/// An invalid index is a caller bug and is reported, never swallowed.
pub fn remove_item(tree: &Value, path: &EditPath, index: usize) -> Result<Value, TreeEditError> {
    let mut next = materialize_root(tree);
    {
        let items = array_at(&mut next, path, false)?;
        let len = items.len();
        if index >= len {
            return Err(TreeEditError::IndexOutOfRange {
                path: path.to_string(),
                index,
                len,
            });
        }
        items.remove(index);
    }
    Ok(next)
}

/// Reads the value at `path`, if present. Used by handlers to echo an edited
/// leaf back and by tests to verify writes.
pub fn get<'a>(tree: &'a Value, path: &EditPath) -> Option<&'a Value> {
    let mut current = tree;
    for segment in path.segments() {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

// A null or missing section root behaves like an empty object, so the first
// edit into a fresh section does not need special-casing by callers.
fn materialize_root(tree: &Value) -> Value {
    match tree {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    }
}

fn split_leaf(path: &EditPath) -> (&[String], &str) {
    let segments = path.segments();
    let (leaf, parents) = segments.split_last().expect("EditPath is never empty");
    (parents, leaf.as_str())
}

fn descend<'a>(
    root: &'a mut Value,
    segments: &[String],
    path: &EditPath,
    create: bool,
) -> Result<&'a mut Value, TreeEditError> {
    let mut current = root;
    for segment in segments {
        current = step(current, segment, path, create)?;
    }
    Ok(current)
}

fn step<'a>(
    node: &'a mut Value,
    segment: &str,
    path: &EditPath,
    create: bool,
) -> Result<&'a mut Value, TreeEditError> {
    match node {
        Value::Object(map) => {
            if create {
                let slot = map
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if slot.is_null() {
                    *slot = Value::Object(Map::new());
                }
                Ok(slot)
            } else {
                map.get_mut(segment)
                    .ok_or_else(|| TreeEditError::MissingPath(path.to_string()))
            }
        }
        Value::Array(items) => {
            let index =
                segment
                    .parse::<usize>()
                    .map_err(|_| TreeEditError::TypeMismatch {
                        path: path.to_string(),
                        segment: segment.to_string(),
                        found: "array",
                    })?;
            let len = items.len();
            items
                .get_mut(index)
                .ok_or(TreeEditError::IndexOutOfRange {
                    path: path.to_string(),
                    index,
                    len,
                })
        }
        other => Err(TreeEditError::TypeMismatch {
            path: path.to_string(),
            segment: segment.to_string(),
            found: json_kind(other),
        }),
    }
}

fn write_leaf(
    parent: &mut Value,
    leaf: &str,
    value: Value,
    path: &EditPath,
) -> Result<(), TreeEditError> {
    match parent {
        Value::Object(map) => {
            map.insert(leaf.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = leaf
                .parse::<usize>()
                .map_err(|_| TreeEditError::TypeMismatch {
                    path: path.to_string(),
                    segment: leaf.to_string(),
                    found: "array",
                })?;
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or(TreeEditError::IndexOutOfRange {
                    path: path.to_string(),
                    index,
                    len,
                })?;
            *slot = value;
            Ok(())
        }
        other => Err(TreeEditError::TypeMismatch {
            path: path.to_string(),
            segment: leaf.to_string(),
            found: json_kind(other),
        }),
    }
}

// Resolves the array addressed by the full path, optionally creating it
// (and any intermediate objects) when absent.
fn array_at<'a>(
    root: &'a mut Value,
    path: &EditPath,
    create: bool,
) -> Result<&'a mut Vec<Value>, TreeEditError> {
    let (parents, leaf) = split_leaf(path);
    let parent = descend(root, parents, path, create)?;
    let slot = match parent {
        Value::Object(map) => {
            if create {
                let slot = map
                    .entry(leaf.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if slot.is_null() {
                    *slot = Value::Array(Vec::new());
                }
                slot
            } else {
                map.get_mut(leaf)
                    .ok_or_else(|| TreeEditError::MissingPath(path.to_string()))?
            }
        }
        Value::Array(items) => {
            let index = leaf
                .parse::<usize>()
                .map_err(|_| TreeEditError::TypeMismatch {
                    path: path.to_string(),
                    segment: leaf.to_string(),
                    found: "array",
                })?;
            let len = items.len();
            items
                .get_mut(index)
                .ok_or(TreeEditError::IndexOutOfRange {
                    path: path.to_string(),
                    index,
                    len,
                })?
        }
        other => {
            return Err(TreeEditError::TypeMismatch {
                path: path.to_string(),
                segment: leaf.to_string(),
                found: json_kind(other),
            })
        }
    };
    match slot {
        Value::Array(items) => Ok(items),
        other => Err(TreeEditError::TypeMismatch {
            path: path.to_string(),
            segment: leaf.to_string(),
            found: json_kind(other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> EditPath {
        EditPath::parse(raw).unwrap()
    }

    #[test]
    fn test_set_field_leaves_input_untouched() {
        let tree = json!({"personalInfo": {"name": "Old"}});
        let before = tree.clone();
        let next = set_field(&tree, &path("personalInfo.name"), json!("Jane")).unwrap();
        assert_eq!(tree, before);
        assert_eq!(next["personalInfo"]["name"], "Jane");
    }

    #[test]
    fn test_set_field_read_back() {
        let tree = json!({});
        let p = path("socialLinks.github");
        let next = set_field(&tree, &p, json!("https://github.com/jane")).unwrap();
        assert_eq!(get(&next, &p), Some(&json!("https://github.com/jane")));
    }

    #[test]
    fn test_set_field_creates_intermediate_objects() {
        let tree = json!({});
        let next = set_field(&tree, &path("a.b.c"), json!(1)).unwrap();
        assert_eq!(next, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_set_field_is_idempotent() {
        let tree = json!({"skills": ["Rust"]});
        let p = path("title");
        let once = set_field(&tree, &p, json!("About")).unwrap();
        let twice = set_field(&once, &p, json!("About")).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_set_field_through_array_index() {
        let tree = json!({"jobs": [{"title": "Dev"}, {"title": "Lead"}]});
        let next = set_field(&tree, &path("jobs.1.title"), json!("Staff")).unwrap();
        assert_eq!(next["jobs"][1]["title"], "Staff");
        assert_eq!(next["jobs"][0]["title"], "Dev");
    }

    #[test]
    fn test_set_field_null_root_behaves_like_empty_object() {
        let next = set_field(&Value::Null, &path("title"), json!("Hi")).unwrap();
        assert_eq!(next, json!({"title": "Hi"}));
    }

    #[test]
    fn test_set_field_rejects_traversal_through_scalar() {
        let tree = json!({"title": "About"});
        let err = set_field(&tree, &path("title.nested"), json!(1)).unwrap_err();
        assert!(matches!(err, TreeEditError::TypeMismatch { .. }));
    }

    #[test]
    fn test_set_array_item_replaces_in_place() {
        let tree = json!({"skills": ["Rust", "Go"]});
        let next = set_array_item(&tree, &path("skills"), 1, json!("TypeScript")).unwrap();
        assert_eq!(next, json!({"skills": ["Rust", "TypeScript"]}));
        assert_eq!(tree, json!({"skills": ["Rust", "Go"]}));
    }

    #[test]
    fn test_set_array_item_never_pads() {
        let tree = json!({"skills": ["Rust"]});
        let err = set_array_item(&tree, &path("skills"), 1, json!("Go")).unwrap_err();
        assert_eq!(
            err,
            TreeEditError::IndexOutOfRange {
                path: "skills".into(),
                index: 1,
                len: 1,
            }
        );
    }

    #[test]
    fn test_add_item_creates_missing_array() {
        let tree = json!({});
        let next = add_item(&tree, &path("skills"), json!("Rust")).unwrap();
        assert_eq!(next, json!({"skills": ["Rust"]}));
    }

    #[test]
    fn test_add_then_remove_restores_original() {
        let tree = json!({"skills": ["Rust", "Go"]});
        let p = path("skills");
        let added = add_item(&tree, &p, json!("Zig")).unwrap();
        let removed = remove_item(&added, &p, 2).unwrap();
        assert_eq!(removed, tree);
    }

    #[test]
    fn test_remove_item_out_of_range_fails_without_side_effects() {
        let tree = json!({"skills": ["Rust"]});
        let before = tree.clone();
        let err = remove_item(&tree, &path("skills"), 3).unwrap_err();
        assert!(matches!(err, TreeEditError::IndexOutOfRange { index: 3, .. }));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_remove_item_missing_array_is_an_error() {
        let tree = json!({});
        let err = remove_item(&tree, &path("skills"), 0).unwrap_err();
        assert!(matches!(err, TreeEditError::MissingPath(_)));
    }

    #[test]
    fn test_remove_item_on_nested_array() {
        let tree = json!({"experience": {"jobs": [{"t": 1}, {"t": 2}]}});
        let next = remove_item(&tree, &path("experience.jobs"), 0).unwrap();
        assert_eq!(next, json!({"experience": {"jobs": [{"t": 2}]}}));
    }

    #[test]
    fn test_add_item_to_scalar_is_type_mismatch() {
        let tree = json!({"title": "About"});
        let err = add_item(&tree, &path("title"), json!("x")).unwrap_err();
        assert!(matches!(err, TreeEditError::TypeMismatch { .. }));
    }

    #[test]
    fn test_get_missing_path() {
        let tree = json!({"a": {"b": 1}});
        assert_eq!(get(&tree, &path("a.c")), None);
        assert_eq!(get(&tree, &path("a.b")), Some(&json!(1)));
    }
}
