//! Recursive value merging.
//!
//! [`replace_recursive`] layers one JSON value over another with override
//! precedence: when both sides are objects their keys are merged recursively,
//! otherwise the override replaces the base outright. Arrays and scalars are
//! never merged element-wise.
//!
//! ```rust
//! use optpage::merge::replace_recursive;
//! use serde_json::json;
//!
//! let base = json!({"title": "Old", "boxes": {"side": "side", "normal": "normal"}});
//! let over = json!({"title": "New", "boxes": {"side": "normal"}});
//!
//! let merged = replace_recursive(base, over);
//! assert_eq!(
//!     merged,
//!     json!({"title": "New", "boxes": {"side": "normal", "normal": "normal"}})
//! );
//! ```

use serde_json::Value;

/// Merges `over` onto `base`, returning the combined value.
pub fn replace_recursive(mut base: Value, over: Value) -> Value {
    merge_into(&mut base, over);
    base
}

/// In-place form of [`replace_recursive`].
pub fn merge_into(base: &mut Value, over: Value) {
    match (base, over) {
        (Value::Object(base_map), Value::Object(over_map)) => {
            for (key, over_value) in over_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_into(existing, over_value),
                    None => {
                        base_map.insert(key, over_value);
                    }
                }
            }
        }
        (slot, over) => *slot = over,
    }
}
