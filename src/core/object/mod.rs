use serde_json::{Map, Value as Json};

/// An untyped (JSON) object, as found at every level of a badge payload.
pub type UntypedObject = Map<String, Json>;

/// Returns the value as an [UntypedObject] if it is a non-null, non-array JSON object.
///
/// This is the base of every structural guard: arrays and `null` never count as objects.
pub fn as_object(value: &Json) -> Option<&UntypedObject> {
    value.as_object()
}

/// Typed reads over an [UntypedObject].
pub trait ObjectExt {
    /// Whether the key is present, regardless of its value.
    fn has(&self, key: &str) -> bool;

    /// The value for `key` if it is a string.
    fn str_field(&self, key: &str) -> Option<&str>;

    /// The value for `key` if it is a string that is not empty.
    fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.str_field(key).filter(|s| !s.is_empty())
    }

    /// The value for `key` if it is an object.
    fn object_field(&self, key: &str) -> Option<&UntypedObject>;

    /// Whether every key in `keys` is present.
    fn has_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|key| self.has(key))
    }
}

impl ObjectExt for UntypedObject {
    fn has(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Json::as_str)
    }

    fn object_field(&self, key: &str) -> Option<&UntypedObject> {
        self.get(key).and_then(as_object)
    }
}

/// Whether the value for `key` is present and carries content.
///
/// Strings must be non-empty; arrays must have at least one element. Any other non-null value
/// counts as present.
pub fn is_present(object: &UntypedObject, key: &str) -> bool {
    match object.get(key) {
        None | Some(Json::Null) => false,
        Some(Json::String(s)) => !s.is_empty(),
        Some(Json::Array(a)) => !a.is_empty(),
        Some(_) => true,
    }
}
