use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A fully decoded JSON value.
///
/// Numbers are always `f64`. Objects keep insertion order; writing an existing
/// key replaces its value and moves the entry to the end. Numbers that are
/// not finite (`1e400` decodes to infinity) serialize as `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(IndexMap<String, JsonValue>),
}

impl JsonValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, JsonValue>> {
        match self {
            JsonValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Looks up `key` when the value is an object.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Compact JSON text for this value.
    pub fn to_json_string(&self) -> Result<String, simd_json::Error> {
        simd_json::to_string(self)
    }

    /// Deserializes the value into any `DeserializeOwned` type.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, simd_json::Error> {
        let owned = simd_json::serde::to_owned_value(self)?;
        simd_json::serde::from_owned_value(owned)
    }
}

/// Writes `key` last-write-wins: the entry ends up at the position of the write.
pub(crate) fn insert_last_write(map: &mut IndexMap<String, JsonValue>, key: String, value: JsonValue) {
    map.shift_remove(&key);
    map.insert(key, value);
}

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(b) => serializer.serialize_bool(*b),
            // JSON has no NaN or infinity.
            JsonValue::Number(n) if !n.is_finite() => serializer.serialize_unit(),
            // Integral numbers go out as integers so typed targets like `u32` accept them.
            JsonValue::Number(n) if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER => {
                if *n >= 0.0 {
                    serializer.serialize_u64(*n as u64)
                } else {
                    serializer.serialize_i64(*n as i64)
                }
            }
            JsonValue::Number(n) => serializer.serialize_f64(*n),
            JsonValue::String(s) => serializer.serialize_str(s),
            JsonValue::Array(items) => serializer.collect_seq(items),
            JsonValue::Object(map) => serializer.collect_map(map),
        }
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Bool(b)
    }
}

impl From<f64> for JsonValue {
    fn from(n: f64) -> Self {
        JsonValue::Number(n)
    }
}

impl From<i64> for JsonValue {
    fn from(n: i64) -> Self {
        JsonValue::Number(n as f64)
    }
}

impl From<i32> for JsonValue {
    fn from(n: i32) -> Self {
        JsonValue::Number(f64::from(n))
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_owned())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        JsonValue::String(s)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(items: Vec<JsonValue>) -> Self {
        JsonValue::Array(items)
    }
}

impl From<IndexMap<String, JsonValue>> for JsonValue {
    fn from(map: IndexMap<String, JsonValue>) -> Self {
        JsonValue::Object(map)
    }
}

impl<K: Into<String>> FromIterator<(K, JsonValue)> for JsonValue {
    fn from_iter<I: IntoIterator<Item = (K, JsonValue)>>(iter: I) -> Self {
        let mut map = IndexMap::new();
        for (key, value) in iter {
            insert_last_write(&mut map, key.into(), value);
        }
        JsonValue::Object(map)
    }
}
