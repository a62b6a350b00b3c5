//! Generic value model shared by the loader, the converter and the registry

use crate::{Error, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// String-keyed mapping of values
pub type Map = BTreeMap<String, Value>;

/// Largest magnitude at which every integer is exactly representable in an f64
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A language-agnostic config value
///
/// Every script number becomes [`Value::Number`]; there is no separate
/// integer variant. [`Value::Sequence`] is only produced when array
/// conversion is enabled for a load.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Double precision number
    Number(f64),
    /// String value
    String(String),
    /// Ordered list of values
    Sequence(Vec<Value>),
    /// Map of string keys to values
    Map(Map),
}

impl Value {
    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Map(_) => "map",
        }
    }

    fn type_error(&self, expected: &str) -> Error {
        Error::TypeError {
            expected: expected.to_string(),
            actual: self.type_name().to_string(),
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(self.type_error("bool")),
        }
    }

    /// Try to get as f64
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            _ => Err(self.type_error("number")),
        }
    }

    /// Try to get as i64, truncating any fractional part
    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Value::Number(n) if n.is_finite() => Ok(*n as i64),
            Value::Number(n) => Err(Error::InvalidValue(format!("{} is not an integer", n))),
            _ => Err(self.type_error("number")),
        }
    }

    /// Try to get as u32
    pub fn as_u32(&self) -> Result<u32> {
        let i = self.as_i64()?;
        u32::try_from(i).map_err(|_| Error::InvalidValue(format!("value {} out of u32 range", i)))
    }

    /// Try to get as string
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s.as_str()),
            _ => Err(self.type_error("string")),
        }
    }

    /// Try to get as sequence
    pub fn as_sequence(&self) -> Result<&[Value]> {
        match self {
            Value::Sequence(items) => Ok(items.as_slice()),
            _ => Err(self.type_error("sequence")),
        }
    }

    /// Try to get as map
    pub fn as_map(&self) -> Result<&Map> {
        match self {
            Value::Map(map) => Ok(map),
            _ => Err(self.type_error("map")),
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Build a value from any serializable host value.
    ///
    /// Fails with [`Error::Conversion`] for shapes the model cannot hold,
    /// such as maps keyed by structs.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let json =
            serde_json::to_value(value).map_err(|e| Error::conversion("host", e.to_string()))?;
        Ok(Value::from(json))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            // Integral numbers go out as integers so typed decoding into
            // integer fields accepts them
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(items) => items.serialize(serializer),
            Value::Map(map) => map.serialize(serializer),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

// Conversion from common types

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Number(i as f64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(i as f64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Number(i as f64)
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        Value::Number(i as f64)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Number(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Sequence(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        let v = Value::from(42i32);
        assert_eq!(v, Value::Number(42.0));
        assert_eq!(v.as_i64().unwrap(), 42);
        assert_eq!(v.as_u32().unwrap(), 42);
        assert_eq!(v.as_f64().unwrap(), 42.0);

        let v = Value::from(3.5f64);
        assert_eq!(v.as_i64().unwrap(), 3);

        let v = Value::from("hello");
        assert_eq!(v.as_str().unwrap(), "hello");

        let v = Value::from(true);
        assert!(v.as_bool().unwrap());

        assert!(Value::from(None::<bool>).is_null());
    }

    #[test]
    fn test_type_errors() {
        let v = Value::from("string");
        assert!(v.as_i64().is_err());
        assert!(v.as_bool().is_err());
        assert!(matches!(
            v.as_map(),
            Err(Error::TypeError { ref expected, ref actual }) if expected == "map" && actual == "string"
        ));
    }

    #[test]
    fn test_u32_range() {
        assert!(matches!(
            Value::from(-1).as_u32(),
            Err(Error::InvalidValue(_))
        ));
        assert!(Value::Number(f64::INFINITY).as_i64().is_err());
    }

    #[test]
    fn test_serialize_integral_numbers_as_integers() {
        let mut map = Map::new();
        map.insert("port".into(), Value::from(8080));
        map.insert("ratio".into(), Value::from(0.5));
        map.insert("hosts".into(), Value::from(vec!["a", "b"]));
        map.insert("none".into(), Value::Null);

        let json = serde_json::to_string(&Value::Map(map)).unwrap();
        assert_eq!(
            json,
            r#"{"hosts":["a","b"],"none":null,"port":8080,"ratio":0.5}"#
        );
    }

    #[test]
    fn test_deserialize_untagged() {
        let v: Value = serde_json::from_str(r#"{"a":[1,"two",true],"b":null}"#).unwrap();
        let map = v.as_map().unwrap();
        assert_eq!(
            map["a"],
            Value::Sequence(vec![
                Value::Number(1.0),
                Value::from("two"),
                Value::Bool(true)
            ])
        );
        assert!(map["b"].is_null());
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Limits {
            retries: u8,
            names: Vec<&'static str>,
        }

        let v = Value::from_serialize(&Limits {
            retries: 3,
            names: vec!["x"],
        })
        .unwrap();
        let map = v.as_map().unwrap();
        assert_eq!(map["retries"], Value::Number(3.0));
        assert_eq!(map["names"], Value::from(vec!["x"]));
    }

    #[test]
    fn test_from_serialize_rejects_non_string_keys() {
        let mut bad = std::collections::HashMap::new();
        bad.insert((1, 2), "pair");
        assert!(matches!(
            Value::from_serialize(&bad),
            Err(Error::Conversion { .. })
        ));
    }
}
