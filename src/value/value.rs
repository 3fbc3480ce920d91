//! Core value types and operations.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Value represents a decoded YAML/JSON node.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`.
    Uint(u64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
}

/// Map represents a mapping with unique keys, kept in sorted order.
///
/// Fields are addressed by the text of their key. Keys decoded as booleans
/// or integers (`80: http`) remember their scalar so they encode back
/// unquoted.
#[derive(Debug, Clone, Default)]
pub struct Map {
    pub fields: BTreeMap<String, Value>,
    scalar_keys: BTreeMap<String, Value>,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Uint(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns a short name for the kind of node, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::Uint(_) | Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "sequence",
            Value::Map(_) => "mapping",
        }
    }

    /// Renders the value as plain text for selector matching.
    ///
    /// Scalars render without quotes (`n1`, `15014`, `true`), null renders
    /// as the empty string and collections render as compact JSON. Floats
    /// use the shortest form, so `1.0` renders as `1`.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Uint(u) => u.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::List(_) | Value::Map(_) => serde_json::to_string(self).unwrap_or_default(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Int(a), Value::Uint(b)) | (Value::Uint(b), Value::Int(a)) => {
                u64::try_from(*a).is_ok_and(|a| a == *b)
            }
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Uint(a), Value::Float(b)) | (Value::Float(b), Value::Uint(a)) => {
                (*a as f64) == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Uint(u),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl Map {
    pub fn new() -> Self {
        Map::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    /// Sets `key` to `value`, returning the previous value if there was one.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.scalar_keys.remove(key);
        self.fields.remove(key)
    }

    /// Inserts a field under a decoded key. Boolean and integer keys keep
    /// their scalar; other scalars are addressed and encoded as text.
    fn insert_decoded(&mut self, key: Value, value: Value) -> Result<(), &'static str> {
        let text = match &key {
            Value::String(s) => s.clone(),
            Value::List(_) | Value::Map(_) => return Err("mapping keys must be scalars"),
            other => other.to_text(),
        };
        match key {
            Value::Bool(_) | Value::Int(_) | Value::Uint(_) => {
                self.scalar_keys.insert(text.clone(), key);
            }
            _ => {
                self.scalar_keys.remove(&text);
            }
        }
        self.fields.insert(text, value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Writes every field of `other` into this map, overwriting fields that
    /// already exist and leaving the rest untouched.
    pub fn merge_shallow(&mut self, other: Map) {
        self.scalar_keys.extend(other.scalar_keys);
        self.fields.extend(other.fields);
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Serialize for Map {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            match self.scalar_keys.get(key) {
                Some(scalar) => map.serialize_entry(scalar, value)?,
                None => map.serialize_entry(key, value)?,
            }
        }
        map.end()
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Map {
            fields: iter.into_iter().collect(),
            scalar_keys: BTreeMap::new(),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for Map {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Map(m) => Ok(m),
            Value::Null => Ok(Map::new()),
            other => Err(de::Error::custom(format!(
                "expected a mapping, got {}",
                other.type_name()
            ))),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML or JSON value")
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = Map::new();
        while let Some(key) = access.next_key::<Value>()? {
            let value = access.next_value::<Value>()?;
            map.insert_decoded(key, value).map_err(de::Error::custom)?;
        }
        Ok(Value::Map(map))
    }
}

/// Parse a value from JSON.
pub fn from_json(json: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize a value to JSON.
pub fn to_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Parse a value from YAML.
pub fn from_yaml(yaml: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Serialize a value to YAML.
pub fn to_yaml(value: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert!(Value::Null.is_null());
        assert!(Value::Bool(true).is_bool());
        assert!(Value::Int(42).is_int());
        assert!(Value::Float(3.5).is_float());
        assert!(Value::String("hello".into()).is_string());
        assert!(Value::List(vec![]).is_list());
        assert!(Value::Map(Map::new()).is_map());
    }

    #[test]
    fn test_map_operations() {
        let mut map = Map::new();
        assert!(map.is_empty());

        map.set("key", Value::from("value"));
        assert!(map.has("key"));
        assert_eq!(map.get("key"), Some(&Value::from("value")));

        map.delete("key");
        assert!(!map.has("key"));
    }

    #[test]
    fn test_merge_shallow_keeps_unmentioned_fields() {
        let mut base: Map = [
            ("name".to_string(), Value::from("n1")),
            ("value".to_string(), Value::from("v1")),
        ]
        .into_iter()
        .collect();
        let patch: Map = [
            ("value".to_string(), Value::from("v2")),
            ("extra".to_string(), Value::Int(3)),
        ]
        .into_iter()
        .collect();

        base.merge_shallow(patch);
        assert_eq!(base.get("name"), Some(&Value::from("n1")));
        assert_eq!(base.get("value"), Some(&Value::from("v2")));
        assert_eq!(base.get("extra"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_to_text() {
        assert_eq!(Value::from("n1").to_text(), "n1");
        assert_eq!(Value::Int(15014).to_text(), "15014");
        assert_eq!(Value::Bool(false).to_text(), "false");
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::Uint(u64::MAX).to_text(), "18446744073709551615");
        assert_eq!(Value::Float(1.0).to_text(), "1");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::from("a")]).to_text(),
            r#"[1,"a"]"#
        );
    }

    #[test]
    fn test_yaml_decoding_keeps_scalar_types() {
        let v = from_yaml("a: 1\nb: 1.5\nc: true\nd: ~\ne: \"15\"\n80: http\n").unwrap();
        let m = v.as_map().unwrap();
        assert_eq!(m.get("a"), Some(&Value::Int(1)));
        assert_eq!(m.get("b"), Some(&Value::Float(1.5)));
        assert_eq!(m.get("c"), Some(&Value::Bool(true)));
        assert_eq!(m.get("d"), Some(&Value::Null));
        assert_eq!(m.get("e"), Some(&Value::from("15")));
        assert_eq!(m.get("80"), Some(&Value::from("http")));
    }

    #[test]
    fn test_large_integers_stay_integers() {
        let v = from_yaml("big: 18446744073709551615\nsmall: 9223372036854775807\n").unwrap();
        let m = v.as_map().unwrap();
        assert_eq!(m.get("big"), Some(&Value::Uint(u64::MAX)));
        assert_eq!(m.get("small"), Some(&Value::Int(i64::MAX)));
        assert_eq!(m.get("big").unwrap().type_name(), "number");
        assert_eq!(
            to_yaml(&v).unwrap(),
            "big: 18446744073709551615\nsmall: 9223372036854775807\n"
        );
        assert_eq!(Value::from(42u64), Value::Int(42));
        assert_eq!(Value::Int(7), Value::Uint(7));
    }

    #[test]
    fn test_scalar_keys_encode_unquoted() {
        let v = from_yaml("80: http\ntrue: enabled\n'443': https\nname: x\n").unwrap();
        let m = v.as_map().unwrap();
        assert_eq!(m.get("80"), Some(&Value::from("http")));
        assert_eq!(m.get("true"), Some(&Value::from("enabled")));
        assert_eq!(
            to_yaml(&v).unwrap(),
            "'443': https\n80: http\nname: x\ntrue: enabled\n"
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let mut m = Map::new();
        m.set("name", Value::from("test"));
        m.set("count", Value::Int(42));
        let value = Value::Map(m);

        let json = to_json(&value).unwrap();
        assert_eq!(json, r#"{"count":42,"name":"test"}"#);
        assert_eq!(from_json(&json).unwrap(), value);
    }
}
