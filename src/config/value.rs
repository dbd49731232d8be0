//! Generic decoded value tree and typed conversions.
//!
//! Every decoded document, whatever its on-disk format, is normalized into
//! [`Value`]. Lookup is by dotted key path; conversion to a concrete Rust
//! type goes through [`FromValue`], an explicit fallible function per target
//! type. There are no blanket "cast to T" shortcuts.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;

/// A node in a decoded configuration document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

impl Value {
    /// Looks up a dotted key path (`"section.inner.key"`).
    ///
    /// Every intermediate segment must be a mapping. Returns `None` when any
    /// segment is absent; an explicit null node is still a present node.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in path.split('.') {
            match current {
                Value::Mapping(map) => current = map.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the variant, used in conversion errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Sequence(_) | Value::Mapping(_) => write!(f, "[{}]", self.type_name()),
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Into::into).collect())
            }
            serde_yaml::Value::Mapping(map) => {
                let mut out = BTreeMap::new();
                for (key, val) in map {
                    // Non-string scalar keys ("1:", "true:") keep their text
                    // form; structured keys have no path rendering and are
                    // dropped.
                    let key = match key {
                        serde_yaml::Value::String(s) => s,
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        serde_yaml::Value::Number(n) => n.to_string(),
                        _ => continue,
                    };
                    out.insert(key, val.into());
                }
                Value::Mapping(out)
            }
            serde_yaml::Value::Tagged(tagged) => tagged.value.into(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Sequence(arr.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Mapping(obj.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(x) => serde_json::Number::from_f64(*x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(seq) => {
                serde_json::Value::Array(seq.iter().map(Into::into).collect())
            }
            Value::Mapping(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.into())).collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(seq: Vec<Value>) -> Self {
        Value::Sequence(seq)
    }
}

/// A failed typed conversion: the offending value's rendering plus the
/// requested target type. The registry attaches the key that was asked for.
#[derive(Debug, Clone)]
pub struct ConversionError {
    pub value: String,
    pub target: &'static str,
}

impl ConversionError {
    fn new(value: &Value, target: &'static str) -> Self {
        Self {
            value: value.to_string(),
            target,
        }
    }
}

/// Fallible conversion out of a decoded [`Value`].
///
/// Numeric conversions follow the decoder's native scalar types: an integer
/// literal converts to any requested numeric width, but a string never
/// implicitly converts to a number. Boolean parsing is the one permissive
/// case, accepting the fixed literal sets (`"yes"`, `"on"`, `"1"`, ...).
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ConversionError>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => Ok(value.to_string()),
            _ => Err(ConversionError::new(value, "string")),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        let text = String::from_value(value)
            .map_err(|_| ConversionError::new(value, "boolean"))?;
        match text.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(ConversionError {
                value: text,
                target: "boolean",
            }),
        }
    }
}

fn float_to_i64(x: f64) -> Option<i64> {
    if x.fract() == 0.0 && x >= i64::MIN as f64 && x <= i64::MAX as f64 {
        Some(x as i64)
    } else {
        None
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Int(i) => Ok(*i),
            Value::Float(x) => {
                float_to_i64(*x).ok_or_else(|| ConversionError::new(value, "long"))
            }
            _ => Err(ConversionError::new(value, "long")),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        let wide = i64::from_value(value)
            .map_err(|_| ConversionError::new(value, "integer"))?;
        i32::try_from(wide).map_err(|_| ConversionError::new(value, "integer"))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float(x) => Ok(*x),
            Value::Int(i) => Ok(*i as f64),
            _ => Err(ConversionError::new(value, "double")),
        }
    }
}

impl FromValue for Decimal {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Int(i) => Ok(Decimal::from(*i)),
            Value::Float(x) => {
                Decimal::try_from(*x).map_err(|_| ConversionError::new(value, "decimal"))
            }
            _ => Err(ConversionError::new(value, "decimal")),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Sequence(seq) => seq.iter().map(T::from_value).collect(),
            _ => Err(ConversionError::new(value, "list")),
        }
    }
}

impl FromValue for BTreeMap<String, Value> {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        value
            .as_mapping()
            .cloned()
            .ok_or_else(|| ConversionError::new(value, "mapping"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str::<serde_yaml::Value>(text).unwrap().into()
    }

    #[test]
    fn test_path_lookup_nested() {
        let tree = yaml("more config keys:\n  inner: inner value\n");
        assert_eq!(
            tree.get_path("more config keys.inner"),
            Some(&Value::String("inner value".into()))
        );
    }

    #[test]
    fn test_path_lookup_absent() {
        let tree = yaml("a:\n  b: 1\n");
        assert!(tree.get_path("a.c").is_none());
        assert!(tree.get_path("a.b.c").is_none());
        assert!(tree.get_path("z").is_none());
    }

    #[test]
    fn test_null_node_is_present() {
        let tree = yaml("a:\n  b:\n");
        assert_eq!(tree.get_path("a.b"), Some(&Value::Null));
    }

    #[test]
    fn test_boolean_literal_sets() {
        for text in ["YES", "On", "1", "true", "TRUE"] {
            let value = Value::String(text.into());
            assert!(bool::from_value(&value).unwrap(), "{text} should be true");
        }
        for text in ["no", "Off", "0", "FALSE"] {
            let value = Value::String(text.into());
            assert!(!bool::from_value(&value).unwrap(), "{text} should be false");
        }

        let err = bool::from_value(&Value::String("maybe".into())).unwrap_err();
        assert_eq!(err.value, "maybe");
        assert_eq!(err.target, "boolean");
    }

    #[test]
    fn test_boolean_from_native_scalars() {
        assert!(bool::from_value(&Value::Bool(true)).unwrap());
        assert!(bool::from_value(&Value::Int(1)).unwrap());
        assert!(!bool::from_value(&Value::Int(0)).unwrap());
    }

    #[test]
    fn test_string_renders_scalars() {
        assert_eq!(String::from_value(&Value::Int(1)).unwrap(), "1");
        assert_eq!(String::from_value(&Value::Bool(false)).unwrap(), "false");
        assert!(String::from_value(&Value::Sequence(vec![])).is_err());
    }

    #[test]
    fn test_string_never_converts_to_number() {
        let value = Value::String("1".into());
        assert!(i32::from_value(&value).is_err());
        assert!(i64::from_value(&value).is_err());
        assert!(f64::from_value(&value).is_err());
        assert!(Decimal::from_value(&value).is_err());
    }

    #[test]
    fn test_numeric_widths() {
        assert_eq!(i32::from_value(&Value::Int(7)).unwrap(), 7);
        assert_eq!(i64::from_value(&Value::Int(7)).unwrap(), 7);
        assert_eq!(f64::from_value(&Value::Int(7)).unwrap(), 7.0);
        assert_eq!(Decimal::from_value(&Value::Int(7)).unwrap(), Decimal::from(7));

        // Out of i32 range, still a valid long.
        let big = Value::Int(i64::from(i32::MAX) + 1);
        assert!(i32::from_value(&big).is_err());
        assert!(i64::from_value(&big).is_ok());
    }

    #[test]
    fn test_integral_floats() {
        assert_eq!(i64::from_value(&Value::Float(3.0)).unwrap(), 3);
        assert!(i64::from_value(&Value::Float(3.5)).is_err());
    }

    #[test]
    fn test_list_conversion_is_elementwise() {
        let seq = Value::Sequence(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(Vec::<i64>::from_value(&seq).unwrap(), vec![1, 2]);

        let mixed = Value::Sequence(vec![Value::Int(1), Value::String("x".into())]);
        assert!(Vec::<i64>::from_value(&mixed).is_err());
        // Stringy elements render fine the other way around.
        assert_eq!(
            Vec::<String>::from_value(&mixed).unwrap(),
            vec!["1".to_owned(), "x".to_owned()]
        );
    }

    #[test]
    fn test_yaml_scalar_keys_are_stringified() {
        let tree = yaml("1: one\ntrue: yes please\n");
        assert_eq!(tree.get_path("1"), Some(&Value::String("one".into())));
        assert_eq!(tree.get_path("true"), Some(&Value::String("yes please".into())));
    }

    #[test]
    fn test_json_round_trips_through_bridge() {
        let tree = yaml("a:\n  b: 2\n  c: [1, 2]\n");
        let json = serde_json::Value::from(&tree);
        assert_eq!(json["a"]["b"], serde_json::json!(2));
        assert_eq!(Value::from(json), tree);
    }
}
