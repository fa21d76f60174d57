//! Typed Pool Values
//!
//! A [`Segment`] wraps a stored value together with its runtime type, so a
//! stored `null` reads back as [`Segment::None`] rather than as an empty
//! string or as "not found".

use std::fmt;

use serde_json::{Map, Number, Value};

/// Runtime-typed value held by the variable pool.
///
/// Segments are never mutated in place; the pool replaces whole entries.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    None,
    String(String),
    Integer(i64),
    /// Integers above `i64::MAX`
    UnsignedInteger(u64),
    Float(f64),
    Boolean(bool),
    Object(Map<String, Value>),
    ArrayString(Vec<String>),
    ArrayNumber(Vec<Number>),
    ArrayBoolean(Vec<bool>),
    ArrayObject(Vec<Map<String, Value>>),
    /// Empty or mixed arrays
    ArrayAny(Vec<Value>),
}

/// Discriminant of a [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentType {
    None,
    String,
    Integer,
    Float,
    Boolean,
    Object,
    ArrayString,
    ArrayNumber,
    ArrayBoolean,
    ArrayObject,
    ArrayAny,
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::ArrayString => "array[string]",
            Self::ArrayNumber => "array[number]",
            Self::ArrayBoolean => "array[boolean]",
            Self::ArrayObject => "array[object]",
            Self::ArrayAny => "array[any]",
        };
        f.write_str(name)
    }
}

impl Segment {
    /// Wraps a JSON value, picking the narrowest segment type.
    ///
    /// Arrays become typed arrays only when every element has the same
    /// kind; empty and mixed arrays become [`Segment::ArrayAny`].
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::None,
            Value::Bool(b) => Self::Boolean(b),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Self::Integer(i),
                (None, Some(u)) => Self::UnsignedInteger(u),
                (None, None) => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s),
            Value::Object(map) => Self::Object(map),
            Value::Array(items) => Self::from_array(items),
        }
    }

    fn from_array(items: Vec<Value>) -> Self {
        let first = match items.first() {
            Some(first) => first,
            None => return Self::ArrayAny(items),
        };

        let homogeneous = items
            .iter()
            .all(|item| std::mem::discriminant(item) == std::mem::discriminant(first));
        if !homogeneous {
            return Self::ArrayAny(items);
        }

        match first {
            Value::String(_) => Self::ArrayString(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::Number(_) => Self::ArrayNumber(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::Number(n) => Some(n),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::Bool(_) => Self::ArrayBoolean(items.iter().filter_map(Value::as_bool).collect()),
            Value::Object(_) => Self::ArrayObject(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::Object(map) => Some(map),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::Null | Value::Array(_) => Self::ArrayAny(items),
        }
    }

    pub fn segment_type(&self) -> SegmentType {
        match self {
            Self::None => SegmentType::None,
            Self::String(_) => SegmentType::String,
            Self::Integer(_) | Self::UnsignedInteger(_) => SegmentType::Integer,
            Self::Float(_) => SegmentType::Float,
            Self::Boolean(_) => SegmentType::Boolean,
            Self::Object(_) => SegmentType::Object,
            Self::ArrayString(_) => SegmentType::ArrayString,
            Self::ArrayNumber(_) => SegmentType::ArrayNumber,
            Self::ArrayBoolean(_) => SegmentType::ArrayBoolean,
            Self::ArrayObject(_) => SegmentType::ArrayObject,
            Self::ArrayAny(_) => SegmentType::ArrayAny,
        }
    }

    /// Plain JSON form, for re-encoding.
    pub fn to_value(&self) -> Value {
        match self {
            Self::None => Value::Null,
            Self::String(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::from(*i),
            Self::UnsignedInteger(u) => Value::from(*u),
            Self::Float(f) => Value::from(*f),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Object(map) => Value::Object(map.clone()),
            Self::ArrayString(items) => items.iter().map(|s| Value::from(s.as_str())).collect(),
            Self::ArrayNumber(items) => items.iter().cloned().map(Value::Number).collect(),
            Self::ArrayBoolean(items) => items.iter().map(|b| Value::Bool(*b)).collect(),
            Self::ArrayObject(items) => items.iter().cloned().map(Value::Object).collect(),
            Self::ArrayAny(items) => Value::Array(items.clone()),
        }
    }

    /// Text substituted into templates: strings verbatim, `None` as empty,
    /// everything else as compact JSON.
    pub fn text(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::UnsignedInteger(u) => u.to_string(),
            Self::Boolean(b) => b.to_string(),
            other => other.to_value().to_string(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Integer(i) => u64::try_from(*i).ok(),
            Self::UnsignedInteger(u) => Some(*u),
            _ => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl From<Value> for Segment {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Segment {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Segment {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(Segment::from_value(json!(null)), Segment::None);
        assert_eq!(Segment::from_value(json!("")), Segment::String(String::new()));
        assert_eq!(Segment::from_value(json!(0)), Segment::Integer(0));
        assert_eq!(Segment::from_value(json!(false)), Segment::Boolean(false));
        assert_eq!(Segment::from_value(json!(2.5)), Segment::Float(2.5));
    }

    #[test]
    fn test_none_is_distinct_from_empty_string() {
        let none = Segment::from_value(Value::Null);
        let empty = Segment::from_value(json!(""));

        assert!(none.is_none());
        assert_ne!(none.segment_type(), empty.segment_type());
        assert_eq!(none.text(), empty.text());
    }

    #[test]
    fn test_typed_arrays() {
        assert_eq!(
            Segment::from_value(json!(["a", "b"])).segment_type(),
            SegmentType::ArrayString
        );
        assert_eq!(
            Segment::from_value(json!([1, 2.5])).segment_type(),
            SegmentType::ArrayNumber
        );
        assert_eq!(
            Segment::from_value(json!([true])).segment_type(),
            SegmentType::ArrayBoolean
        );
        assert_eq!(
            Segment::from_value(json!([{"id": 1}])).segment_type(),
            SegmentType::ArrayObject
        );
        assert_eq!(Segment::from_value(json!([])).segment_type(), SegmentType::ArrayAny);
        assert_eq!(
            Segment::from_value(json!([1, "a"])).segment_type(),
            SegmentType::ArrayAny
        );
    }

    #[test]
    fn test_to_value_preserves_content() {
        let values = [
            json!(null),
            json!("x"),
            json!(-3),
            json!(u64::MAX),
            json!(1.25),
            json!({"a": {"b": [1, 2]}}),
            json!(["a", "b"]),
            json!([1, 2.5]),
            json!([false, true]),
            json!([{"id": 1}, {"id": 2}]),
            json!([1, "mixed", null]),
        ];

        for value in values {
            assert_eq!(Segment::from_value(value.clone()).to_value(), value);
        }
    }

    #[test]
    fn test_integers_above_i64_stay_exact() {
        let big = Segment::from_value(json!(u64::MAX));

        assert_eq!(big, Segment::UnsignedInteger(u64::MAX));
        assert_eq!(big.segment_type(), SegmentType::Integer);
        assert_eq!(big.text(), "18446744073709551615");
        assert_eq!(big.as_u64(), Some(u64::MAX));
        assert!(big.as_i64().is_none());

        assert_eq!(Segment::from_value(json!(i64::MAX)), Segment::Integer(i64::MAX));
        assert_eq!(Segment::from(7_i64).as_u64(), Some(7));
    }

    #[test]
    fn test_text() {
        assert_eq!(Segment::from("John").text(), "John");
        assert_eq!(Segment::from(25_i64).text(), "25");
        assert_eq!(Segment::from(true).text(), "true");
        assert_eq!(Segment::Float(0.5).text(), "0.5");
        assert_eq!(Segment::from_value(json!({"a": 1})).text(), r#"{"a":1}"#);
        assert_eq!(Segment::from_value(json!(["x", "y"])).to_string(), r#"["x","y"]"#);
    }

    #[test]
    fn test_accessors() {
        let obj = Segment::from_value(json!({"k": "v"}));
        assert_eq!(obj.as_object().unwrap()["k"], "v");
        assert!(obj.as_str().is_none());
        assert_eq!(Segment::from("s").as_str(), Some("s"));
        assert_eq!(Segment::from(7_i64).as_i64(), Some(7));
    }

    #[test]
    fn test_segment_type_display() {
        assert_eq!(SegmentType::ArrayObject.to_string(), "array[object]");
        assert_eq!(SegmentType::None.to_string(), "none");
    }
}
