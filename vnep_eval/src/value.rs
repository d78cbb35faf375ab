use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A concrete value of a scenario generation parameter, e.g. a node resource
/// factor (`0.5`), a number of requests (`40`) or a topology name
/// (`"Geant2012"`).
///
/// Values are totally ordered: numbers come before strings, numbers are
/// compared numerically and strings lexicographically. An integer and a float
/// with the same value are equal, so `1` selects scenarios stored under `1.0`.
#[derive(Clone)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl Ord for ParamValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            (Self::Str(_), _) => Ordering::Greater,
            (_, Self::Str(_)) => Ordering::Less,
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).total_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.total_cmp(&(*b as f64)),
        }
    }
}

impl PartialOrd for ParamValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParamValue {}

impl Hash for ParamValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // equal numbers share their float bits
        match self {
            Self::Str(value) => value.hash(state),
            number => number.as_f64().map(f64::to_bits).hash(state),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{}", value),
            // `Debug` keeps the decimal point, i.e. `1.0` and not `1`
            Self::Float(value) => write!(f, "{:?}", value),
            Self::Str(value) => write!(f, "{}", value),
        }
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => write!(f, "{:?}", value),
            _ => write!(f, "{}", self),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

// Human-readable formats (JSON) store the bare scalar; binary formats (which
// can't drive an untagged deserializer) store the tagged variant.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlainValue {
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Deserialize)]
enum TaggedValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Serialize for ParamValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            match self {
                Self::Int(value) => serializer.serialize_i64(*value),
                Self::Float(value) => serializer.serialize_f64(*value),
                Self::Str(value) => serializer.serialize_str(value),
            }
        } else {
            match self {
                Self::Int(value) => serializer
                    .serialize_newtype_variant("ParamValue", 0, "Int", value),
                Self::Float(value) => serializer
                    .serialize_newtype_variant("ParamValue", 1, "Float", value),
                Self::Str(value) => serializer
                    .serialize_newtype_variant("ParamValue", 2, "Str", value),
            }
        }
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let value = match PlainValue::deserialize(deserializer)? {
                PlainValue::Int(value) => Self::Int(value),
                PlainValue::Float(value) => Self::Float(value),
                PlainValue::Str(value) => Self::Str(value),
            };
            Ok(value)
        } else {
            let value = match TaggedValue::deserialize(deserializer)? {
                TaggedValue::Int(value) => Self::Int(value),
                TaggedValue::Float(value) => Self::Float(value),
                TaggedValue::Str(value) => Self::Str(value),
            };
            Ok(value)
        }
    }
}
