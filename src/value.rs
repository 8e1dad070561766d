//! Type-erased equatable values
//!
//! Trace items carry payloads of heterogeneous kinds (an event name, a list
//! of experiment flags, a property map) that must be comparable for equality
//! without losing type identity. [`TraceValue`] is a closed tagged union over
//! the supported kinds; comparing values of different kinds is defined as
//! `false`, never an error, so equality stays total.
//!
//! Application-defined payload types plug in through the
//! [`CustomEquatable`] trait, which pairs a downcast-based equality check
//! with a rendering used in logs and reports. Two custom values of different
//! concrete Rust types always compare unequal.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// An application-defined payload type usable inside a [`TraceValue`]
///
/// Implementors supply equality against the erased trait object by
/// downcasting; a mismatched concrete type compares as not-equal:
///
/// ```rust
/// use std::any::Any;
/// use tracekit::CustomEquatable;
///
/// #[derive(Debug, PartialEq)]
/// struct UserProperty { key: String, value: String }
///
/// impl CustomEquatable for UserProperty {
///     fn as_any(&self) -> &dyn Any { self }
///     fn eq_value(&self, other: &dyn CustomEquatable) -> bool {
///         other.as_any().downcast_ref::<Self>() == Some(self)
///     }
/// }
/// ```
pub trait CustomEquatable: fmt::Debug + Send + Sync + 'static {
    /// Upcast used by implementors to downcast `other` in [`eq_value`]
    ///
    /// [`eq_value`]: CustomEquatable::eq_value
    fn as_any(&self) -> &dyn Any;

    /// Whether `other` wraps an equal value of the same concrete type
    fn eq_value(&self, other: &dyn CustomEquatable) -> bool;

    /// A rendering of the value for logs and reports
    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

/// A value of any supported equatable kind
///
/// Allows heterogeneous collections of comparable payloads, e.g.:
///
/// ```rust
/// use tracekit::TraceValue;
///
/// let values = vec![
///     TraceValue::from("string"),
///     TraceValue::from(vec![TraceValue::from("a"), TraceValue::from("b")]),
///     TraceValue::from(true),
/// ];
/// assert_eq!(values[0], TraceValue::from("string"));
/// assert_ne!(values[0], values[2]); // different kinds are unequal, not an error
/// ```
#[derive(Debug, Clone)]
pub enum TraceValue {
    /// A UTF-8 string
    String(String),
    /// A signed integer
    Integer(i64),
    /// A boolean
    Boolean(bool),
    /// An ordered sequence; equality is order-sensitive
    Sequence(Vec<TraceValue>),
    /// An unordered collection; equality ignores element order
    Set(Vec<TraceValue>),
    /// A string-keyed map
    Map(BTreeMap<String, TraceValue>),
    /// An opaque application-defined equatable value
    Custom(Arc<dyn CustomEquatable>),
}

impl TraceValue {
    /// Wraps the elements as an unordered collection
    pub fn set(values: Vec<TraceValue>) -> Self {
        TraceValue::Set(values)
    }

    /// Wraps an application-defined equatable value
    pub fn custom<T: CustomEquatable>(value: T) -> Self {
        TraceValue::Custom(Arc::new(value))
    }

    /// A rendering of the contained value for logs and reports
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for TraceValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TraceValue::String(a), TraceValue::String(b)) => a == b,
            (TraceValue::Integer(a), TraceValue::Integer(b)) => a == b,
            (TraceValue::Boolean(a), TraceValue::Boolean(b)) => a == b,
            (TraceValue::Sequence(a), TraceValue::Sequence(b)) => a == b,
            (TraceValue::Set(a), TraceValue::Set(b)) => unordered_eq(a, b),
            (TraceValue::Map(a), TraceValue::Map(b)) => a == b,
            (TraceValue::Custom(a), TraceValue::Custom(b)) => a.eq_value(b.as_ref()),
            // Different kinds are unequal by definition
            _ => false,
        }
    }
}

impl Eq for TraceValue {}

/// Multiset equality: every element pairs off with an equal partner
fn unordered_eq(lhs: &[TraceValue], rhs: &[TraceValue]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }
    let mut claimed = vec![false; rhs.len()];
    for value in lhs {
        let partner = rhs
            .iter()
            .enumerate()
            .find(|(idx, candidate)| !claimed[*idx] && *candidate == value);
        match partner {
            Some((idx, _)) => claimed[idx] = true,
            None => return false,
        }
    }
    true
}

impl fmt::Display for TraceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceValue::String(value) => write!(f, "{value}"),
            TraceValue::Integer(value) => write!(f, "{value}"),
            TraceValue::Boolean(value) => write!(f, "{value}"),
            TraceValue::Sequence(values) => {
                let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            TraceValue::Set(values) => {
                // Sorted so the rendering is stable regardless of insertion order
                let mut rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
                rendered.sort();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            TraceValue::Map(map) => {
                let rendered: Vec<String> =
                    map.iter().map(|(key, value)| format!("{key}: {value}")).collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
            TraceValue::Custom(value) => write!(f, "{}", value.describe()),
        }
    }
}

impl Serialize for TraceValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TraceValue::String(value) => serializer.serialize_str(value),
            TraceValue::Integer(value) => serializer.serialize_i64(*value),
            TraceValue::Boolean(value) => serializer.serialize_bool(*value),
            TraceValue::Sequence(values) | TraceValue::Set(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            TraceValue::Map(map) => {
                let mut entries = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    entries.serialize_entry(key, value)?;
                }
                entries.end()
            }
            // Opaque values export as their rendering
            TraceValue::Custom(value) => serializer.serialize_str(&value.describe()),
        }
    }
}

impl From<&str> for TraceValue {
    fn from(value: &str) -> Self {
        TraceValue::String(value.to_string())
    }
}

impl From<String> for TraceValue {
    fn from(value: String) -> Self {
        TraceValue::String(value)
    }
}

impl From<i64> for TraceValue {
    fn from(value: i64) -> Self {
        TraceValue::Integer(value)
    }
}

impl From<i32> for TraceValue {
    fn from(value: i32) -> Self {
        TraceValue::Integer(i64::from(value))
    }
}

impl From<bool> for TraceValue {
    fn from(value: bool) -> Self {
        TraceValue::Boolean(value)
    }
}

impl From<Vec<TraceValue>> for TraceValue {
    fn from(values: Vec<TraceValue>) -> Self {
        TraceValue::Sequence(values)
    }
}

impl From<BTreeMap<String, TraceValue>> for TraceValue {
    fn from(map: BTreeMap<String, TraceValue>) -> Self {
        TraceValue::Map(map)
    }
}
