//! Events, the atomic outcome the arbiter selects each round.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{Assignment, Symbol};

// ── Value ─────────────────────────────────────────────────────────────────────

/// A scalar payload field.
///
/// Floats compare and hash by bit pattern so that `Event` can be `Eq + Hash`;
/// `0.0` and `-0.0` are therefore distinct payloads.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(x) => x.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Structured event data, ordered by key so equal payloads hash equally.
pub type Payload = BTreeMap<String, Value>;

// ── Event ─────────────────────────────────────────────────────────────────────

/// The atomic, engine-selected outcome of a round.
///
/// Events are immutable once built.  Enumerative programs use
/// [`Event::Named`]; the symbolic strategy produces [`Event::Joint`], the full
/// assignment it solved for (e.g. one action per controlled vehicle).
///
/// Equality covers name *and* payload.  Consumers that only care about the
/// name match with [`EventSet::Named`][crate::EventSet::Named].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    Named { name: Symbol, payload: Payload },
    Joint(Assignment),
}

impl Event {
    /// An event with an empty payload.
    pub fn named(name: impl Into<Symbol>) -> Self {
        Event::Named { name: name.into(), payload: Payload::new() }
    }

    /// An event carrying `fields` as its payload.
    pub fn with_payload<K, V, I>(name: impl Into<Symbol>, fields: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let payload = fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Event::Named { name: name.into(), payload }
    }

    pub fn joint(assignment: Assignment) -> Self {
        Event::Joint(assignment)
    }

    /// Event name; `None` for joint assignments.
    pub fn name(&self) -> Option<&Symbol> {
        match self {
            Event::Named { name, .. } => Some(name),
            Event::Joint(_) => None,
        }
    }

    /// `true` if this is a named event called `name`.
    pub fn is(&self, name: &str) -> bool {
        self.name().is_some_and(|n| n == name)
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Event::Named { payload, .. } => Some(payload),
            Event::Joint(_) => None,
        }
    }

    /// Look up one payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload().and_then(|p| p.get(key))
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            Event::Joint(a) => Some(a),
            Event::Named { .. } => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Named { name, payload } if payload.is_empty() => write!(f, "{name}"),
            Event::Named { name, payload } => {
                write!(f, "{name}{{")?;
                for (i, (k, v)) in payload.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}={v}")?;
                }
                f.write_str("}")
            }
            Event::Joint(a) => write!(f, "{a}"),
        }
    }
}
