//! Event sets used as enumerative `request`/`waitFor`/`block` formulas.

use std::fmt;
use std::slice;
use std::sync::Arc;

use crate::{Event, Symbol};

/// A labelled event predicate, e.g. "any `SPEED_UPDATE` above 30 m/s".
///
/// The label only exists for diagnostics (`Debug`, deadlock reports).
#[derive(Clone)]
pub struct Matcher {
    label: Symbol,
    test:  Arc<dyn Fn(&Event) -> bool + Send + Sync>,
}

impl Matcher {
    pub fn new(label: impl Into<Symbol>, test: impl Fn(&Event) -> bool + Send + Sync + 'static) -> Self {
        Self { label: label.into(), test: Arc::new(test) }
    }

    pub fn label(&self) -> &Symbol {
        &self.label
    }

    #[inline]
    pub fn test(&self, event: &Event) -> bool {
        (self.test)(event)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matcher({})", self.label)
    }
}

/// A set of events, possibly infinite.
///
/// Only [`EventSet::One`] and [`EventSet::List`] are *concrete*: they can be
/// enumerated and are therefore the only shapes allowed in an enumerative
/// `request`.  The others may appear in `waitFor` and `block`.
#[derive(Clone, Debug)]
pub enum EventSet {
    /// Every event.
    All,
    One(Event),
    List(Vec<Event>),
    /// Every named event called `name`, whatever its payload.
    Named(Symbol),
    Predicate(Matcher),
}

impl EventSet {
    pub fn named(name: impl Into<Symbol>) -> Self {
        EventSet::Named(name.into())
    }

    pub fn predicate(label: impl Into<Symbol>, test: impl Fn(&Event) -> bool + Send + Sync + 'static) -> Self {
        EventSet::Predicate(Matcher::new(label, test))
    }

    /// Membership test.
    pub fn contains(&self, event: &Event) -> bool {
        match self {
            EventSet::All => true,
            EventSet::One(e) => e == event,
            EventSet::List(es) => es.contains(event),
            EventSet::Named(name) => event.name() == Some(name),
            EventSet::Predicate(m) => m.test(event),
        }
    }

    /// The enumerable members, or `None` for intensional sets.
    pub fn concrete(&self) -> Option<&[Event]> {
        match self {
            EventSet::One(e) => Some(slice::from_ref(e)),
            EventSet::List(es) => Some(es),
            _ => None,
        }
    }

    /// `true` only for an explicitly empty list.
    pub fn is_empty(&self) -> bool {
        matches!(self, EventSet::List(es) if es.is_empty())
    }
}

impl From<Event> for EventSet {
    fn from(e: Event) -> Self {
        EventSet::One(e)
    }
}

impl From<Vec<Event>> for EventSet {
    fn from(es: Vec<Event>) -> Self {
        EventSet::List(es)
    }
}

impl fmt::Display for EventSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSet::All => f.write_str("*"),
            EventSet::One(e) => write!(f, "{e}"),
            EventSet::List(es) => {
                f.write_str("[")?;
                for (i, e) in es.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{e}")?;
                }
                f.write_str("]")
            }
            EventSet::Named(name) => write!(f, "{name}{{..}}"),
            EventSet::Predicate(m) => write!(f, "<{}>", m.label()),
        }
    }
}
