//! Synchronization statements: what a unit declares at each pause point.

use std::fmt;

use crate::{Event, EventSet, Expr};

/// One role of a [`Statement`]: a set of concrete events, or a boolean
/// expression over symbolic variables.
#[derive(Clone, Debug)]
pub enum Formula {
    Events(EventSet),
    Expr(Expr),
}

impl Formula {
    /// Does the selected `event` satisfy this formula?
    ///
    /// Event sets test membership; expressions are evaluated against the
    /// event's joint assignment.  A named event never satisfies an expression
    /// and a joint event only satisfies `EventSet::All` or a predicate that
    /// accepts it.
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Formula::Events(set) => set.contains(event),
            Formula::Expr(expr) => event.assignment().is_some_and(|a| expr.eval(a)),
        }
    }

    /// `true` if the formula can never match anything (empty list, `false`).
    pub fn is_empty(&self) -> bool {
        match self {
            Formula::Events(set) => set.is_empty(),
            Formula::Expr(expr) => expr.is_false(),
        }
    }

    pub fn as_events(&self) -> Option<&EventSet> {
        match self {
            Formula::Events(set) => Some(set),
            Formula::Expr(_) => None,
        }
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Formula::Expr(expr) => Some(expr),
            Formula::Events(_) => None,
        }
    }
}

impl From<Event> for Formula {
    fn from(e: Event) -> Self {
        Formula::Events(EventSet::One(e))
    }
}

impl From<Vec<Event>> for Formula {
    fn from(es: Vec<Event>) -> Self {
        Formula::Events(EventSet::List(es))
    }
}

impl From<EventSet> for Formula {
    fn from(set: EventSet) -> Self {
        Formula::Events(set)
    }
}

impl From<Expr> for Formula {
    fn from(expr: Expr) -> Self {
        Formula::Expr(expr)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Events(set) => write!(f, "{set}"),
            Formula::Expr(expr) => write!(f, "{expr}"),
        }
    }
}

// ── Statement ─────────────────────────────────────────────────────────────────

/// The `request` / `waitFor` / `block` triple a unit yields at a pause point.
///
/// A missing role means "nothing".  Statements are produced fresh at every
/// pause point and never edited once handed to the program.
///
/// ```rust,ignore
/// let s = Statement::new()
///     .request(Event::named("Y"))
///     .block(Event::named("X"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Statement {
    pub request:  Option<Formula>,
    pub wait_for: Option<Formula>,
    pub block:    Option<Formula>,
}

impl Statement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(mut self, f: impl Into<Formula>) -> Self {
        self.request = Some(f.into());
        self
    }

    pub fn wait_for(mut self, f: impl Into<Formula>) -> Self {
        self.wait_for = Some(f.into());
        self
    }

    pub fn block(mut self, f: impl Into<Formula>) -> Self {
        self.block = Some(f.into());
        self
    }

    /// The unit asks for at least one outcome this round.
    pub fn has_request(&self) -> bool {
        self.request.as_ref().is_some_and(|f| !f.is_empty())
    }

    /// The unit must be resumed if `event` is selected.
    pub fn observes(&self, event: &Event) -> bool {
        self.request.as_ref().is_some_and(|f| f.matches(event))
            || self.wait_for.as_ref().is_some_and(|f| f.matches(event))
    }

    pub fn blocks(&self, event: &Event) -> bool {
        self.block.as_ref().is_some_and(|f| f.matches(event))
    }

    /// Iterate the present roles as `(role_name, formula)`.
    pub fn roles(&self) -> impl Iterator<Item = (&'static str, &Formula)> {
        [("request", &self.request), ("waitFor", &self.wait_for), ("block", &self.block)]
            .into_iter()
            .filter_map(|(role, f)| f.as_ref().map(|f| (role, f)))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("sync(")?;
        for (i, (role, formula)) in self.roles().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{role}={formula}")?;
        }
        f.write_str(")")
    }
}
