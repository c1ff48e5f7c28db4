//! Selection over concrete events.

use bp_core::{Event, Formula, Statement};

use crate::{EventSelectionStrategy, SelectError, SelectResult, Selection, SelectionRng};

/// How to choose among several admissible events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tiebreak {
    /// First candidate requested by the highest-priority unit.
    #[default]
    Priority,
    /// Uniform choice among all candidates, reproducible per seed.
    Seeded(u64),
}

/// Candidate set = every requested event that no unit blocks.
///
/// `waitFor` plays no part in selection here; it only decides who is resumed.
pub struct EnumerativeStrategy {
    tiebreak: Tiebreak,
    rng:      Option<SelectionRng>,
}

impl Default for EnumerativeStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl EnumerativeStrategy {
    pub fn new() -> Self {
        Self { tiebreak: Tiebreak::Priority, rng: None }
    }

    pub fn with_tiebreak(tiebreak: Tiebreak) -> Self {
        let rng = match tiebreak {
            Tiebreak::Priority => None,
            Tiebreak::Seeded(seed) => Some(SelectionRng::new(seed, 0)),
        };
        Self { tiebreak, rng }
    }

    pub fn tiebreak(&self) -> Tiebreak {
        self.tiebreak
    }

    /// All admissible events, in priority order, without duplicates.
    pub fn candidates(statements: &[&Statement]) -> SelectResult<Vec<Event>> {
        let mut out: Vec<Event> = Vec::new();
        for s in statements {
            let Some(request) = &s.request else { continue };
            for event in concrete("request", request)? {
                if out.contains(event) {
                    continue;
                }
                if statements.iter().any(|other| other.blocks(event)) {
                    continue;
                }
                out.push(event.clone());
            }
        }
        Ok(out)
    }
}

fn concrete<'a>(role: &'static str, formula: &'a Formula) -> SelectResult<&'a [Event]> {
    match formula {
        Formula::Events(set) => set.concrete().ok_or_else(|| SelectError::Malformed {
            role,
            reason: format!("`{set}` is not a concrete event list"),
        }),
        Formula::Expr(expr) => Err(SelectError::Malformed {
            role,
            reason: format!("symbolic formula `{expr}` needs the symbolic strategy"),
        }),
    }
}

impl EventSelectionStrategy for EnumerativeStrategy {
    fn name(&self) -> &'static str {
        "enumerative"
    }

    fn validate(&self, statement: &Statement) -> SelectResult<()> {
        for (role, formula) in statement.roles() {
            if role == "request" {
                concrete(role, formula)?;
            } else if let Formula::Expr(expr) = formula {
                return Err(SelectError::Malformed {
                    role,
                    reason: format!("symbolic formula `{expr}` needs the symbolic strategy"),
                });
            }
        }
        Ok(())
    }

    fn select(&mut self, statements: &[&Statement]) -> SelectResult<Selection> {
        if !statements.iter().any(|s| s.has_request()) {
            return Ok(Selection::Quiescent);
        }
        let candidates = Self::candidates(statements)?;
        let chosen = match &mut self.rng {
            Some(rng) => rng.choose(&candidates),
            None => candidates.first(),
        };
        Ok(match chosen {
            Some(e) => Selection::Event(e.clone()),
            None => {
                tracing::debug!(units = statements.len(), "no admissible event among requests");
                Selection::Deadlocked
            }
        })
    }
}
