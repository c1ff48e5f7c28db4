//! Fluent builder for constructing a [`Program`].

use bp_core::UnitId;
use bp_select::EventSelectionStrategy;
use bp_thread::BThread;

use crate::{Program, ProgramConfig, ProgramError, ProgramResult};

/// Fluent builder for [`Program<S>`].
///
/// Units are admitted in the order they are added; that order is the
/// priority order the enumerative strategy uses to break ties.
///
/// # Example
///
/// ```rust,ignore
/// let mut program = ProgramBuilder::new(EnumerativeStrategy::new())
///     .config(ProgramConfig::default().max_rounds(100))
///     .unit(thread("hot", hot))
///     .unit_with(|id| thread(format!("cold-{id}"), cold()))
///     .build()?;
/// ```
pub struct ProgramBuilder<S: EventSelectionStrategy> {
    strategy: S,
    config:   ProgramConfig,
    units:    Vec<Box<dyn BThread>>,
}

impl<S: EventSelectionStrategy> ProgramBuilder<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy, config: ProgramConfig::default(), units: Vec::new() }
    }

    pub fn config(mut self, config: ProgramConfig) -> Self {
        self.config = config;
        self
    }

    pub fn unit(mut self, thread: impl BThread + 'static) -> Self {
        self.units.push(Box::new(thread));
        self
    }

    pub fn unit_boxed(mut self, thread: Box<dyn BThread>) -> Self {
        self.units.push(thread);
        self
    }

    /// Add a unit built from the id it will be admitted under.
    pub fn unit_with<T, F>(mut self, factory: F) -> Self
    where
        T: BThread + 'static,
        F: FnOnce(UnitId) -> T,
    {
        let id = UnitId(self.units.len() as u32);
        self.units.push(Box::new(factory(id)));
        self
    }

    /// Validate and build the [`Program`].
    ///
    /// # Errors
    ///
    /// - [`ProgramError::Config`] if `max_rounds` is zero.
    pub fn build(self) -> ProgramResult<Program<S>> {
        if self.config.max_rounds == Some(0) {
            return Err(ProgramError::Config("max_rounds must be > 0".into()));
        }

        let mut program = Program::new(self.strategy, self.config);
        for unit in self.units {
            program.admit(unit);
        }
        Ok(program)
    }
}
