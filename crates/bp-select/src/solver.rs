//! Deterministic finite-domain solver.
//!
//! Depth-first search over the vocabulary: variables in declaration order,
//! each domain in declared order.  Every partial assignment is checked with
//! three-valued evaluation, and a branch is cut as soon as the constraint is
//! decided `false`.
//!
//! Because the visiting order is fixed, the first solution is the
//! lexicographically smallest total assignment under
//! (variable declaration index, domain value index).  [`Solver::solve_best`]
//! ranks solutions by how many objectives they satisfy and falls back to that
//! order on ties, which is the tie-break the symbolic strategy relies on for
//! reproducible selection.

use std::ops::ControlFlow;

use bp_core::{Assignment, Expr, Vocabulary};

pub struct Solver<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> Solver<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// The first satisfying total assignment, if any.
    pub fn solve(&self, constraint: &Expr) -> Option<Assignment> {
        let mut found = None;
        self.visit(constraint, &mut |a| {
            found = Some(a.clone());
            ControlFlow::Break(())
        });
        found
    }

    /// The solution satisfying the most `objectives`; the first one in search
    /// order among equals.
    ///
    /// Visits every solution unless one satisfies all objectives, so the cost
    /// is bounded by the size of the assignment space.
    pub fn solve_best(&self, constraint: &Expr, objectives: &[Expr]) -> Option<Assignment> {
        let mut best: Option<(usize, Assignment)> = None;
        self.visit(constraint, &mut |a| {
            let score = objectives.iter().filter(|o| o.eval(a)).count();
            if best.as_ref().is_none_or(|(top, _)| score > *top) {
                best = Some((score, a.clone()));
            }
            if score == objectives.len() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        best.map(|(_, a)| a)
    }

    /// `true` if any total assignment satisfies `constraint`.
    pub fn is_satisfiable(&self, constraint: &Expr) -> bool {
        self.solve(constraint).is_some()
    }

    /// Every satisfying total assignment, in search order.
    pub fn solutions(&self, constraint: &Expr) -> Vec<Assignment> {
        let mut all = Vec::new();
        self.visit(constraint, &mut |a| {
            all.push(a.clone());
            ControlFlow::Continue(())
        });
        all
    }

    fn visit(&self, constraint: &Expr, f: &mut dyn FnMut(&Assignment) -> ControlFlow<()>) {
        let mut partial = Assignment::new();
        let _ = self.search(0, constraint, &mut partial, f);
    }

    fn search(
        &self,
        depth:      usize,
        constraint: &Expr,
        partial:    &mut Assignment,
        f:          &mut dyn FnMut(&Assignment) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        if constraint.eval_partial(partial) == Some(false) {
            return ControlFlow::Continue(());
        }
        let Some(decl) = self.vocabulary.decls().get(depth) else {
            return if constraint.eval(partial) { f(partial) } else { ControlFlow::Continue(()) };
        };
        for value in &decl.domain {
            partial.insert(&decl.var, value.clone());
            self.search(depth + 1, constraint, partial, f)?;
        }
        partial.remove(&decl.var);
        ControlFlow::Continue(())
    }
}
