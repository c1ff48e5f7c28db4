//! Unit tests for bp-select.

use bp_core::{Event, EventSet, Expr, Statement, Var, Vocabulary};

use crate::{
    EnumerativeStrategy, EventSelectionStrategy, SelectError, Selection, Solver,
    SymbolicStrategy, Tiebreak,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const ACTIONS: [&str; 3] = ["LEFT", "IDLE", "RIGHT"];

fn ev(name: &str) -> Event {
    Event::named(name)
}

fn two_agents() -> (Vocabulary, Var, Var) {
    let mut vocab = Vocabulary::new();
    let a1 = vocab.declare("agent1", ACTIONS).unwrap();
    let a2 = vocab.declare("agent2", ACTIONS).unwrap();
    (vocab, a1, a2)
}

fn refs(statements: &[Statement]) -> Vec<&Statement> {
    statements.iter().collect()
}

// ── Enumerative ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod enumerative_tests {
    use super::*;

    #[test]
    fn blocked_request_loses_to_unblocked_one() {
        let stmts = [
            Statement::new().request(ev("X")),
            Statement::new().request(ev("Y")).block(ev("X")),
        ];
        let sel = EnumerativeStrategy::new().select(&refs(&stmts)).unwrap();
        assert_eq!(sel, Selection::Event(ev("Y")));
    }

    #[test]
    fn sole_request_blocked_is_deadlock() {
        let stmts = [
            Statement::new().request(ev("X")),
            Statement::new().block(ev("X")),
        ];
        let sel = EnumerativeStrategy::new().select(&refs(&stmts)).unwrap();
        assert_eq!(sel, Selection::Deadlocked);
    }

    #[test]
    fn no_requests_is_quiescent() {
        let stmts = [
            Statement::new().wait_for(EventSet::All),
            Statement::new().block(ev("X")),
        ];
        let sel = EnumerativeStrategy::new().select(&refs(&stmts)).unwrap();
        assert_eq!(sel, Selection::Quiescent);
    }

    #[test]
    fn priority_follows_unit_order() {
        let stmts = [
            Statement::new().request(vec![ev("B"), ev("A")]),
            Statement::new().request(ev("A")),
        ];
        let sel = EnumerativeStrategy::new().select(&refs(&stmts)).unwrap();
        assert_eq!(sel, Selection::Event(ev("B")));
    }

    #[test]
    fn chosen_event_is_always_requested() {
        let stmts = [
            Statement::new().wait_for(ev("W")),
            Statement::new().request(vec![ev("A"), ev("B")]).block(ev("A")),
            Statement::new().request(ev("C")),
        ];
        let Selection::Event(chosen) = EnumerativeStrategy::new().select(&refs(&stmts)).unwrap()
        else {
            panic!("expected an event");
        };
        assert!(stmts.iter().any(|s| s.request.as_ref().is_some_and(|r| r.matches(&chosen))));
        assert_eq!(chosen, ev("B"));
    }

    #[test]
    fn adding_a_block_never_grows_candidates() {
        let base = vec![
            Statement::new().request(vec![ev("A"), ev("B"), ev("C")]),
            Statement::new().request(ev("D")).block(ev("B")),
        ];
        let before = EnumerativeStrategy::candidates(&refs(&base)).unwrap();

        let mut tightened = base.clone();
        tightened[0] = tightened[0].clone().block(vec![ev("A"), ev("Z")]);
        let after = EnumerativeStrategy::candidates(&refs(&tightened)).unwrap();

        assert!(after.len() <= before.len());
        assert!(after.iter().all(|e| before.contains(e)));
        assert_eq!(after, vec![ev("C"), ev("D")]);
    }

    #[test]
    fn named_block_matches_any_payload() {
        let stmts = [
            Statement::new().request(Event::with_payload("STEP", [("step", 1)])),
            Statement::new().block(EventSet::named("STEP")),
        ];
        let sel = EnumerativeStrategy::new().select(&refs(&stmts)).unwrap();
        assert_eq!(sel, Selection::Deadlocked);
    }

    #[test]
    fn seeded_tiebreak_is_reproducible() {
        let stmts = [Statement::new().request(vec![ev("A"), ev("B"), ev("C"), ev("D")])];
        let run = || {
            let mut s = EnumerativeStrategy::with_tiebreak(Tiebreak::Seeded(7));
            (0..20)
                .map(|_| s.select(&refs(&stmts)).unwrap())
                .collect::<Vec<_>>()
        };
        let first = run();
        assert_eq!(first, run());
        assert!(first.iter().all(|s| matches!(s, Selection::Event(_))));
    }

    #[test]
    fn intensional_request_is_malformed() {
        let strategy = EnumerativeStrategy::new();
        let err = strategy.validate(&Statement::new().request(EventSet::All)).unwrap_err();
        assert!(matches!(err, SelectError::Malformed { role: "request", .. }));
        assert!(strategy.validate(&Statement::new().wait_for(EventSet::All)).is_ok());
    }

    #[test]
    fn symbolic_formula_is_malformed() {
        let (_, a1, _) = two_agents();
        let strategy = EnumerativeStrategy::new();
        assert!(strategy.validate(&Statement::new().block(a1.is("LEFT"))).is_err());
    }
}

// ── Solver ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod solver_tests {
    use super::*;

    #[test]
    fn first_solution_is_lexicographically_smallest() {
        let (vocab, a1, a2) = two_agents();
        let solver = Solver::new(&vocab);
        let a = solver.solve(&a2.is_not("LEFT")).unwrap();
        assert_eq!(a.get(&a1).map(|s| s.as_str()), Some("LEFT"));
        assert_eq!(a.get(&a2).map(|s| s.as_str()), Some("IDLE"));
    }

    #[test]
    fn counts_match_brute_force() {
        let (vocab, a1, a2) = two_agents();
        let solver = Solver::new(&vocab);
        assert_eq!(solver.solutions(&Expr::True).len(), 9);
        assert_eq!(solver.solutions(&a1.is("RIGHT")).len(), 3);
        assert_eq!(solver.solutions(&a1.is("RIGHT").and(a2.is("RIGHT"))).len(), 1);
        assert!(solver.solutions(&Expr::False).is_empty());
        assert!(!solver.is_satisfiable(&a1.is("LEFT").and(a1.is("RIGHT"))));
    }

    #[test]
    fn best_solution_covers_most_objectives() {
        let (vocab, a1, a2) = two_agents();
        let solver = Solver::new(&vocab);
        // Only (RIGHT, RIGHT) meets all three; search order would start at LEFT.
        let objectives = [a1.is("RIGHT"), a2.is("RIGHT"), a1.is_not("LEFT")];
        let a = solver.solve_best(&Expr::True, &objectives).unwrap();
        assert_eq!(a.get(&a1).map(|s| s.as_str()), Some("RIGHT"));
        assert_eq!(a.get(&a2).map(|s| s.as_str()), Some("RIGHT"));

        // Equal coverage falls back to search order.
        let a = solver.solve_best(&a1.is_not("LEFT"), &[]).unwrap();
        assert_eq!(a, solver.solve(&a1.is_not("LEFT")).unwrap());
        let tied = [a1.is("LEFT"), a1.is("RIGHT"), a2.is("RIGHT")];
        let a = solver.solve_best(&Expr::True, &tied).unwrap();
        assert_eq!(a.get(&a1).map(|s| s.as_str()), Some("LEFT"));
        assert_eq!(a.get(&a2).map(|s| s.as_str()), Some("RIGHT"));
    }

    #[test]
    fn empty_vocabulary_has_one_empty_assignment() {
        let vocab = Vocabulary::new();
        let solver = Solver::new(&vocab);
        assert_eq!(solver.solutions(&Expr::True).len(), 1);
        assert!(solver.solve(&Expr::False).is_none());
    }
}

// ── Symbolic ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod symbolic_tests {
    use super::*;

    fn joint(sel: Selection) -> bp_core::Assignment {
        match sel {
            Selection::Event(e) => e.assignment().cloned().unwrap(),
            other => panic!("expected a joint event, got {other:?}"),
        }
    }

    #[test]
    fn request_respects_joint_block() {
        let (vocab, a1, a2) = two_agents();
        let stmts = [
            Statement::new().request(a1.is("RIGHT")),
            Statement::new().block(a1.is("RIGHT").and(a2.is("RIGHT"))),
        ];
        let a = joint(SymbolicStrategy::new(vocab).select(&refs(&stmts)).unwrap());
        assert_eq!(a.get(&a1).map(|s| s.as_str()), Some("RIGHT"));
        assert_ne!(a.get(&a2).map(|s| s.as_str()), Some("RIGHT"));
    }

    #[test]
    fn quiescent_when_nothing_requested() {
        let (vocab, a1, _) = two_agents();
        let stmts = [
            Statement::new().wait_for(Expr::True),
            Statement::new().block(a1.is("LEFT")),
        ];
        let sel = SymbolicStrategy::new(vocab).select(&refs(&stmts)).unwrap();
        assert_eq!(sel, Selection::Quiescent);
    }

    #[test]
    fn deadlock_when_every_request_is_blocked() {
        let (vocab, a1, _) = two_agents();
        let stmts = [
            Statement::new().request(a1.is("LEFT")),
            Statement::new().block(a1.is("LEFT")),
        ];
        let sel = SymbolicStrategy::new(vocab).select(&refs(&stmts)).unwrap();
        assert_eq!(sel, Selection::Deadlocked);
    }

    #[test]
    fn wait_for_only_tightens() {
        let (vocab, a1, a2) = two_agents();
        let loose = vec![Statement::new().request(a1.is("RIGHT"))];
        let mut tight = loose.clone();
        tight.push(Statement::new().wait_for(a2.is("LEFT")));

        let (e, f, w) = SymbolicStrategy::constraints(&refs(&loose)).unwrap();
        let before = Solver::new(&vocab).solutions(&Expr::all([e, !f, w]));
        let (e, f, w) = SymbolicStrategy::constraints(&refs(&tight)).unwrap();
        let after = Solver::new(&vocab).solutions(&Expr::all([e, !f, w]));

        assert_eq!(before.len(), 3);
        assert_eq!(after.len(), 1);
        assert!(after.iter().all(|a| before.contains(a)));
    }

    #[test]
    fn own_request_counts_as_accepted() {
        let (vocab, a1, a2) = two_agents();
        let stmts = vec![
            Statement::new().request(a1.is("RIGHT")).wait_for(a2.is("LEFT")),
            Statement::new().request(a1.is("LEFT")),
        ];
        let (e, f, w) = SymbolicStrategy::constraints(&refs(&stmts)).unwrap();
        assert_eq!(w, a1.is("RIGHT").or(a2.is("LEFT")));

        // a1 = RIGHT with any a2, or a1 = LEFT only alongside a2 = LEFT.
        let solutions = Solver::new(&vocab).solutions(&Expr::all([e, !f, w]));
        assert_eq!(solutions.len(), 4);
    }

    #[test]
    fn trivial_wait_for_is_ignored() {
        let (vocab, a1, _) = two_agents();
        let stmts = [
            Statement::new().wait_for(Expr::True),
            Statement::new().request(a1.is("IDLE")),
        ];
        let a = joint(SymbolicStrategy::new(vocab).select(&refs(&stmts)).unwrap());
        assert_eq!(a.get(&a1).map(|s| s.as_str()), Some("IDLE"));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn adding_a_block_never_grows_solutions() {
        let (vocab, a1, a2) = two_agents();
        let base = vec![
            Statement::new().request(a1.is_not("LEFT")),
            Statement::new().request(Expr::True),
        ];
        let mut tightened = base.clone();
        tightened.push(Statement::new().block(a2.is("IDLE")));

        let count = |stmts: &[Statement]| {
            let (e, f, w) = SymbolicStrategy::constraints(&refs(stmts)).unwrap();
            Solver::new(&vocab).solutions(&Expr::all([e, !f, w])).len()
        };
        assert!(count(&tightened) <= count(&base));
    }

    #[test]
    fn specific_requests_beat_a_catch_all() {
        let (vocab, a1, a2) = two_agents();
        let stmts = [
            Statement::new().request(Expr::True),
            Statement::new().request(a1.is("RIGHT")),
            Statement::new().request(a2.is("IDLE")),
        ];
        let a = joint(SymbolicStrategy::new(vocab).select(&refs(&stmts)).unwrap());
        assert_eq!(a.get(&a1).map(|s| s.as_str()), Some("RIGHT"));
        assert_eq!(a.get(&a2).map(|s| s.as_str()), Some("IDLE"));
    }

    #[test]
    fn selection_is_deterministic() {
        let (vocab, a1, a2) = two_agents();
        let stmts = [
            Statement::new().request(a1.one_of(["LEFT", "RIGHT"])),
            Statement::new().request(a2.is_not("IDLE")),
        ];
        let mut s1 = SymbolicStrategy::new(vocab.clone());
        let mut s2 = SymbolicStrategy::new(vocab);
        assert_eq!(s1.select(&refs(&stmts)).unwrap(), s2.select(&refs(&stmts)).unwrap());
    }

    #[test]
    fn undeclared_variable_is_rejected() {
        let (vocab, _, _) = two_agents();
        let ghost = Var::new("agent3");
        let err = SymbolicStrategy::new(vocab)
            .validate(&Statement::new().wait_for(ghost.is("LEFT")))
            .unwrap_err();
        assert!(matches!(err, SelectError::Undeclared { role: "waitFor", .. }));
    }

    #[test]
    fn event_sets_are_rejected() {
        let (vocab, _, _) = two_agents();
        let strategy = SymbolicStrategy::new(vocab);
        assert!(strategy.validate(&Statement::new().request(ev("X"))).is_err());
    }
}
