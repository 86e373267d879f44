//! Bounded fixed-point sub-iteration shared by the slow modules.
//!
//! A module hands the solver a closure that performs one explicit update and
//! returns the change it made (or the residual it measured). The solver calls
//! it at least once and stops as soon as the change is below tolerance or the
//! accumulated sub-time reaches the time budget, whichever comes first. Running
//! out of budget is a normal outcome; the caller keeps the last iterate.

use serde::Serialize;

/// How a call to [`EquilibriumSolver::iterate`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Converged { iterations: usize },
    Exhausted { iterations: usize },
}

impl Termination {
    pub fn iterations(&self) -> usize {
        match *self {
            Termination::Converged { iterations } | Termination::Exhausted { iterations } => {
                iterations
            }
        }
    }

    pub fn converged(&self) -> bool {
        matches!(self, Termination::Converged { .. })
    }
}

/// Counters for one named loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SolverStats {
    pub name: &'static str,
    pub calls: u64,
    pub iterations: u64,
    pub exhausted: u64,
    /// Largest iteration count of any single call
    pub max_iterations: usize,
}

/// One named instance of the sub-iteration pattern.
#[derive(Debug, Clone)]
pub struct EquilibriumSolver {
    stats: SolverStats,
}

impl EquilibriumSolver {
    pub fn new(name: &'static str) -> Self {
        Self {
            stats: SolverStats {
                name,
                ..Default::default()
            },
        }
    }

    /// Runs `step` until `|step()| < tol` or `budget` minutes of sub-steps of
    /// `sub_dt` have elapsed.
    ///
    /// Terminates within `ceil(budget / sub_dt) + 1` calls. A non-positive or
    /// non-finite budget or sub-step allows exactly one call.
    pub fn iterate<F>(&mut self, budget: f64, sub_dt: f64, tol: f64, mut step: F) -> Termination
    where
        F: FnMut() -> f64,
    {
        let bounded = budget > 0.0 && budget.is_finite() && sub_dt > 0.0 && sub_dt.is_finite();
        let mut elapsed = 0.0;
        let mut iterations = 0;

        let outcome = loop {
            let change = step();
            iterations += 1;
            if change.abs() < tol {
                break Termination::Converged { iterations };
            }
            elapsed += sub_dt;
            if !bounded || elapsed >= budget {
                break Termination::Exhausted { iterations };
            }
        };

        self.record(outcome);
        outcome
    }

    fn record(&mut self, outcome: Termination) {
        let n = outcome.iterations();
        self.stats.calls += 1;
        self.stats.iterations += n as u64;
        self.stats.max_iterations = self.stats.max_iterations.max(n);
        if !outcome.converged() {
            self.stats.exhausted += 1;
        }
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub fn reset(&mut self) {
        let name = self.stats.name;
        self.stats = SolverStats {
            name,
            ..Default::default()
        };
    }
}
