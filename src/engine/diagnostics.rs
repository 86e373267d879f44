//! Solver diagnostics collected from a run.

use serde::Serialize;

use crate::integrator::SolverStats;
use crate::renal::NephronStats;

/// Counters from every iterative loop, for reporting at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SolverDiagnostics {
    pub time_min: f64,
    pub step_min: f64,
    pub accepted_steps: u64,
    pub rejected_micro_steps: u64,
    pub solvers: Vec<SolverStats>,
    pub nephron: NephronStats,
}

impl SolverDiagnostics {
    /// Loops that ran out of time budget at least once.
    pub fn exhausted(&self) -> impl Iterator<Item = &SolverStats> {
        self.solvers.iter().filter(|s| s.exhausted > 0)
    }

    /// Print a formatted summary
    pub fn print_summary(&self) {
        println!("=== Solver Diagnostics (t = {:.3} min) ===", self.time_min);
        println!();
        println!("Integrator:");
        println!("  Accepted steps:      {}", self.accepted_steps);
        println!("  Rejected micro-steps: {}", self.rejected_micro_steps);
        println!("  Current step:        {:.4} min", self.step_min);
        println!();
        println!("Equilibrium loops:");
        Self::print_row_header();
        for stats in &self.solvers {
            Self::print_row(stats);
        }
        println!();
        println!("Single nephron:");
        println!("  Solves:              {}", self.nephron.solves);
        println!("  Shooting iterations: {}", self.nephron.shooting_iterations);
        println!("  Max per solve:       {}", self.nephron.max_shooting_iterations);
        println!("  Shooting cap hits:   {}", self.nephron.shooting_cap_hits);
        println!("  TGF passes:          {}", self.nephron.tgf_iterations);
        println!("  TGF cap hits:        {}", self.nephron.tgf_cap_hits);
    }

    /// Print the column header for [`SolverDiagnostics::print_row`]
    pub fn print_row_header() {
        println!("  {:<22} {:>10} {:>12} {:>10} {:>8}",
            "Loop", "Calls", "Iterations", "Exhausted", "Max");
    }

    pub fn print_row(stats: &SolverStats) {
        println!("  {:<22} {:>10} {:>12} {:>10} {:>8}",
            stats.name,
            stats.calls,
            stats.iterations,
            stats.exhausted,
            stats.max_iterations);
    }
}
