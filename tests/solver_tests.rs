//! Property tests for the equilibrium solver and step controller.

use body_simulator_x::integrator::{EquilibriumSolver, StepController};
use proptest::prelude::*;

// ============================================================================
// Equilibrium solver
// ============================================================================

proptest! {
    #[test]
    fn prop_solver_terminates_within_bound(
        dt in 0.001f64..10.0,
        ratio in 0.001f64..1.0,
        growth in -2.0f64..2.0,
    ) {
        let sub_dt = dt * ratio;
        let bound = (dt / sub_dt).ceil() as usize + 1;
        let mut solver = EquilibriumSolver::new("prop");
        let mut x = 1.0f64;

        // Never converges: tolerance is below anything the update reports
        let outcome = solver.iterate(dt, sub_dt, 0.0, || {
            x = x * growth + 1.0;
            1.0
        });

        prop_assert!(outcome.iterations() <= bound,
            "{} iterations, bound {}", outcome.iterations(), bound);
        prop_assert!(!outcome.converged());
    }

    #[test]
    fn prop_solver_stops_on_convergence(tol in 1e-9f64..1.0, x0 in 1.0f64..1e3) {
        let mut solver = EquilibriumSolver::new("prop");
        let mut x = x0;
        let outcome = solver.iterate(1e9, 1.0, tol, || {
            let old = x;
            x *= 0.5;
            x - old
        });
        prop_assert!(outcome.converged());
        prop_assert!(x.abs() < 2.0 * tol);
    }
}

// ============================================================================
// Step controller
// ============================================================================

proptest! {
    #[test]
    fn prop_step_grows_then_clamps(dt in 1e-4f64..10.0, max_dt in 1e-3f64..10.0) {
        let c = StepController::default();
        let p = c.propose(dt, max_dt, 1e-4, 0.0);
        prop_assert_eq!(p.dt, (dt * 1.2).min(max_dt));
    }

    #[test]
    fn prop_step_is_positive_and_within_stiffness(
        dt in 1e-4f64..10.0,
        max_dt in 1e-3f64..10.0,
        vp1 in 0.0f64..1e-2,
        vpd in -1.0f64..1.0,
    ) {
        let c = StepController::default();
        let p = c.propose(dt, max_dt, vp1, vpd);
        let base = (dt * 1.2).min(max_dt);

        prop_assert!(p.dt > 0.0);
        prop_assert!(p.dt <= base);
        if let Some(bound) = p.stiffness {
            if bound > 0.0 && bound < base {
                prop_assert_eq!(p.dt, bound);
            } else {
                prop_assert_eq!(p.dt, base);
            }
        }
    }
}
