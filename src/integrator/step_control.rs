//! Slow step-size policy.
//!
//! After an accepted step the proposal grows by a fixed factor, is clamped to
//! the configured maximum (`i3`), then shrunk to the plasma-volume stiffness
//! bound `|vp1 / vpd / dt|` when that is smaller.

/// Growth factor applied to the step after every accepted step.
pub const GROWTH: f64 = 1.2;

/// Result of one step-size decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepProposal {
    pub dt: f64,
    /// The stiffness bound, when plasma volume was changing
    pub stiffness: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct StepController {
    pub growth: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self { growth: GROWTH }
    }
}

impl StepController {
    /// Next slow step from the current one.
    ///
    /// `max_dt` is the upper clamp, `vp1` the allowed plasma volume change per
    /// step and `vpd` the current rate of plasma volume change. The result is
    /// strictly positive whenever `dt` and `max_dt` are.
    pub fn propose(&self, dt: f64, max_dt: f64, vp1: f64, vpd: f64) -> StepProposal {
        let mut next = (dt * self.growth).min(max_dt);
        let mut stiffness = None;
        if vpd != 0.0 {
            let bound = (vp1 / vpd / next).abs();
            stiffness = Some(bound);
            if bound > 0.0 && bound < next {
                next = bound;
            }
        }
        StepProposal { dt: next, stiffness }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_without_stiffness() {
        let c = StepController::default();
        let p = c.propose(0.003, 5.0, 1e-4, 0.0);
        assert!((p.dt - 0.0036).abs() < 1e-15);
        assert_eq!(p.stiffness, None);
    }

    #[test]
    fn test_clamped_to_maximum() {
        let c = StepController::default();
        assert_eq!(c.propose(4.9, 5.0, 1e-4, 0.0).dt, 5.0);
    }

    #[test]
    fn test_stiffness_bound_shrinks_step() {
        let c = StepController::default();
        // bound = 1e-4 / 1e-3 / 1.2 = 0.0833...
        let p = c.propose(1.0, 5.0, 1e-4, -1e-3);
        assert!((p.dt - 1e-4 / 1e-3 / 1.2).abs() < 1e-12, "dt = {}", p.dt);
        assert!(p.dt > 0.0);
    }

    #[test]
    fn test_loose_stiffness_bound_is_ignored() {
        let c = StepController::default();
        let p = c.propose(0.003, 5.0, 1e-4, 1e-6);
        assert!((p.dt - 0.0036).abs() < 1e-15);
        assert!(p.stiffness.unwrap() > p.dt);
    }
}
