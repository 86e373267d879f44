use crate::instrument::{Filter, Observation};

/// Report times used when no experiment declares any (min).
pub const DEFAULT_OUTPUT_TIMES: [f64; 7] =
    [10070.0, 10075.0, 10130.0, 11510.0, 30230.0, 40310.0, f64::MAX];

/// Permits one notification per listed time: the first one at or after it.
#[derive(Debug, Clone)]
pub struct OutputTimes {
    times: Vec<f64>,
    index: usize,
}

impl Default for OutputTimes {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_TIMES.to_vec())
    }
}

impl OutputTimes {
    /// `times` should be ascending; an `f64::MAX` sentinel is appended when
    /// missing.
    pub fn new(mut times: Vec<f64>) -> Self {
        if times.last() != Some(&f64::MAX) {
            times.push(f64::MAX);
        }
        Self { times, index: 0 }
    }

    /// Times not yet reached, excluding the sentinel.
    pub fn remaining(&self) -> usize {
        self.times.len() - 1 - self.index.min(self.times.len() - 1)
    }
}

impl Filter for OutputTimes {
    fn name(&self) -> &'static str {
        "output_times"
    }

    fn permit(&mut self, obs: &Observation) -> bool {
        match self.times.get(self.index) {
            Some(&next) if obs.vars.t >= next => {
                self.index += 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Parameters;
    use crate::state::{StateRegistry, Variables};

    fn permits_at(filter: &mut OutputTimes, t: f64) -> bool {
        let reg = StateRegistry::new();
        let p = Parameters::default();
        let mut v = Variables::default();
        v.t = t;
        filter.permit(&Observation {
            params: &p,
            vars: &v,
            registry: &reg,
        })
    }

    #[test]
    fn test_one_notification_per_time() {
        let mut filter = OutputTimes::new(vec![0.0, 10.0]);
        assert!(permits_at(&mut filter, 0.0));
        assert!(!permits_at(&mut filter, 5.0));
        assert!(permits_at(&mut filter, 12.0));
        assert!(!permits_at(&mut filter, 13.0));
        assert_eq!(filter.remaining(), 0);
    }

    #[test]
    fn test_late_step_only_advances_one_time() {
        let mut filter = OutputTimes::new(vec![1.0, 2.0, f64::MAX]);
        assert!(permits_at(&mut filter, 5.0));
        assert!(permits_at(&mut filter, 5.0));
        assert!(!permits_at(&mut filter, 5.0));
    }

    #[test]
    fn test_default_times() {
        let mut filter = OutputTimes::default();
        assert_eq!(filter.remaining(), 6);
        assert!(!permits_at(&mut filter, 10069.0));
        assert!(permits_at(&mut filter, 10070.5));
    }
}
