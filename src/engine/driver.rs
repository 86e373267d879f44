//! The simulation driver.
//!
//! Each call to [`Simulation::step`] is one driver iteration: apply due
//! experiment changes, run one fast micro-step, and, once the circulation is
//! stable, run the slow pipeline and notify the instruments. The driver is a
//! two-state machine:
//!
//! | Phase         | Event        | Next          |
//! |---------------|--------------|---------------|
//! | Equilibrating | Rejected     | Equilibrating |
//! | Equilibrating | Accepted     | Advancing     |
//! | Advancing     | PipelineDone | Equilibrating |

use crate::config::{EngineConfig, Parameters};
use crate::engine::{Pipeline, SolverDiagnostics};
use crate::experiment::{rapid_regulation, transfuse, Experiment};
use crate::instrument::{InstrumentBus, Observation};
use crate::integrator::{FastEquilibrator, MicroStep, StepController};
use crate::state::{ModelState, StateRegistry, Variables};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Running fast micro-steps until the circulation settles
    Equilibrating,
    /// Running the slow pipeline for an accepted step
    Advancing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Rejected,
    Accepted,
    PipelineDone,
}

impl Phase {
    /// Transition table. Events that cannot occur in a phase leave it
    /// unchanged.
    pub fn next(self, event: Event) -> Phase {
        match (self, event) {
            (Phase::Equilibrating, Event::Rejected) => Phase::Equilibrating,
            (Phase::Equilibrating, Event::Accepted) => Phase::Advancing,
            (Phase::Advancing, Event::PipelineDone) => Phase::Equilibrating,
            (phase, _) => phase,
        }
    }
}

/// Result of one driver iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The micro-step was rejected; time did not advance
    Rejected,
    /// A slow step was completed; `permitted` tells whether the instruments saw it
    Completed { permitted: bool },
}

/// Totals for one call to [`Simulation::run_until`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub accepted: u64,
    pub rejected: u64,
    pub start_min: f64,
    pub end_min: f64,
}

pub struct Simulation {
    pub params: Parameters,
    pub vars: Variables,
    registry: StateRegistry,
    config: EngineConfig,
    equilibrator: FastEquilibrator,
    pipeline: Pipeline,
    experiment: Experiment,
    bus: InstrumentBus,
    phase: Phase,
    started: bool,
}

impl Simulation {
    /// Starts at t = 0 with the configured initial step. Invalid settings
    /// are replaced by their defaults.
    pub fn new(params: Parameters, mut vars: Variables, config: EngineConfig) -> Self {
        let config = config.sanitized();
        vars.t = 0.0;
        vars.i = config.initial_dt_min;
        Self {
            params,
            vars,
            registry: StateRegistry::new(),
            pipeline: Pipeline::new(&config),
            config,
            equilibrator: FastEquilibrator::new(StepController::default()),
            experiment: Experiment::empty(),
            bus: InstrumentBus::new(),
            phase: Phase::Equilibrating,
            started: false,
        }
    }

    pub fn with_experiment(mut self, experiment: Experiment) -> Self {
        self.experiment = experiment;
        self
    }

    pub fn experiment(&self) -> &Experiment {
        &self.experiment
    }

    pub fn bus_mut(&mut self) -> &mut InstrumentBus {
        &mut self.bus
    }

    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The experiment's last declared time, or the default duration.
    pub fn stop_time(&self) -> f64 {
        if self.experiment.has_times() {
            self.experiment.stop_at()
        } else {
            self.config.default_duration_min
        }
    }

    /// One driver iteration.
    pub fn step(&mut self) -> StepOutcome {
        self.start();

        self.experiment
            .update(self.vars.t, &mut self.params, &self.registry.params);
        self.apply_overrides();

        let event = match self.equilibrator.micro_step(&self.params, &mut self.vars) {
            MicroStep::Rejected => Event::Rejected,
            MicroStep::Accepted(_) => Event::Accepted,
        };
        self.phase = self.phase.next(event);
        if self.phase == Phase::Equilibrating {
            return StepOutcome::Rejected;
        }

        self.pipeline.run(&self.params, &mut self.vars);
        rapid_regulation(&mut self.params, &mut self.vars);
        transfuse(&mut self.params, &mut self.vars);
        let permitted = self.notify();

        self.phase = self.phase.next(Event::PipelineDone);
        StepOutcome::Completed { permitted }
    }

    /// Iterates until one slow step completes. Returns the rejections seen.
    pub fn advance(&mut self) -> u64 {
        let mut rejected = 0;
        while self.step() == StepOutcome::Rejected {
            rejected += 1;
        }
        rejected
    }

    /// Runs until `t >= end_min`.
    pub fn run_until(&mut self, end_min: f64) -> RunSummary {
        self.start();
        let mut summary = RunSummary {
            start_min: self.vars.t,
            ..Default::default()
        };
        while self.vars.t < end_min {
            match self.step() {
                StepOutcome::Rejected => summary.rejected += 1,
                StepOutcome::Completed { .. } => summary.accepted += 1,
            }
        }
        summary.end_min = self.vars.t;
        log::info!(
            "Simulated {:.3} to {:.3} min: {} steps, {} rejected micro-steps",
            summary.start_min,
            summary.end_min,
            summary.accepted,
            summary.rejected
        );
        summary
    }

    /// Runs to [`Simulation::stop_time`].
    pub fn run(&mut self) -> RunSummary {
        let end = self.stop_time();
        log::info!("Running to t = {} min", end);
        self.run_until(end)
    }

    pub fn snapshot(&self) -> ModelState {
        self.registry.snapshot(&self.params, &self.vars)
    }

    pub fn diagnostics(&self) -> SolverDiagnostics {
        SolverDiagnostics {
            time_min: self.vars.t,
            step_min: self.vars.i,
            accepted_steps: self.equilibrator.accepted,
            rejected_micro_steps: self.equilibrator.rejected,
            solvers: self.pipeline.solver_stats(),
            nephron: self.pipeline.nephron_stats().clone(),
        }
    }

    /// Notifies the instruments of the initial state, once.
    fn start(&mut self) {
        if !self.started {
            self.started = true;
            self.notify();
        }
    }

    fn notify(&mut self) -> bool {
        let obs = Observation {
            params: &self.params,
            vars: &self.vars,
            registry: &self.registry,
        };
        self.bus.notify(&obs)
    }

    /// Switches that override parameters every iteration.
    fn apply_overrides(&mut self) {
        let (p, v) = (&mut self.params, &mut self.vars);
        if v.aurg <= 0.0 {
            p.poz = 0.0;
            p.pon = 0.0;
            p.pok = 0.0;
            p.pom = 0.0;
            p.pom2 = 0.0;
        }
        // Doubles the extra-renal resistance
        if v.rps > 0.0 {
            p.rar = 60.0;
            v.ram = 180.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Simulation {
        Simulation::new(
            Parameters::default(),
            Variables::default(),
            EngineConfig::default(),
        )
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(Phase::Equilibrating.next(Event::Rejected), Phase::Equilibrating);
        assert_eq!(Phase::Equilibrating.next(Event::Accepted), Phase::Advancing);
        assert_eq!(Phase::Advancing.next(Event::PipelineDone), Phase::Equilibrating);
        assert_eq!(Phase::Advancing.next(Event::Rejected), Phase::Advancing);
    }

    #[test]
    fn test_first_iteration_from_reference_state() {
        let mut sim = reference();
        let outcome = sim.step();

        assert!(matches!(outcome, StepOutcome::Completed { .. }));
        assert!(sim.vars.t > 0.0 && sim.vars.t <= 0.0036 + 1e-12, "t = {}", sim.vars.t);
        assert!((sim.vars.pa - 100.0).abs() < 1.0, "pa = {}", sim.vars.pa);
        assert_eq!(sim.phase(), Phase::Equilibrating);
    }

    #[test]
    fn test_default_stop_time_is_four_weeks() {
        assert_eq!(reference().stop_time(), 40320.0);
    }

    #[test]
    fn test_rps_override() {
        let mut sim = reference();
        sim.vars.rps = 1.0;
        sim.step();
        assert_eq!(sim.params.rar, 60.0);
    }

    #[test]
    fn test_zero_initial_step_still_advances() {
        let config = EngineConfig {
            initial_dt_min: 0.0,
            ..EngineConfig::default()
        };
        let mut sim = Simulation::new(Parameters::default(), Variables::default(), config);
        assert_eq!(sim.vars.i, 0.003);

        for _ in 0..1000 {
            sim.step();
        }
        assert!(sim.vars.i > 0.0, "dt = {}", sim.vars.i);
        assert!(sim.vars.t > 0.0, "t = {}", sim.vars.t);
    }

    #[test]
    fn test_initial_state_is_notified_once() {
        let mut sim = reference();
        sim.run_until(1.0);
        sim.run_until(2.0);
        let d = sim.diagnostics();
        assert_eq!(sim.bus_mut().notifications, d.accepted_steps + 1);
    }
}
