//! End-to-end tests of the simulation driver.
//!
//! Tests verify that:
//! - Runs are bit-for-bit reproducible
//! - The reference state is a steady state for the first step
//! - A day with either kidney keeps the circulation physiological
//! - Runs stop at the experiment's last declared time

use body_simulator_x::{
    engine::StepOutcome,
    instrument::{Observation, OutputTimes},
    EngineConfig, Experiment, Parameters, Simulation, StateRegistry, Variables,
};
use std::cell::RefCell;
use std::rc::Rc;

fn simulation(params: Parameters) -> Simulation {
    Simulation::new(params, Variables::default(), EngineConfig::default())
}

fn nephron_params() -> Parameters {
    Parameters {
        newkidney: 1.0,
        ..Parameters::default()
    }
}

// ============================================================================
// Integrator
// ============================================================================

#[test]
fn test_runs_are_deterministic() {
    let mut a = simulation(Parameters::default());
    let mut b = simulation(Parameters::default());
    a.run_until(60.0);
    b.run_until(60.0);

    let diff = a.snapshot().diff(&b.snapshot());
    assert!(diff.is_empty(), "runs diverged: {:?}", &diff[..diff.len().min(5)]);
}

#[test]
fn test_first_iteration_is_steady() {
    let mut sim = simulation(Parameters::default());
    let pa0 = sim.vars.pa;

    let rejected = sim.advance();

    assert_eq!(rejected, 0);
    assert!(sim.vars.t > 0.0 && sim.vars.t <= 0.0036 + 1e-12, "t = {}", sim.vars.t);
    assert!(
        ((sim.vars.pa - pa0) / pa0).abs() < 0.01,
        "pa moved from {} to {}",
        pa0,
        sim.vars.pa
    );
}

#[test]
fn test_step_grows_after_acceptance() {
    let mut sim = simulation(Parameters::default());
    let dt0 = sim.vars.i;
    sim.advance();
    assert!(sim.vars.i > dt0);
    assert!(sim.vars.i <= sim.params.i3);
}

#[test]
fn test_legacy_kidney_one_day() {
    let mut sim = simulation(Parameters::default());
    let summary = sim.run_until(1440.0);

    assert!(summary.end_min >= 1440.0);
    assert!(sim.vars.pa > 95.0 && sim.vars.pa < 105.0, "pa = {}", sim.vars.pa);
    assert!(sim.vars.cna > 140.0 && sim.vars.cna < 144.0, "cna = {}", sim.vars.cna);
    assert!(sim.vars.vud > 0.0);
}

#[test]
fn test_nephron_kidney_one_day() {
    let mut sim = simulation(nephron_params());
    sim.run_until(1440.0);

    assert!(sim.vars.pa > 80.0 && sim.vars.pa < 140.0, "pa = {}", sim.vars.pa);
    let state = sim.snapshot();
    let bad: Vec<_> = state
        .variables
        .iter()
        .filter(|(_, x)| !x.is_finite())
        .map(|(name, _)| name.clone())
        .collect();
    assert!(bad.is_empty(), "non-finite variables: {:?}", bad);

    let d = sim.diagnostics();
    assert!(d.nephron.solves > 0);
    assert_eq!(d.nephron.shooting_cap_hits, 0);
}

#[test]
fn test_shadow_renal_does_not_change_results() {
    let mut plain = simulation(Parameters::default());
    let config = EngineConfig {
        shadow_renal: true,
        ..EngineConfig::default()
    };
    let mut shadowed = Simulation::new(Parameters::default(), Variables::default(), config);

    plain.run_until(10.0);
    shadowed.run_until(10.0);

    assert!(plain.snapshot().diff(&shadowed.snapshot()).is_empty());
    // The shadow kidney still ran
    assert!(shadowed.diagnostics().nephron.solves > 0);
    assert_eq!(plain.diagnostics().nephron.solves, 0);
}

// ============================================================================
// Experiments and instruments
// ============================================================================

#[test]
fn test_run_stops_at_experiment_end() {
    let registry = StateRegistry::new();
    let exp = Experiment::parse("o= pa\nt= 0\nnid 0.3\nt= 30\n".as_bytes(), &registry.params)
        .unwrap();
    let mut sim = simulation(Parameters::default()).with_experiment(exp);

    assert_eq!(sim.stop_time(), 30.0);
    let summary = sim.run();

    assert!(summary.end_min >= 30.0);
    assert!(summary.end_min < 30.0 + sim.params.i3);
    assert_eq!(sim.params.nid, 0.3);
}

#[test]
fn test_change_set_applies_mid_run() {
    let registry = StateRegistry::new();
    let exp = Experiment::parse("t= 5\nnid 0.4\nt= 30\n".as_bytes(), &registry.params).unwrap();
    let mut sim = simulation(Parameters::default()).with_experiment(exp);

    sim.run_until(4.0);
    assert_eq!(sim.params.nid, 0.1);
    sim.run_until(20.0);
    assert_eq!(sim.params.nid, 0.4);
}

#[test]
fn test_output_times_filter_reports_once_per_time() {
    let times = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&times);

    let mut sim = simulation(Parameters::default());
    let bus = sim.bus_mut();
    bus.add_filter(OutputTimes::new(vec![1.0, 2.0, 3.0]));
    bus.add_instrument_fn(move |obs: &Observation| {
        seen.borrow_mut().push(obs.vars.t);
        true
    });
    sim.run_until(5.0);

    let times = times.borrow();
    assert_eq!(times.len(), 3, "{:?}", times);
    assert!(times[0] >= 1.0 && times[1] >= 2.0 && times[2] >= 3.0);
    assert!(times.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn test_every_completed_step_is_reported_without_filter() {
    let mut sim = simulation(Parameters::default());
    let mut permitted = 0;
    for _ in 0..20 {
        if let StepOutcome::Completed { permitted: true } = sim.step() {
            permitted += 1;
        }
    }
    // The initial notification plus one per completed step
    assert_eq!(sim.bus_mut().permitted, permitted + 1);
}
