//! Pipeline and renal solver benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use body_simulator_x::config::{EngineConfig, NephronConfig, Parameters};
use body_simulator_x::engine::{Pipeline, Simulation};
use body_simulator_x::physiology::circdyn;
use body_simulator_x::renal::{NephronParams, NephronSolver};
use body_simulator_x::state::Variables;

fn bench_slow_pipeline(c: &mut Criterion) {
    let params = Parameters::default();
    let mut vars = Variables::default();
    circdyn::update(&params, &mut vars);
    let mut pipeline = Pipeline::new(&EngineConfig::default());

    c.bench_function("slow_pipeline", |b| {
        b.iter(|| {
            let mut v = vars.clone();
            pipeline.run(black_box(&params), &mut v);
            v
        })
    });
}

fn bench_nephron_solve(c: &mut Criterion) {
    let params = NephronParams::from(&Parameters::default());
    let mut solver = NephronSolver::new(NephronConfig::default());

    c.bench_function("nephron_solve", |b| {
        b.iter(|| solver.solve(black_box(&params), black_box(100.0)))
    });
}

fn bench_one_hour(c: &mut Criterion) {
    c.bench_function("simulate_one_hour", |b| {
        b.iter(|| {
            let mut sim = Simulation::new(
                Parameters::default(),
                Variables::default(),
                EngineConfig::default(),
            );
            sim.run_until(black_box(60.0))
        })
    });
}

criterion_group!(benches, bench_slow_pipeline, bench_nephron_solve, bench_one_hour);
criterion_main!(benches);
