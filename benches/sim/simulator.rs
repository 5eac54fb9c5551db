use std::time::Duration;

use criterion::{criterion_group, Criterion};
use toroidal_sand::sim::simulator::{SandSimulator, SandSimulatorBuilder, StepUniforms};
use toroidal_sand::util::clock::Clock;

/// The default simulator for benchmarking
fn get_simulator() -> SandSimulator {
    SandSimulatorBuilder::new()
        .width(256)
        .height(256)
        .seed_spacing(2)
        .ttl_decay(true)
        .build(|u: f32, v: f32| (u * v).fract())
        .unwrap()
}

fn bench_step(c: &mut Criterion) {
    let mut simulator = get_simulator();
    let mut clock = Clock::new();
    // Seed some sand so the step is not a pure no-op over air
    clock.update(Duration::from_millis(16));
    simulator.step(&StepUniforms::from_clock(&clock, true, false, 0));

    c.bench_function("step", |b| {
        b.iter(|| {
            clock.update(Duration::from_millis(16));
            simulator.step(&StepUniforms::from_clock(&clock, false, false, 0));
        })
    });
}

fn bench_to_raw_image(c: &mut Criterion) {
    let simulator = get_simulator();
    c.bench_function("to_raw_image", |b| {
        b.iter(|| {
            simulator.to_raw_image();
        })
    });
}

criterion_group!(benches, bench_step, bench_to_raw_image);
