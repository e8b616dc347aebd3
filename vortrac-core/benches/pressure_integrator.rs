use std::{hint::black_box, time::Duration};

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use vortrac_core::pressure_integrator::deficit_profile;

const FIRST_RING_KM: u32 = 3;
const LAST_RING_KM: u32 = 150;

/// A Rankine-like VTC0 profile: linear growth to the radius of maximum
/// wind, then 1/r decay, with every fifth ring missing a fit, approximating
/// the gap pattern a real analysis produces.
fn synthetic_profile() -> Vec<Option<f32>> {
    let rmw_km = 30.0f32;
    let v_max = 45.0f32;
    (0..=LAST_RING_KM)
        .map(|r| {
            if r % 5 == 0 {
                return None;
            }
            let r = r as f32;
            let v = if r <= rmw_km { v_max * (r / rmw_km) } else { v_max * (rmw_km / r) };
            Some(v)
        })
        .collect()
}

fn benchmark_deficit_profile(c: &mut Criterion) {
    let profile = synthetic_profile();

    let mut group = c.benchmark_group("pressure_integrator");
    group
        .warm_up_time(Duration::from_secs(3))
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);

    group.bench_function("deficit_profile_150_rings", |b| {
        b.iter_batched(
            || profile.clone(),
            |profile| deficit_profile(&profile, FIRST_RING_KM, LAST_RING_KM, black_box(25.0), black_box(1.0)),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, benchmark_deficit_profile);
criterion_main!(benches);
