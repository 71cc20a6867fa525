use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use steady_core::{Stabilizer, StabilizerCfg};

// Synthetic trace: plateaus with additive white noise, one step every 2000 samples.
fn synth_trace(n: usize, noise_amp: f32, seed: u32) -> Vec<f32> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut next_f32 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        (x as f32) / (u32::MAX as f32 + 1.0)
    };
    (0..n)
        .map(|i| {
            let level = 60.0 + 10.0 * ((i / 2000) % 4) as f32;
            level + (next_f32() * 2.0 - 1.0) * noise_amp
        })
        .collect()
}

pub fn bench_update(c: &mut Criterion) {
    let mut g = c.benchmark_group("stabilizer_update");
    // Allow quick tweaking without CLI flags (Criterion 0.5):
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p steady_core --bench stabilizer
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(1));
        }
    } else {
        g.sample_size(50);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }

    let n = 50_000usize;
    let trace = synth_trace(n, 3.0, 0xC0FFEE);
    let trace_i32: Vec<i32> = trace.iter().map(|v| v.round() as i32).collect();

    g.bench_function("f32_ranged", |b| {
        b.iter_batched(
            || {
                Stabilizer::new(
                    StabilizerCfg::new(5.0f32, 3000, 100).with_valid_range(40.0, 200.0),
                )
            },
            |mut f| {
                for (i, &v) in trace.iter().enumerate() {
                    f.update(black_box(v), i as u64 * 10);
                }
                black_box(f.stable_value());
            },
            BatchSize::SmallInput,
        )
    });

    g.bench_function("i32_unranged", |b| {
        b.iter_batched(
            || Stabilizer::new(StabilizerCfg::new(2i32, 3000, 0)),
            |mut f| {
                for (i, &v) in trace_i32.iter().enumerate() {
                    f.update(black_box(v), i as u64 * 10);
                }
                black_box(f.is_stable());
            },
            BatchSize::SmallInput,
        )
    });

    g.finish();
}

criterion_group!(benches, bench_update);
criterion_main!(benches);
