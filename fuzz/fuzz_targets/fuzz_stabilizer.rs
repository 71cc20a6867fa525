#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use steady_core::{Stabilizer, StabilizerCfg};

#[derive(Debug, Arbitrary)]
struct Input {
    tolerance: u16,
    stability_ms: u16,
    interval_ms: u8,
    range: Option<(i32, i32)>,
    samples: Vec<(i32, u16)>,
}

fuzz_target!(|input: Input| {
    let mut cfg = StabilizerCfg::new(
        i32::from(input.tolerance),
        u64::from(input.stability_ms),
        u64::from(input.interval_ms),
    );
    if let Some((a, b)) = input.range {
        cfg = cfg.with_valid_range(a.min(b), a.max(b));
    }
    let mut f = Stabilizer::new(cfg);
    let mut t = 0u64;
    for (v, gap) in input.samples {
        t += u64::from(gap);
        f.update(v, t);
        assert!(!f.is_stable() || f.has_any_reading());
        if let Some(r) = f.config().valid_range {
            if f.has_any_reading() {
                assert!(r.contains(f.last_value()));
            }
        }
    }
});
