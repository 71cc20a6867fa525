#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse errors and validation errors are fine; panics are not.
    if let Ok(cfg) = toml::from_str::<steady_config::Config>(data) {
        if cfg.validate().is_ok() {
            // A validated config must resolve to timings without panicking.
            let _ = cfg.height_timing();
            let _ = cfg.bpm_timing();
            let _ = cfg.spo2_timing();
        }
    }
});
