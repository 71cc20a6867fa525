use steady_config::{DisplayKind, Profile, load_toml};

#[test]
fn empty_config_uses_esp_defaults() {
    let cfg = load_toml("").expect("parse TOML");
    cfg.validate().expect("defaults should validate");
    assert_eq!(cfg.profile, Profile::Esp);
    assert_eq!(cfg.height_timing(), (3000, 100));
    assert_eq!(cfg.height.tolerance_cm, 2);
    assert_eq!(cfg.height.max_distance_cm, 200);
    assert_eq!(cfg.display.kind, DisplayKind::Auto);
    assert_eq!(cfg.display.lcd_address, 0x27);
}

#[test]
fn uno_profile_changes_timing_unless_overridden() {
    let toml = r#"
profile = "uno"

[pulse.bpm]
stability_ms = 1500
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.height_timing(), (2000, 200));
    assert_eq!(cfg.spo2_timing(), (2000, 200));
    assert_eq!(cfg.bpm_timing(), (1500, 200));
    // Untouched fields of a partially specified section keep their defaults.
    assert_eq!(cfg.pulse.bpm.tolerance, 5.0);
    assert_eq!((cfg.pulse.bpm.min, cfg.pulse.bpm.max), (40.0, 200.0));
}

#[test]
fn accepts_full_config() {
    let toml = r#"
profile = "esp"

[height]
tolerance_cm = 3
stability_ms = 2500
sample_interval_ms = 50
max_distance_cm = 300
reject_no_echo = true

[pulse]
report_period_ms = 500
poll_ms = 5

[pulse.spo2]
tolerance = 1
min = 70
max = 100

[pins]
trig = 23
echo = 24

[display]
kind = "oled"
oled_address = 0x3D

[logging]
level = "debug"
rotation = "daily"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert!(cfg.height.reject_no_echo);
    assert_eq!(cfg.height_timing(), (2500, 50));
    assert_eq!(cfg.display.kind, DisplayKind::Oled);
    assert_eq!(cfg.display.oled_address, 0x3D);
    assert_eq!(cfg.pins.trig, 23);
}

#[test]
fn rejects_unknown_profile() {
    let err = load_toml("profile = \"mega\"").expect_err("unknown profile must not parse");
    assert!(format!("{err}").contains("mega"));
}

fn assert_invalid(toml: &str, needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        format!("{err}").to_lowercase().contains(needle),
        "expected '{needle}' in '{err}'"
    );
}

#[test]
fn rejects_zero_height_interval() {
    assert_invalid(
        "[height]\nsample_interval_ms = 0\n",
        "height.sample_interval_ms must be >= 1",
    );
}

#[test]
fn rejects_negative_tolerances() {
    assert_invalid("[height]\ntolerance_cm = -1\n", "height.tolerance_cm");
    assert_invalid("[pulse.bpm]\ntolerance = -0.5\n", "pulse.bpm.tolerance");
    assert_invalid("[pulse.spo2]\ntolerance = -2\n", "pulse.spo2.tolerance");
}

#[test]
fn rejects_inverted_ranges() {
    assert_invalid("[pulse.bpm]\nmin = 150.0\nmax = 60.0\n", "pulse.bpm.min");
    assert_invalid("[pulse.spo2]\nmin = 99\nmax = 90\n", "pulse.spo2.min");
    assert_invalid("[pulse.spo2]\nmax = 120\n", "within [0, 100]");
}

#[test]
fn rejects_poll_slower_than_report() {
    assert_invalid(
        "[pulse]\nreport_period_ms = 100\npoll_ms = 200\n",
        "pulse.poll_ms must be <= pulse.report_period_ms",
    );
}

#[test]
fn rejects_bad_rotation() {
    assert_invalid("[logging]\nrotation = \"weekly\"\n", "logging.rotation");
}
