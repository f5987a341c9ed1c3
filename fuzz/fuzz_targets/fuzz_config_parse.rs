#![no_main]
use libfuzzer_sys::fuzz_target;
use libgsf::config::{Config, MAX_FONT_SCALE, MIN_FONT_SCALE};

fn in_range(scale: f64) -> bool {
    scale.is_finite() && (MIN_FONT_SCALE..=MAX_FONT_SCALE).contains(&scale)
}

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut cfg = Config::from_str(&text);
    assert!(in_range(cfg.font_scale));
    assert_eq!(Config::from_str(&cfg.to_ini()).theme, cfg.theme);

    assert!(in_range(cfg.increase_font_scale()));
    assert!(in_range(cfg.decrease_font_scale()));
});
