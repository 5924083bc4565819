#![no_main]
use api_compat::filter::AttributeFilter;
use api_compat::pipeline::{parse_surface_str, SnapshotFormat};
use api_compat::rules::{standard_rules, RuleSettings};
use api_compat::CompatEngine;
use libfuzzer_sys::fuzz_target;

/// Compare a fuzzed surface against itself and against an empty surface.
///
/// Any surface that loads must compare without panicking.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(surface) = parse_surface_str(s, SnapshotFormat::Json) else {
        return;
    };

    let engine = CompatEngine::new(standard_rules(
        RuleSettings::default(),
        AttributeFilter::with_defaults(),
    ))
    .parallel(false);
    let empty = api_compat::ApiSurface::default();

    let _ = engine.compare(&surface, &surface);
    let _ = engine.compare(&surface, &empty);
    let _ = engine.compare(&empty, &surface);
});
