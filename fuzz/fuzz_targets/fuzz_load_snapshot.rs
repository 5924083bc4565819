#![no_main]
use api_compat::pipeline::{parse_surface_str, SnapshotFormat};
use libfuzzer_sys::fuzz_target;

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the snapshot loader in both formats.
///
/// Also wraps input as the member list of a type so deeper member
/// deserialization is reached.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_surface_str(s, SnapshotFormat::Json);
        let _ = parse_surface_str(s, SnapshotFormat::Yaml);

        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                concat!(
                    r#"{{"name":"Fuzz","types":[{{"full_name":"Ns.T","#,
                    r#""kind":"class","members":[{}]}}]}}"#,
                ),
                s
            );
            let _ = parse_surface_str(&wrapped, SnapshotFormat::Json);
        }
    }
});
