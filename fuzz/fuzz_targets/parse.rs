#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic, at any width.
    let _ = atof::parse::<half::f16>(data);
    let _ = atof::parse::<atof::F128>(data);
    let _ = atof::parse::<f32>(data);

    // On the grammar shared with the standard library (no separators, no
    // hex floats), an accepted input must agree with it bit for bit.
    if let Ok(ours) = atof::parse::<f64>(data) {
        let s = match std::str::from_utf8(data) {
            Ok(s) => s,
            Err(_) => return,
        };
        if s.contains('_') || s.contains('x') || s.contains('X') {
            return;
        }
        let std: f64 = s.parse().expect("std rejected what we accepted");
        if ours.is_nan() {
            assert!(std.is_nan());
        } else {
            assert_eq!(ours.to_bits(), std.to_bits(), "{s}");
        }
    }
});
