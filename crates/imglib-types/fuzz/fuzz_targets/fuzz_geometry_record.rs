#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Saved geometry comes back from an untrusted store
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = serde_json::from_str::<imglib_types::PositionRecord>(s);
        let _ = serde_json::from_str::<imglib_types::SizeRecord>(s);
    }
});
