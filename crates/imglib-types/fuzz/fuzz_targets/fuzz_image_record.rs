#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Host-supplied image batches must never panic the parser
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = serde_json::from_str::<Vec<imglib_types::ImageRecord>>(s);
    }
});
