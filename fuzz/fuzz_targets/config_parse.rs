#![no_main]

use libfuzzer_sys::fuzz_target;
use passgrind::{ConfigFile, SearchConfig};

fuzz_target!(|data: &[u8]| {
    // Fuzz the config parser and resolver with arbitrary text
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(file) = ConfigFile::parse("fuzz.cfg", text) {
            let _ = SearchConfig::from_file(&file);
        }
    }
});
