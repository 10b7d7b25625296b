#![no_main]

use bezel_types::config::UiConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Arbitrary TOML must either parse into a config or return a
        // parse error -- never panic.
        let _result = UiConfig::from_toml_str(input);
    }
});
