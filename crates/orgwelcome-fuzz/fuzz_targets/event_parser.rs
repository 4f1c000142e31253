#![no_main]
use libfuzzer_sys::fuzz_target;
use orgwelcome_core::TriggerEvent;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        // Parsing must never panic; a parsed event must always produce a
        // search key decision without panicking either.
        if let Ok(event) = TriggerEvent::from_json(raw) {
            let _ = event.search_key();
        }
    }
});
