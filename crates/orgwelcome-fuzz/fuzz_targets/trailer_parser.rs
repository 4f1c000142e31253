#![no_main]
use libfuzzer_sys::fuzz_target;
use orgwelcome_core::trailers::extract_coauthors;

fuzz_target!(|data: &[u8]| {
    if let Ok(message) = std::str::from_utf8(data) {
        for login in extract_coauthors(message) {
            // Parser contract: never empty, never whitespace
            assert!(!login.is_empty());
            assert!(!login.contains(char::is_whitespace));
        }
    }
});
