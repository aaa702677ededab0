#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_utility::{
    escape, is_valid, is_valid_with,
    pct_enc::{EStr, EscapeMode},
    ParseMode,
};

fuzz_target!(|data: (&str, u8)| {
    let (s, code) = data;
    let mode = EscapeMode::from_code(code % 4).unwrap();

    let once = escape(s, mode);
    assert_eq!(escape(&once, mode), once);

    if mode == EscapeMode::UnsafeAndStrayPercent {
        assert!(EStr::new(&once).is_some());
    }
    assert!(once.is_ascii());
    if is_valid(s) {
        assert!(is_valid_with(&once, ParseMode::UriStrict));
    }
});
