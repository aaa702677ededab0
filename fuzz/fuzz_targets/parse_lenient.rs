#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_utility::{split_with, ParseMode};

fuzz_target!(|data: &str| {
    let r = split_with(data, ParseMode::IriLenient).unwrap();
    assert_eq!(data.is_ascii(), split_with(data, ParseMode::UriLenient).is_ok());

    let mut end = 0;
    let spans = [
        r.scheme(),
        r.authority().map(|a| a.span()),
        Some(r.path()),
        r.query(),
        r.fragment(),
    ];
    for span in spans.into_iter().flatten() {
        assert!(end <= span.start && span.start <= span.end);
        end = span.end;
    }
    assert!(end <= data.len());
});
