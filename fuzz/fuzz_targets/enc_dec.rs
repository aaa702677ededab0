#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_utility::pct_enc::{decode_with, encode, table, EStr};

fuzz_target!(|data: &[u8]| {
    let mut buf = String::new();
    let mut lossy = String::new();

    for chunk in data.utf8_chunks() {
        buf.push_str(&encode(chunk.valid(), table::IQUERY));
        lossy.push_str(chunk.valid());

        for &x in chunk.invalid() {
            buf.push_str(&format!("%{x:02X}"));
        }
        if !chunk.invalid().is_empty() {
            lossy.push(char::REPLACEMENT_CHARACTER);
        }
    }

    let estr = EStr::new(&buf).unwrap();
    assert_eq!(data, &*estr.decode().to_bytes());
    assert_eq!(lossy, decode_with(&buf, true).unwrap());
    assert_eq!(
        std::str::from_utf8(data).is_ok(),
        decode_with(&buf, false).is_ok()
    );
});
