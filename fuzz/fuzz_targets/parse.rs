#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_utility::{IriRef, ParseMode};

fuzz_target!(|data: &str| {
    let Ok(r) = IriRef::parse(data) else {
        return;
    };
    let mut buf = String::with_capacity(data.len());
    if let Some(s) = r.scheme() {
        buf.push_str(s);
        buf.push(':');
    }
    if let Some(a) = r.authority() {
        buf.push_str("//");
        let start = buf.len();
        if let Some(ui) = a.userinfo() {
            buf.push_str(ui.as_str());
            buf.push('@');
        }
        buf.push_str(a.host());
        if let Some(p) = a.port() {
            buf.push(':');
            buf.push_str(p);
        }
        assert_eq!(&buf[start..], a.as_str());
    }
    buf.push_str(r.path().as_str());
    if let Some(q) = r.query() {
        buf.push('?');
        buf.push_str(q.as_str());
    }
    if let Some(f) = r.fragment() {
        buf.push('#');
        buf.push_str(f.as_str());
    }
    assert_eq!(data, buf);

    // Whatever the strict mode accepts, the lenient mode splits the same way.
    let lenient = uri_utility::split_with(data, ParseMode::IriLenient).unwrap();
    assert_eq!(lenient, r.spans());

    assert_eq!(data.is_ascii(), uri_utility::is_valid_with(data, ParseMode::UriStrict));
});
