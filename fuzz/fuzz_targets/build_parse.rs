#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_utility::{build_iri, pct_enc::EStr, IriRef};

fuzz_target!(|data: (Option<&str>, &str, Option<&str>, Option<&str>)| {
    let (sa, path, query, fragment) = data;
    let Ok(s) = build_iri(sa, path, query, fragment) else {
        return;
    };
    let r = IriRef::parse(&*s).unwrap();
    assert!(r.as_str().is_ascii());

    let decode = |s: &EStr| s.decode().to_string_lossy().into_owned();

    assert_eq!(r.query().is_some(), query.is_some());
    assert_eq!(r.fragment().is_some(), fragment.is_some());
    if let (Some(q), Some(orig)) = (r.query(), query) {
        if !orig.contains('%') {
            assert_eq!(decode(q), orig);
        }
    }
    if !path.contains('%') {
        assert_eq!(decode(r.path()), path);
    }
});
