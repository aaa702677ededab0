#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_utility::{resolve, IriRef};

fuzz_target!(|data: (&str, &str)| {
    let (Ok(base), Ok(r)) = (IriRef::parse(data.0), IriRef::parse(data.1)) else {
        return;
    };

    let u1 = r.resolve_against(&base);
    let u2 = IriRef::parse(u1.as_str()).unwrap();
    assert_eq!(u1.spans(), u2.spans());
    assert_eq!(resolve(data.1, data.0).unwrap(), u1.as_str());

    assert_eq!(u1.scheme(), r.scheme().or(base.scheme()));
    assert_eq!(u1.fragment(), r.fragment());

    // Resolving an absolute result again is a no-op.
    if u1.has_scheme() {
        assert_eq!(u1.resolve_against(&base), u1);
    }
});
