use std::collections::HashSet;

use uri_utility::{component::Host, pct_enc::EStr, HostKind, IriRef, ParseErrorKind};

#[test]
fn components() {
    let s = "foo://user@example.com:8042/over/there?name=ferret#nose";
    let iri = IriRef::parse(s).unwrap();

    assert_eq!(iri.as_str(), s);
    assert_eq!(iri.scheme(), Some("foo"));
    assert_eq!(iri.path(), "/over/there");
    assert_eq!(iri.query(), Some(EStr::new("name=ferret").unwrap()));
    assert_eq!(iri.fragment(), Some(EStr::new("nose").unwrap()));
    assert!(iri.has_scheme() && iri.has_authority() && iri.has_query() && iri.has_fragment());

    let auth = iri.authority().unwrap();
    assert_eq!(auth.as_str(), "user@example.com:8042");
    assert_eq!(auth.userinfo().unwrap(), "user");
    assert_eq!(auth.host(), "example.com");
    assert_eq!(auth.host_kind(), HostKind::RegName);
    assert_eq!(
        auth.host_parsed(),
        Host::RegName(EStr::new("example.com").unwrap())
    );
    assert_eq!(auth.port(), Some("8042"));
    assert_eq!(auth.port_to_u16(), Ok(Some(8042)));
    assert!(auth.has_userinfo() && auth.has_port());

    // Spans index into the whole reference.
    let spans = auth.spans();
    assert_eq!(spans.span().slice(s), auth.as_str());
    assert_eq!(spans.host().slice(s), "example.com");
    assert_eq!(iri.spans().path().slice(s), "/over/there");
}

#[test]
fn components_absent() {
    let iri = IriRef::parse("mailto:John.Doe@example.com").unwrap();
    assert_eq!(iri.scheme(), Some("mailto"));
    assert!(iri.authority().is_none());
    assert_eq!(iri.path(), "John.Doe@example.com");
    assert!(iri.query().is_none() && iri.fragment().is_none());

    let iri = IriRef::parse("").unwrap();
    assert!(!iri.has_scheme() && !iri.has_authority());
    assert!(iri.path().is_empty());

    let iri = IriRef::parse("//h:?#").unwrap();
    let auth = iri.authority().unwrap();
    assert!(!auth.has_userinfo());
    assert_eq!(auth.port(), Some(""));
    assert_eq!(auth.port_to_u16(), Ok(None));
    assert_eq!(iri.query(), Some(EStr::EMPTY));
    assert_eq!(iri.fragment(), Some(EStr::EMPTY));

    let iri = IriRef::parse("//h:65536").unwrap();
    assert!(iri.authority().unwrap().port_to_u16().is_err());
    let iri = IriRef::parse("//h:00080").unwrap();
    assert_eq!(iri.authority().unwrap().port_to_u16(), Ok(Some(80)));
}

#[test]
fn international() {
    let s = "http://\u{4f8b}\u{5b50}.\u{6d4b}\u{8bd5}/\u{8def}%E5%BE%84?\u{e000}";
    let iri = IriRef::parse(s).unwrap();
    let auth = iri.authority().unwrap();
    assert_eq!(auth.host(), "\u{4f8b}\u{5b50}.\u{6d4b}\u{8bd5}");
    assert_eq!(iri.path().decode().to_string().unwrap(), "/\u{8def}\u{5f84}");
    assert_eq!(iri.query().unwrap(), "\u{e000}");

    // Private-use characters are only allowed in the query.
    assert!(IriRef::parse("/\u{e000}").is_err());
}

#[test]
fn parse_owned() {
    let iri = IriRef::parse(String::from("http://example.com/")).unwrap();
    assert_eq!(iri.scheme(), Some("http"));
    assert_eq!(iri.borrow().path(), "/");
    assert_eq!(iri.into_string(), "http://example.com/");

    let (e, s) = IriRef::parse(String::from("http://exa mple.com")).unwrap_err();
    assert_eq!(s, "http://exa mple.com");
    assert_eq!(e.index(), 10);
    assert_eq!(e.kind(), ParseErrorKind::UnexpectedCharOrEnd);

    let iri: IriRef<String> = "//[::1]".parse().unwrap();
    assert!(matches!(
        iri.authority().unwrap().host_parsed(),
        Host::Ipv6 { zone_id: None, .. }
    ));
    assert!("a%2".parse::<IriRef<String>>().is_err());

    let iri = IriRef::<&str>::try_from("a/b").unwrap();
    let owned: IriRef<String> = iri.into();
    assert_eq!(owned, iri);
    assert_eq!(owned, iri.to_owned());
    assert_eq!(String::from(owned), "a/b");
    assert!(IriRef::<String>::try_from(String::from("a b")).is_err());
    assert_eq!(<&str>::from(iri), "a/b");
}

#[test]
fn resolve_against() {
    let base = IriRef::parse("http://example.com/foo/bar?q").unwrap();
    let cases = [
        ("baz", "http://example.com/foo/baz"),
        ("../baz", "http://example.com/baz"),
        ("?baz", "http://example.com/foo/bar?baz"),
        ("#f", "http://example.com/foo/bar?q#f"),
        ("//h", "http://h"),
    ];
    for (r, t) in cases {
        let resolved = IriRef::parse(r).unwrap().resolve_against(&base);
        assert_eq!(resolved, t);
        // The component boundaries agree with a fresh parse.
        assert_eq!(resolved.spans(), IriRef::parse(t).unwrap().spans());
    }

    let owned_base = base.to_owned();
    let resolved = IriRef::parse("./a:b").unwrap().resolve_against(&owned_base);
    assert_eq!(resolved, "http://example.com/foo/a:b");

    let resolved = IriRef::parse("a:b")
        .unwrap()
        .resolve_against(&IriRef::parse("c").unwrap());
    assert_eq!(resolved, "a:b");
    assert_eq!(resolved.scheme(), Some("a"));

    let resolved = IriRef::parse("./a:b")
        .unwrap()
        .resolve_against(&IriRef::parse("c").unwrap());
    assert_eq!(resolved, "./a:b");
    assert_eq!(resolved.scheme(), None);
    assert_eq!(resolved.path(), "./a:b");
}

#[test]
fn fmt() {
    let iri = IriRef::parse("http://user@example.com/a?b#c").unwrap();
    assert_eq!(iri.to_string(), "http://user@example.com/a?b#c");
    assert_eq!(
        format!("{iri:?}"),
        "IriRef { scheme: Some(\"http\"), authority: Some(Authority { userinfo: Some(\"user\"), \
         host: \"example.com\", host_parsed: RegName(\"example.com\"), port: None }), \
         path: \"/a\", query: Some(\"b\"), fragment: Some(\"c\") }"
    );
}

#[test]
fn compare() {
    let a = IriRef::parse("http://a/").unwrap();
    let b = IriRef::parse("http://b/").unwrap();
    assert!(a < b);
    assert_ne!(a, b);
    assert_eq!(a, "http://a/");
    assert_eq!("http://a/", a);
    // No normalization is performed.
    assert_ne!(a, IriRef::parse("HTTP://a/").unwrap());

    let set: HashSet<_> = [a, b, IriRef::parse("http://a/").unwrap()].into();
    assert_eq!(set.len(), 2);
}
