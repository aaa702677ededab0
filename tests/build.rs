use uri_utility::{build_iri, is_valid_with, BuildError, ParseMode};

#[test]
fn build() {
    let cases = [
        (
            Some("http://example.com"),
            "/a b/%41%",
            Some("q?"),
            Some("\u{fc}"),
            "http://example.com/a%20b/%41%25?q%3F#%C3%BC",
        ),
        (Some("urn:"), "isbn:123", None, Some("a b"), "urn:isbn:123#a%20b"),
        (Some("s:"), "a:b", None, None, "s:a:b"),
        (Some("//h"), "", Some(""), Some(""), "//h?#"),
        (Some("//u@h:80"), "/p", None, None, "//u@h:80/p"),
        (Some("http://[::1]"), "/[x]", None, None, "http://[::1]/%5Bx%5D"),
        (None, "a/b:c", Some("k=v&k2=(v2)"), None, "a/b:c?k=v&k2=(v2)"),
        (None, "", Some("#"), Some("%zz"), "?%23#%25zz"),
        (Some(""), "a", None, None, "a"),
        (None, "a", Some(""), None, "a?"),
        (Some(""), "", None, Some(""), "#"),
        (None, "/~user/x.y_z-", None, None, "/~user/x.y_z-"),
        (None, "\"<>\\^`{|}", None, None, "%22%3C%3E%5C%5E%60%7B%7C%7D"),
    ];
    for (sa, path, query, fragment, out) in cases {
        let s = build_iri(sa, path, query, fragment).unwrap();
        assert_eq!(s, out);
        assert!(is_valid_with(&s, ParseMode::UriStrict), "{s:?}");
    }
}

#[test]
fn build_error() {
    assert_eq!(
        build_iri(Some("//h"), "p", None, None),
        Err(BuildError::NonemptyRootlessPath)
    );
    assert_eq!(
        build_iri(None, "//p", None, None),
        Err(BuildError::PathStartsWithDoubleSlash)
    );
    assert_eq!(
        build_iri(Some("s:"), "//p", None, None),
        Err(BuildError::PathStartsWithDoubleSlash)
    );
    assert_eq!(
        build_iri(None, "a:b", None, None),
        Err(BuildError::FirstPathSegmentContainsColon)
    );
    assert_eq!(
        build_iri(Some(""), "a:b/c", None, None),
        Err(BuildError::FirstPathSegmentContainsColon)
    );

    for sa in [
        "example",
        "http://h/p",
        "http://h?q",
        "http://h#f",
        "http://h h",
        "?q",
        "1a:",
    ] {
        assert_eq!(
            build_iri(Some(sa), "", None, None),
            Err(BuildError::InvalidSchemeAndAuthority),
            "{sa:?}"
        );
    }

    assert_eq!(
        BuildError::NonemptyRootlessPath.to_string(),
        "when authority is present, path should either be empty or start with '/'"
    );
}
