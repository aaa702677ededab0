use std::borrow::Cow;

use uri_utility::{
    is_valid, is_valid_with,
    pct_enc::{
        decode, decode_range, decode_with, encode, escape, table, DecodedChunk, EStr, EscapeMode,
        Table,
    },
    DecodeErrorKind::*,
    ParseMode,
};

const MODES: [EscapeMode; 4] = [
    EscapeMode::Unsafe,
    EscapeMode::NonAsciiValidated,
    EscapeMode::NonAscii,
    EscapeMode::UnsafeAndStrayPercent,
];

#[test]
fn decode_replacement() {
    assert_eq!(decode("te%c2%80t").unwrap(), "te\u{80}t");
    assert_eq!(decode_with("te%c2%80t", false).unwrap(), "te\u{80}t");

    assert_eq!(decode("te%c2%40t").unwrap(), "te\u{fffd}@t");
    assert_eq!(decode_with("te%c2%40t", true).unwrap(), "te\u{fffd}@t");
    let e = decode_with("te%c2%40t", false).unwrap_err();
    assert_eq!(e.index(), 2);
    assert_eq!(e.kind(), InvalidUtf8);

    assert_eq!(decode("te%c2%c3t").unwrap(), "te\u{fffd}\u{fffd}t");
    let e = decode_with("te%c2%c3t", false).unwrap_err();
    assert_eq!(e.index(), 2);
    assert_eq!(e.kind(), InvalidUtf8);

    // One replacement for a truncated but well-started sequence.
    assert_eq!(decode("%e2%82").unwrap(), "\u{fffd}");
    assert_eq!(decode("%f0%9f%98x").unwrap(), "\u{fffd}x");
    // Over-long encodings, surrogates and out-of-range code points
    // are replaced byte by byte.
    assert_eq!(decode("%c0%af").unwrap(), "\u{fffd}\u{fffd}");
    assert_eq!(decode("%e0%80%af").unwrap(), "\u{fffd}\u{fffd}\u{fffd}");
    assert_eq!(decode("%ed%a0%80").unwrap(), "\u{fffd}\u{fffd}\u{fffd}");
    assert_eq!(
        decode("%f4%90%80%80").unwrap(),
        "\u{fffd}\u{fffd}\u{fffd}\u{fffd}"
    );
    // A lone continuation byte.
    assert_eq!(decode("a%80b").unwrap(), "a\u{fffd}b");

    // The error points to the first triplet of the malformed subsequence.
    let e = decode_with("te%c3%a9%c3", false).unwrap_err();
    assert_eq!(e.index(), 8);
    assert_eq!(e.kind(), InvalidUtf8);
}

#[test]
fn decode_passthrough() {
    let s = "\u{6d4b}\u{8bd5} \u{fc}";
    assert!(matches!(decode(s), Ok(Cow::Borrowed(x)) if x == s));
    assert!(matches!(decode(""), Ok(Cow::Borrowed(""))));

    assert_eq!(decode("\u{fc}%20\u{fc}").unwrap(), "\u{fc} \u{fc}");
    assert_eq!(
        decode("%E6%B5%8B%E8%AF%95").unwrap(),
        "\u{6d4b}\u{8bd5}"
    );
    // Plus signs are not spaces.
    assert_eq!(decode("a+b%2B").unwrap(), "a+b+");
}

#[test]
fn decode_invalid_octet() {
    for lenient in [true, false] {
        let e = decode_with("te%c", lenient).unwrap_err();
        assert_eq!(e.index(), 2);
        assert_eq!(e.kind(), InvalidOctet);

        let e = decode_with("%2d%fg", lenient).unwrap_err();
        assert_eq!(e.index(), 3);
        assert_eq!(e.kind(), InvalidOctet);

        // Malformed triplets are reported before malformed UTF-8.
        let e = decode_with("%c3%zz", lenient).unwrap_err();
        assert_eq!(e.index(), 3);
        assert_eq!(e.kind(), InvalidOctet);
    }

    let e = decode("%").unwrap_err();
    assert_eq!(e.index(), 0);
    assert_eq!(e.to_string(), "invalid percent-encoded octet at index 0");
}

#[test]
fn decode_range_of() {
    let s = "xx%41%zz";
    assert_eq!(decode_range(s, 2..5, false).unwrap(), "A");
    assert_eq!(decode_range(s, 0..2, false).unwrap(), "xx");
    assert_eq!(decode_range(s, 5..5, false).unwrap(), "");

    let e = decode_range(s, 2..8, true).unwrap_err();
    assert_eq!(e.index(), 5);
    assert_eq!(e.kind(), InvalidOctet);

    let s = "a%c3b%c3";
    assert_eq!(decode_range(s, 4..8, true).unwrap(), "b\u{fffd}");
    let e = decode_range(s, 4..8, false).unwrap_err();
    assert_eq!(e.index(), 5);
    assert_eq!(e.kind(), InvalidUtf8);
}

#[test]
#[should_panic]
fn decode_range_out_of_bounds() {
    let _ = decode_range("abc", 1..4, true);
}

#[test]
fn escape_modes() {
    let s = "a b\"<>\\^`{|}\x7f\u{e9}";
    assert_eq!(
        escape(s, EscapeMode::Unsafe),
        "a%20b%22%3C%3E%5C%5E%60%7B%7C%7D%7F%C3%A9"
    );
    assert_eq!(
        escape(s, EscapeMode::NonAscii),
        "a b\"<>\\^`{|}\x7f%C3%A9"
    );
    assert_eq!(
        escape(s, EscapeMode::NonAsciiValidated),
        "a b\"<>\\^`{|}\x7f%C3%A9"
    );

    let s = "\t\n\r\0";
    assert_eq!(escape(s, EscapeMode::Unsafe), "%09%0A%0D%00");
    assert_eq!(escape(s, EscapeMode::NonAscii), s);

    // Percent signs.
    let s = "100%%41%zz";
    assert_eq!(escape(s, EscapeMode::Unsafe), s);
    assert_eq!(escape(s, EscapeMode::NonAscii), s);
    assert_eq!(escape(s, EscapeMode::UnsafeAndStrayPercent), "100%25%41%25zz");
    assert_eq!(escape("%", EscapeMode::UnsafeAndStrayPercent), "%25");
    assert_eq!(escape("%4", EscapeMode::UnsafeAndStrayPercent), "%254");

    // Characters outside the BMP.
    assert_eq!(escape("\u{1f603}", EscapeMode::NonAscii), "%F0%9F%98%83");
}

#[test]
fn escape_brackets() {
    for mode in MODES {
        assert_eq!(escape("[x]", mode), "%5Bx%5D");
        assert_eq!(escape("s:?[#]", mode), "s:?%5B#%5D");
    }

    let s = "http://[::1]/[x]";
    assert_eq!(escape(s, EscapeMode::Unsafe), "http://[::1]/%5Bx%5D");
    assert_eq!(escape(s, EscapeMode::NonAscii), "http://[::1]/%5Bx%5D");
    assert_eq!(escape(s, EscapeMode::UnsafeAndStrayPercent), "http://[::1]/%5Bx%5D");
    // Brackets in the path make the reference invalid.
    assert_eq!(escape(s, EscapeMode::NonAsciiValidated), "http://%5B::1%5D/%5Bx%5D");
    assert_eq!(
        escape("http://[::1]/x", EscapeMode::NonAsciiValidated),
        "http://[::1]/x"
    );

    // Delimiters alone locate the authority of an invalid reference,
    // except in the validated mode.
    let s = "http://[::1] x/";
    assert_eq!(escape(s, EscapeMode::Unsafe), "http://[::1]%20x/");
    assert_eq!(escape(s, EscapeMode::NonAscii), "http://[::1] x/");
    assert_eq!(escape(s, EscapeMode::NonAsciiValidated), "http://%5B::1%5D x/");
}

#[test]
fn escape_borrows() {
    for mode in MODES {
        assert!(matches!(escape("http://example.com/a?b#c", mode), Cow::Borrowed(_)));
        assert!(matches!(escape("", mode), Cow::Borrowed("")));
    }
    assert!(matches!(escape("a%20b", EscapeMode::UnsafeAndStrayPercent), Cow::Borrowed(_)));
    assert!(matches!(escape("a b", EscapeMode::Unsafe), Cow::Owned(_)));
}

#[test]
fn escape_idempotence() {
    let cases = [
        "",
        "http://example.com/a b/\u{e9}?q=\u{6d4b}#\u{1f603}",
        "http://[::1]/[x]",
        "http://[::1] x/[y]",
        "http://u\u{e9}@[fe80::1%25eth0]:8080/%zz%4",
        "100%",
        "%%%25%2",
        "a\"<>\\^`{|}\x7f b",
        "s:?[#]",
        "//[v1.x]/\u{e000}?\u{e000}",
        "\u{fffe}[\u{fffe}]",
    ];
    for s in cases {
        for mode in MODES {
            let once = escape(s, mode);
            let twice = escape(&once, mode);
            assert_eq!(once, twice, "{s:?} with {mode:?}");
            assert!(matches!(twice, Cow::Borrowed(_)), "{s:?} with {mode:?}");
        }
    }
}

#[test]
fn escape_keeps_validity() {
    let cases = [
        "http://example.com/a/b?q#f",
        "http://\u{4f8b}\u{5b50}.\u{6d4b}\u{8bd5}/\u{8def}\u{5f84}?\u{e000}#\u{7247}",
        "foo://u\u{e9}@[fe80::1%25eth0]:80/?#",
        "//[v1.x]",
        "../a/\u{e9}",
    ];
    for s in cases {
        assert!(is_valid(s));
        for mode in MODES {
            let escaped = escape(s, mode);
            assert!(is_valid(&escaped), "{s:?} with {mode:?}");
            assert_eq!(escape(&escaped, mode), escaped);
        }
        let escaped = escape(s, EscapeMode::NonAsciiValidated);
        assert!(is_valid_with(&escaped, ParseMode::UriStrict), "{s:?}");
    }
}

#[test]
fn encode_with_table() {
    const RAW: &str = "te\u{1f603}a \u{6d4b}1`~!@\u{8bd5}#$%st^&+=";

    assert_eq!(
        encode(RAW, table::IQUERY),
        "te\u{1f603}a%20\u{6d4b}1%60~!@\u{8bd5}%23$%25st%5E&+="
    );
    assert_eq!(
        encode(RAW, table::QUERY),
        "te%F0%9F%98%83a%20%E6%B5%8B1%60~!@%E8%AF%95%23$%25st%5E&+="
    );
    assert_eq!(
        encode(RAW, table::UNRESERVED),
        "te%F0%9F%98%83a%20%E6%B5%8B1%60~%21%40%E8%AF%95%23%24%25st%5E%26%2B%3D"
    );

    let custom = Table::new(b"-").or(table::ALPHA);
    assert_eq!(encode("a-b_c 1", custom), "a-b%5Fc%20%31");
    assert!(custom.validate("a-b"));
    assert!(!custom.validate("a_b"));

    // Encoding then decoding gives back the input.
    assert_eq!(decode(&encode(RAW, table::UNRESERVED)).unwrap(), RAW);
    assert!(encode("", table::UNRESERVED).is_empty());
}

#[test]
fn estr() {
    let s = EStr::new("a%20b").unwrap();
    assert_eq!(s.to_string(), "a%20b");
    assert_eq!(s.as_str().to_owned(), "a%20b");
    assert_eq!(s.decode().to_string_lossy().into_owned(), "a b");

    assert!(EStr::new("%20a%E2").is_some());
    assert!(EStr::new("%2").is_none());
    assert!(EStr::new("%zz").is_none());
    assert_eq!(EStr::new("abc").unwrap().as_str(), "abc");
    assert!(EStr::EMPTY.is_empty());
    assert_eq!(<&EStr>::default(), EStr::EMPTY);

    let s = EStr::new("id=3&name=%E5%BC%A0%E4%B8%89").unwrap();
    let mut split = s.split('&');
    assert_eq!(split.next().unwrap(), "id=3");
    assert_eq!(split.next().unwrap(), "name=%E5%BC%A0%E4%B8%89");
    assert_eq!(split.next(), None);

    let (k, v) = s.split_once('&').unwrap().1.split_once('=').unwrap();
    assert_eq!(k, "name");
    assert_eq!(v.decode().to_string().unwrap(), "\u{5f20}\u{4e09}");
    assert_eq!(s.split_once('#'), None);

    assert!(EStr::new("a/b/c").unwrap().split('/').rev().eq(["c", "b", "a"]));
}

#[test]
#[should_panic]
fn estr_split_unreserved() {
    let _ = EStr::new("a.b").unwrap().split('.');
}

#[test]
fn estr_decode() {
    let dec = EStr::new("%C2%A1Hola%21").unwrap().decode();
    assert!(dec.clone().eq([
        DecodedChunk::PctDecoded(0xc2),
        DecodedChunk::PctDecoded(0xa1),
        DecodedChunk::Unencoded("Hola"),
        DecodedChunk::PctDecoded(0x21),
    ]));
    assert_eq!(*dec.clone().to_bytes(), *b"\xc2\xa1Hola!");
    assert_eq!(dec.to_string().unwrap(), "\u{a1}Hola!");

    let dec = EStr::new("a%ffb").unwrap().decode();
    assert_eq!(*dec.clone().to_bytes(), *b"a\xffb");
    let e = dec.clone().to_string().unwrap_err();
    assert_eq!(e.index(), 1);
    assert_eq!(e.kind(), InvalidUtf8);
    assert_eq!(dec.to_string_lossy(), "a\u{fffd}b");

    assert!(matches!(
        EStr::new("abc").unwrap().decode().to_bytes(),
        Cow::Borrowed(x) if x == b"abc"
    ));
}
