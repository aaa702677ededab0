use crate::{
    error::BuildError,
    log::debug,
    meta::{ParseMode, ParsedReference, Span},
    parse,
    pct_enc::{self, table},
};
use alloc::string::String;

/// Builds an IRI reference from its parts.
///
/// `scheme_and_authority`, if present and nonempty, must be a valid IRI reference
/// made only of a scheme, an authority, or both, such as `"http://example.com"`,
/// `"urn:"` or `"//example.com"`. It is copied verbatim.
///
/// The path, query and fragment are percent-encoded: valid percent-encoded
/// octets are kept, a stray `'%'` is encoded as `"%25"`, and every character
/// other than ASCII alphanumerics and ``-_.~/(=):!$&'*+,;@`` is encoded,
/// including `'?'`.
///
/// # Errors
///
/// Returns `Err` if `scheme_and_authority` is invalid or if the encoded path
/// conflicts with the presence or absence of the scheme and authority.
///
/// # Examples
///
/// ```
/// use uri_utility::{build_iri, BuildError};
///
/// assert_eq!(
///     build_iri(Some("http://example.com"), "/a b/%41%", Some("q?"), Some("ü"))?,
///     "http://example.com/a%20b/%41%25?q%3F#%C3%BC"
/// );
/// assert_eq!(build_iri(None, "a:b", None, None), Err(BuildError::FirstPathSegmentContainsColon));
/// assert_eq!(build_iri(Some("example"), "", None, None), Err(BuildError::InvalidSchemeAndAuthority));
/// # Ok::<_, BuildError>(())
/// ```
pub fn build_iri(
    scheme_and_authority: Option<&str>,
    path: &str,
    query: Option<&str>,
    fragment: Option<&str>,
) -> Result<String, BuildError> {
    let mut b = Builder {
        buf: String::new(),
        meta: ParsedReference::default(),
    };

    if let Some(sa) = scheme_and_authority.filter(|s| !s.is_empty()) {
        b.push_scheme_and_authority(sa)?;
    }
    b.push_path(path);
    b.validate()?;

    if let Some(query) = query {
        b.buf.push('?');
        b.push_encoded(query);
    }
    if let Some(fragment) = fragment {
        b.buf.push('#');
        b.push_encoded(fragment);
    }

    debug_assert!(parse::parse(&b.buf, ParseMode::IriStrict).is_ok());
    Ok(b.buf)
}

struct Builder {
    buf: String,
    meta: ParsedReference,
}

impl Builder {
    fn push_scheme_and_authority(&mut self, s: &str) -> Result<(), BuildError> {
        match parse::parse(s, ParseMode::IriStrict) {
            Ok(r)
                if (r.scheme.is_some() || r.authority.is_some())
                    && r.path.is_empty()
                    && r.query.is_none()
                    && r.fragment.is_none() =>
            {
                self.buf.push_str(s);
                self.meta = r;
                Ok(())
            }
            _ => {
                debug!("invalid scheme and authority {:?}", s);
                Err(BuildError::InvalidSchemeAndAuthority)
            }
        }
    }

    fn push_path(&mut self, v: &str) {
        let start = self.buf.len();
        self.push_encoded(v);
        self.meta.path = Span::new(start, self.buf.len());
    }

    fn push_encoded(&mut self, v: &str) {
        let bytes = v.as_bytes();
        for (i, ch) in v.char_indices() {
            if ch == '%' {
                match bytes.get(i + 1..i + 3) {
                    Some(&[hi, lo]) if pct_enc::is_hexdig_pair(hi, lo) => self.buf.push('%'),
                    _ => self.buf.push_str("%25"),
                }
            } else if table::UNRESERVED.allows(ch) || "/(=):!$&'*+,;@".contains(ch) {
                self.buf.push(ch);
            } else {
                pct_enc::push_encoded_char(&mut self.buf, ch);
            }
        }
    }

    fn validate(&self) -> Result<(), BuildError> {
        fn first_segment_contains_colon(path: &str) -> bool {
            path.split_once('/').map_or(path, |x| x.0).contains(':')
        }

        let path = self.meta.path.slice(&self.buf);

        if self.meta.authority.is_some() {
            if !path.is_empty() && !path.starts_with('/') {
                return Err(BuildError::NonemptyRootlessPath);
            }
        } else {
            if path.starts_with("//") {
                return Err(BuildError::PathStartsWithDoubleSlash);
            }
            if self.meta.scheme.is_none() && first_segment_contains_colon(path) {
                return Err(BuildError::FirstPathSegmentContainsColon);
            }
        }
        Ok(())
    }
}
