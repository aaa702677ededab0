//! Module for reference resolution.

use crate::{
    error::{ParseError, ResolveError},
    log::{debug, trace},
    meta::{ParseMode, ParsedReference, Span},
    parse,
    pct_enc::EStr,
};
use alloc::{borrow::Cow, string::String};

/// Resolves a URI/IRI reference against a base, following
/// [Section 5.2 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2).
///
/// Both strings are parsed with [`ParseMode::IriStrict`].
/// The base need not be absolute: when it has no scheme, neither has the result.
///
/// No normalization other than the removal of dot segments is performed.
/// The fragment of the result always comes from the reference.
///
/// # Errors
///
/// Returns `Err` if either the reference or the base fails to parse.
///
/// # Examples
///
/// ```
/// use uri_utility::resolve;
///
/// let base = "http://example.com/a/b/c/d/e.f";
/// assert_eq!(resolve("../.x", base)?, "http://example.com/a/b/c/.x");
/// assert_eq!(resolve("../..../../../.../.x", base)?, "http://example.com/a/b/.../.x");
/// assert_eq!(resolve("index.html", "http://example.com")?, "http://example.com/index.html");
/// assert_eq!(resolve("?q#f", base)?, "http://example.com/a/b/c/d/e.f?q#f");
/// # Ok::<_, uri_utility::ResolveError>(())
/// ```
pub fn resolve(reference: &str, base: &str) -> Result<String, ResolveError> {
    resolve_with(reference, base, ParseMode::IriStrict)
}

/// Resolves a URI/IRI reference against a base, parsing both with the given mode.
///
/// See [`resolve`] for details.
///
/// # Errors
///
/// Returns `Err` if either the reference or the base fails to parse.
pub fn resolve_with(reference: &str, base: &str, mode: ParseMode) -> Result<String, ResolveError> {
    let (r, b) = parse_pair(reference, base, mode)?;
    Ok(resolve_parsed(reference, &r, base, &b).0)
}

/// Resolves a reference against a base, requiring the result to stay
/// in the directory of the base.
///
/// # Errors
///
/// Returns `Err` if either string fails to parse, if the path of the reference
/// contains a `"."` or `".."` segment after percent-decoding, or if the
/// [directory path](directory_path) of the result differs from that of the base.
///
/// # Examples
///
/// ```
/// use uri_utility::{resolve_within_base, ResolveError};
///
/// let base = "http://example.com/dir/index.html";
/// assert_eq!(resolve_within_base("a.html", base)?, "http://example.com/dir/a.html");
/// assert_eq!(resolve_within_base("%2E%2E/a.html", base), Err(ResolveError::DotSegment));
/// assert_eq!(resolve_within_base("/a.html", base), Err(ResolveError::OutsideBase));
/// assert_eq!(resolve_within_base("sub/a.html", base), Err(ResolveError::OutsideBase));
/// # Ok::<_, ResolveError>(())
/// ```
pub fn resolve_within_base(reference: &str, base: &str) -> Result<String, ResolveError> {
    let (r, b) = parse_pair(reference, base, ParseMode::IriStrict)?;

    let r_path = EStr::new_validated(r.path.slice(reference));
    if r_path
        .decode()
        .to_string_lossy()
        .split('/')
        .any(|seg| seg == "." || seg == "..")
    {
        debug!("dot segment in reference path {:?}", r_path);
        return Err(ResolveError::DotSegment);
    }

    let (resolved, t) = resolve_parsed(reference, &r, base, &b);
    if base[..directory_end(&b, base)] != resolved[..directory_end(&t, &resolved)] {
        debug!("{:?} escapes the directory of {:?}", resolved, base);
        return Err(ResolveError::OutsideBase);
    }
    Ok(resolved)
}

/// Returns the prefix of a URI/IRI reference up to and including the last
/// `'/'` of its path, dropping the query and fragment.
///
/// A path without `'/'` is kept whole.
///
/// # Errors
///
/// Returns `Err` if the string fails to parse with [`ParseMode::IriStrict`].
///
/// # Examples
///
/// ```
/// use uri_utility::directory_path;
///
/// assert_eq!(directory_path("http://example.com/a/b?q#f")?, "http://example.com/a/");
/// assert_eq!(directory_path("http://example.com")?, "http://example.com");
/// assert_eq!(directory_path("urn:isbn")?, "urn:isbn");
/// # Ok::<_, uri_utility::ParseError>(())
/// ```
pub fn directory_path(s: &str) -> Result<&str, ParseError> {
    let r = parse::parse(s, ParseMode::IriStrict)?;
    Ok(&s[..directory_end(&r, s)])
}

fn directory_end(r: &ParsedReference, s: &str) -> usize {
    let path = r.path;
    path.slice(s)
        .rfind('/')
        .map_or(path.end, |i| path.start + i + 1)
}

fn parse_pair(
    reference: &str,
    base: &str,
    mode: ParseMode,
) -> Result<(ParsedReference, ParsedReference), ResolveError> {
    let r = parse::parse(reference, mode).map_err(|e| {
        debug!("invalid reference {:?}: {}", reference, e);
        ResolveError::InvalidReference(e)
    })?;
    let b = parse::parse(base, mode).map_err(|e| {
        debug!("invalid base {:?}: {}", base, e);
        ResolveError::InvalidBase(e)
    })?;
    Ok((r, b))
}

/// Resolves a parsed reference `r` against a parsed base `b`,
/// returning the result along with its component boundaries.
pub(crate) fn resolve_parsed(
    r_str: &str,
    r: &ParsedReference,
    b_str: &str,
    b: &ParsedReference,
) -> (String, ParsedReference) {
    fn slice(span: Option<Span>, s: &str) -> Option<&str> {
        span.map(|span| span.slice(s))
    }

    let r_path = r.path.slice(r_str);

    let (t_scheme, t_authority, t_path, t_query): (_, _, Cow<'_, str>, _);

    if r.scheme.is_some() {
        trace!("reference has a scheme");
        t_scheme = slice(r.scheme, r_str);
        t_authority = r.authority.map(|a| (r_str, a));
        t_path = remove_dot_segments(r_path).into();
        t_query = slice(r.query, r_str);
    } else {
        if r.authority.is_some() {
            trace!("reference has an authority");
            t_authority = r.authority.map(|a| (r_str, a));
            t_path = remove_dot_segments(r_path).into();
            t_query = slice(r.query, r_str);
        } else {
            if r_path.is_empty() {
                trace!("reference has an empty path");
                t_path = b.path.slice(b_str).into();
                t_query = match r.query {
                    Some(_) => slice(r.query, r_str),
                    None => slice(b.query, b_str),
                };
            } else {
                if r_path.starts_with('/') {
                    trace!("reference has an absolute path");
                    t_path = remove_dot_segments(r_path).into();
                } else {
                    trace!("merging reference path with base path");
                    t_path = remove_dot_segments(&merge(b_str, b, r_path)).into();
                }
                t_query = slice(r.query, r_str);
            }
            t_authority = b.authority.map(|a| (b_str, a));
        }
        t_scheme = slice(b.scheme, b_str);
    }
    let t_fragment = slice(r.fragment, r_str);

    // Keep the result parsing into the same components.
    let path_prefix = if t_authority.is_none() && t_path.starts_with("//") {
        "/."
    } else if t_scheme.is_none()
        && t_authority.is_none()
        && t_path.split('/').next().is_some_and(|seg| seg.contains(':'))
    {
        "./"
    } else {
        ""
    };

    let mut buf = String::with_capacity(r_str.len() + b_str.len() + 4);
    let mut t = ParsedReference::default();

    if let Some(scheme) = t_scheme {
        buf.push_str(scheme);
        t.scheme = Some(Span::new(0, buf.len()));
        buf.push(':');
    }

    if let Some((src, authority)) = t_authority {
        buf.push_str("//");
        t.authority = Some(authority.moved_to(buf.len()));
        buf.push_str(authority.span.slice(src));
    }

    let path_start = buf.len();
    buf.push_str(path_prefix);
    buf.push_str(&t_path);
    t.path = Span::new(path_start, buf.len());

    if let Some(query) = t_query {
        buf.push('?');
        let start = buf.len();
        buf.push_str(query);
        t.query = Some(Span::new(start, buf.len()));
    }

    if let Some(fragment) = t_fragment {
        buf.push('#');
        let start = buf.len();
        buf.push_str(fragment);
        t.fragment = Some(Span::new(start, buf.len()));
    }

    (buf, t)
}

/// Merges a relative-path reference with the path of the base.
fn merge(b_str: &str, b: &ParsedReference, r_path: &str) -> String {
    let b_path = b.path.slice(b_str);
    let mut buf = String::with_capacity(b_path.len() + r_path.len() + 1);

    if b.authority.is_some() && b_path.is_empty() {
        buf.push('/');
    } else if let Some(i) = b_path.rfind('/') {
        buf.push_str(&b_path[..=i]);
    }
    buf.push_str(r_path);
    buf
}

/// Removes dot segments from a path, as in
/// [Section 5.2.4 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2.4).
///
/// Only segments exactly equal to `"."` or `".."` are dot segments.
pub(crate) fn remove_dot_segments(mut input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    while !input.is_empty() {
        if let Some(rem) = input
            .strip_prefix("../")
            .or_else(|| input.strip_prefix("./"))
        {
            input = rem;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            pop_segment(&mut out);
        } else if input == "/.." {
            input = "/";
            pop_segment(&mut out);
        } else if input == "." || input == ".." {
            input = "";
        } else {
            // Move the first segment, with its leading '/' if any.
            let end = input
                .bytes()
                .skip(1)
                .position(|x| x == b'/')
                .map_or(input.len(), |i| i + 1);
            out.push_str(&input[..end]);
            input = &input[end..];
        }
    }
    out
}

fn pop_segment(out: &mut String) {
    out.truncate(out.rfind('/').unwrap_or(0));
}

#[cfg(test)]
mod tests {
    use super::remove_dot_segments as rds;

    #[test]
    fn remove_dot_segments() {
        assert_eq!(rds(""), "");
        assert_eq!(rds("."), "");
        assert_eq!(rds(".."), "");
        assert_eq!(rds("/"), "/");
        assert_eq!(rds("/."), "/");
        assert_eq!(rds("/.."), "/");
        assert_eq!(rds("/a/b/c/./../../g"), "/a/g");
        assert_eq!(rds("mid/content=5/../6"), "mid/6");
        assert_eq!(rds("/a/b/.."), "/a/");
        assert_eq!(rds("/a/b/."), "/a/b/");
        assert_eq!(rds("/../../a"), "/a");
        assert_eq!(rds("../a/./b"), "a/b");
        assert_eq!(rds("a/../../b"), "/b");
        assert_eq!(rds("/.../..../.x"), "/.../..../.x");
        assert_eq!(rds("/a/%2E/b"), "/a/%2E/b");
        assert_eq!(rds("/a//../b"), "/a/b");
        assert_eq!(rds("é/../ü"), "/ü");
    }
}
