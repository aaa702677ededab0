#![warn(
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_op_in_unsafe_fn)]
#![no_std]

//! Validation, splitting, percent-coding and resolution of URI/IRI references
//! as specified in IETF [RFC 3986] and [RFC 3987].
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//! [RFC 3987]: https://datatracker.ietf.org/doc/html/rfc3987/
//!
//! # Overview
//!
//! - [`split`] locates the components of a reference, yielding a [`ParsedReference`]
//!   of byte spans. [`is_valid`] only checks whether the split succeeds.
//!   Both come in a `_with` flavor taking a [`ParseMode`].
//! - [`IriRef`] keeps a string along with its component boundaries and gives
//!   typed access to the components.
//! - [`pct_enc`] decodes and encodes percent-encoded octets.
//! - [`resolve`] resolves a reference against a base.
//! - [`build_iri`] builds a reference from its parts.
//!
//! # Examples
//!
//! ```
//! use uri_utility::{is_valid, pct_enc, resolve};
//!
//! assert!(is_valid("http://example.com/\u{4f60}\u{597d}"));
//! assert!(!is_valid("a://x%/"));
//!
//! assert_eq!(pct_enc::decode("te%c2%80t")?, "te\u{80}t");
//! assert_eq!(resolve("../c", "http://example.com/a/b/")?, "http://example.com/a/c");
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! # Crate features
//!
//! - `std` (default): Implies `impl-error`.
//!
//! - `impl-error` (default): Implements the `Error` trait for the error types,
//!   using `core::error::Error` when `std` is disabled.
//!
//! - `serde`: Implements `Serialize` and `Deserialize` for [`IriRef`].
//!
//! - `log`: Logs rejected inputs at the debug level and the steps of
//!   resolution at the trace level, through the [`log`] facade.
//!
//! [`log`]: https://docs.rs/log

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod component;
pub mod pct_enc;

mod build;
mod error;
mod iri;
mod log;
mod meta;
mod parse;
mod resolve;
mod utf8;

pub use build::build_iri;
pub use error::{
    BuildError, DecodeError, DecodeErrorKind, ParseError, ParseErrorKind, ResolveError,
};
pub use iri::{IriRef, Parse};
pub use meta::{HostKind, ParseMode, ParsedAuthority, ParsedReference, Span};
pub use pct_enc::{decode, decode_range, decode_with, escape, EscapeMode};
pub use resolve::{directory_path, resolve, resolve_with, resolve_within_base};

#[cfg(all(feature = "impl-error", not(feature = "std")))]
use core::error::Error;

#[cfg(feature = "std")]
use std::error::Error;

use crate::log::debug;

/// Splits a URI/IRI reference into its components, with [`ParseMode::IriStrict`].
///
/// # Errors
///
/// Returns `Err` if the string does not match the
/// [`IRI-reference`][abnf] ABNF rule from RFC 3987.
///
/// [abnf]: https://datatracker.ietf.org/doc/html/rfc3987#section-2.2
///
/// # Examples
///
/// ```
/// use uri_utility::split;
///
/// for s in ["s://h", "s://h?x", "//h#x", "s://", "s:", "s:#x"] {
///     assert!(split(s)?.path().is_empty());
/// }
///
/// let s = "foo:bar/baz";
/// let r = split(s)?;
/// assert!(r.authority().is_none());
/// assert_eq!(r.path().slice(s), "bar/baz");
/// # Ok::<_, uri_utility::ParseError>(())
/// ```
pub fn split(s: &str) -> Result<ParsedReference, ParseError> {
    split_with(s, ParseMode::IriStrict)
}

/// Splits a URI/IRI reference into its components, with the given mode.
///
/// # Errors
///
/// Returns `Err` if the string is rejected by `mode`. The lenient
/// modes only reject non-ASCII characters under [`ParseMode::UriLenient`].
///
/// # Examples
///
/// ```
/// use uri_utility::{split_with, ParseMode};
///
/// let s = "http://ex ample.com:80/a b";
/// assert!(split_with(s, ParseMode::IriStrict).is_err());
///
/// let r = split_with(s, ParseMode::IriLenient)?;
/// let auth = r.authority().unwrap();
/// assert_eq!(auth.host().slice(s), "ex ample.com");
/// assert_eq!(auth.port().unwrap().slice(s), "80");
/// assert_eq!(r.path().slice(s), "/a b");
/// # Ok::<_, uri_utility::ParseError>(())
/// ```
pub fn split_with(s: &str, mode: ParseMode) -> Result<ParsedReference, ParseError> {
    parse::parse(s, mode).map_err(|e| {
        debug!("rejected {:?} with {:?}: {}", s, mode, e);
        e
    })
}

/// Checks whether a string is a valid URI/IRI reference, with [`ParseMode::IriStrict`].
///
/// # Examples
///
/// ```
/// use uri_utility::is_valid;
///
/// assert!(is_valid("e://[a:a:a:a:a::99.255.240.10]"));
/// assert!(is_valid("e://[fe80::1%25eth0]"));
/// assert!(!is_valid("e://[::1%25eth0]"));
/// assert!(!is_valid("e://x:a"));
/// assert!(!is_valid("01:/w/x"));
/// ```
#[must_use]
pub fn is_valid(s: &str) -> bool {
    split(s).is_ok()
}

/// Checks whether a string is a valid URI/IRI reference, with the given mode.
#[must_use]
pub fn is_valid_with(s: &str, mode: ParseMode) -> bool {
    split_with(s, mode).is_ok()
}

/// Checks whether a string is a valid IRI reference with a scheme.
///
/// # Examples
///
/// ```
/// use uri_utility::has_scheme;
///
/// assert!(has_scheme("http://example.com"));
/// assert!(has_scheme("urn:\u{4f60}"));
/// assert!(!has_scheme("//example.com"));
/// assert!(!has_scheme("http://exa mple.com"));
/// ```
#[must_use]
pub fn has_scheme(s: &str) -> bool {
    split(s).is_ok_and(|r| r.scheme.is_some())
}

/// Checks whether a string is a valid URI reference with a scheme.
///
/// Unlike [`has_scheme`], non-ASCII characters are rejected.
#[must_use]
pub fn has_scheme_for_uri(s: &str) -> bool {
    split_with(s, ParseMode::UriStrict).is_ok_and(|r| r.scheme.is_some())
}

/// Checks whether a string is a valid [CURIE] reference, i.e.,
/// the part of a CURIE after the prefix and colon.
///
/// A CURIE reference is an IRI reference without scheme or authority.
/// The empty string is valid.
///
/// [CURIE]: https://www.w3.org/TR/rdfa-core/#s_curies
///
/// # Examples
///
/// ```
/// use uri_utility::is_valid_curie_reference;
///
/// assert!(is_valid_curie_reference(""));
/// assert!(is_valid_curie_reference("name:x/y?q=%41#frag"));
/// assert!(!is_valid_curie_reference("//authority"));
/// assert!(!is_valid_curie_reference("a%4"));
/// assert!(!is_valid_curie_reference("a b"));
/// ```
#[must_use]
pub fn is_valid_curie_reference(s: &str) -> bool {
    parse::validate_curie_reference(s)
}
