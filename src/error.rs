//! Error types.

use core::fmt;

/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected character or end of input.
    ///
    /// The error index points to the first byte of the character or the end of input.
    UnexpectedCharOrEnd,
    /// Invalid IPv6 address.
    ///
    /// The error index points to the first byte of the address.
    InvalidIpv6Addr,
    /// A zone identifier that is empty or attached to an address
    /// outside of the link-local prefix `fe80::/10`.
    ///
    /// The error index points to the percent character `'%'` introducing the zone.
    InvalidZoneId,
}

/// An error occurred when parsing a URI/IRI reference.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseError {
    pub(crate) index: usize,
    pub(crate) kind: ParseErrorKind,
}

impl ParseError {
    /// Returns the byte index at which the error occurred.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            ParseErrorKind::UnexpectedCharOrEnd => "unexpected character or end of input",
            ParseErrorKind::InvalidIpv6Addr => "invalid IPv6 address",
            ParseErrorKind::InvalidZoneId => "invalid or non-link-local zone identifier",
        };
        write!(f, "{} at index {}", msg, self.index)
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for ParseError {}

/// Detailed cause of a [`DecodeError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeErrorKind {
    /// A percent character not followed by two hexadecimal digits.
    ///
    /// The error index points to the percent character.
    InvalidOctet,
    /// Decoded octets that do not form valid UTF-8.
    ///
    /// The error index points to the percent character of the first
    /// octet of the malformed subsequence.
    InvalidUtf8,
}

/// An error occurred when percent-decoding a string.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeError {
    pub(crate) index: usize,
    pub(crate) kind: DecodeErrorKind,
}

impl DecodeError {
    /// Returns the byte index at which the error occurred.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            DecodeErrorKind::InvalidOctet => "invalid percent-encoded octet",
            DecodeErrorKind::InvalidUtf8 => "percent-encoded octets are not valid UTF-8",
        };
        write!(f, "{} at index {}", msg, self.index)
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for DecodeError {}

/// An error occurred when resolving a URI/IRI reference.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolveError {
    /// The reference failed to parse.
    InvalidReference(ParseError),
    /// The base failed to parse.
    InvalidBase(ParseError),
    /// The path of the reference contains a `"."` or `".."` segment,
    /// possibly percent-encoded.
    ///
    /// Only returned by [`resolve_within_base`](crate::resolve_within_base).
    DotSegment,
    /// The resolved reference is not in the directory of the base.
    ///
    /// Only returned by [`resolve_within_base`](crate::resolve_within_base).
    OutsideBase,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidReference(e) => write!(f, "invalid reference: {e}"),
            Self::InvalidBase(e) => write!(f, "invalid base: {e}"),
            Self::DotSegment => f.write_str("reference path contains a dot segment"),
            Self::OutsideBase => f.write_str("resolved reference escapes the base directory"),
        }
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for ResolveError {
    fn source(&self) -> Option<&(dyn crate::Error + 'static)> {
        match self {
            Self::InvalidReference(e) | Self::InvalidBase(e) => Some(e),
            _ => None,
        }
    }
}

/// An error occurred when building an IRI reference from its parts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// The scheme-and-authority part does not parse, has a nonempty path,
    /// a query or a fragment, or has neither scheme nor authority.
    InvalidSchemeAndAuthority,
    /// Authority is present, but the path is not empty and does not start with `'/'`.
    NonemptyRootlessPath,
    /// Authority is not present, but the path starts with `"//"`.
    PathStartsWithDoubleSlash,
    /// Neither scheme nor authority is present, but the first path segment contains `':'`.
    FirstPathSegmentContainsColon,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidSchemeAndAuthority => {
                "scheme-and-authority should consist of a scheme, an authority, or both"
            }
            Self::NonemptyRootlessPath => {
                "when authority is present, path should either be empty or start with '/'"
            }
            Self::PathStartsWithDoubleSlash => {
                "when authority is not present, path should not start with \"//\""
            }
            Self::FirstPathSegmentContainsColon => {
                "when neither scheme nor authority is present, first path segment should not contain ':'"
            }
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for BuildError {}
