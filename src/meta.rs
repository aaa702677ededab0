//! Component boundaries produced by the parser.

use core::ops::Range;

/// A half-open byte range `[start, end)` into a parsed string.
///
/// An absent component is represented by `None` rather than by a
/// special span, so an empty span always means "present but empty".
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Span {
    /// Byte index of the first byte.
    pub start: usize,
    /// Byte index one past the last byte.
    pub end: usize,
}

impl Span {
    pub(crate) const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// Checks whether the span is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Converts the span to a [`Range`].
    #[must_use]
    pub const fn range(self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the subslice of `s` covered by the span.
    ///
    /// # Panics
    ///
    /// Panics if the span is out of bounds or not on char boundaries of `s`.
    #[must_use]
    pub fn slice(self, s: &str) -> &str {
        &s[self.start..self.end]
    }

    /// Moves the span so that a string starting at `from` starts at `to` instead.
    pub(crate) const fn rebase(self, from: usize, to: usize) -> Self {
        Self::new(self.start - from + to, self.end - from + to)
    }

    pub(crate) const fn contains(self, i: usize) -> bool {
        self.start <= i && i < self.end
    }
}

/// The syntactic form of a host.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum HostKind {
    /// A registered name, possibly empty.
    #[default]
    RegName,
    /// An IPv4 address in dotted-decimal form.
    Ipv4,
    /// A bracketed IPv6 address, possibly with a zone identifier.
    Ipv6,
    /// A bracketed IP address of a future version.
    IpvFuture,
}

/// Boundaries of an authority component and its subcomponents.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct ParsedAuthority {
    pub(crate) span: Span,
    pub(crate) userinfo: Option<Span>,
    pub(crate) host: Span,
    pub(crate) host_kind: HostKind,
    pub(crate) port: Option<Span>,
}

impl ParsedAuthority {
    /// Returns the span of the whole authority, without the leading `"//"`.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the span of the userinfo subcomponent, without the trailing `'@'`.
    #[must_use]
    pub fn userinfo(&self) -> Option<Span> {
        self.userinfo
    }

    /// Returns the span of the host subcomponent.
    ///
    /// Brackets of an IP literal are included.
    #[must_use]
    pub fn host(&self) -> Span {
        self.host
    }

    /// Returns the syntactic form of the host.
    #[must_use]
    pub fn host_kind(&self) -> HostKind {
        self.host_kind
    }

    /// Returns the span of the port subcomponent, without the leading `':'`.
    ///
    /// The port may be present but empty, as in `"http://example.com:/"`.
    #[must_use]
    pub fn port(&self) -> Option<Span> {
        self.port
    }

    /// Moves the authority to start at `to`.
    pub(crate) fn moved_to(mut self, to: usize) -> Self {
        let from = self.span.start;
        self.span = self.span.rebase(from, to);
        self.userinfo = self.userinfo.map(|s| s.rebase(from, to));
        self.host = self.host.rebase(from, to);
        self.port = self.port.map(|s| s.rebase(from, to));
        self
    }
}

/// The component boundaries of a URI/IRI reference.
///
/// Produced by [`split`](crate::split). Spans are byte ranges into the
/// parsed string, non-decreasing in component order.
///
/// # Examples
///
/// ```
/// use uri_utility::{split, HostKind};
///
/// let s = "http://user@[::1]:8080/a?q#f";
/// let r = split(s)?;
/// assert_eq!(r.scheme().unwrap().slice(s), "http");
/// let auth = r.authority().unwrap();
/// assert_eq!(auth.userinfo().unwrap().slice(s), "user");
/// assert_eq!(auth.host().slice(s), "[::1]");
/// assert_eq!(auth.host_kind(), HostKind::Ipv6);
/// assert_eq!(auth.port().unwrap().slice(s), "8080");
/// assert_eq!(r.path().slice(s), "/a");
/// assert_eq!(r.query().unwrap().slice(s), "q");
/// assert_eq!(r.fragment().unwrap().slice(s), "f");
/// # Ok::<_, uri_utility::ParseError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct ParsedReference {
    pub(crate) scheme: Option<Span>,
    pub(crate) authority: Option<ParsedAuthority>,
    pub(crate) path: Span,
    pub(crate) query: Option<Span>,
    pub(crate) fragment: Option<Span>,
}

impl ParsedReference {
    /// Returns the span of the scheme, without the trailing `':'`.
    #[must_use]
    pub fn scheme(&self) -> Option<Span> {
        self.scheme
    }

    /// Returns the boundaries of the authority, if any.
    #[must_use]
    pub fn authority(&self) -> Option<ParsedAuthority> {
        self.authority
    }

    /// Returns the span of the path, which is always present.
    #[must_use]
    pub fn path(&self) -> Span {
        self.path
    }

    /// Returns the span of the query, without the leading `'?'`.
    #[must_use]
    pub fn query(&self) -> Option<Span> {
        self.query
    }

    /// Returns the span of the fragment, without the leading `'#'`.
    #[must_use]
    pub fn fragment(&self) -> Option<Span> {
        self.fragment
    }
}

/// Specifies how strictly a string is checked when it is split.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ParseMode {
    /// The full IRI grammar of RFC 3987.
    #[default]
    IriStrict,
    /// The full URI grammar of RFC 3986; any non-ASCII character is rejected.
    UriStrict,
    /// Only the component delimiters are located; characters
    /// within components are not checked.
    IriLenient,
    /// Like [`IriLenient`](Self::IriLenient), but any non-ASCII
    /// character is rejected.
    UriLenient,
}

impl ParseMode {
    pub(crate) fn is_strict(self) -> bool {
        matches!(self, Self::IriStrict | Self::UriStrict)
    }

    pub(crate) fn is_ascii_only(self) -> bool {
        matches!(self, Self::UriStrict | Self::UriLenient)
    }
}
