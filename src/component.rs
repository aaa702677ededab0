//! URI/IRI components.

use crate::{
    meta::{HostKind, ParsedAuthority},
    parse,
    pct_enc::EStr,
};
use core::{
    fmt,
    net::{Ipv4Addr, Ipv6Addr},
    num::ParseIntError,
};

/// An [authority] component.
///
/// [authority]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2
#[derive(Clone, Copy)]
pub struct Authority<'a> {
    // The whole reference the authority was parsed from.
    src: &'a str,
    meta: ParsedAuthority,
}

impl<'a> Authority<'a> {
    pub(crate) fn new(src: &'a str, meta: ParsedAuthority) -> Self {
        Self { src, meta }
    }

    /// Returns the boundaries of the authority and its subcomponents,
    /// as byte ranges into the whole reference.
    #[must_use]
    pub fn spans(&self) -> ParsedAuthority {
        self.meta
    }

    /// Returns the authority component as a string slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_utility::IriRef;
    ///
    /// let iri = IriRef::parse("http://user@example.com:8080/")?;
    /// let auth = iri.authority().unwrap();
    /// assert_eq!(auth.as_str(), "user@example.com:8080");
    /// # Ok::<_, uri_utility::ParseError>(())
    /// ```
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.meta.span.slice(self.src)
    }

    /// Returns the optional [userinfo] subcomponent.
    ///
    /// [userinfo]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.1
    #[must_use]
    pub fn userinfo(&self) -> Option<&'a EStr> {
        self.meta
            .userinfo
            .map(|s| EStr::new_validated(s.slice(self.src)))
    }

    /// Returns the [host] subcomponent as a string slice.
    ///
    /// The host subcomponent is always present, although it may be empty.
    ///
    /// The square brackets enclosing an IPv6 or IPvFuture address are included.
    ///
    /// [host]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.2
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_utility::IriRef;
    ///
    /// let iri = IriRef::parse("file:///path/to/file")?;
    /// assert_eq!(iri.authority().unwrap().host(), "");
    ///
    /// let iri = IriRef::parse("http://[::1]")?;
    /// assert_eq!(iri.authority().unwrap().host(), "[::1]");
    /// # Ok::<_, uri_utility::ParseError>(())
    /// ```
    #[must_use]
    pub fn host(&self) -> &'a str {
        self.meta.host.slice(self.src)
    }

    /// Returns the syntactic form of the host.
    #[must_use]
    pub fn host_kind(&self) -> HostKind {
        self.meta.host_kind
    }

    /// Returns the parsed [host] subcomponent.
    ///
    /// [host]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.2
    ///
    /// # Examples
    ///
    /// ```
    /// use std::net::{Ipv4Addr, Ipv6Addr};
    /// use uri_utility::{component::Host, IriRef};
    ///
    /// let iri = IriRef::parse("foo://127.0.0.1")?;
    /// assert_eq!(iri.authority().unwrap().host_parsed(), Host::Ipv4(Ipv4Addr::LOCALHOST));
    ///
    /// let iri = IriRef::parse("foo://[fe80::1%25eth0]")?;
    /// let Host::Ipv6 { addr, zone_id } = iri.authority().unwrap().host_parsed() else {
    ///     unreachable!()
    /// };
    /// assert_eq!(addr, Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1));
    /// assert_eq!(zone_id.unwrap(), "eth0");
    ///
    /// let iri = IriRef::parse("foo://[v1.addr]")?;
    /// assert_eq!(iri.authority().unwrap().host_parsed(), Host::IpvFuture("v1.addr"));
    ///
    /// let iri = IriRef::parse("foo://localhost")?;
    /// assert!(matches!(iri.authority().unwrap().host_parsed(), Host::RegName(name) if name == "localhost"));
    /// # Ok::<_, uri_utility::ParseError>(())
    /// ```
    #[must_use]
    pub fn host_parsed(&self) -> Host<'a> {
        let host = self.host();
        match self.meta.host_kind {
            HostKind::Ipv4 => Host::Ipv4(parse::parse_v4(host).into()),
            HostKind::Ipv6 => {
                let (segs, zone_id) = parse::parse_v6(&host[1..host.len() - 1]);
                Host::Ipv6 {
                    addr: segs.into(),
                    zone_id: zone_id.map(EStr::new_validated),
                }
            }
            HostKind::IpvFuture => Host::IpvFuture(&host[1..host.len() - 1]),
            HostKind::RegName => Host::RegName(EStr::new_validated(host)),
        }
    }

    /// Returns the optional [port] subcomponent.
    ///
    /// Note that the port may be empty, with leading zeros, or larger than [`u16::MAX`].
    ///
    /// [port]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.3
    #[must_use]
    pub fn port(&self) -> Option<&'a str> {
        self.meta.port.map(|s| s.slice(self.src))
    }

    /// Converts the [port] subcomponent to `u16`, if present and nonempty.
    ///
    /// Returns `Ok(None)` if the port is not present or is empty. Leading zeros are ignored.
    ///
    /// [port]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.3
    ///
    /// # Errors
    ///
    /// Returns `Err` if the port cannot be parsed into `u16`.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_utility::IriRef;
    ///
    /// let iri = IriRef::parse("foo://localhost:4673/")?;
    /// assert_eq!(iri.authority().unwrap().port_to_u16(), Ok(Some(4673)));
    ///
    /// let iri = IriRef::parse("foo://localhost:/")?;
    /// assert_eq!(iri.authority().unwrap().port_to_u16(), Ok(None));
    ///
    /// let iri = IriRef::parse("foo://localhost:123456/")?;
    /// assert!(iri.authority().unwrap().port_to_u16().is_err());
    /// # Ok::<_, uri_utility::ParseError>(())
    /// ```
    pub fn port_to_u16(&self) -> Result<Option<u16>, ParseIntError> {
        self.port()
            .filter(|port| !port.is_empty())
            .map(|port| port.parse())
            .transpose()
    }

    /// Checks whether a userinfo subcomponent is present.
    #[must_use]
    pub fn has_userinfo(&self) -> bool {
        self.meta.userinfo.is_some()
    }

    /// Checks whether a port subcomponent is present.
    #[must_use]
    pub fn has_port(&self) -> bool {
        self.meta.port.is_some()
    }
}

impl fmt::Debug for Authority<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authority")
            .field("userinfo", &self.userinfo())
            .field("host", &self.host())
            .field("host_parsed", &self.host_parsed())
            .field("port", &self.port())
            .finish()
    }
}

/// A parsed [host] component.
///
/// [host]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.2
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Host<'a> {
    /// An IPv4 address.
    Ipv4(Ipv4Addr),
    /// An IPv6 address.
    Ipv6 {
        /// The address.
        addr: Ipv6Addr,
        /// The zone identifier, without the leading `"%25"`.
        zone_id: Option<&'a EStr>,
    },
    /// An IP address of future version, without the enclosing brackets.
    IpvFuture(&'a str),
    /// A registered name.
    ///
    /// Note that ASCII characters within a registered name are *case-insensitive*.
    RegName(&'a EStr),
}
