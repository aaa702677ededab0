use crate::{
    error::{ParseError, ParseErrorKind},
    meta::{HostKind, ParseMode, ParsedAuthority, ParsedReference, Span},
    pct_enc::{
        self,
        table::{self, Table},
    },
    utf8,
};
use core::ops::{Deref, DerefMut};

type Result<T> = core::result::Result<T, ParseError>;

/// Returns immediately with an error.
macro_rules! err {
    ($index:expr, $kind:ident) => {
        return Err(ParseError {
            index: $index,
            kind: ParseErrorKind::$kind,
        })
    };
}

pub(crate) fn parse(s: &str, mode: ParseMode) -> Result<ParsedReference> {
    if !mode.is_strict() {
        return parse_lenient(s, mode.is_ascii_only());
    }
    let mut parser = Parser {
        ascii_only: mode.is_ascii_only(),
        reader: Reader::new(s.as_bytes()),
        out: ParsedReference::default(),
    };
    parser.parse_from_scheme()?;
    Ok(parser.out)
}

/// URI/IRI parser.
///
/// # Invariants
///
/// `pos <= len`, `pos` is non-decreasing and on the boundary of a UTF-8 code point.
///
/// # Preconditions and guarantees
///
/// Before parsing, ensure that `pos == 0` and `out` is default initialized.
///
/// Start and finish parsing by calling `parse_from_scheme`.
/// The following are guaranteed when parsing succeeds:
///
/// - All output spans are within bounds, correctly ordered
///   and on the boundary of a UTF-8 code point.
/// - All components covered by output spans are validated.
struct Parser<'a> {
    ascii_only: bool,
    reader: Reader<'a>,
    out: ParsedReference,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Deref for Parser<'a> {
    type Target = Reader<'a>;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

impl DerefMut for Parser<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reader
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PathKind {
    General,
    AbEmpty,
    ContinuedNoScheme,
}

enum Seg {
    // *1":" 1*4HEXDIG
    Normal(u16, bool),
    // "::"
    Ellipsis,
    // *1":" 1*4HEXDIG "."
    MaybeV4(bool),
    // ":"
    SingleColon,
}

struct HostPort {
    host: Span,
    kind: HostKind,
    port: Option<Span>,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.len()
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(self.pos + i).copied()
    }

    // Any call to this method must keep the invariants.
    fn skip(&mut self, n: usize) {
        // INVARIANT: `pos` is non-decreasing.
        self.pos += n;
        debug_assert!(self.pos <= self.len());
    }

    #[cold]
    fn invalid_pct(&self, mut i: usize) -> Result<bool> {
        i += 1;
        if let Some(&x) = self.bytes.get(i) {
            if pct_enc::is_hexdig(x) {
                i += 1;
            }
        }
        err!(i, UnexpectedCharOrEnd);
    }

    /// Reads as many characters allowed by `table` as possible.
    ///
    /// Returns whether anything was read.
    fn read(&mut self, table: Table) -> Result<bool> {
        let start = self.pos;
        let mut i = self.pos;

        while i < self.len() {
            let x = self.bytes[i];
            if x == b'%' && table.allows_pct_encoded() {
                match self.bytes.get(i + 1..i + 3) {
                    Some(&[hi, lo]) if pct_enc::is_hexdig_pair(hi, lo) => i += 3,
                    _ => return self.invalid_pct(i),
                }
            } else {
                let (x, len) = utf8::next_code_point(self.bytes, i);
                if !table.allows_code_point(x) {
                    break;
                }
                i += len;
            }
        }

        // INVARIANT: `i` is non-decreasing and on a char boundary.
        self.pos = i;
        Ok(self.pos > start)
    }

    fn read_str(&mut self, s: &str) -> bool {
        if self.bytes[self.pos..].starts_with(s.as_bytes()) {
            // INVARIANT: The remaining bytes start with `s` so it's fine to skip `s.len()`.
            self.skip(s.len());
            true
        } else {
            false
        }
    }

    fn read_v6(&mut self) -> Option<[u16; 8]> {
        let mut segs = [0; 8];
        let mut ellipsis_idx = 8;

        let mut i = 0;
        while i < 8 {
            match self.read_v6_segment() {
                Some(Seg::Normal(seg, colon)) => {
                    if colon == (i == 0 || i == ellipsis_idx) {
                        // Leading colon, triple colons, or no colon.
                        return None;
                    }
                    segs[i] = seg;
                    i += 1;
                }
                Some(Seg::Ellipsis) => {
                    if ellipsis_idx != 8 {
                        // Multiple ellipses.
                        return None;
                    }
                    ellipsis_idx = i;
                }
                Some(Seg::MaybeV4(colon)) => {
                    if i > 6 || colon == (i == ellipsis_idx) {
                        // Not enough space, triple colons, or no colon.
                        return None;
                    }
                    let octets = self.read_v4()?.to_be_bytes();
                    segs[i] = u16::from_be_bytes([octets[0], octets[1]]);
                    segs[i + 1] = u16::from_be_bytes([octets[2], octets[3]]);
                    i += 2;
                    break;
                }
                Some(Seg::SingleColon) => return None,
                None => break,
            }
        }

        if ellipsis_idx == 8 {
            // No ellipsis.
            if i != 8 {
                // Too short.
                return None;
            }
        } else if i == 8 {
            // Eliding nothing.
            return None;
        } else {
            // Shift the segments after the ellipsis to the right.
            for j in (ellipsis_idx..i).rev() {
                segs[8 - (i - j)] = segs[j];
                segs[j] = 0;
            }
        }

        Some(segs)
    }

    fn read_v6_segment(&mut self) -> Option<Seg> {
        let colon = self.read_str(":");
        let Some(first) = self.peek(0) else {
            return colon.then_some(Seg::SingleColon);
        };

        let mut x = match pct_enc::decode_hexdigit(first) {
            Some(v) => v as u16,
            _ => {
                return colon.then(|| {
                    if first == b':' {
                        // INVARIANT: Skipping ":" is fine.
                        self.skip(1);
                        Seg::Ellipsis
                    } else {
                        Seg::SingleColon
                    }
                });
            }
        };
        let mut i = 1;

        while i < 4 {
            let Some(b) = self.peek(i) else {
                // INVARIANT: Skipping `i` hexadecimal digits is fine.
                self.skip(i);
                return Some(Seg::Normal(x, colon));
            };
            match pct_enc::decode_hexdigit(b) {
                Some(v) => {
                    x = (x << 4) | v as u16;
                    i += 1;
                }
                _ if b == b'.' => return Some(Seg::MaybeV4(colon)),
                _ => break,
            }
        }
        // INVARIANT: Skipping `i` hexadecimal digits is fine.
        self.skip(i);
        Some(Seg::Normal(x, colon))
    }

    fn read_v4(&mut self) -> Option<u32> {
        let mut addr = self.read_v4_octet()? << 24;
        for i in (0..3).rev() {
            if !self.read_str(".") {
                return None;
            }
            addr |= self.read_v4_octet()? << (i * 8);
        }
        Some(addr)
    }

    fn read_v4_octet(&mut self) -> Option<u32> {
        let mut res = self.peek_digit(0)?;
        if res == 0 {
            // INVARIANT: Skipping "0" is fine.
            self.skip(1);
            return Some(0);
        }

        for i in 1..3 {
            let Some(x) = self.peek_digit(i) else {
                // INVARIANT: Skipping `i` digits is fine.
                self.skip(i);
                return Some(res);
            };
            res = res * 10 + x;
        }
        // INVARIANT: Skipping 3 digits is fine.
        self.skip(3);

        u8::try_from(res).is_ok().then_some(res)
    }

    fn peek_digit(&self, i: usize) -> Option<u32> {
        self.peek(i).and_then(|x| (x as char).to_digit(10))
    }

    fn read_port(&mut self) -> Option<Span> {
        if !self.read_str(":") {
            return None;
        }
        let start = self.pos;
        let mut i = 0;
        while self.peek_digit(i).is_some() {
            i += 1;
        }
        // INVARIANT: Skipping `i` digits is fine.
        self.skip(i);
        Some(Span::new(start, self.pos))
    }

    fn read_ip_literal(&mut self) -> Result<Option<HostKind>> {
        if !self.read_str("[") {
            return Ok(None);
        }

        let start = self.pos;

        let kind = if let Some(segs) = self.read_v6() {
            if self.peek(0) == Some(b'%') {
                self.read_zone_id(segs)?;
            }
            HostKind::Ipv6
        } else if self.pos == start {
            self.read_ipv_future()?;
            HostKind::IpvFuture
        } else {
            err!(start, InvalidIpv6Addr);
        };

        if !self.read_str("]") {
            err!(self.pos, UnexpectedCharOrEnd);
        }
        Ok(Some(kind))
    }

    // Zone identifiers are only accepted on link-local addresses (fe80::/10).
    fn read_zone_id(&mut self, segs: [u16; 8]) -> Result<()> {
        let start = self.pos;
        if !self.read_str("%25") || segs[0] & 0xffc0 != 0xfe80 || !self.read(table::ZONE_ID)? {
            err!(start, InvalidZoneId);
        }
        Ok(())
    }

    fn read_ipv_future(&mut self) -> Result<()> {
        if let Some(b'v' | b'V') = self.peek(0) {
            // INVARIANT: Skipping "v" or "V" is fine.
            self.skip(1);
            if self.read(table::HEXDIG)? && self.read_str(".") && self.read(table::IPV_FUTURE)? {
                return Ok(());
            }
        }
        err!(self.pos, UnexpectedCharOrEnd);
    }

    fn read_curie_reference(&mut self) -> Result<bool> {
        self.read(table::IPATH)?;
        if self.read_str("?") {
            self.read(table::IQUERY)?;
        }
        if self.read_str("#") {
            self.read(table::IFRAGMENT)?;
        }
        Ok(!self.has_remaining())
    }
}

impl Parser<'_> {
    fn table(&self, table: Table) -> Table {
        if self.ascii_only {
            table.ascii_only()
        } else {
            table
        }
    }

    fn read_component(&mut self, table: Table) -> Result<bool> {
        let table = self.table(table);
        self.read(table)
    }

    fn read_v4_or_reg_name(&mut self) -> Result<HostKind> {
        let v4 = self.read_v4().is_some();
        let more = self.read_component(table::IREG_NAME)?;
        Ok(if v4 && !more {
            HostKind::Ipv4
        } else {
            HostKind::RegName
        })
    }

    fn read_host_port(&mut self) -> Result<HostPort> {
        let start = self.pos;
        let kind = match self.read_ip_literal()? {
            Some(kind) => kind,
            None => self.read_v4_or_reg_name()?,
        };
        let host = Span::new(start, self.pos);
        let port = self.read_port();
        Ok(HostPort { host, kind, port })
    }

    fn parse_from_scheme(&mut self) -> Result<()> {
        self.read(table::SCHEME)?;

        if self.peek(0) == Some(b':') {
            // Scheme starts with a letter.
            if self.pos > 0 && self.bytes[0].is_ascii_alphabetic() {
                self.out.scheme = Some(Span::new(0, self.pos));
            } else {
                err!(0, UnexpectedCharOrEnd);
            }

            // INVARIANT: Skipping ":" is fine.
            self.skip(1);
            return if self.read_str("//") {
                self.parse_from_authority()
            } else {
                self.parse_from_path(PathKind::General)
            };
        } else if self.pos == 0 {
            // Nothing read.
            if self.read_str("//") {
                return self.parse_from_authority();
            }
        }
        // Scheme chars are valid for path.
        self.parse_from_path(PathKind::ContinuedNoScheme)
    }

    fn parse_from_authority(&mut self) -> Result<()> {
        let start = self.pos;
        // We first try to read host and port, noting that
        // a reg-name or IPv4address can also be part of userinfo.
        let mut host_port = self.read_host_port()?;
        let mut userinfo = None;

        if let HostKind::Ipv4 | HostKind::RegName = host_port.kind {
            let userinfo_read = self.read_component(table::IUSERINFO)?;

            if self.peek(0) == Some(b'@') {
                userinfo = Some(Span::new(start, self.pos));
                // INVARIANT: Skipping "@" is fine.
                self.skip(1);
                host_port = self.read_host_port()?;
            } else if userinfo_read {
                err!(self.pos, UnexpectedCharOrEnd);
            }
        }

        self.out.authority = Some(ParsedAuthority {
            span: Span::new(start, self.pos),
            userinfo,
            host: host_port.host,
            host_kind: host_port.kind,
            port: host_port.port,
        });
        self.parse_from_path(PathKind::AbEmpty)
    }

    fn parse_from_path(&mut self, kind: PathKind) -> Result<()> {
        let path_start = match kind {
            PathKind::General | PathKind::AbEmpty => self.pos,
            PathKind::ContinuedNoScheme => {
                self.read_component(table::ISEGMENT_NZ_NC)?;

                if self.peek(0) == Some(b':') {
                    // In a relative reference, the first path
                    // segment cannot contain a colon character.
                    err!(self.pos, UnexpectedCharOrEnd);
                }
                0
            }
        };

        if self.read_component(table::IPATH)?
            && kind == PathKind::AbEmpty
            && self.bytes[path_start] != b'/'
        {
            err!(path_start, UnexpectedCharOrEnd);
        }

        self.out.path = Span::new(path_start, self.pos);

        if self.read_str("?") {
            let start = self.pos;
            self.read_component(table::IQUERY)?;
            self.out.query = Some(Span::new(start, self.pos));
        }

        if self.read_str("#") {
            let start = self.pos;
            self.read_component(table::IFRAGMENT)?;
            self.out.fragment = Some(Span::new(start, self.pos));
        }

        if self.has_remaining() {
            err!(self.pos, UnexpectedCharOrEnd);
        }
        Ok(())
    }
}

/// Splits a string only at component delimiters.
fn parse_lenient(s: &str, ascii_only: bool) -> Result<ParsedReference> {
    if ascii_only {
        if let Some(i) = s.bytes().position(|x| !x.is_ascii()) {
            err!(i, UnexpectedCharOrEnd);
        }
    }

    let bytes = s.as_bytes();
    let mut out = ParsedReference::default();
    let mut pos = 0;

    let first_delim = find_any(bytes, 0, b":/?#");
    if first_delim > 0 && bytes.get(first_delim) == Some(&b':') {
        out.scheme = Some(Span::new(0, first_delim));
        pos = first_delim + 1;
    }

    if bytes[pos..].starts_with(b"//") {
        let start = pos + 2;
        let end = find_any(bytes, start, b"/?#");
        out.authority = Some(split_authority_lenient(s, Span::new(start, end)));
        pos = end;
    }

    let path_end = find_any(bytes, pos, b"?#");
    out.path = Span::new(pos, path_end);
    pos = path_end;

    if bytes.get(pos) == Some(&b'?') {
        let end = find_any(bytes, pos + 1, b"#");
        out.query = Some(Span::new(pos + 1, end));
        pos = end;
    }

    if bytes.get(pos) == Some(&b'#') {
        out.fragment = Some(Span::new(pos + 1, s.len()));
    }
    Ok(out)
}

fn find_any(bytes: &[u8], from: usize, delims: &[u8]) -> usize {
    bytes[from..]
        .iter()
        .position(|x| delims.contains(x))
        .map_or(bytes.len(), |i| from + i)
}

fn split_authority_lenient(s: &str, span: Span) -> ParsedAuthority {
    let auth = span.slice(s);
    let (userinfo, host_start) = match auth.rfind('@') {
        Some(i) => (Some(Span::new(span.start, span.start + i)), span.start + i + 1),
        None => (None, span.start),
    };

    let host_port = &s[host_start..span.end];
    let host_len = if host_port.starts_with('[') {
        match host_port.find(']') {
            Some(i) if matches!(host_port.as_bytes().get(i + 1), None | Some(b':')) => i + 1,
            _ => host_port.len(),
        }
    } else {
        match host_port.rfind(':') {
            Some(i) if host_port[i + 1..].bytes().all(|x| x.is_ascii_digit()) => i,
            _ => host_port.len(),
        }
    };

    let host = Span::new(host_start, host_start + host_len);
    ParsedAuthority {
        span,
        userinfo,
        host,
        host_kind: classify_host(host.slice(s)),
        port: (host.end < span.end).then(|| Span::new(host.end + 1, span.end)),
    }
}

/// Classifies a host found by delimiters alone.
fn classify_host(host: &str) -> HostKind {
    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        let mut reader = Reader::new(inner.as_bytes());
        if let Some(segs) = reader.read_v6() {
            let zone_ok = !reader.has_remaining() || reader.read_zone_id(segs).is_ok();
            if zone_ok && !reader.has_remaining() {
                return HostKind::Ipv6;
            }
        } else if reader.pos == 0 && reader.read_ipv_future().is_ok() && !reader.has_remaining() {
            return HostKind::IpvFuture;
        }
        return HostKind::RegName;
    }

    let mut reader = Reader::new(host.as_bytes());
    match reader.read_v4() {
        Some(_) if !reader.has_remaining() => HostKind::Ipv4,
        _ => HostKind::RegName,
    }
}

/// Parses a host previously classified as [`HostKind::Ipv4`].
pub(crate) fn parse_v4(host: &str) -> u32 {
    Reader::new(host.as_bytes()).read_v4().unwrap()
}

/// Parses the interior of a host previously classified as [`HostKind::Ipv6`],
/// returning the address and the decoded-form-free zone identifier, if any.
pub(crate) fn parse_v6(inner: &str) -> ([u16; 8], Option<&str>) {
    let mut reader = Reader::new(inner.as_bytes());
    let segs = reader.read_v6().unwrap();
    let zone_id = inner[reader.pos..].strip_prefix("%25");
    (segs, zone_id)
}

pub(crate) fn validate_curie_reference(s: &str) -> bool {
    if s.starts_with("//") {
        return false;
    }
    matches!(Reader::new(s.as_bytes()).read_curie_reference(), Ok(true))
}
