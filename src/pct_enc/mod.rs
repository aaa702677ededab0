//! Percent-encoding utilities.

mod escape;
pub mod table;

pub use escape::{escape, EscapeMode};
pub use table::Table;

use crate::{
    error::{DecodeError, DecodeErrorKind},
    log::debug,
    utf8::Utf8Chunks,
};
use alloc::{borrow::Cow, string::String, vec::Vec};
use core::{cmp::Ordering, convert::Infallible, fmt, hash, iter::FusedIterator, ops::Range, str};
use ref_cast::{ref_cast_custom, RefCastCustom};

/// Percent-encoded string slices.
///
/// Every `'%'` in an `EStr` slice begins a percent-encoded octet,
/// i.e., is followed by two hexadecimal digits. The slices returned
/// by the component accessors of [`IriRef`](crate::IriRef) are of this type.
///
/// # Comparison
///
/// `EStr` slices are compared [lexicographically](Ord#lexicographical-comparison)
/// by their byte values. Normalization is **not** performed prior to comparison.
///
/// # Examples
///
/// Parse key-value pairs from a query string:
///
/// ```
/// use uri_utility::{pct_enc::EStr, IriRef};
///
/// let s = "?name=%E5%BC%A0%E4%B8%89&speech=%C2%A1Ol%C3%A9%21";
/// let iri = IriRef::parse(s)?;
/// let pairs: Vec<_> = iri
///     .query()
///     .unwrap()
///     .split('&')
///     .map(|s| s.split_once('=').unwrap_or((s, EStr::EMPTY)))
///     .map(|(k, v)| (k.decode().to_string_lossy(), v.decode().to_string_lossy()))
///     .collect();
/// assert_eq!(pairs[0], ("name".into(), "张三".into()));
/// assert_eq!(pairs[1], ("speech".into(), "¡Olé!".into()));
/// # Ok::<_, uri_utility::ParseError>(())
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct EStr {
    inner: str,
}

impl EStr {
    /// Converts a string slice to an `EStr` slice assuming validity.
    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Self;

    /// An empty `EStr` slice.
    pub const EMPTY: &'static Self = Self::new_validated("");

    /// Converts a string slice to an `EStr` slice, returning `None` if
    /// the string contains a `'%'` not followed by two hexadecimal digits.
    #[must_use]
    pub fn new(s: &str) -> Option<&Self> {
        match find_invalid_octet(s) {
            Some(_) => None,
            None => Some(Self::new_validated(s)),
        }
    }

    /// Yields the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the length of the `EStr` slice in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether the `EStr` slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator used to decode the `EStr` slice.
    ///
    /// Always **split before decoding**, as otherwise the data may be
    /// mistaken for component delimiters.
    ///
    /// Note that the iterator will **not** decode `U+002B` (+) as `0x20` (space).
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_utility::pct_enc::EStr;
    ///
    /// let dec = EStr::new("%C2%A1Hola%21").unwrap().decode();
    /// assert_eq!(*dec.clone().to_bytes(), [0xc2, 0xa1, 0x48, 0x6f, 0x6c, 0x61, 0x21]);
    /// assert_eq!(dec.to_string().unwrap(), "¡Hola!");
    /// ```
    pub fn decode(&self) -> Decode<'_> {
        Decode::new(&self.inner)
    }

    /// Returns an iterator over subslices of the `EStr` slice separated by the given delimiter.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_utility::pct_enc::EStr;
    ///
    /// assert!(EStr::new("a,b,c").unwrap().split(',').eq(["a", "b", "c"]));
    /// assert!(EStr::new(",").unwrap().split(',').eq(["", ""]));
    /// assert!(EStr::EMPTY.split(',').eq([""]));
    /// ```
    pub fn split(&self, delim: char) -> Split<'_> {
        assert!(
            table::RESERVED.allows(delim),
            "splitting with non-reserved character"
        );
        Split {
            inner: self.inner.split(delim),
        }
    }

    /// Splits the `EStr` slice on the first occurrence of the given delimiter and
    /// returns prefix before delimiter and suffix after delimiter.
    ///
    /// Returns `None` if the delimiter is not found.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    #[must_use]
    pub fn split_once(&self, delim: char) -> Option<(&Self, &Self)> {
        assert!(
            table::RESERVED.allows(delim),
            "splitting with non-reserved character"
        );
        self.inner
            .split_once(delim)
            .map(|(a, b)| (Self::new_validated(a), Self::new_validated(b)))
    }
}

impl AsRef<str> for EStr {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl PartialEq for EStr {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl PartialEq<str> for EStr {
    fn eq(&self, other: &str) -> bool {
        &self.inner == other
    }
}

impl PartialEq<EStr> for str {
    fn eq(&self, other: &EStr) -> bool {
        self == &other.inner
    }
}

impl Eq for EStr {}

impl hash::Hash for EStr {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl PartialOrd for EStr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EStr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl Default for &EStr {
    /// Creates an empty `EStr` slice.
    fn default() -> Self {
        EStr::EMPTY
    }
}

impl fmt::Debug for EStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for EStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

pub(crate) const fn is_hexdig(x: u8) -> bool {
    x.is_ascii_hexdigit()
}

pub(crate) const fn is_hexdig_pair(hi: u8, lo: u8) -> bool {
    is_hexdig(hi) && is_hexdig(lo)
}

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

/// Decodes a hexadecimal digit.
pub(crate) fn decode_hexdigit(x: u8) -> Option<u8> {
    match OCTET_TABLE_LO[x as usize] {
        0xff => None,
        v => Some(v),
    }
}

/// Decodes a percent-encoded octet, assuming that the bytes are hexadecimal.
fn decode_octet(hi: u8, lo: u8) -> u8 {
    debug_assert!(is_hexdig_pair(hi, lo));
    OCTET_TABLE_HI[hi as usize] | OCTET_TABLE_LO[lo as usize]
}

/// Returns the index of the first `'%'` not followed by two hexadecimal digits.
pub(crate) fn find_invalid_octet(s: &str) -> Option<usize> {
    let s = s.as_bytes();
    let mut i = 0;
    while i < s.len() {
        if s[i] == b'%' {
            match s.get(i + 1..i + 3) {
                Some(&[hi, lo]) if is_hexdig_pair(hi, lo) => i += 3,
                _ => return Some(i),
            }
        } else {
            i += 1;
        }
    }
    None
}

pub(crate) fn encode_byte(x: u8) -> &'static str {
    const TABLE: &[u8; 256 * 3] = &{
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut i = 0;
        let mut table = [0; 256 * 3];
        while i < 256 {
            table[i * 3] = b'%';
            table[i * 3 + 1] = HEX_DIGITS[i >> 4];
            table[i * 3 + 2] = HEX_DIGITS[i & 0b1111];
            i += 1;
        }
        table
    };

    const TABLE_STR: &str = match str::from_utf8(TABLE) {
        Ok(s) => s,
        Err(_) => unreachable!(),
    };

    &TABLE_STR[x as usize * 3..x as usize * 3 + 3]
}

/// Percent-encodes every UTF-8 byte of `ch` onto `buf`.
pub(crate) fn push_encoded_char(buf: &mut String, ch: char) {
    for &x in ch.encode_utf8(&mut [0; 4]).as_bytes() {
        buf.push_str(encode_byte(x));
    }
}

/// An iterator used to decode an [`EStr`] slice.
///
/// This struct is created by [`EStr::decode`]. Normally you'll use the methods below
/// instead of iterating over a `Decode` manually.
///
/// See the [`DecodedChunk`] type for documentation of the items yielded by this iterator.
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Decode<'a> {
    source: &'a str,
}

/// An item returned by the [`Decode`] iterator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodedChunk<'a> {
    /// An unencoded subslice.
    Unencoded(&'a str),
    /// A percent-encoded octet, decoded (for example, `"%20"` decoded as `0x20`).
    PctDecoded(u8),
}

impl<'a> Decode<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn next_if_unencoded(&mut self) -> Option<&'a str> {
        let i = self
            .source
            .bytes()
            .position(|x| x == b'%')
            .unwrap_or(self.source.len());

        if i == 0 {
            None
        } else {
            let s;
            (s, self.source) = self.source.split_at(i);
            Some(s)
        }
    }

    fn decoded_len(&self) -> usize {
        self.source.len() - self.source.bytes().filter(|&x| x == b'%').count() * 2
    }

    fn borrow_all_or_prep_buf(&mut self) -> Result<&'a str, String> {
        if let Some(s) = self.next_if_unencoded() {
            if self.source.is_empty() {
                return Ok(s);
            }
            let mut buf = String::with_capacity(s.len() + self.decoded_len());
            buf.push_str(s);
            Err(buf)
        } else {
            Err(String::with_capacity(self.decoded_len()))
        }
    }

    /// Decodes the rest of the slice as UTF-8, calling `on_invalid` with the
    /// index of the first triplet of each maximal invalid subpart, which is
    /// then replaced with U+FFFD unless `on_invalid` fails.
    fn decode_utf8<E>(
        mut self,
        mut on_invalid: impl FnMut(usize) -> Result<(), E>,
    ) -> Result<Cow<'a, str>, E> {
        if self.source.is_empty() {
            return Ok(Cow::Borrowed(""));
        }

        let total_len = self.source.len();
        let mut buf = match self.borrow_all_or_prep_buf() {
            Ok(s) => return Ok(Cow::Borrowed(s)),
            Err(buf) => buf,
        };

        // Octets are only flushed at the end of a run of triplets: an unencoded
        // character always starts with a non-continuation byte.
        let mut octets = Vec::new();
        let mut run_start = 0;

        loop {
            let pos = total_len - self.source.len();
            let chunk = self.next();
            if let Some(DecodedChunk::PctDecoded(x)) = chunk {
                if octets.is_empty() {
                    run_start = pos;
                }
                octets.push(x);
                continue;
            }

            let mut i = 0;
            for utf8 in Utf8Chunks::new(&octets) {
                buf.push_str(utf8.valid());
                i += utf8.valid().len();
                if !utf8.invalid().is_empty() {
                    on_invalid(run_start + i * 3)?;
                    buf.push(char::REPLACEMENT_CHARACTER);
                    i += utf8.invalid().len();
                }
            }
            octets.clear();

            match chunk {
                Some(DecodedChunk::Unencoded(s)) => buf.push_str(s),
                _ => break,
            }
        }
        Ok(Cow::Owned(buf))
    }

    /// Decodes the slice to bytes.
    ///
    /// This method allocates only when the slice contains any percent-encoded octet.
    #[must_use]
    pub fn to_bytes(mut self) -> Cow<'a, [u8]> {
        if self.source.is_empty() {
            return Cow::Borrowed(&[]);
        }

        let mut buf = match self.borrow_all_or_prep_buf() {
            Ok(s) => return Cow::Borrowed(s.as_bytes()),
            Err(buf) => buf.into_bytes(),
        };

        for chunk in self {
            match chunk {
                DecodedChunk::Unencoded(s) => buf.extend_from_slice(s.as_bytes()),
                DecodedChunk::PctDecoded(x) => buf.push(x),
            }
        }
        Cow::Owned(buf)
    }

    /// Attempts to decode the slice to a string.
    ///
    /// This method allocates only when the slice contains any percent-encoded octet.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the decoded bytes are not valid UTF-8.
    pub fn to_string(self) -> Result<Cow<'a, str>, DecodeError> {
        self.decode_utf8(|index| {
            Err(DecodeError {
                index,
                kind: DecodeErrorKind::InvalidUtf8,
            })
        })
    }

    /// Decodes the slice to a string, replacing any invalid UTF-8 sequences with
    /// [`U+FFFD REPLACEMENT CHARACTER`][U+FFFD].
    ///
    /// [U+FFFD]: char::REPLACEMENT_CHARACTER
    ///
    /// This method allocates only when the slice contains any percent-encoded octet.
    #[must_use]
    pub fn to_string_lossy(self) -> Cow<'a, str> {
        match self.decode_utf8(|_| Ok::<_, Infallible>(())) {
            Ok(s) => s,
            Err(e) => match e {},
        }
    }
}

impl<'a> Iterator for Decode<'a> {
    type Item = DecodedChunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.source.is_empty() {
            None
        } else if let Some(s) = self.next_if_unencoded() {
            Some(DecodedChunk::Unencoded(s))
        } else {
            let s;
            (s, self.source) = self.source.split_at(3);
            let x = decode_octet(s.as_bytes()[1], s.as_bytes()[2]);
            Some(DecodedChunk::PctDecoded(x))
        }
    }
}

impl FusedIterator for Decode<'_> {}

/// Percent-decodes a string, replacing each maximal invalid UTF-8
/// subsequence of the decoded octets with U+FFFD.
///
/// Equivalent to `decode_with(s, true)`.
///
/// # Errors
///
/// Returns `Err` if a `'%'` is not followed by two hexadecimal digits.
///
/// # Examples
///
/// ```
/// use uri_utility::pct_enc::decode;
///
/// assert_eq!(decode("te%c2%80t")?, "te\u{80}t");
/// assert_eq!(decode("te%c2%40t")?, "te\u{fffd}@t");
/// assert_eq!(decode("te%c2%c3t")?, "te\u{fffd}\u{fffd}t");
/// assert!(decode("te%c").is_err());
/// # Ok::<_, uri_utility::DecodeError>(())
/// ```
pub fn decode(s: &str) -> Result<Cow<'_, str>, DecodeError> {
    decode_with(s, true)
}

/// Percent-decodes a string.
///
/// Unencoded characters are passed through. When `lenient` is `true`, each
/// maximal invalid UTF-8 subsequence of the decoded octets is replaced with
/// U+FFFD; otherwise it is an error.
///
/// Borrows from `s` when it contains no `'%'`.
///
/// # Errors
///
/// Returns `Err` if a `'%'` is not followed by two hexadecimal digits,
/// regardless of `lenient`, or if `lenient` is `false` and the decoded
/// octets are not valid UTF-8.
pub fn decode_with(s: &str, lenient: bool) -> Result<Cow<'_, str>, DecodeError> {
    decode_range(s, 0..s.len(), lenient)
}

/// Percent-decodes the substring `s[range]`.
///
/// Error indexes are byte offsets into `s`. See [`decode_with`] for details.
///
/// # Errors
///
/// See [`decode_with`].
///
/// # Panics
///
/// Panics if the range is out of bounds or not on char boundaries of `s`.
pub fn decode_range(s: &str, range: Range<usize>, lenient: bool) -> Result<Cow<'_, str>, DecodeError> {
    let offset = range.start;
    let src = &s[range];

    if let Some(i) = find_invalid_octet(src) {
        debug!("invalid percent-encoded octet at index {}", offset + i);
        return Err(DecodeError {
            index: offset + i,
            kind: DecodeErrorKind::InvalidOctet,
        });
    }

    Decode::new(src).decode_utf8(|i| {
        if lenient {
            return Ok(());
        }
        debug!("invalid UTF-8 at index {}", offset + i);
        Err(DecodeError {
            index: offset + i,
            kind: DecodeErrorKind::InvalidUtf8,
        })
    })
}

/// Percent-encodes every character not allowed by `table`.
///
/// A `'%'` is always encoded as `"%25"` since no table allows it unencoded.
///
/// # Examples
///
/// ```
/// use uri_utility::pct_enc::{encode, table};
///
/// assert_eq!(encode("a b/ü%", table::UNRESERVED), "a%20b%2F%C3%BC%25");
/// assert_eq!(encode("a b/ü", table::IPATH), "a%20b/ü");
/// ```
#[must_use]
pub fn encode(s: &str, table: Table) -> String {
    let mut buf = String::with_capacity(s.len());
    let mut rem = s;

    while !rem.is_empty() {
        let i = rem
            .char_indices()
            .find_map(|(i, ch)| (!table.allows(ch)).then_some(i))
            .unwrap_or(rem.len());
        buf.push_str(&rem[..i]);
        rem = &rem[i..];

        let mut chars = rem.chars();
        if let Some(ch) = chars.next() {
            push_encoded_char(&mut buf, ch);
        }
        rem = chars.as_str();
    }
    buf
}

/// An iterator over subslices of an [`EStr`] slice separated by a delimiter.
///
/// This struct is created by [`EStr::split`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Split<'a> {
    inner: str::Split<'a, char>,
}

impl<'a> Iterator for Split<'a> {
    type Item = &'a EStr;

    fn next(&mut self) -> Option<&'a EStr> {
        self.inner.next().map(EStr::new_validated)
    }
}

impl<'a> DoubleEndedIterator for Split<'a> {
    fn next_back(&mut self) -> Option<&'a EStr> {
        self.inner.next_back().map(EStr::new_validated)
    }
}

impl FusedIterator for Split<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hexdigits() {
        assert_eq!(decode_hexdigit(b'0'), Some(0));
        assert_eq!(decode_hexdigit(b'f'), Some(15));
        assert_eq!(decode_hexdigit(b'F'), Some(15));
        assert_eq!(decode_hexdigit(b'g'), None);
        assert_eq!(decode_octet(b'2', b'f'), b'/');
    }

    #[test]
    fn invalid_octets() {
        assert_eq!(find_invalid_octet("a%20b"), None);
        assert_eq!(find_invalid_octet("a%2"), Some(1));
        assert_eq!(find_invalid_octet("%%41"), Some(0));
        assert_eq!(find_invalid_octet("%41%g1"), Some(3));
    }
}
