use crate::{
    log::trace,
    meta::{ParseMode, Span},
    parse,
};
use alloc::{borrow::Cow, string::String};

/// Selects the characters that [`escape`] percent-encodes.
///
/// In every mode, `'['` and `']'` are encoded when outside of the
/// authority, where they are not allowed unencoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EscapeMode {
    /// Encodes control characters, space, non-ASCII characters and
    /// ``"<>\^`{|}``. A `'%'` is left alone.
    ///
    /// The authority is located only by its delimiters.
    Unsafe,
    /// Encodes non-ASCII characters.
    ///
    /// The authority is located only if the string is a valid IRI reference.
    NonAsciiValidated,
    /// Encodes non-ASCII characters.
    ///
    /// The authority is located only by its delimiters.
    NonAscii,
    /// Like [`Unsafe`](Self::Unsafe), but also encodes a `'%'` that
    /// is not followed by two hexadecimal digits as `"%25"`.
    UnsafeAndStrayPercent,
}

impl EscapeMode {
    /// Returns the mode with the given numeric code in `0..=3`, in declaration order.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Unsafe,
            1 => Self::NonAsciiValidated,
            2 => Self::NonAscii,
            3 => Self::UnsafeAndStrayPercent,
            _ => return None,
        })
    }

    /// Returns the numeric code of the mode.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    fn parse_mode(self) -> ParseMode {
        match self {
            Self::NonAsciiValidated => ParseMode::IriStrict,
            _ => ParseMode::IriLenient,
        }
    }

    fn escapes_unsafe(self) -> bool {
        matches!(self, Self::Unsafe | Self::UnsafeAndStrayPercent)
    }
}

/// Percent-encodes the characters of a URI/IRI reference selected by `mode`.
///
/// Valid percent-encoded octets are passed through, so escaping
/// twice with the same mode gives the same result as escaping once.
/// Borrows from `s` when nothing is to be encoded.
///
/// # Examples
///
/// ```
/// use uri_utility::pct_enc::{escape, EscapeMode};
///
/// let s = "http://[::1]/a b/ü[0]";
/// assert_eq!(escape(s, EscapeMode::Unsafe), "http://[::1]/a%20b/%C3%BC%5B0%5D");
/// assert_eq!(escape(s, EscapeMode::NonAscii), "http://[::1]/a b/%C3%BC%5B0%5D");
///
/// let s = "a%2Fb%zz";
/// assert_eq!(escape(s, EscapeMode::Unsafe), s);
/// assert_eq!(escape(s, EscapeMode::UnsafeAndStrayPercent), "a%2Fb%25zz");
/// ```
#[must_use]
pub fn escape(s: &str, mode: EscapeMode) -> Cow<'_, str> {
    let authority = parse::parse(s, mode.parse_mode())
        .ok()
        .and_then(|r| r.authority)
        .map(|a| a.span);
    trace!("escaping {:?} with authority at {:?}", mode, authority);

    let Some((first, _)) = s
        .char_indices()
        .find(|&(i, ch)| needs_escape(s, i, ch, mode, authority))
    else {
        return Cow::Borrowed(s);
    };

    let mut buf = String::with_capacity(s.len() + 16);
    buf.push_str(&s[..first]);
    for (i, ch) in s[first..].char_indices() {
        if needs_escape(s, first + i, ch, mode, authority) {
            super::push_encoded_char(&mut buf, ch);
        } else {
            buf.push(ch);
        }
    }
    Cow::Owned(buf)
}

fn needs_escape(s: &str, i: usize, ch: char, mode: EscapeMode, authority: Option<Span>) -> bool {
    match ch {
        '[' | ']' => !authority.is_some_and(|a| a.contains(i)),
        '%' => {
            mode == EscapeMode::UnsafeAndStrayPercent
                && !matches!(
                    s.as_bytes().get(i + 1..i + 3),
                    Some(&[hi, lo]) if super::is_hexdig_pair(hi, lo)
                )
        }
        _ if mode.escapes_unsafe() => {
            ch <= ' '
                || ch >= '\x7f'
                || matches!(ch, '"' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}')
        }
        _ => !ch.is_ascii(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        for code in 0..4 {
            assert_eq!(EscapeMode::from_code(code).unwrap().code(), code);
        }
        assert_eq!(EscapeMode::from_code(4), None);
    }

    #[test]
    fn brackets_in_authority() {
        // Not a valid IRI, so the strict mode finds no authority.
        let s = "http://[::1]/\u{fffe}";
        assert_eq!(escape(s, EscapeMode::NonAsciiValidated), "http://%5B::1%5D/%EF%BF%BE");
        assert_eq!(escape(s, EscapeMode::NonAscii), "http://[::1]/%EF%BF%BE");
    }
}
