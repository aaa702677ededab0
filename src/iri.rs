use crate::{
    component::Authority,
    error::ParseError,
    meta::{ParseMode, ParsedReference},
    parse,
    pct_enc::EStr,
    resolve,
};
use alloc::{borrow::ToOwned, string::String};
use borrow_or_share::{BorrowOrShare, Bos};
use core::{borrow::Borrow, cmp::Ordering, fmt, hash, str::FromStr};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Types that can be parsed into an [`IriRef`].
pub trait Parse {
    /// The storage of the parsed reference.
    type Val;
    /// The error returned on failure.
    type Err;

    /// Parses `self` into an [`IriRef`].
    fn parse(self) -> Result<IriRef<Self::Val>, Self::Err>;
}

impl<'a> Parse for &'a str {
    type Val = &'a str;
    type Err = ParseError;

    fn parse(self) -> Result<IriRef<&'a str>, ParseError> {
        parse::parse(self, ParseMode::IriStrict).map(|meta| IriRef { val: self, meta })
    }
}

impl Parse for String {
    type Val = Self;
    type Err = (ParseError, Self);

    fn parse(self) -> Result<IriRef<String>, (ParseError, Self)> {
        match parse::parse(&self, ParseMode::IriStrict) {
            Ok(meta) => Ok(IriRef { val: self, meta }),
            Err(e) => Err((e, self)),
        }
    }
}

/// An [IRI reference], i.e., either an IRI or a relative reference.
///
/// The string is kept along with the boundaries of its components,
/// so accessing a component does not parse again.
///
/// [IRI reference]: https://datatracker.ietf.org/doc/html/rfc3987#section-2.2
///
/// # Type parameter
///
/// The `T` parameter is the storage: `&str` for a borrowed reference
/// or `String` for an owned one.
///
/// # Comparison
///
/// `IriRef`s are compared [lexicographically](Ord#lexicographical-comparison)
/// by their byte values. Normalization is **not** performed prior to comparison.
///
/// # Examples
///
/// ```
/// use uri_utility::{pct_enc::EStr, IriRef};
///
/// let iri = IriRef::parse("foo://user@example.com:8042/over/there?name=ferret#nose")?;
///
/// assert_eq!(iri.scheme().unwrap(), "foo");
/// let auth = iri.authority().unwrap();
/// assert_eq!(auth.as_str(), "user@example.com:8042");
/// assert_eq!(auth.userinfo().unwrap(), "user");
/// assert_eq!(auth.host(), "example.com");
/// assert_eq!(auth.port_to_u16(), Ok(Some(8042)));
/// assert_eq!(iri.path(), "/over/there");
/// assert_eq!(iri.query(), Some(EStr::new("name=ferret").unwrap()));
/// assert_eq!(iri.fragment(), Some(EStr::new("nose").unwrap()));
/// # Ok::<_, uri_utility::ParseError>(())
/// ```
#[derive(Clone, Copy)]
pub struct IriRef<T> {
    val: T,
    meta: ParsedReference,
}

impl<T> IriRef<T> {
    /// Parses an IRI reference from a string into an `IriRef`.
    ///
    /// The return type is
    ///
    /// - `Result<IriRef<&str>, ParseError>` for `I = &str`;
    /// - `Result<IriRef<String>, (ParseError, String)>` for `I = String`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not match the
    /// [`IRI-reference`][abnf] ABNF rule from RFC 3987.
    ///
    /// [abnf]: https://datatracker.ietf.org/doc/html/rfc3987#section-2.2
    pub fn parse<I>(input: I) -> Result<Self, I::Err>
    where
        I: Parse<Val = T>,
    {
        input.parse()
    }

    /// Returns the boundaries of the components.
    #[must_use]
    pub fn spans(&self) -> ParsedReference {
        self.meta
    }
}

impl IriRef<String> {
    /// Borrows this `IriRef<String>` as `IriRef<&str>`.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn borrow(&self) -> IriRef<&str> {
        IriRef {
            val: &self.val,
            meta: self.meta,
        }
    }

    /// Consumes this `IriRef<String>` and yields the underlying [`String`].
    #[must_use]
    pub fn into_string(self) -> String {
        self.val
    }
}

impl IriRef<&str> {
    /// Creates a new `IriRef<String>` by cloning the contents of this `IriRef<&str>`.
    #[must_use]
    pub fn to_owned(&self) -> IriRef<String> {
        IriRef {
            val: self.val.to_owned(),
            meta: self.meta,
        }
    }
}

impl<'i, 'o, T: BorrowOrShare<'i, 'o, str>> IriRef<T> {
    /// Returns the IRI reference as a string slice.
    #[must_use]
    pub fn as_str(&'i self) -> &'o str {
        self.val.borrow_or_share()
    }

    /// Returns the optional [scheme] component.
    ///
    /// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
    #[must_use]
    pub fn scheme(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        self.meta.scheme.map(|span| span.slice(s))
    }

    /// Returns the optional [authority] component.
    ///
    /// [authority]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2
    #[must_use]
    pub fn authority(&'i self) -> Option<Authority<'o>> {
        let s = self.as_str();
        self.meta.authority.map(|meta| Authority::new(s, meta))
    }

    /// Returns the [path] component.
    ///
    /// The path component is always present, although it may be empty.
    ///
    /// [path]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.3
    #[must_use]
    pub fn path(&'i self) -> &'o EStr {
        EStr::new_validated(self.meta.path.slice(self.as_str()))
    }

    /// Returns the optional [query] component.
    ///
    /// [query]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.4
    #[must_use]
    pub fn query(&'i self) -> Option<&'o EStr> {
        let s = self.as_str();
        self.meta
            .query
            .map(|span| EStr::new_validated(span.slice(s)))
    }

    /// Returns the optional [fragment] component.
    ///
    /// [fragment]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.5
    #[must_use]
    pub fn fragment(&'i self) -> Option<&'o EStr> {
        let s = self.as_str();
        self.meta
            .fragment
            .map(|span| EStr::new_validated(span.slice(s)))
    }
}

impl<T: Bos<str>> IriRef<T> {
    /// Resolves the IRI reference against the given base.
    ///
    /// See [`resolve`](crate::resolve) for the exact behavior of this method.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_utility::IriRef;
    ///
    /// let base = IriRef::parse("http://example.com/foo/bar")?;
    ///
    /// assert_eq!(IriRef::parse("baz")?.resolve_against(&base), "http://example.com/foo/baz");
    /// assert_eq!(IriRef::parse("../baz")?.resolve_against(&base), "http://example.com/baz");
    /// assert_eq!(IriRef::parse("?baz")?.resolve_against(&base), "http://example.com/foo/bar?baz");
    /// # Ok::<_, uri_utility::ParseError>(())
    /// ```
    #[must_use]
    pub fn resolve_against<U: Bos<str>>(&self, base: &IriRef<U>) -> IriRef<String> {
        let (val, meta) =
            resolve::resolve_parsed(self.as_str(), &self.meta, base.as_str(), &base.meta);
        IriRef { val, meta }
    }

    /// Checks whether a scheme component is present.
    #[must_use]
    pub fn has_scheme(&self) -> bool {
        self.meta.scheme.is_some()
    }

    /// Checks whether an authority component is present.
    #[must_use]
    pub fn has_authority(&self) -> bool {
        self.meta.authority.is_some()
    }

    /// Checks whether a query component is present.
    #[must_use]
    pub fn has_query(&self) -> bool {
        self.meta.query.is_some()
    }

    /// Checks whether a fragment component is present.
    #[must_use]
    pub fn has_fragment(&self) -> bool {
        self.meta.fragment.is_some()
    }
}

impl<T: Bos<str>, U: Bos<str>> PartialEq<IriRef<U>> for IriRef<T> {
    fn eq(&self, other: &IriRef<U>) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<T: Bos<str>> PartialEq<str> for IriRef<T> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<T: Bos<str>> PartialEq<IriRef<T>> for str {
    fn eq(&self, other: &IriRef<T>) -> bool {
        self == other.as_str()
    }
}

impl<T: Bos<str>> PartialEq<&str> for IriRef<T> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<T: Bos<str>> PartialEq<IriRef<T>> for &str {
    fn eq(&self, other: &IriRef<T>) -> bool {
        *self == other.as_str()
    }
}

impl<T: Bos<str>> Eq for IriRef<T> {}

impl<T: Bos<str>> hash::Hash for IriRef<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl<T: Bos<str>> PartialOrd for IriRef<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Bos<str>> Ord for IriRef<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl<T: Bos<str>> AsRef<str> for IriRef<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T: Bos<str>> Borrow<str> for IriRef<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<'a> TryFrom<&'a str> for IriRef<&'a str> {
    type Error = ParseError;

    /// Equivalent to [`parse`](Self::parse).
    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        IriRef::parse(value)
    }
}

impl TryFrom<String> for IriRef<String> {
    type Error = (ParseError, String);

    /// Equivalent to [`parse`](Self::parse).
    fn try_from(value: String) -> Result<Self, Self::Error> {
        IriRef::parse(value)
    }
}

impl<'a> From<IriRef<&'a str>> for &'a str {
    /// Equivalent to [`as_str`](IriRef::as_str).
    fn from(value: IriRef<&'a str>) -> &'a str {
        value.val
    }
}

impl From<IriRef<String>> for String {
    /// Equivalent to [`into_string`](IriRef::into_string).
    fn from(value: IriRef<String>) -> String {
        value.val
    }
}

impl From<IriRef<&str>> for IriRef<String> {
    /// Equivalent to [`to_owned`](IriRef::to_owned).
    fn from(value: IriRef<&str>) -> Self {
        value.to_owned()
    }
}

impl FromStr for IriRef<String> {
    type Err = ParseError;

    /// Equivalent to `IriRef::parse(s).map(|r| r.to_owned())`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IriRef::parse(s).map(|r| r.to_owned())
    }
}

impl<T: Bos<str>> fmt::Debug for IriRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IriRef")
            .field("scheme", &self.scheme())
            .field("authority", &self.authority())
            .field("path", &self.path())
            .field("query", &self.query())
            .field("fragment", &self.fragment())
            .finish()
    }
}

impl<T: Bos<str>> fmt::Display for IriRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

#[cfg(feature = "serde")]
impl<T: Bos<str>> Serialize for IriRef<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for IriRef<&'de str> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        IriRef::parse(s).map_err(de::Error::custom)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for IriRef<String> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        IriRef::parse(s).map_err(|(e, _)| de::Error::custom(e))
    }
}

