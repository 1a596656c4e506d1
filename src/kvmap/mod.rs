//! Key/value builders for request data.
//!
//! This module provides:
//! - `MultiMap`: an insertion-ordered, multi-valued string map with
//!   deterministic URL encoding
//! - `Params` and `PostForm`, the query-string and form flavours of it
//! - `Cookie`/`Cookies` and the `headers` builder
//!
//! Every builder accepts a flat `key, value, key, value, ...` list and rejects
//! an odd number of items with [`Error::MalformedArguments`].

mod cookies;
mod headers;

use std::ops::{Deref, DerefMut};

use url::form_urlencoded;

use crate::error_handling::{Error, Result};

pub use cookies::{Cookie, Cookies};
pub use headers::headers;

/// Splits a flat key/value list into pairs.
pub(crate) fn pairs<I, S>(key_values: I) -> Result<Vec<(String, String)>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let items: Vec<String> = key_values.into_iter().map(Into::into).collect();
    if items.len() % 2 != 0 {
        return Err(Error::MalformedArguments { len: items.len() });
    }
    let mut iter = items.into_iter();
    let mut out = Vec::new();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        out.push((key, value));
    }
    Ok(out)
}

/// A string map where each key holds an ordered list of values.
///
/// Keys keep the order they were first inserted in. Encoding with
/// [`MultiMap::url_encode`] visits keys in sorted order instead, so the same
/// contents always encode to the same string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiMap {
    entries: Vec<(String, Vec<String>)>,
}

impl MultiMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from a flat `key, value, key, value, ...` list.
    ///
    /// Repeated keys accumulate their values in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedArguments`] if the list has an odd length.
    pub fn from_pairs<I, S>(key_values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for (key, value) in pairs(key_values)? {
            map.add(key, value);
        }
        Ok(map)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Appends `value` to the values of `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1.push(value.into()),
            None => self.entries.push((key, vec![value.into()])),
        }
    }

    /// Replaces all values of `key` with the single `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1 = vec![value.into()],
            None => self.entries.push((key, vec![value.into()])),
        }
    }

    /// Removes `key` and its values. Absent keys are ignored.
    pub fn del(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k != key);
    }

    /// Returns the first value of `key`, or an empty string if there is none.
    pub fn get(&self, key: &str) -> &str {
        self.get_all(key).first().map(String::as_str).unwrap_or("")
    }

    /// Returns the value of `key` at `index`.
    ///
    /// An absent key yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the key exists but holds fewer than
    /// `index + 1` values.
    pub fn get_at(&self, key: &str, index: usize) -> Result<&str> {
        let values = self.get_all(key);
        if values.is_empty() {
            return Ok("");
        }
        values
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| Error::OutOfRange {
                key: key.to_string(),
                index,
                len: values.len(),
            })
    }

    /// Returns every value of `key` in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.position(key)
            .map(|i| self.entries[i].1.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if `key` has at least one value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates keys with their values, in key insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Encodes the map as `key=value&key=value`, form-URL-encoded.
    ///
    /// Keys are emitted in lexicographic order; values of one key keep their
    /// insertion order.
    ///
    /// Escaping follows `application/x-www-form-urlencoded`: alphanumerics and
    /// `*-._` stay as-is, a space becomes `+` and every other byte is
    /// percent-encoded with uppercase hex. So `~` is written `%7E` while `*`
    /// is left alone, which differs from some query escapers.
    ///
    /// ```
    /// use reqsession::MultiMap;
    ///
    /// let map = MultiMap::from_pairs(["b", "2", "a", "1", "a", "3"]).unwrap();
    /// assert_eq!(map.url_encode(), "a=1&a=3&b=2");
    /// ```
    pub fn url_encode(&self) -> String {
        let mut sorted: Vec<&(String, Vec<String>)> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in sorted {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

/// Query parameters appended to a request URL.
///
/// ```
/// use reqsession::Params;
///
/// let params = Params::from_pairs(["key1", "value1", "key2", "value2"]).unwrap();
/// assert_eq!(params.url_encode(), "key1=value1&key2=value2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(MultiMap);

impl Params {
    /// Builds params from a flat key/value list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedArguments`] if the list has an odd length.
    pub fn from_pairs<I, S>(key_values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MultiMap::from_pairs(key_values).map(Self)
    }
}

/// A form sent URL-encoded as the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm(MultiMap);

impl PostForm {
    /// Builds a form from a flat key/value list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedArguments`] if the list has an odd length.
    pub fn from_pairs<I, S>(key_values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MultiMap::from_pairs(key_values).map(Self)
    }
}

macro_rules! deref_multimap {
    ($($ty:ty),*) => {$(
        impl Deref for $ty {
            type Target = MultiMap;

            fn deref(&self) -> &MultiMap {
                &self.0
            }
        }

        impl DerefMut for $ty {
            fn deref_mut(&mut self) -> &mut MultiMap {
                &mut self.0
            }
        }

        impl From<MultiMap> for $ty {
            fn from(map: MultiMap) -> Self {
                Self(map)
            }
        }
    )*};
}

deref_multimap!(Params, PostForm);
