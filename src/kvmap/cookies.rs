//! Request and response cookies.

use std::ops::Deref;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pairs;
use crate::error_handling::{Error, Result};

// RFC 6265 cookie-octet: visible ASCII minus DQUOTE, comma, semicolon and backslash
fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

// RFC 7230 tchar
fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// A single cookie with its optional attributes.
///
/// Only `name` and `value` travel on a request; the attributes are filled in
/// for cookies parsed from a response and used when seeding a session jar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    /// `Max-Age` in whole seconds
    pub max_age: Option<Duration>,
    pub expires: Option<SystemTime>,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    /// Creates a cookie with no attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            max_age: None,
            expires: None,
            secure: false,
            http_only: false,
        }
    }

    /// Checks that the cookie travels as exactly one `name=value` entry.
    ///
    /// The name must be a non-empty token and the value a run of cookie
    /// octets, optionally wrapped in double quotes. Spaces, commas, `;` and
    /// control characters are rejected rather than rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] naming the offending cookie.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidHeader {
            name: format!("Cookie ({})", self.name),
            reason: reason.to_string(),
        };
        if self.name.is_empty() || !self.name.bytes().all(is_token_char) {
            return Err(invalid("cookie name must be a non-empty token"));
        }
        let value = self.value.as_bytes();
        let inner = match value {
            [b'"', inner @ .., b'"'] => inner,
            _ => value,
        };
        if !inner.iter().copied().all(is_cookie_octet) {
            return Err(invalid("cookie value contains a character outside cookie-octet"));
        }
        Ok(())
    }

    /// The `name=value` pair as sent in a `Cookie` request header.
    pub fn pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    /// Renders the cookie in `Set-Cookie` syntax, attributes included.
    pub fn to_set_cookie(&self) -> String {
        let mut out = self.pair();
        if let Some(path) = &self.path {
            out.push_str("; Path=");
            out.push_str(path);
        }
        if let Some(domain) = &self.domain {
            out.push_str("; Domain=");
            out.push_str(domain);
        }
        if let Some(max_age) = self.max_age {
            out.push_str(&format!("; Max-Age={}", max_age.as_secs()));
        }
        if let Some(expires) = self.expires {
            let expires: DateTime<Utc> = expires.into();
            out.push_str(&format!(
                "; Expires={}",
                expires.format("%a, %d %b %Y %H:%M:%S GMT")
            ));
        }
        if self.secure {
            out.push_str("; Secure");
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        out
    }
}

impl From<reqwest::cookie::Cookie<'_>> for Cookie {
    fn from(c: reqwest::cookie::Cookie<'_>) -> Self {
        Self {
            name: c.name().to_string(),
            value: c.value().to_string(),
            path: c.path().map(str::to_string),
            domain: c.domain().map(str::to_string),
            max_age: c.max_age(),
            expires: c.expires(),
            secure: c.secure(),
            http_only: c.http_only(),
        }
    }
}

/// An ordered list of cookies.
///
/// Each cookie is attached to a request as its own entry, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookies(Vec<Cookie>);

impl Cookies {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds cookies from a flat `name, value, name, value, ...` list.
    ///
    /// ```
    /// use reqsession::Cookies;
    ///
    /// let cookies = Cookies::from_pairs(["name", "direwolf"]).unwrap();
    /// assert_eq!(cookies.get("name").unwrap().value, "direwolf");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedArguments` if the list has an odd length.
    pub fn from_pairs<I, S>(key_values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self(
            pairs(key_values)?
                .into_iter()
                .map(|(name, value)| Cookie::new(name, value))
                .collect(),
        ))
    }

    /// Parses the value of a `Cookie` request header (`a=1; b=2`).
    ///
    /// Segments without `=` are skipped.
    pub fn from_header_value(header: &str) -> Self {
        Self(
            header
                .split(';')
                .filter_map(|part| part.trim().split_once('='))
                .map(|(name, value)| Cookie::new(name.trim(), value.trim()))
                .collect(),
        )
    }

    /// Appends a cookie with no attributes.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push(Cookie::new(name, value));
    }

    /// Appends a cookie.
    pub fn push(&mut self, cookie: Cookie) {
        self.0.push(cookie);
    }

    /// Returns the first cookie named `name`.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.0.iter().find(|c| c.name == name)
    }
}

impl Deref for Cookies {
    type Target = [Cookie];

    fn deref(&self) -> &[Cookie] {
        &self.0
    }
}

impl From<Vec<Cookie>> for Cookies {
    fn from(cookies: Vec<Cookie>) -> Self {
        Self(cookies)
    }
}

impl FromIterator<Cookie> for Cookies {
    fn from_iter<T: IntoIterator<Item = Cookie>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Cookies {
    type Item = Cookie;
    type IntoIter = std::vec::IntoIter<Cookie>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Cookies {
    type Item = &'a Cookie;
    type IntoIter = std::slice::Iter<'a, Cookie>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
