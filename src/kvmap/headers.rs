//! Header map builder.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::pairs;
use crate::error_handling::{Error, Result};

/// Builds a header map from a flat `name, value, name, value, ...` list.
///
/// Repeated names append rather than overwrite.
///
/// ```
/// let h = reqsession::headers(["User-Agent", "direwolf"]).unwrap();
/// assert_eq!(h["user-agent"], "direwolf");
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedArguments`] for an odd-length list and
/// [`Error::InvalidHeader`] if a name or value is not valid on the wire.
pub fn headers<I, S>(key_values: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut map = HeaderMap::new();
    for (name, value) in pairs(key_values)? {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(&value).map_err(|e| Error::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        map.append(header_name, header_value);
    }
    Ok(map)
}
