//! Request preparation.
//!
//! Everything that can fail before the network is touched happens here:
//! method and URL parsing, policy resolution, body selection and cookie
//! attachment. The result is a [`PreparedRequest`] that only needs a client.

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::Method;
use url::Url;

use crate::config::FORM_CONTENT_TYPE;
use crate::error_handling::{Error, Result};
use crate::initialization::TransportKey;
use crate::kvmap::{Cookie, Params, PostForm};
use crate::policy::{merge_headers, resolve_timeout, select_proxy, RedirectPolicy, TimeoutPolicy};
use crate::request::{Body, Proxy, RequestSetting, Timeout};

/// Session-level defaults a request is resolved against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionDefaults<'a> {
    pub(crate) headers: &'a HeaderMap,
    pub(crate) proxy: Option<&'a Proxy>,
    pub(crate) timeout: Timeout,
}

/// What goes in the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Payload {
    Empty,
    Form(String),
    Raw(Vec<u8>),
}

/// A fully resolved request, ready to hand to a client.
#[derive(Debug)]
pub(crate) struct PreparedRequest {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) payload: Payload,
    pub(crate) transport: TransportKey,
    pub(crate) timeout: TimeoutPolicy,
}

/// Parses the method and URL, appending `params` to the query.
///
/// The method is uppercased here as well, since `RequestSetting` fields are
/// public and may bypass its constructors. An empty method means GET.
pub(crate) fn build_target(
    method: &str,
    raw_url: &str,
    params: Option<&Params>,
) -> Result<(Method, Url)> {
    let method_str = if method.is_empty() {
        "GET".to_string()
    } else {
        method.to_uppercase()
    };
    let new_request_error = |source: crate::error_handling::BoxError| Error::NewRequest {
        method: method_str.clone(),
        url: raw_url.to_string(),
        source,
    };

    let method = Method::from_bytes(method_str.as_bytes()).map_err(|e| new_request_error(e.into()))?;
    let mut url = Url::parse(raw_url).map_err(|e| new_request_error(e.into()))?;

    if let Some(params) = params.filter(|p| !p.is_empty()) {
        let encoded = params.url_encode();
        let query = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
            _ => encoded,
        };
        url.set_query(Some(&query));
    }
    Ok((method, url))
}

/// Chooses the body, setting the form content type when a form is sent.
pub(crate) fn resolve_payload(
    body: Option<&Body>,
    form: Option<&PostForm>,
    headers: &mut HeaderMap,
) -> Result<Payload> {
    match (body, form) {
        (Some(_), Some(_)) => Err(Error::RequestBody),
        (None, Some(form)) => {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
            Ok(Payload::Form(form.url_encode()))
        }
        (Some(body), None) => Ok(Payload::Raw(body.as_bytes().to_vec())),
        (None, None) => Ok(Payload::Empty),
    }
}

/// Adds one cookie to the `Cookie` header, after any cookies already there.
///
/// The cookie is validated first so it stays a single entry on the wire.
pub(crate) fn attach_cookie(headers: &mut HeaderMap, cookie: &Cookie) -> Result<()> {
    cookie.validate()?;
    let pair = cookie.pair();
    let value = match headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
        Some(existing) if !existing.is_empty() => format!("{existing}; {pair}"),
        _ => pair,
    };
    let value = HeaderValue::from_str(&value).map_err(|e| Error::InvalidHeader {
        name: format!("Cookie ({})", cookie.name),
        reason: e.to_string(),
    })?;
    headers.insert(COOKIE, value);
    Ok(())
}

/// Resolves `setting` against the session defaults.
///
/// When the request carries its own cookies, the jar's cookies for the URL
/// are written first: the transport skips the jar for requests that already
/// have a `Cookie` header.
pub(crate) fn prepare(
    setting: &RequestSetting,
    defaults: SessionDefaults<'_>,
    jar: &Jar,
) -> Result<PreparedRequest> {
    let (method, url) = build_target(&setting.method, &setting.url, setting.params.as_ref())?;

    let mut headers = merge_headers(setting.headers.as_ref(), defaults.headers);

    let proxy = select_proxy(setting.proxy.as_ref(), defaults.proxy)?;
    if let Some(selector) = &proxy {
        selector.select(&url)?;
    }

    let redirect = RedirectPolicy::resolve(setting.redirect_num);
    let timeout = resolve_timeout(setting.timeout, defaults.timeout);

    let payload = resolve_payload(setting.body.as_ref(), setting.post_form.as_ref(), &mut headers)?;

    if let Some(cookies) = setting.cookies.as_ref().filter(|c| !c.is_empty()) {
        if !headers.contains_key(COOKIE) {
            if let Some(stored) = jar.cookies(&url) {
                headers.insert(COOKIE, stored);
            }
        }
        for cookie in cookies {
            attach_cookie(&mut headers, cookie)?;
        }
    }

    Ok(PreparedRequest {
        method,
        url,
        headers,
        payload,
        transport: TransportKey { proxy, redirect },
        timeout,
    })
}
