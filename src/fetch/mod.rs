//! Request dispatch.
//!
//! Turns a [`RequestSetting`] into exactly one [`Response`] or one error:
//! 1. Resolve method, URL, headers, proxy, redirect limit, timeout, body and
//!    cookies (no I/O; any failure stops here)
//! 2. Pick the session client for the resolved proxy/redirect policy
//! 3. Send with the resolved timeout applied to this request only
//! 4. Read the whole body and build the response
//!
//! Session state is never reconfigured per request, so concurrent requests
//! can't observe each other's policy.

mod request;

use log::debug;
use reqwest::cookie::Jar;

use crate::error_handling::{transport_error, Result};
use crate::initialization::ClientPool;
use crate::request::RequestSetting;
use crate::response::{build_response, Response};

pub(crate) use request::{prepare, Payload, PreparedRequest, SessionDefaults};

/// Sends `setting` through `pool` and buffers the response.
pub(crate) async fn dispatch(
    pool: &ClientPool,
    jar: &Jar,
    defaults: SessionDefaults<'_>,
    setting: RequestSetting,
) -> Result<Response> {
    let prepared = prepare(&setting, defaults, jar)?;
    execute(pool, prepared, setting).await
}

/// Sends an already prepared request.
pub(crate) async fn execute(
    pool: &ClientPool,
    prepared: PreparedRequest,
    setting: RequestSetting,
) -> Result<Response> {
    let PreparedRequest {
        method,
        url,
        headers,
        payload,
        transport,
        timeout,
    } = prepared;

    let client = pool.client_for(&transport)?;
    let redirect_limit = transport.redirect.limit();
    debug!(
        "{method} {url} (timeout: {timeout:?}, redirect limit: {redirect_limit}, proxy: {})",
        transport.proxy.is_some()
    );

    let mut builder = client.request(method, url).headers(headers);
    if let Some(duration) = timeout.as_duration() {
        builder = builder.timeout(duration);
    }
    builder = match payload {
        Payload::Empty => builder,
        Payload::Form(form) => builder.body(form),
        Payload::Raw(bytes) => builder.body(bytes),
    };

    let resp = builder
        .send()
        .await
        .map_err(|e| transport_error(e, redirect_limit))?;
    debug!("Received {} from {}", resp.status(), resp.url());

    build_response(setting, resp).await
}
