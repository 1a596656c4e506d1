//! Integration tests for request construction against a mock server.
//!
//! These tests verify what the server actually observes:
//! - method, path and query params
//! - header precedence between session and request
//! - post form and raw body encoding
//! - request cookies and the session cookie jar
//! - the response view (status, protocol, text, cookies)

use reqsession::{
    headers, Body, Cookies, ErrorKind, Params, PostForm, RequestOptions, RequestSetting, Session,
    StatusCode,
};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

async fn mount_passed(server: &MockServer, verb: &str) {
    Mock::given(method(verb))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("passed"))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get() {
    let server = MockServer::start().await;
    mount_passed(&server, "GET").await;

    let session = Session::new();
    let resp = session
        .get(&format!("{}/test", server.uri()), RequestOptions::new())
        .await
        .expect("GET should succeed");
    assert_eq!(resp.text(), "passed");
}

#[tokio::test]
async fn test_post_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/test"))
        .and(body_string("direwolf"))
        .and(|req: &Request| !req.headers.contains_key("content-type"))
        .respond_with(ResponseTemplate::new(200).set_body_string("passed"))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new();
    let resp = session
        .post(
            &format!("{}/test", server.uri()),
            RequestOptions::new().body(Body::from("direwolf")),
        )
        .await
        .expect("POST should succeed");
    assert_eq!(resp.text(), "passed");
}

#[tokio::test]
async fn test_request_setting_with_mixed_case_method() {
    let server = MockServer::start().await;
    mount_passed(&server, "GET").await;

    let session = Session::new();
    let resp = session
        .send(RequestSetting::new("Get", format!("{}/test", server.uri())))
        .await
        .expect("request should succeed");
    assert_eq!(resp.text(), "passed");
    assert_eq!(resp.request.method, "GET");
}

#[tokio::test]
async fn test_default_session_functions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("passed"))
        .expect(2)
        .mount(&server)
        .await;

    let url = format!("{}/test", server.uri());
    let resp = reqsession::get(&url, RequestOptions::new()).await.unwrap();
    assert_eq!(resp.text(), "passed");

    let resp = reqsession::send(RequestSetting::new("get", url)).await.unwrap();
    assert_eq!(resp.text(), "passed");
}

#[tokio::test]
async fn test_other_verbs() {
    let server = MockServer::start().await;
    for verb in ["PUT", "PATCH", "DELETE", "HEAD"] {
        Mock::given(method(verb))
            .and(path("/verb"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }

    let session = Session::new();
    let url = format!("{}/verb", server.uri());
    for resp in [
        session.put(&url, RequestOptions::new()).await.unwrap(),
        session.patch(&url, RequestOptions::new()).await.unwrap(),
        session.delete(&url, RequestOptions::new()).await.unwrap(),
        session.head(&url, RequestOptions::new()).await.unwrap(),
    ] {
        assert_eq!(resp.status_code, StatusCode::NO_CONTENT);
        assert_eq!(resp.text(), "");
    }
}

#[tokio::test]
async fn test_request_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .and(header("user-agent", "direwolf"))
        .respond_with(ResponseTemplate::new(200).set_body_string("passed"))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new();
    let resp = session
        .get(
            &format!("{}/test", server.uri()),
            RequestOptions::new().headers(headers(["User-Agent", "direwolf"]).unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(resp.text(), "passed");
}

#[tokio::test]
async fn test_request_headers_override_session_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .and(header("user-agent", "request"))
        .and(header("x-session", "kept"))
        .respond_with(ResponseTemplate::new(200).set_body_string("passed"))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new();
    session.headers = headers(["User-Agent", "session", "X-Session", "kept"]).unwrap();

    let resp = session
        .get(
            &format!("{}/test", server.uri()),
            RequestOptions::new().headers(headers(["User-Agent", "request"]).unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(resp.text(), "passed");
}

#[tokio::test]
async fn test_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .and(query_param("key", "value"))
        .and(query_param("other", "a b"))
        .respond_with(ResponseTemplate::new(200).set_body_string("passed"))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new();
    let resp = session
        .get(
            &format!("{}/test", server.uri()),
            RequestOptions::new().params(Params::from_pairs(["key", "value", "other", "a b"]).unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(resp.text(), "passed");
    assert!(resp.url.ends_with("/test?key=value&other=a+b"));
}

#[tokio::test]
async fn test_post_form() {
    let server = MockServer::start().await;
    let form = PostForm::from_pairs(["key", "value"]).unwrap();
    Mock::given(method("POST"))
        .and(path("/form"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(form.url_encode()))
        .respond_with(ResponseTemplate::new(200).set_body_string("passed"))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new();
    let resp = session
        .post(
            &format!("{}/form", server.uri()),
            RequestOptions::new().post_form(form),
        )
        .await
        .unwrap();
    assert_eq!(resp.text(), "passed");

    let received = server.received_requests().await.unwrap();
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(&received[0].body)
        .into_owned()
        .collect();
    assert_eq!(pairs, [("key".to_string(), "value".to_string())]);
}

#[tokio::test]
async fn test_body_with_post_form_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = Session::new();
    let err = session
        .post(
            &format!("{}/test", server.uri()),
            RequestOptions::new()
                .body("direwolf")
                .post_form(PostForm::from_pairs(["key", "value"]).unwrap()),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestBodyError);
    server.verify().await;
}

#[tokio::test]
async fn test_send_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .and(header("cookie", "name=direwolf"))
        .respond_with(ResponseTemplate::new(200).set_body_string("passed"))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new();
    let resp = session
        .get(
            &format!("{}/test", server.uri()),
            RequestOptions::new().cookies(Cookies::from_pairs(["name", "direwolf"]).unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(resp.text(), "passed");
}

#[tokio::test]
async fn test_cookie_value_with_separator_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = Session::new();
    let err = session
        .get(
            &format!("{}/test", server.uri()),
            RequestOptions::new()
                .cookies(Cookies::from_pairs(["name", "direwolf; admin=true"]).unwrap()),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidHeader);
    server.verify().await;
}

#[tokio::test]
async fn test_send_multiple_cookies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new();
    session
        .get(
            &format!("{}/test", server.uri()),
            RequestOptions::new()
                .cookies(Cookies::from_pairs(["name", "direwolf", "pack", "stark"]).unwrap()),
        )
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    let header = received[0].headers["cookie"].to_str().unwrap();
    let seen = Cookies::from_header_value(header);
    assert_eq!(seen.len(), 2);
    assert_eq!(seen.get("name").unwrap().value, "direwolf");
    assert_eq!(seen.get("pack").unwrap().value, "stark");
}

#[tokio::test]
async fn test_cookie_jar_persists_between_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "session=abc; Path=/"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/check"))
        .and(header("cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("logged in"))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new();
    let login = session
        .get(&format!("{}/login", server.uri()), RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(login.cookies.get("session").unwrap().value, "abc");
    assert_eq!(login.cookies.get("session").unwrap().path.as_deref(), Some("/"));

    let check = session
        .get(&format!("{}/check", server.uri()), RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(check.text(), "logged in");

    let stored = session.cookies(&server.uri()).unwrap();
    assert_eq!(stored.get("session").unwrap().value, "abc");
}

#[tokio::test]
async fn test_response_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/created"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("x-answer", "42")
                .set_body_raw(r#"{"id":7}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let session = Session::new();
    let resp = session
        .get(&format!("{}/created", server.uri()), RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(resp.status_code, StatusCode::CREATED);
    assert_eq!(resp.proto, "HTTP/1.1");
    assert_eq!(resp.encoding, "UTF-8");
    assert_eq!(resp.headers["x-answer"], "42");
    assert_eq!(resp.content_length, Some(8));
    assert_eq!(resp.content(), br#"{"id":7}"#);
    assert_eq!(resp.request.url, format!("{}/created", server.uri()));

    let value: serde_json::Value = resp.json().unwrap();
    assert_eq!(value["id"], 7);
}
