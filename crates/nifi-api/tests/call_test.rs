#![allow(clippy::unwrap_used)]
// Tests for the generic call primitive against a wiremock server.

mod common;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{api_path, setup};
use nifi_api::{Error, Method, Outcome};

#[tokio::test]
async fn test_payload_is_sent_as_json() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("echo")))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(body_json(json!({ "hello": "world" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let url = client.url(&["echo"]).unwrap();
    let outcome: Outcome<Value> = client
        .json_call(Method::POST, url, Some(&json!({ "hello": "world" })))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Success {
            status: 201,
            body: json!({ "ok": true }),
        }
    );
}

#[tokio::test]
async fn test_no_payload_means_no_body_and_no_content_type() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("thing")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let url = client.url(&["thing"]).unwrap();
    let _: Outcome<Value> = client
        .json_call(Method::GET, url, None::<&Value>)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
    assert!(!requests[0].headers.contains_key("content-type"));
}

#[tokio::test]
async fn test_not_found_is_not_an_error() {
    let (server, client) = setup().await;

    // Body is not JSON: a 404 must not be decoded.
    Mock::given(method("GET"))
        .and(path(api_path("missing")))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such thing"))
        .mount(&server)
        .await;

    let url = client.url(&["missing"]).unwrap();
    let outcome: Outcome<Value> = client
        .json_call(Method::GET, url, None::<&Value>)
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::NotFound { status: 404 });
}

#[tokio::test]
async fn test_error_status_carries_code_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(api_path("thing")))
        .respond_with(ResponseTemplate::new(400).set_body_string("name is required"))
        .mount(&server)
        .await;

    let url = client.url(&["thing"]).unwrap();
    let result: Result<Outcome<Value>, Error> = client
        .json_call(Method::PUT, url, Some(&json!({})))
        .await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "name is required");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_redirect_status_is_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("moved")))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;

    let url = client.url(&["moved"]).unwrap();
    let err = client
        .json_call::<Value, Value>(Method::GET, url, None)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(304));
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("garbled")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let url = client.url(&["garbled"]).unwrap();
    let result: Result<Outcome<Value>, Error> =
        client.json_call(Method::GET, url, None::<&Value>).await;

    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_discard_ignores_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(api_path("thing")))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let url = client.url(&["thing"]).unwrap();
    let outcome = client
        .json_call_discard(Method::DELETE, url, None::<&Value>)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Success {
            status: 200,
            body: ()
        }
    );
}

#[tokio::test]
async fn test_text_call_returns_raw_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(api_path("thing")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("other")))
        .respond_with(ResponseTemplate::new(200).set_body_string("queued"))
        .mount(&server)
        .await;

    let url = client.url(&["thing"]).unwrap();
    let outcome = client
        .text_call(Method::PUT, url, Some(&json!({})))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::Success {
            status: 204,
            body: String::new()
        }
    );

    let url = client.url(&["other"]).unwrap();
    let outcome = client
        .text_call(Method::PUT, url, Some(&json!({})))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::Success {
            status: 200,
            body: "queued".to_owned()
        }
    );
}

#[tokio::test]
async fn test_single_attempt_per_call() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("flaky")))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let url = client.url(&["flaky"]).unwrap();
    let err = client
        .json_call::<Value, Value>(Method::GET, url, None)
        .await
        .unwrap_err();

    assert!(err.is_transient());
    server.verify().await;
}
