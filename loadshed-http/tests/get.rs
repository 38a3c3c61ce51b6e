use loadshed_http::{DEFAULT_USER_AGENT, HttpClient, HttpError, RequestOpts};
use serde::Deserialize;
use std::borrow::Cow;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::new(&format!("{}/LoadShedding", server.uri())).expect("mock base url")
}

#[tokio::test]
async fn get_bytes_returns_body_and_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/LoadShedding/GetStatus"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string("2"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let body = client
        .get_bytes("/GetStatus", RequestOpts::default())
        .await
        .unwrap();
    assert_eq!(body, b"2");
}

#[tokio::test]
async fn get_json_decodes_and_encodes_query() {
    #[derive(Deserialize)]
    struct Thing {
        thing: String,
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/LoadShedding/FindSuburbs"))
        .and(query_param("searchText", "sea point"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"thing": "yes"}"#))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let got: Thing = client
        .get_json(
            "FindSuburbs",
            RequestOpts {
                query: Some(vec![("searchText", Cow::Borrowed("sea point"))]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(got.thing, "yes");
}

#[tokio::test]
async fn decode_error_carries_snippet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .get_json::<serde_json::Value>("anything", RequestOpts::default())
        .await
        .unwrap_err();
    match err {
        HttpError::Decode(_, snippet) => assert_eq!(snippet, "not json"),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_success_is_api_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(503).set_body_string(r#"{"Message":"An error has occurred."}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .get_text("GetStatus", RequestOpts::default())
        .await
        .unwrap_err();
    match err {
        HttpError::Api { status, message } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(message, "An error has occurred.");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn per_request_timeout_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .get_text(
            "GetStatus",
            RequestOpts {
                timeout: Some(Duration::from_millis(50)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn custom_user_agent_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "loadshed-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server)
        .await
        .with_user_agent("loadshed-tests/1.0");
    let text = client.get_text("x", RequestOpts::default()).await.unwrap();
    assert_eq!(text, "ok");
}
