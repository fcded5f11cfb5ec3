//! reqwest transport against a local mock cluster

use esapi::{
    Arguments, Client, ClientConfig, Error, HttpMethod, ReqwestTransport, Request, Transport,
    TransportError,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        url: server.uri(),
        ..ClientConfig::default()
    }
}

fn args(value: Value) -> Arguments {
    Arguments::try_from(value).unwrap()
}

#[tokio::test]
async fn test_query_headers_and_body_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logs/_search"))
        .and(query_param("size", "5"))
        .and(query_param("_source", "a,b"))
        .and(header("x-default", "on"))
        .and(header("x-opaque-id", "job-1"))
        .and(body_json(json!({"query": {"match_all": {}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": {"total": 0}})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.headers.insert("X-Default".to_string(), "on".to_string());
    let client = Client::from_config(&config).unwrap();

    let body = client
        .perform(
            "search",
            &args(json!({
                "index": "logs",
                "size": 5,
                "_source": ["a", "b"],
                "body": {"query": {"match_all": {}}},
                "headers": {"X-Opaque-Id": "job-1"}
            })),
        )
        .await
        .unwrap();

    assert_eq!(body, json!({"hits": {"total": 0}}));
}

#[tokio::test]
async fn test_error_status_carries_decoded_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/missing/_flush"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": {"type": "index_not_found_exception"}})),
        )
        .mount(&server)
        .await;

    let client = Client::from_config(&config_for(&server)).unwrap();
    let err = client
        .perform("indices.flush", &args(json!({"index": "missing"})))
        .await
        .unwrap_err();

    match err {
        Error::Transport(TransportError::Status { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body["error"]["type"], "index_not_found_exception");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_head_reports_status_instead_of_failing() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/logs"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = Client::from_config(&config_for(&server)).unwrap();

    assert!(client.exists("indices.exists", &args(json!({"index": "logs"}))).await.unwrap());
    assert!(!client.exists("indices.exists", &args(json!({"index": "gone"}))).await.unwrap());
}

#[tokio::test]
async fn test_empty_and_plain_text_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/_refresh"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_cat/indices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("green open logs\n"))
        .mount(&server)
        .await;

    let client = Client::from_config(&config_for(&server)).unwrap();

    assert_eq!(client.perform("indices.refresh", &Arguments::new()).await.unwrap(), Value::Null);
    assert_eq!(
        client.perform("cat.indices", &Arguments::new()).await.unwrap(),
        json!("green open logs\n")
    );
}

#[tokio::test]
async fn test_escaped_document_id_reaches_server_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs/_doc/a%20b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "a b"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::from_config(&config_for(&server)).unwrap();
    let body = client
        .perform("get", &args(json!({"index": "logs", "id": "a b"})))
        .await
        .unwrap();

    assert_eq!(body["_id"], "a b");
}

#[tokio::test]
async fn test_base_path_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/es/_cluster/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "green"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig {
        url: format!("{}/es", server.uri()),
        ..ClientConfig::default()
    };
    let transport = ReqwestTransport::new(&config).unwrap();
    let response = transport
        .perform_request(Request {
            method: HttpMethod::Get,
            path: "_cluster/health".to_string(),
            params: BTreeMap::new(),
            body: None,
            headers: BTreeMap::new(),
        })
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body(), &json!({"status": "green"}));
    assert!(response.headers.contains_key("content-type"));
}
