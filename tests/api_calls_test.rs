use api_utils::prelude::*;
use api_utils::{ApiClient, Params};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

const METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
];

fn call_options() -> RequestOptions {
    RequestOptions::new()
        .json(json!({"name": "Peter"}))
        .params(Params::new().with("key", "value"))
}

async fn mock_call(status: u16, body: Option<serde_json::Value>) -> MockServer {
    let server = MockServer::start().await;
    let mut template = ResponseTemplate::new(status);
    if let Some(body) = body {
        template = template.set_body_json(body);
    }
    Mock::given(path("/frus"))
        .respond_with(template)
        .expect(1)
        .mount(&server)
        .await;
    server
}

fn endpoint(server: &MockServer) -> String {
    format!("{}/frus", server.uri())
}

async fn last_request(server: &MockServer) -> wiremock::Request {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .pop()
        .expect("no request received")
}

/// Asserts the request carried the JSON body, verb and expected query.
async fn assert_api_called(server: &MockServer, method: &Method, query: Option<&str>) {
    let request = last_request(server).await;
    assert_eq!(request.method.as_str(), method.as_str());
    assert_eq!(request.url.query(), query);
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body, json!({"name": "Peter"}));
}

async fn header(server: &MockServer, name: &str) -> Option<String> {
    last_request(server)
        .await
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

#[tokio::test]
async fn raw_call_resolves_with_the_response() {
    let client = ApiClient::new().unwrap();
    for method in METHODS {
        let server = mock_call(200, Some(json!({"key": "value"}))).await;

        let response = client
            .request_raw(method.clone(), &endpoint(&server), call_options())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let text: serde_json::Value = serde_json::from_str(&response.text()).unwrap();
        assert_eq!(text, json!({"key": "value"}));
        assert_api_called(&server, &method, Some("key=value")).await;
        assert_eq!(
            header(&server, "content-type").await.as_deref(),
            Some("application/json")
        );
    }
}

#[tokio::test]
async fn successful_request_with_body_resolves_to_json() {
    let client = ApiClient::new().unwrap();
    for method in METHODS {
        let server = mock_call(200, Some(json!({"key": "value"}))).await;

        let body = client
            .request(method.clone(), &endpoint(&server), call_options())
            .await
            .unwrap();

        assert_eq!(body, json!({"key": "value"}));
        assert_api_called(&server, &method, Some("key=value")).await;
        assert_eq!(
            header(&server, "content-type").await.as_deref(),
            Some("application/json")
        );
    }
}

#[tokio::test]
async fn successful_request_without_body_resolves_to_empty_text() {
    let client = ApiClient::new().unwrap();
    for method in METHODS {
        let server = mock_call(200, None).await;

        let body = client
            .request(method.clone(), &endpoint(&server), call_options())
            .await
            .unwrap();

        assert_eq!(body, "");
        assert_api_called(&server, &method, Some("key=value")).await;
    }
}

#[tokio::test]
async fn missing_or_empty_params_use_the_bare_url() {
    let client = ApiClient::new().unwrap();
    for method in METHODS {
        for params in [None, Some(Params::new())] {
            let server = mock_call(200, None).await;
            let mut options = RequestOptions::new().json(json!({"name": "Peter"}));
            options.params = params;

            let body = client
                .request(method.clone(), &endpoint(&server), options)
                .await
                .unwrap();

            assert_eq!(body, "");
            assert_api_called(&server, &method, None).await;
            assert_eq!(
                header(&server, "content-type").await.as_deref(),
                Some("application/json")
            );
        }
    }
}

#[tokio::test]
async fn error_request_rejects_with_the_error_body() {
    let client = ApiClient::new().unwrap();
    for method in METHODS {
        let server = mock_call(500, Some(json!({"error": "error"}))).await;

        let err = client
            .request(method.clone(), &endpoint(&server), call_options())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.body().unwrap(), &json!({"error": "error"}));
        assert_api_called(&server, &method, Some("key=value")).await;
    }
}

#[tokio::test]
async fn error_request_without_params_rejects_with_the_error_body() {
    let client = ApiClient::new().unwrap();
    for method in METHODS {
        let server = mock_call(500, Some(json!({"error": "error"}))).await;

        let err = client
            .request(
                method.clone(),
                &endpoint(&server),
                RequestOptions::new().json(json!({"name": "Peter"})),
            )
            .await
            .unwrap_err();

        assert!(err.is_server_error());
        assert_eq!(err.into_body(), Some(ResponseBody::Json(json!({"error": "error"}))));
        assert_api_called(&server, &method, None).await;
    }
}

#[tokio::test]
async fn error_request_without_body_rejects_with_empty_text() {
    let client = ApiClient::new().unwrap();
    for method in METHODS {
        let server = mock_call(500, None).await;

        let err = client
            .request(method.clone(), &endpoint(&server), call_options())
            .await
            .unwrap_err();

        assert_eq!(err.body().unwrap(), &"");
        assert_api_called(&server, &method, Some("key=value")).await;
    }
}

#[tokio::test]
async fn custom_headers_are_sent_and_override_content_type() {
    let client = ApiClient::new().unwrap();
    for method in METHODS {
        let server = mock_call(200, None).await;

        let body = client
            .request(
                method.clone(),
                &endpoint(&server),
                RequestOptions::new()
                    .json(json!({"name": "Peter"}))
                    .header("Content-Type", "Custom")
                    .header("X-Head", "xHead"),
            )
            .await
            .unwrap();

        assert_eq!(body, "");
        assert_api_called(&server, &method, None).await;
        assert_eq!(header(&server, "content-type").await.as_deref(), Some("Custom"));
        assert_eq!(header(&server, "x-head").await.as_deref(), Some("xHead"));
    }
}

#[tokio::test]
async fn timeout_option_is_carried_on_the_request() {
    let client = ApiClient::new().unwrap();
    for method in METHODS {
        let server = mock_call(200, None).await;
        let options = || {
            RequestOptions::new()
                .json(json!({"name": "Peter"}))
                .params(Params::new())
                .timeout(Duration::from_millis(2000))
        };

        let request = client
            .build_request(method.clone(), &endpoint(&server), options())
            .unwrap();
        assert_eq!(request.timeout(), Some(Duration::from_millis(2000)));

        let body = client
            .request(method.clone(), &endpoint(&server), options())
            .await
            .unwrap();
        assert_eq!(body, "");
        assert_api_called(&server, &method, None).await;
    }
}

#[tokio::test]
async fn verb_helpers_use_their_methods() {
    let client = ApiClient::new().unwrap();

    let server = mock_call(200, None).await;
    client.get(&endpoint(&server), call_options()).await.unwrap();
    assert_api_called(&server, &Method::GET, Some("key=value")).await;

    let server = mock_call(200, None).await;
    client.post(&endpoint(&server), call_options()).await.unwrap();
    assert_api_called(&server, &Method::POST, Some("key=value")).await;

    let server = mock_call(200, None).await;
    client.put(&endpoint(&server), call_options()).await.unwrap();
    assert_api_called(&server, &Method::PUT, Some("key=value")).await;

    let server = mock_call(200, None).await;
    client.delete(&endpoint(&server), call_options()).await.unwrap();
    assert_api_called(&server, &Method::DELETE, Some("key=value")).await;

    let server = mock_call(200, None).await;
    client.patch(&endpoint(&server), call_options()).await.unwrap();
    assert_api_called(&server, &Method::PATCH, Some("key=value")).await;
}
