use api_utils::prelude::*;
use api_utils::{ApiClient, ClientConfig, Params};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn form_fields_are_posted_url_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("user=peter%20pan&role=a&role=b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut fields = Params::new();
    fields.insert("user", "peter pan").extend_values("role", ["a", "b"]);

    let body = api_utils::post(
        &format!("{}/login", server.uri()),
        RequestOptions::new().form(fields),
    )
    .await
    .unwrap();

    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn multipart_forms_keep_their_boundary_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let form = reqwest::multipart::Form::new().text("title", "report");
    let client = ApiClient::new().unwrap();
    let response = client
        .post_raw(
            &format!("{}/upload", server.uri()),
            RequestOptions::new().form(form),
        )
        .await
        .unwrap();
    assert_eq!(response.status, 201);

    let request = server.received_requests().await.unwrap().pop().unwrap();
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    assert!(String::from_utf8_lossy(&request.body).contains("report"));
}

#[tokio::test]
async fn body_and_form_data_together_are_rejected_before_sending() {
    let server = MockServer::start().await;
    Mock::given(path("/frus"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = ApiClient::new()
        .unwrap()
        .post(
            &format!("{}/frus", server.uri()),
            RequestOptions::new()
                .json(json!({"name": "Peter"}))
                .form(Params::new().with("a", "b")),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::MultipleBodies));
}

#[tokio::test]
async fn base_url_default_headers_and_params_combine() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(query_param("page", "2"))
        .and(header("authorization", "Bearer token"))
        .and(header("x-trace", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(format!("{}/v1/", server.uri()))
        .bearer_auth("token")
        .header("X-Trace", "abc")
        .build()
        .unwrap();
    let client = ApiClient::with_config(config).unwrap();

    #[derive(serde::Deserialize)]
    struct User {
        id: u32,
    }
    let users: Vec<User> = client
        .get("users", RequestOptions::new().param("page", "2"))
        .await
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, 1);
}

#[tokio::test]
async fn cache_mode_adds_no_cache_headers() {
    let server = MockServer::start().await;
    Mock::given(header("cache-control", "no-cache"))
        .and(header("pragma", "no-cache"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let body = ApiClient::new()
        .unwrap()
        .get(
            &format!("{}/fresh", server.uri()),
            RequestOptions::new().cache(CacheMode::Reload),
        )
        .await
        .unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start().await;
    Mock::given(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let err = ApiClient::new()
        .unwrap()
        .get(
            &format!("{}/slow", server.uri()),
            RequestOptions::new().timeout(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert_eq!(err.category(), ErrorCategory::Network);
}

#[tokio::test]
async fn redirect_modes() {
    let server = MockServer::start().await;
    Mock::given(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
        .mount(&server)
        .await;
    Mock::given(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&server)
        .await;

    let client = ApiClient::new().unwrap();
    let url = format!("{}/old", server.uri());

    let followed = client.get(&url, RequestOptions::new()).await.unwrap();
    assert_eq!(followed, "moved");

    let manual = client
        .get_raw(&url, RequestOptions::new().redirect(RedirectMode::Manual))
        .await
        .unwrap();
    assert_eq!(manual.status, 302);

    let err = client
        .get(&url, RequestOptions::new().redirect(RedirectMode::Error))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Redirect(_)));
}

#[tokio::test]
async fn not_found_is_a_client_error_with_text_body() {
    let server = MockServer::start().await;
    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such thing"))
        .mount(&server)
        .await;

    let err = ApiClient::new()
        .unwrap()
        .delete(&format!("{}/missing", server.uri()), RequestOptions::new())
        .await
        .unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(err.body().and_then(ResponseBody::as_text), Some("no such thing"));
}
