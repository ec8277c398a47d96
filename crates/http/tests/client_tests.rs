//! Integration tests for the catalog HTTP client

use catalog_core::{LoginForm, RegisterForm};
use catalog_http::{ApiClient, ClientConfig, ClientError};
use reqwest::header::HeaderValue;
use reqwest::{Request, Response};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: format!("{}/api", server.uri()),
        ..ClientConfig::default()
    }
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = ApiClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::from_config(&config_for(&mock_server)).unwrap();
    let user = client.me().await.unwrap();
    assert_eq!(user.email, "ada@example.com");
}

#[tokio::test]
async fn test_login_posts_credentials_and_returns_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "email": "a@b.com", "password": "secret1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "T1", "token_type": "Bearer" })),
        )
        .mount(&mock_server)
        .await;

    let client = ApiClient::from_config(&config_for(&mock_server)).unwrap();
    let token = client
        .login(&LoginForm::new("a@b.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(token.access_token, "T1");
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&mock_server)
        .await;

    let client = ApiClient::from_config(&config_for(&mock_server)).unwrap();
    let result = client.login(&LoginForm::new("a@b.com", "wrong12")).await;

    match result {
        Err(ClientError::AuthenticationFailed(message)) => {
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected AuthenticationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_register_validation_errors_are_propagated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The email has already been taken.",
            "errors": { "email": ["The email has already been taken."] }
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::from_config(&config_for(&mock_server)).unwrap();
    let err = client
        .register(&RegisterForm::default())
        .await
        .unwrap_err();

    let errors = err.field_errors().expect("validation error");
    assert_eq!(errors.first("email"), Some("The email has already been taken."));
}

#[tokio::test]
async fn test_logout_accepts_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::from_config(&config_for(&mock_server)).unwrap();
    assert!(client.logout().await.is_ok());
}

#[tokio::test]
async fn test_middleware_runs_around_every_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(header("x-trace", "on"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let failures = Arc::new(AtomicUsize::new(0));
    let seen = failures.clone();

    let client = ApiClient::from_config(&config_for(&mock_server))
        .unwrap()
        .with_request_middleware(Arc::new(
            |mut request: Request| -> Result<Request, ClientError> {
                request
                    .headers_mut()
                    .insert("x-trace", HeaderValue::from_static("on"));
                Ok(request)
            },
        ))
        .with_response_middleware(Arc::new(
            move |outcome: Result<Response, ClientError>| -> Result<Response, ClientError> {
                if outcome.is_err() {
                    seen.fetch_add(1, Ordering::SeqCst);
                }
                outcome
            },
        ));

    let result = client.get::<serde_json::Value>("/categories").await;
    match result {
        Err(ClientError::ServerError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected ServerError, got {other:?}"),
    }
    assert_eq!(failures.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    // Nothing listens on port 1
    let client = ApiClient::new("http://127.0.0.1:1/api").unwrap();
    let err = client.me().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert!(!err.is_auth_expired());
}

#[tokio::test]
async fn test_malformed_body_is_a_serialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&mock_server)
        .await;

    let client = ApiClient::from_config(&config_for(&mock_server)).unwrap();
    assert!(matches!(
        client.me().await,
        Err(ClientError::Serialization(_))
    ));
}

fn login_setting_session_cookie() -> Mock {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "laravel_session=abc; Path=/")
                .set_body_json(json!({ "access_token": "T1", "token_type": "Bearer" })),
        )
}

#[tokio::test]
async fn test_session_cookie_is_returned_with_credentials() {
    let mock_server = MockServer::start().await;

    login_setting_session_cookie().mount(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("cookie", "laravel_session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::from_config(&config_for(&mock_server)).unwrap();
    client
        .login(&LoginForm::new("ada@example.com", "secret1"))
        .await
        .unwrap();

    let user = client.me().await.unwrap();
    assert_eq!(user.id, 1);
}

#[tokio::test]
async fn test_cookies_are_not_kept_without_credentials() {
    let mock_server = MockServer::start().await;

    login_setting_session_cookie().mount(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig {
        with_credentials: false,
        ..config_for(&mock_server)
    };
    let client = ApiClient::from_config(&config).unwrap();
    client
        .login(&LoginForm::new("ada@example.com", "secret1"))
        .await
        .unwrap();
    client.me().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let me = requests
        .iter()
        .find(|r| r.url.path() == "/api/me")
        .unwrap();
    assert!(me.headers.get("cookie").is_none());
}
