//! End-to-end checks of the HTTP contract over a real socket.
//!
//! The server runs on an ephemeral port with an in-memory gateway, except
//! for the last test which points the PostgreSQL gateway at a closed port.

use std::net::SocketAddr;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use users_service::api::{create_router, serve, AppState};
use users_service::users::{MockUserGateway, SharedGateway};

async fn spawn_server(gateway: SharedGateway) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = create_router(AppState::new(gateway));

    tokio::spawn(serve(listener, router, std::future::pending()));
    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{}{}", addr, path)
}

#[tokio::test]
async fn probes_and_greeting() {
    let addr = spawn_server(Arc::new(MockUserGateway::new())).await;
    let client = client();

    for path in ["/startup", "/liveness", "/readiness"] {
        let response = client.get(url(addr, path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert_eq!(response.text().await.unwrap(), "OK");
    }

    let response = client.get(url(addr, "/foo")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Hola Mundo desde el MS2"));
}

#[tokio::test]
async fn create_then_list_users() {
    let addr = spawn_server(Arc::new(MockUserGateway::new())).await;
    let client = client();

    let response = client
        .post(url(addr, "/users"))
        .body(r#"{"name":"Ana"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["message"], "Usuario creado correctamente");
    assert!(created["id"].is_number());
    assert_eq!(created["name"], "Ana");

    let response = client.get(url(addr, "/users")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
    let listed: Value = response.json().await.unwrap();
    assert_eq!(
        listed,
        json!({"users": [{"id": created["id"], "name": "Ana"}]})
    );
}

#[tokio::test]
async fn bad_payloads_are_rejected() {
    let addr = spawn_server(Arc::new(MockUserGateway::new())).await;
    let client = client();

    let response = client
        .post(url(addr, "/users"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"error": "Falta el campo 'name'"})
    );

    let response = client
        .post(url(addr, "/users"))
        .body("not-json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"error": "JSON inválido"})
    );
}

#[tokio::test]
async fn unknown_post_is_empty_404() {
    let addr = spawn_server(Arc::new(MockUserGateway::new())).await;

    let response = client()
        .post(url(addr, "/unknown"))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "");
}

#[cfg(feature = "postgres")]
#[tokio::test]
async fn unreachable_database_keeps_success_status() {
    use users_service::config::DatabaseSettings;
    use users_service::users::PostgresGateway;

    let gateway = PostgresGateway::new(&DatabaseSettings {
        host: "127.0.0.1".to_string(),
        port: 1,
        name: "postgres".to_string(),
        user: "postgres".to_string(),
        password: String::new(),
    });
    let addr = spawn_server(Arc::new(gateway)).await;
    let client = client();

    let response = client.get(url(addr, "/users")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string(), "unexpected body: {body}");

    let response = client
        .post(url(addr, "/users"))
        .body(r#"{"name":"Ana"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string(), "unexpected body: {body}");
}
