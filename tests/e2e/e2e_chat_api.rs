use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use chat_client::{ChatClient, ClientConfig, RequestErrorKind};
use sonic_rs::JsonValueTrait;
use tokio::net::TcpListener;
use tokio::time::sleep;

#[derive(Clone, Default)]
struct AppState {
    last_body: Arc<Mutex<Option<Bytes>>>,
}

#[tokio::test]
async fn e2e_send_roundtrip_returns_decoded_body() {
    let server = TestServer::start().await;
    let client = ChatClient::with_config(ClientConfig::new(
        server.url("/chat"),
        Duration::from_secs(2),
    ));

    let value = client
        .send_message("1", "2", "3", "4", "5")
        .await
        .expect("stub 200 response should parse");

    assert_eq!(value.get("ok").as_bool(), Some(true));

    let captured = server
        .state
        .last_body
        .lock()
        .expect("last body mutex poisoned")
        .clone()
        .expect("stub should have captured the posted body");
    assert_eq!(
        captured.as_ref(),
        br#"{"text":"1","channel":"2","user":"3","mention":"4","date":"5"}"#
    );
}

#[tokio::test]
async fn e2e_server_error_raises_request_error() {
    let server = TestServer::start().await;
    let client = ChatClient::with_config(ClientConfig::new(
        server.url("/chat-error"),
        Duration::from_secs(2),
    ));

    let err = client
        .send_message("", "", "", "", "")
        .await
        .expect_err("500 response must surface as an error");

    assert_eq!(err.kind(), RequestErrorKind::Rejected);
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn e2e_configured_timeout_triggers_on_slow_server() {
    let server = TestServer::start().await;
    let client = ChatClient::with_config(ClientConfig::new(
        server.url("/chat-slow"),
        Duration::from_millis(200),
    ));

    let err = client
        .send_test_message()
        .await
        .expect_err("200ms timeout should trigger before the slow handler replies");

    assert_eq!(err.kind(), RequestErrorKind::Timeout);
}

struct TestServer {
    base_url: String,
    state: AppState,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let state = AppState::default();
        let app = Router::new()
            .route("/chat", post(chat_handler))
            .route("/chat-error", post(error_handler))
            .route("/chat-slow", post(slow_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let base_url = format!("http://{}", addr);

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url,
            state,
            task,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn chat_handler(State(state): State<AppState>, body: Bytes) -> (StatusCode, &'static str) {
    *state.last_body.lock().expect("last body mutex poisoned") = Some(body);
    (StatusCode::OK, r#"{"ok":true}"#)
}

async fn error_handler() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}

async fn slow_handler() -> (StatusCode, &'static str) {
    sleep(Duration::from_millis(2500)).await;
    (StatusCode::OK, r#"{"ok":true}"#)
}
