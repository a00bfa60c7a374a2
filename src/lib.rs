//! Chat API client: serializes a five-field message payload and posts it to
//! a remote chat endpoint over a pluggable transport, with an in-memory mock
//! transport for fully deterministic tests.

pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod payload;
pub mod transport;

pub use reqwest::Method;
pub use sonic_rs::Value;

pub use client::ChatClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{RequestError, RequestErrorKind};
pub use mock::{MockBehavior, MockBehaviorPlan, MockResponse, MockStateSnapshot, MockTransport};
pub use payload::MessagePayload;
pub use transport::{
    ApiBytes, ApiFuture, ApiRequest, ApiResponse, ApiResult, ApiTransport, ApiTransportState,
    ReqwestTransport,
};
