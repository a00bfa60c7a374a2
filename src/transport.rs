use std::{
    future::Future,
    pin::Pin,
    time::{Duration, Instant},
};

use bytes::Bytes;
use reqwest::header::HeaderValue;
use reqwest::{Client as ReqwestClient, Method};
use serde::de::DeserializeOwned;

use crate::error::{RequestError, RequestErrorKind};

pub type ApiBytes = Bytes;
pub type ApiFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;
pub type ApiResult<T> = Result<T, RequestError>;

/// Request state mirrored by the mock transport (optional for callers).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiTransportState {
    Idle,
    Busy,
    Error,
}

#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, ApiBytes)>,
    pub body: Option<ApiBytes>,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<ApiBytes>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<ApiBytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, ApiBytes)>,
    pub body: ApiBytes,
    pub elapsed: Duration,
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        sonic_rs::from_slice(&self.body).map_err(RequestError::from_sonic)
    }
}

pub trait ApiTransport: Send + Sync {
    fn execute(&self, request: ApiRequest) -> ApiFuture<ApiResult<ApiResponse>>;
}

#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: ReqwestClient::new(),
        }
    }

    pub fn with_client(client: ReqwestClient) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiTransport for ReqwestTransport {
    fn execute(&self, request: ApiRequest) -> ApiFuture<ApiResult<ApiResponse>> {
        let client = self.client.clone();
        Box::pin(async move {
            let start = Instant::now();
            let mut req = client.request(request.method.clone(), &request.url);

            for (key, value) in request.headers {
                let value = HeaderValue::from_bytes(value.as_ref()).map_err(|err| {
                    RequestError::new(RequestErrorKind::Internal, None, err.to_string())
                })?;
                req = req.header(key, value);
            }

            if let Some(body) = request.body {
                req = req.body(body);
            }

            if let Some(timeout) = request.timeout {
                req = req.timeout(timeout);
            }

            let resp = req
                .send()
                .await
                .map_err(|err| RequestError::from_reqwest(RequestErrorKind::Send, err))?;

            let status = resp.status().as_u16();
            let headers = resp
                .headers()
                .iter()
                .map(|(name, value)| (name.to_string(), Bytes::copy_from_slice(value.as_ref())))
                .collect();
            let body = resp
                .bytes()
                .await
                .map_err(|err| RequestError::from_reqwest(RequestErrorKind::Receive, err))?;
            let elapsed = start.elapsed();

            Ok(ApiResponse {
                status,
                headers,
                body,
                elapsed,
            })
        })
    }
}
