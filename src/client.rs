use std::sync::Arc;

use sonic_rs::Value;
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::payload::MessagePayload;
use crate::transport::{ApiRequest, ApiResult, ApiTransport, ReqwestTransport};

/// Posts chat messages to the configured endpoint and returns the decoded
/// response. One request per call, no retries; every failure is logged once
/// and handed back to the caller.
#[derive(Clone)]
pub struct ChatClient {
    config: ClientConfig,
    transport: Arc<dyn ApiTransport>,
}

impl ChatClient {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn from_env() -> Self {
        Self::with_config(ClientConfig::from_env())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }

    pub fn with_transport<T>(config: ClientConfig, transport: T) -> Self
    where
        T: ApiTransport + 'static,
    {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn send_message(
        &self,
        text: impl Into<String>,
        channel: impl Into<String>,
        user: impl Into<String>,
        mention: impl Into<String>,
        date: impl Into<String>,
    ) -> ApiResult<Value> {
        self.send_payload(&MessagePayload::new(text, channel, user, mention, date))
            .await
    }

    pub async fn send_payload(&self, payload: &MessagePayload) -> ApiResult<Value> {
        match self.dispatch(payload).await {
            Ok(value) => Ok(value),
            Err(err) => {
                error!(error = %err, url = %self.config.base_url, "chat api request failed");
                Err(err)
            }
        }
    }

    /// The canned `"1".."5"` example message.
    pub async fn send_test_message(&self) -> ApiResult<Value> {
        self.send_message("1", "2", "3", "4", "5").await
    }

    async fn dispatch(&self, payload: &MessagePayload) -> ApiResult<Value> {
        let body = sonic_rs::to_vec(payload).map_err(RequestError::from_sonic)?;
        let request = ApiRequest::post(self.config.base_url.as_str())
            .with_header("Content-Type", "application/json")
            .with_body(body)
            .with_timeout(self.config.timeout);

        debug!(url = %request.url, "posting chat message");
        let response = self.transport.execute(request).await?;

        if !response.is_success() {
            return Err(RequestError::rejected(
                response.status(),
                String::from_utf8_lossy(response.body()).into_owned(),
            ));
        }

        response.json::<Value>()
    }
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}
