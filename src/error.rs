use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestErrorKind {
    Connect,
    Send,
    Receive,
    Timeout,
    Rejected,
    Parse,
    Internal,
}

/// Failure of a single chat API request: transport errors, timeouts,
/// non-2xx statuses and undecodable response bodies all land here.
#[derive(Clone, Debug, Error)]
#[error("chat api request failed: {kind:?} status={status:?} {message}")]
pub struct RequestError {
    kind: RequestErrorKind,
    status: Option<u16>,
    message: String,
}

impl RequestError {
    pub fn new(kind: RequestErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> RequestErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::Connect, None, message)
    }

    pub fn send(message: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::Send, None, message)
    }

    pub fn receive(message: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::Receive, None, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::Timeout, None, message)
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::Rejected, Some(status), message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::Parse, None, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::Internal, None, message)
    }

    pub(crate) fn from_reqwest(fallback: RequestErrorKind, err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            RequestErrorKind::Timeout
        } else if err.is_connect() {
            RequestErrorKind::Connect
        } else {
            fallback
        };
        let status = err.status().map(|s| s.as_u16());
        Self::new(kind, status, err.to_string())
    }

    pub(crate) fn from_sonic(err: sonic_rs::Error) -> Self {
        Self::parse(err.to_string())
    }
}
