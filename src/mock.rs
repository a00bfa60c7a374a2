use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use bytes::Bytes;
use serde::Serialize;
use sonic_rs::to_vec;

use crate::error::RequestError;
use crate::transport::{
    ApiBytes, ApiFuture, ApiRequest, ApiResponse, ApiResult, ApiTransport, ApiTransportState,
};

/// Scripted outcome for the next request seen by a [`MockTransport`].
#[derive(Clone, Debug)]
pub enum MockBehavior {
    Pass,
    Delay(Duration),
    Reject { status: u16, reason: String },
    ConnectError { reason: String },
    SendError { reason: String },
    ReceiveError { reason: String },
    TimeoutError { reason: String },
    Drop,
}

impl MockBehavior {
    pub fn pass() -> Self {
        Self::Pass
    }

    pub fn delay(ms: u64) -> Self {
        Self::Delay(Duration::from_millis(ms))
    }

    pub fn reject(status: u16, reason: impl Into<String>) -> Self {
        Self::Reject {
            status,
            reason: reason.into(),
        }
    }

    pub fn connect_error(reason: impl Into<String>) -> Self {
        Self::ConnectError {
            reason: reason.into(),
        }
    }

    pub fn send_error(reason: impl Into<String>) -> Self {
        Self::SendError {
            reason: reason.into(),
        }
    }

    pub fn receive_error(reason: impl Into<String>) -> Self {
        Self::ReceiveError {
            reason: reason.into(),
        }
    }

    pub fn timeout_error(reason: impl Into<String>) -> Self {
        Self::TimeoutError {
            reason: reason.into(),
        }
    }

    pub fn drop_response() -> Self {
        Self::Drop
    }
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self::Pass
    }
}

#[derive(Clone, Debug, Default)]
pub struct MockBehaviorPlan {
    queue: VecDeque<MockBehavior>,
}

impl MockBehaviorPlan {
    pub fn push(&mut self, behavior: MockBehavior) -> &mut Self {
        self.queue.push_back(behavior);
        self
    }

    fn pop(&mut self) -> MockBehavior {
        self.queue.pop_front().unwrap_or_default()
    }

    fn remaining(&self) -> usize {
        self.queue.len()
    }
}

#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, ApiBytes)>,
    pub body: ApiBytes,
}

impl MockResponse {
    pub fn new(status: u16, body: impl Into<ApiBytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<ApiBytes>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, body.into())
    }

    pub fn json<T: Serialize>(status: u16, payload: &T) -> ApiResult<Self> {
        let body = to_vec(payload).map_err(RequestError::from_sonic)?;
        Ok(Self::new(status, body))
    }
}

#[derive(Clone, Debug)]
pub struct MockStateSnapshot {
    pub state: ApiTransportState,
    pub request_count: usize,
    pub last_url: Option<String>,
    pub last_status: Option<u16>,
    pub behavior_remaining: usize,
    pub response_queue_len: usize,
    pub elapsed_total: Duration,
    pub last_error: Option<String>,
}

#[derive(Debug)]
struct MockTransportState {
    state: ApiTransportState,
    request_count: usize,
    last_url: Option<String>,
    last_status: Option<u16>,
    behavior_plan: MockBehaviorPlan,
    default_response_queue: VecDeque<MockResponse>,
    route_response_queues: HashMap<String, VecDeque<MockResponse>>,
    outbound_log: Vec<ApiRequest>,
    last_error: Option<String>,
    elapsed_total: Duration,
}

impl MockTransportState {
    fn snapshot(&self) -> MockStateSnapshot {
        MockStateSnapshot {
            state: self.state,
            request_count: self.request_count,
            last_url: self.last_url.clone(),
            last_status: self.last_status,
            behavior_remaining: self.behavior_plan.remaining(),
            response_queue_len: self.default_response_queue.len()
                + self
                    .route_response_queues
                    .values()
                    .map(VecDeque::len)
                    .sum::<usize>(),
            elapsed_total: self.elapsed_total,
            last_error: self.last_error.clone(),
        }
    }
}

impl Default for MockTransportState {
    fn default() -> Self {
        Self {
            state: ApiTransportState::Idle,
            request_count: 0,
            last_url: None,
            last_status: None,
            behavior_plan: MockBehaviorPlan::default(),
            default_response_queue: VecDeque::new(),
            route_response_queues: HashMap::new(),
            outbound_log: Vec::new(),
            last_error: None,
            elapsed_total: Duration::from_millis(0),
        }
    }
}

/// In-memory [`ApiTransport`] with scripted behaviors and queued responses,
/// for fully deterministic tests.
#[derive(Clone, Debug)]
pub struct MockTransport {
    state: Arc<Mutex<MockTransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockTransportState::default())),
        }
    }

    pub fn with_behavior_plan(behavior_plan: MockBehaviorPlan) -> Self {
        let mut state = MockTransportState::default();
        state.behavior_plan = behavior_plan;
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn snapshot(&self) -> MockStateSnapshot {
        self.state
            .lock()
            .expect("mock transport mutex poisoned while taking snapshot")
            .snapshot()
    }

    pub fn queue_response(&self, response: MockResponse) {
        self.state
            .lock()
            .expect("mock transport mutex poisoned while queueing response")
            .default_response_queue
            .push_back(response);
    }

    pub fn queue_response_for(&self, url: impl Into<String>, response: MockResponse) {
        self.state
            .lock()
            .expect("mock transport mutex poisoned while queueing response by route")
            .route_response_queues
            .entry(url.into())
            .or_default()
            .push_back(response);
    }

    pub fn outbound_requests(&self) -> Vec<ApiRequest> {
        self.state
            .lock()
            .expect("mock transport mutex poisoned while reading outbound log")
            .outbound_log
            .clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.state
            .lock()
            .expect("mock transport mutex poisoned while reading outbound log")
            .outbound_log
            .last()
            .cloned()
    }

    pub fn request_count(&self) -> usize {
        self.state
            .lock()
            .expect("mock transport mutex poisoned while reading request count")
            .request_count
    }

    fn pop_behavior(&self) -> MockBehavior {
        self.state
            .lock()
            .expect("mock transport mutex poisoned while reading behavior plan")
            .behavior_plan
            .pop()
    }

    fn apply_delay(behavior: &MockBehavior) {
        if let MockBehavior::Delay(duration) = behavior {
            std::thread::sleep(*duration);
        }
    }

    fn next_response(&self, request: &ApiRequest) -> Option<MockResponse> {
        let mut state = self
            .state
            .lock()
            .expect("mock transport mutex poisoned while selecting response");
        if let Some(queue) = state.route_response_queues.get_mut(&request.url) {
            if let Some(response) = queue.pop_front() {
                return Some(response);
            }
        }
        state.default_response_queue.pop_front()
    }

    fn fail(&self, error: RequestError) -> RequestError {
        let mut state = self
            .state
            .lock()
            .expect("mock transport mutex poisoned while recording error");
        state.state = ApiTransportState::Error;
        state.last_status = error.status();
        state.last_error = Some(error.to_string());
        error
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiTransport for MockTransport {
    fn execute(&self, request: ApiRequest) -> ApiFuture<ApiResult<ApiResponse>> {
        let transport = self.clone();
        Box::pin(async move {
            let behavior = transport.pop_behavior();
            Self::apply_delay(&behavior);

            let start = Instant::now();
            {
                let mut state = transport
                    .state
                    .lock()
                    .expect("mock transport mutex poisoned while recording request");
                state.request_count += 1;
                state.last_url = Some(request.url.clone());
                state.state = ApiTransportState::Busy;
                state.last_error = None;
                state.outbound_log.push(request.clone());
            }

            match behavior {
                MockBehavior::Drop => {
                    return Err(
                        transport.fail(RequestError::timeout("mock transport dropped response"))
                    );
                }
                MockBehavior::ConnectError { reason } => {
                    return Err(transport.fail(RequestError::connect(reason)));
                }
                MockBehavior::SendError { reason } => {
                    return Err(transport.fail(RequestError::send(reason)));
                }
                MockBehavior::ReceiveError { reason } => {
                    return Err(transport.fail(RequestError::receive(reason)));
                }
                MockBehavior::TimeoutError { reason } => {
                    return Err(transport.fail(RequestError::timeout(reason)));
                }
                MockBehavior::Reject { status, reason } => {
                    return Err(transport.fail(RequestError::rejected(status, reason)));
                }
                MockBehavior::Pass | MockBehavior::Delay(_) => {}
            }

            let queued = transport.next_response(&request);
            let response = match queued {
                Some(mock) => ApiResponse {
                    status: mock.status,
                    headers: mock.headers,
                    body: mock.body,
                    elapsed: start.elapsed(),
                },
                None => ApiResponse {
                    status: 200,
                    headers: Vec::new(),
                    body: Bytes::new(),
                    elapsed: start.elapsed(),
                },
            };

            let mut state = transport
                .state
                .lock()
                .expect("mock transport mutex poisoned while recording response");
            state.last_status = Some(response.status);
            state.state = ApiTransportState::Idle;
            state.elapsed_total += response.elapsed;
            drop(state);

            Ok(response)
        })
    }
}
