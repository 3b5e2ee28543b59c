use super::client::LLMClient;
use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted LLM client
///
/// Responses registered with [`MockLLMClient::on_phase`] answer every request tagged with
/// that phase; anything else is served from the FIFO queue.
pub struct MockLLMClient {
    responses: Mutex<VecDeque<MockResponse>>,
    routes: Mutex<HashMap<String, MockResponse>>,
    phases_seen: Mutex<Vec<String>>,
    calls: AtomicUsize,
    name: String,
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub content: String,
    pub error: Option<BackendError>,
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            error: None,
            delay: None,
        }
    }

    pub fn json(value: serde_json::Value) -> Self {
        Self::text(value.to_string())
    }

    pub fn error(error: BackendError) -> Self {
        Self {
            content: String::new(),
            error: Some(error),
            delay: None,
        }
    }

    /// Holds the response back for `delay` before answering
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl MockLLMClient {
    pub fn new() -> Self {
        Self::with_name("MockLLM")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            routes: Mutex::new(HashMap::new()),
            phases_seen: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            name: name.into(),
        }
    }

    pub fn add_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        let mut queue = self.responses.lock().unwrap();
        for response in responses {
            queue.push_back(response);
        }
    }

    /// Answers every request tagged with `phase` with `response`
    pub fn on_phase(&self, phase: impl Into<String>, response: MockResponse) {
        self.routes.lock().unwrap().insert(phase.into(), response);
    }

    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Total number of `chat` calls received
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of calls received for the given phase
    pub fn calls_for(&self, phase: &str) -> usize {
        self.phases_seen
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == phase)
            .count()
    }

    fn next_response(&self, phase: Option<&str>) -> Option<MockResponse> {
        if let Some(phase) = phase {
            if let Some(routed) = self.routes.lock().unwrap().get(phase) {
                return Some(routed.clone());
            }
        }
        self.responses.lock().unwrap().pop_front()
    }
}

impl Default for MockLLMClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(phase) = &request.phase {
            self.phases_seen.lock().unwrap().push(phase.clone());
        }

        let response =
            self.next_response(request.phase.as_deref())
                .ok_or_else(|| BackendError::Other {
                    message: "MockLLMClient: No more responses in queue".to_string(),
                })?;

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = response.error {
            return Err(error);
        }

        Ok(LLMResponse::text(
            response.content,
            response.delay.unwrap_or(Duration::from_millis(10)),
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model_info(&self) -> Option<String> {
        Some("mock-model".to_string())
    }
}

impl std::fmt::Debug for MockLLMClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLLMClient")
            .field("name", &self.name)
            .field("remaining_responses", &self.remaining_responses())
            .field("calls", &self.call_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatMessage;

    fn tagged(phase: &str) -> LLMRequest {
        LLMRequest::new(vec![ChatMessage::user("x")]).with_phase(phase)
    }

    #[tokio::test]
    async fn test_mock_client_basic() {
        let client = MockLLMClient::new();
        client.add_response(MockResponse::text("Hello!"));

        let response = client.chat(LLMRequest::new(vec![])).await.unwrap();

        assert_eq!(response.content, "Hello!");
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let client = MockLLMClient::new();
        client.add_response(MockResponse::error(BackendError::TimeoutError {
            seconds: 30,
        }));

        let result = client.chat(LLMRequest::new(vec![])).await;

        assert!(matches!(result, Err(BackendError::TimeoutError { seconds: 30 })));
    }

    #[tokio::test]
    async fn test_mock_client_no_responses() {
        let client = MockLLMClient::new();

        let result = client.chat(LLMRequest::new(vec![])).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_client_multiple_responses() {
        let client = MockLLMClient::new();
        client.add_responses(vec![
            MockResponse::text("First"),
            MockResponse::text("Second"),
            MockResponse::text("Third"),
        ]);

        assert_eq!(client.remaining_responses(), 3);

        let r1 = client.chat(LLMRequest::new(vec![])).await.unwrap();
        assert_eq!(r1.content, "First");

        let r2 = client.chat(LLMRequest::new(vec![])).await.unwrap();
        assert_eq!(r2.content, "Second");

        assert_eq!(client.remaining_responses(), 1);
    }

    #[tokio::test]
    async fn test_phase_routes_are_reusable() {
        let client = MockLLMClient::new();
        client.on_phase("analyze_domain", MockResponse::text("domain"));
        client.add_response(MockResponse::text("queued"));

        let a = client.chat(tagged("analyze_domain")).await.unwrap();
        let b = client.chat(tagged("analyze_domain")).await.unwrap();
        let c = client.chat(tagged("refine_idea")).await.unwrap();

        assert_eq!(a.content, "domain");
        assert_eq!(b.content, "domain");
        assert_eq!(c.content, "queued");
        assert_eq!(client.calls_for("analyze_domain"), 2);
        assert_eq!(client.calls_for("refine_idea"), 1);
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn test_delayed_response() {
        let client = MockLLMClient::new();
        client.add_response(MockResponse::text("late").delayed(Duration::from_millis(50)));

        let start = std::time::Instant::now();
        let response = client.chat(LLMRequest::new(vec![])).await.unwrap();

        assert_eq!(response.content, "late");
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_custom_name() {
        let client = MockLLMClient::with_name("TestClient");
        assert_eq!(client.name(), "TestClient");
    }
}
