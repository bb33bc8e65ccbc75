// Scripted TextGenerator for tests. Replies are consumed in order; prompts are recorded.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{join_sections, LlmError, TextGenerator};

enum Reply {
    Text(String),
    Fail { status: u16, message: String },
}

#[derive(Clone, Default)]
pub struct MockLlm {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    calls: Arc<Mutex<Vec<(String, bool)>>>,
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw text reply.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Text(response.into()));
        self
    }

    /// Queue a JSON reply (serialized).
    pub fn with_json_response(self, data: &serde_json::Value) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.with_response(json)
    }

    /// Queue a provider-level failure.
    pub fn with_failure(self, status: u16) -> Self {
        self.replies.lock().unwrap().push_back(Reply::Fail {
            status,
            message: "mock provider failure".to_string(),
        });
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|(p, _)| p.clone())
    }

    pub fn prompt(&self, index: usize) -> Option<String> {
        self.calls.lock().unwrap().get(index).map(|(p, _)| p.clone())
    }

    pub fn all_expected_json(&self) -> bool {
        self.calls.lock().unwrap().iter().all(|(_, json)| *json)
    }
}

#[async_trait]
impl TextGenerator for MockLlm {
    async fn complete(&self, sections: &[&str], expect_json: bool) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((join_sections(sections), expect_json));

        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail { status, message }) => Err(LlmError::Api { status, message }),
            None => Err(LlmError::EmptyContent),
        }
    }
}
