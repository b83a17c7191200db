//! Scripted gateway used by the relay and web tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::gateway::{GatewayReply, ModelGateway};
use super::prompt::ChatRequest;
use crate::error::RelayResult;

/// A scripted gateway for tests. Returns the same reply on every call and
/// counts how often it was reached.
pub struct MockGateway {
    reply: GatewayReply,
    calls: AtomicUsize,
    last_image: Mutex<Option<String>>,
}

impl MockGateway {
    pub fn new(reply: GatewayReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_image: Mutex::new(None),
        }
    }

    /// A 200 reply wrapping `content` in a chat-completion envelope.
    pub fn with_content(content: &str) -> Self {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        });
        Self::new(GatewayReply::new(200, body.to_string()))
    }

    pub fn with_status(status: u16, body: &str) -> Self {
        Self::new(GatewayReply::new(status, body))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Image URL of the last request seen.
    pub fn last_image(&self) -> Option<String> {
        self.last_image.lock().ok().and_then(|g| g.clone())
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    async fn complete(&self, _api_key: &str, request: &ChatRequest) -> RelayResult<GatewayReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let image = request.messages.iter().find_map(|m| match &m.content {
            super::prompt::MessageContent::Parts(parts) => parts.iter().find_map(|p| match p {
                super::prompt::ContentPart::ImageUrl { image_url } => Some(image_url.url.clone()),
                _ => None,
            }),
            _ => None,
        });
        if let Ok(mut slot) = self.last_image.lock() {
            *slot = image;
        }
        Ok(self.reply.clone())
    }
}
