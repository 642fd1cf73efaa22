//! Chat transport trait and inbound message types.
//!
//! The pipeline and media delivery depend on this trait, never on the
//! concrete bot client, so tests can substitute a recording stub.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

use super::keypad::Keypad;

/// An inbound message that may trigger a command.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: String,
    pub message_id: String,
    pub text: String,
}

/// A drained batch of updates plus the offset to resume polling from.
#[derive(Debug, Clone, Default)]
pub struct UpdateBatch {
    pub messages: Vec<IncomingMessage>,
    pub next_offset: Option<String>,
}

/// Outbound replies and update polling against the messaging service.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Fetch pending updates, starting after `offset` when given.
    async fn poll_updates(&self, offset: Option<&str>) -> Result<UpdateBatch>;

    /// Send a plain text reply.
    async fn send_text(&self, chat_id: &str, reply_to: Option<&str>, text: &str) -> Result<()>;

    /// Send a text reply that also installs a chat keypad.
    async fn send_text_with_keypad(&self, chat_id: &str, text: &str, keypad: &Keypad)
        -> Result<()>;

    /// Send a local image file with a caption, replying to a message.
    async fn send_image(
        &self,
        chat_id: &str,
        reply_to: Option<&str>,
        path: &Path,
        caption: &str,
    ) -> Result<()>;
}
