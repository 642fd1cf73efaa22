//! Shared test doubles: a recording chat transport and a stub translator.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use reelbot::bot::keypad::Keypad;
use reelbot::bot::{ChatTransport, IncomingMessage, UpdateBatch};
use reelbot::error::{Error, Result};
use reelbot::translate::Translator;

/// One recorded outbound reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: String,
        reply_to: Option<String>,
        text: String,
    },
    Image {
        chat_id: String,
        reply_to: Option<String>,
        path: PathBuf,
        caption: String,
        existed_at_send: bool,
    },
}

/// Transport stub that records every outbound reply.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    fail_image_send: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose `send_image` always fails.
    pub fn failing_image_send() -> Self {
        Self {
            fail_image_send: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Just the text bodies, in send order.
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                Sent::Image { .. } => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| matches!(s, Sent::Image { .. }))
            .collect()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn poll_updates(&self, _offset: Option<&str>) -> Result<UpdateBatch> {
        Ok(UpdateBatch::default())
    }

    async fn send_text(&self, chat_id: &str, reply_to: Option<&str>, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id: chat_id.to_string(),
            reply_to: reply_to.map(str::to_string),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_text_with_keypad(
        &self,
        chat_id: &str,
        text: &str,
        _keypad: &Keypad,
    ) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id: chat_id.to_string(),
            reply_to: None,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_image(
        &self,
        chat_id: &str,
        reply_to: Option<&str>,
        path: &Path,
        caption: &str,
    ) -> Result<()> {
        let existed = path.exists();
        self.sent.lock().unwrap().push(Sent::Image {
            chat_id: chat_id.to_string(),
            reply_to: reply_to.map(str::to_string),
            path: path.to_path_buf(),
            caption: caption.to_string(),
            existed_at_send: existed,
        });
        if self.fail_image_send {
            return Err(Error::transport("send rejected"));
        }
        Ok(())
    }
}

/// Translator stub that tags text with the target language.
pub struct StubTranslator {
    fail: bool,
}

impl StubTranslator {
    pub fn new() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        if self.fail {
            return Err(Error::transport("translator down"));
        }
        Ok(format!("[{target}] {text}"))
    }
}

/// A triggering message addressed to a fixed chat.
pub fn incoming(text: &str) -> IncomingMessage {
    IncomingMessage {
        chat_id: "chat-1".to_string(),
        message_id: "msg-1".to_string(),
        text: text.to_string(),
    }
}
