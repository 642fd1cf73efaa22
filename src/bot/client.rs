//! Rubika-style bot API client.
//!
//! Every method is a JSON POST to `{api_base}/{token}/{method}` returning a
//! `{status, data}` envelope. Sending a file is a three-step flow:
//! `requestSendFile` yields an upload URL, the bytes go up as multipart
//! form data, and the returned file id is referenced by `sendFile`.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BotConfig;
use crate::error::{Error, Result};

use super::keypad::Keypad;
use super::transport::{ChatTransport, IncomingMessage, UpdateBatch};

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct UpdatesData {
    #[serde(default)]
    updates: Vec<Update>,
    next_offset_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    chat_id: String,
    new_message: Option<NewMessage>,
}

#[derive(Debug, Deserialize)]
struct NewMessage {
    message_id: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RequestSendFileData {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    file_id: String,
}

#[derive(Serialize)]
struct GetUpdatesBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset_id: Option<&'a str>,
    limit: u32,
}

#[derive(Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chat_keypad: Option<&'a Keypad>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chat_keypad_type: Option<&'a str>,
}

#[derive(Serialize)]
struct RequestSendFileBody<'a> {
    #[serde(rename = "type")]
    file_type: &'a str,
}

#[derive(Serialize)]
struct SendFileBody<'a> {
    chat_id: &'a str,
    file_id: &'a str,
    text: &'a str,
    #[serde(rename = "type")]
    file_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<&'a str>,
}

/// Bot API client bound to one token.
pub struct RubikaClient {
    client: reqwest::Client,
    base_url: String,
}

impl RubikaClient {
    /// Create a new client from config.
    pub fn new(config: &BotConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(CONNECTION_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: format!("{}/{}", config.api_base.trim_end_matches('/'), config.token),
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// POST a method call and unwrap the `{status, data}` envelope.
    async fn call<B: Serialize, T: DeserializeOwned>(&self, method: &str, body: &B) -> Result<T> {
        debug!(method, "bot API call");
        let resp = self
            .client
            .post(self.url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(format!("bot API {method} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::transport(format!(
                "bot API {method} returned {}",
                resp.status()
            )));
        }

        let envelope: Envelope<T> = resp
            .json()
            .await
            .map_err(|e| Error::data_shape(format!("failed to parse bot API {method}: {e}")))?;

        if envelope.status != "OK" {
            return Err(Error::transport(format!(
                "bot API {method} status {}",
                envelope.status
            )));
        }
        envelope
            .data
            .ok_or_else(|| Error::data_shape(format!("bot API {method} returned no data")))
    }

    /// Upload file bytes to the URL handed out by `requestSendFile`.
    async fn upload(&self, upload_url: &str, file_name: &str, data: Vec<u8>) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(data).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .client
            .post(upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::transport(format!("file upload failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::transport(format!(
                "file upload returned {}",
                resp.status()
            )));
        }

        let envelope: Envelope<UploadData> = resp
            .json()
            .await
            .map_err(|e| Error::data_shape(format!("failed to parse upload response: {e}")))?;

        envelope
            .data
            .map(|d| d.file_id)
            .ok_or_else(|| Error::data_shape("upload response returned no file id"))
    }
}

#[async_trait]
impl ChatTransport for RubikaClient {
    async fn poll_updates(&self, offset: Option<&str>) -> Result<UpdateBatch> {
        let body = GetUpdatesBody {
            offset_id: offset,
            limit: POLL_LIMIT,
        };
        let data: UpdatesData = self.call("getUpdates", &body).await?;

        let messages = data
            .updates
            .into_iter()
            .filter_map(|update| {
                let message = update.new_message?;
                let text = message.text?;
                Some(IncomingMessage {
                    chat_id: update.chat_id,
                    message_id: message.message_id,
                    text,
                })
            })
            .collect();

        Ok(UpdateBatch {
            messages,
            next_offset: data.next_offset_id,
        })
    }

    async fn send_text(&self, chat_id: &str, reply_to: Option<&str>, text: &str) -> Result<()> {
        let body = SendMessageBody {
            chat_id,
            text,
            reply_to_message_id: reply_to,
            chat_keypad: None,
            chat_keypad_type: None,
        };
        let _: serde_json::Value = self.call("sendMessage", &body).await?;
        Ok(())
    }

    async fn send_text_with_keypad(
        &self,
        chat_id: &str,
        text: &str,
        keypad: &Keypad,
    ) -> Result<()> {
        let body = SendMessageBody {
            chat_id,
            text,
            reply_to_message_id: None,
            chat_keypad: Some(keypad),
            chat_keypad_type: Some("New"),
        };
        let _: serde_json::Value = self.call("sendMessage", &body).await?;
        Ok(())
    }

    async fn send_image(
        &self,
        chat_id: &str,
        reply_to: Option<&str>,
        path: &Path,
        caption: &str,
    ) -> Result<()> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::invalid_input(format!("bad file path: {}", path.display())))?;
        let data = tokio::fs::read(path).await?;

        let slot: RequestSendFileData = self
            .call("requestSendFile", &RequestSendFileBody { file_type: "Image" })
            .await?;
        let file_id = self.upload(&slot.upload_url, file_name, data).await?;

        let body = SendFileBody {
            chat_id,
            file_id: &file_id,
            text: caption,
            file_type: "Image",
            reply_to_message_id: reply_to,
        };
        let _: serde_json::Value = self.call("sendFile", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_includes_token_and_method() {
        let client = RubikaClient::new(&BotConfig {
            token: "abc123".to_string(),
            api_base: "https://botapi.example.com/v3/".to_string(),
            poll_interval_secs: 2,
        });
        assert_eq!(
            client.url("sendMessage"),
            "https://botapi.example.com/v3/abc123/sendMessage"
        );
    }

    #[test]
    fn send_message_body_omits_empty_fields() {
        let body = SendMessageBody {
            chat_id: "c1",
            text: "hi",
            reply_to_message_id: None,
            chat_keypad: None,
            chat_keypad_type: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["chat_id"], "c1");
        assert!(json.get("reply_to_message_id").is_none());
        assert!(json.get("chat_keypad").is_none());
    }

    #[test]
    fn updates_parse_and_skip_non_message_updates() {
        let raw = r#"{
            "status": "OK",
            "data": {
                "updates": [
                    {"chat_id": "c1", "new_message": {"message_id": "m1", "text": "/start"}},
                    {"chat_id": "c2", "new_message": null},
                    {"chat_id": "c3", "new_message": {"message_id": "m3", "text": null}}
                ],
                "next_offset_id": "off-2"
            }
        }"#;
        let envelope: Envelope<UpdatesData> = serde_json::from_str(raw).unwrap();
        let data = envelope.data.unwrap();
        assert_eq!(data.updates.len(), 3);
        assert_eq!(data.next_offset_id.as_deref(), Some("off-2"));

        let messages: Vec<_> = data
            .updates
            .into_iter()
            .filter_map(|u| {
                let m = u.new_message?;
                let text = m.text?;
                Some((u.chat_id, m.message_id, text))
            })
            .collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].2, "/start");
    }
}
