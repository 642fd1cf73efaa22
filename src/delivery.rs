//! Best-effort poster delivery.
//!
//! Downloads a poster through the image relay, writes it to a transient
//! path derived from the title, and sends it as a captioned image reply.
//! Every failure maps to a distinct short user notice plus a log line;
//! nothing propagates to the caller. The temp file is removed on every
//! exit path once written -- the [`PosterFile`] guard deletes it on drop.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use crate::bot::{ChatTransport, IncomingMessage};
use crate::config::DeliveryConfig;
use crate::error::{Error, Result};
use crate::resolver::MediaDetails;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

const NOTICE_NO_POSTER: &str = "No poster is available for this title.";
const NOTICE_POSTER_NOT_FOUND: &str = "Poster not found for this title.";
const NOTICE_DOWNLOAD_FAILED: &str = "Sorry, there was a problem downloading the poster.";
const NOTICE_SEND_FAILED: &str = "Sorry, there was a problem sending the file.";

/// Sends resolved titles as captioned poster replies.
pub struct MediaDelivery {
    client: reqwest::Client,
    relay_base: String,
    image_base: String,
    temp_dir: PathBuf,
}

impl MediaDelivery {
    /// Create a new delivery service from config.
    pub fn new(config: &DeliveryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            relay_base: config.relay_base.trim_end_matches('/').to_string(),
            image_base: config.image_base.trim_end_matches('/').to_string(),
            temp_dir: config
                .temp_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
        }
    }

    /// Relay-indirected URL for a catalog poster path.
    fn poster_url(&self, poster_path: &str) -> String {
        format!("{}/?url={}{}", self.relay_base, self.image_base, poster_path)
    }

    fn temp_path(&self, title: &str) -> PathBuf {
        self.temp_dir.join(format!("{}.jpg", sanitize_title(title)))
    }

    /// Deliver one resolved title as a captioned poster reply.
    ///
    /// Failures are reported to the user and logged; the call itself always
    /// completes. When `details.poster_path` is absent a plain notice is sent
    /// and no file I/O happens.
    pub async fn deliver(
        &self,
        transport: &dyn ChatTransport,
        msg: &IncomingMessage,
        details: &MediaDetails,
    ) {
        let Some(poster_path) = details.poster_path.as_deref() else {
            self.notify(transport, msg, NOTICE_NO_POSTER).await;
            return;
        };

        let url = self.poster_url(poster_path);
        let data = match self.download(&url).await {
            Ok(data) => data,
            Err(Error::NotFound(_)) => {
                warn!(title = %details.title, "poster not found");
                self.notify(transport, msg, NOTICE_POSTER_NOT_FOUND).await;
                return;
            }
            Err(e) => {
                warn!(title = %details.title, error = %e, "poster download failed");
                self.notify(transport, msg, NOTICE_DOWNLOAD_FAILED).await;
                return;
            }
        };

        let path = self.temp_path(&details.title);
        let _poster = match PosterFile::write(&path, &data).await {
            Ok(guard) => guard,
            Err(e) => {
                warn!(title = %details.title, error = %e, "poster temp write failed");
                self.notify(transport, msg, NOTICE_SEND_FAILED).await;
                return;
            }
        };

        let caption = format_caption(details);
        if let Err(e) = transport
            .send_image(&msg.chat_id, Some(&msg.message_id), &path, &caption)
            .await
        {
            warn!(title = %details.title, error = %e, "poster send failed");
            self.notify(transport, msg, NOTICE_SEND_FAILED).await;
        } else {
            debug!(title = %details.title, "poster delivered");
        }
        // _poster drops here, removing the temp file on every outcome.
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("poster request failed: {e}")))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::not_found(format!("poster returned 404: {url}")));
        }
        if !resp.status().is_success() {
            return Err(Error::transport(format!(
                "poster returned {}: {url}",
                resp.status()
            )));
        }

        let data = resp
            .bytes()
            .await
            .map_err(|e| Error::transport(format!("poster body read failed: {e}")))?;
        Ok(data.to_vec())
    }

    async fn notify(&self, transport: &dyn ChatTransport, msg: &IncomingMessage, text: &str) {
        if let Err(e) = transport
            .send_text(&msg.chat_id, Some(&msg.message_id), text)
            .await
        {
            warn!(chat_id = %msg.chat_id, error = %e, "failed to send notice");
        }
    }
}

/// Owned transient poster file, removed on drop.
struct PosterFile {
    path: PathBuf,
}

impl PosterFile {
    async fn write(path: &Path, data: &[u8]) -> Result<Self> {
        tokio::fs::write(path, data).await?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for PosterFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to remove poster file");
            }
        }
    }
}

/// Title-derived file stem: whitespace and path separators become underscores.
fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect()
}

fn format_caption(details: &MediaDetails) -> String {
    format!(
        "🎥 **{}**\nGenre: {}\nYear: {}\n\n⭐️ IMDB: {:.1}/10\n\n• {}",
        details.title, details.genres, details.year, details.rating, details.plot
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MediaKind;

    fn details() -> MediaDetails {
        MediaDetails {
            title: "The Matrix".to_string(),
            year: "1999".to_string(),
            genres: "Action, Science Fiction".to_string(),
            plot: "A hacker learns the truth.".to_string(),
            rating: 8.2,
            poster_path: Some("/matrix.jpg".to_string()),
            kind: MediaKind::Movie,
        }
    }

    #[test]
    fn sanitizes_titles_for_file_names() {
        assert_eq!(sanitize_title("The Matrix"), "The_Matrix");
        assert_eq!(sanitize_title("Face/Off"), "Face_Off");
        assert_eq!(sanitize_title("Plain"), "Plain");
    }

    #[test]
    fn caption_contains_all_fields() {
        let caption = format_caption(&details());
        assert!(caption.contains("🎥 **The Matrix**"));
        assert!(caption.contains("Genre: Action, Science Fiction"));
        assert!(caption.contains("Year: 1999"));
        assert!(caption.contains("⭐️ IMDB: 8.2/10"));
        assert!(caption.contains("• A hacker learns the truth."));
    }

    #[test]
    fn poster_url_goes_through_the_relay() {
        let delivery = MediaDelivery::new(&DeliveryConfig {
            relay_base: "https://images.weserv.nl".to_string(),
            image_base: "https://image.tmdb.org/t/p/original".to_string(),
            temp_dir: None,
        });
        assert_eq!(
            delivery.poster_url("/matrix.jpg"),
            "https://images.weserv.nl/?url=https://image.tmdb.org/t/p/original/matrix.jpg"
        );
    }

    #[tokio::test]
    async fn poster_file_guard_removes_file_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.jpg");

        let guard = PosterFile::write(&path, b"jpeg bytes").await.unwrap();
        assert!(path.exists());

        drop(guard);
        assert!(!path.exists());
    }
}
