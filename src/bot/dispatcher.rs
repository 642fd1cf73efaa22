//! Update polling and command dispatch.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::catalog::Bucket;
use crate::error::Result;
use crate::pipeline::CommandPipeline;

use super::keypad;
use super::{ChatTransport, Command, IncomingMessage};

const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

const NOTICE_GENERIC: &str = "Sorry, something went wrong. Please try again later.";

/// Long-polls the transport for updates and routes commands.
pub struct Dispatcher {
    transport: Arc<dyn ChatTransport>,
    pipeline: CommandPipeline,
    poll_interval: Duration,
    shutdown_rx: mpsc::Receiver<()>,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        pipeline: CommandPipeline,
        poll_interval: Duration,
        shutdown_rx: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            transport,
            pipeline,
            poll_interval,
            shutdown_rx,
        }
    }

    /// Poll for updates until a shutdown signal arrives.
    ///
    /// Poll failures are logged and retried after a short delay; a bad
    /// update never stops the loop.
    pub async fn run(mut self) {
        info!("Dispatcher started");
        let mut offset: Option<String> = None;

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.recv() => {
                    info!("Dispatcher shutting down");
                    break;
                }
                batch = self.transport.poll_updates(offset.as_deref()) => {
                    match batch {
                        Ok(batch) => {
                            if let Some(next) = batch.next_offset {
                                offset = Some(next);
                            }
                            let idle = batch.messages.is_empty();
                            for msg in &batch.messages {
                                self.dispatch(msg).await;
                            }
                            if idle {
                                tokio::time::sleep(self.poll_interval).await;
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "update poll failed, retrying");
                            tokio::time::sleep(POLL_RETRY_DELAY).await;
                        }
                    }
                }
            }
        }
    }

    /// Handle one message, reporting any unanticipated failure to the user.
    async fn dispatch(&self, msg: &IncomingMessage) {
        let Some(command) = Command::parse(&msg.text) else {
            return;
        };
        info!(chat_id = %msg.chat_id, command = ?command, "handling command");

        if let Err(e) = self.handle(msg, command).await {
            error!(chat_id = %msg.chat_id, command = ?command, error = %e, "command handler failed");
            if let Err(e) = self
                .transport
                .send_text(&msg.chat_id, Some(&msg.message_id), NOTICE_GENERIC)
                .await
            {
                warn!(chat_id = %msg.chat_id, error = %e, "failed to send failure notice");
            }
        }
    }

    async fn handle(&self, msg: &IncomingMessage, command: Command) -> Result<()> {
        let transport = self.transport.as_ref();
        match command {
            Command::Start => {
                transport
                    .send_text_with_keypad(
                        &msg.chat_id,
                        "Welcome to the movie and series bot. Pick an option from the menu below:",
                        &keypad::main_menu(),
                    )
                    .await?;
            }
            Command::TopMoviesMenu => {
                transport
                    .send_text_with_keypad(
                        &msg.chat_id,
                        "⭕️ Browsing today's best...",
                        &keypad::movies_menu(),
                    )
                    .await?;
            }
            Command::BackToMain => {
                transport
                    .send_text_with_keypad(
                        &msg.chat_id,
                        "Back to the main menu.",
                        &keypad::main_menu(),
                    )
                    .await?;
            }
            Command::NewEpisodes => {
                transport
                    .send_text(
                        &msg.chat_id,
                        Some(&msg.message_id),
                        "⭕️ New series episodes are on the way...",
                    )
                    .await?;
            }
            Command::SelectGenre => {
                transport
                    .send_text(
                        &msg.chat_id,
                        Some(&msg.message_id),
                        "⭕️ The genre picker is on the way...",
                    )
                    .await?;
            }
            Command::Profile => {
                transport
                    .send_text(&msg.chat_id, Some(&msg.message_id), "Preparing your profile...")
                    .await?;
            }
            Command::LatestMovies => {
                self.run_catalog(msg, Bucket::NowPlaying, "⭕️ Searching for the latest movies...")
                    .await;
            }
            Command::TopSeries => {
                self.run_catalog(msg, Bucket::TopRatedTv, "⭕️ Searching for the top series...")
                    .await;
            }
            Command::HottestMovies => {
                self.run_catalog(
                    msg,
                    Bucket::PopularMovies,
                    "⭕️ Searching for the hottest movies...",
                )
                .await;
            }
            Command::TopAnime => {
                self.run_catalog(msg, Bucket::PopularAnime, "⭕️ Searching for top anime...")
                    .await;
            }
            Command::Cartoons => {
                self.run_catalog(msg, Bucket::PopularCartoons, "⭕️ Searching for cartoons...")
                    .await;
            }
            Command::DailySuggestion => {
                self.run_catalog(msg, Bucket::PopularMovies, "⭕️ Fetching today's pick...")
                    .await;
            }
        }
        Ok(())
    }

    async fn run_catalog(&self, msg: &IncomingMessage, bucket: Bucket, ack: &str) {
        self.pipeline
            .run(self.transport.as_ref(), msg, bucket, ack)
            .await;
    }
}
