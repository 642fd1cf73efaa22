//! Command pipeline: acknowledge, fetch a bucket, sample titles, then
//! resolve and deliver each sampled title in turn.

use rand::seq::SliceRandom;

use tracing::{debug, info, warn};

use crate::bot::{ChatTransport, IncomingMessage};
use crate::catalog::{Bucket, CatalogFetcher, ItemSummary};
use crate::delivery::MediaDelivery;
use crate::resolver::DetailResolver;

/// Upper bound on titles delivered per command.
pub const SAMPLE_SIZE: usize = 5;

const NOTICE_UNAVAILABLE: &str =
    "Sorry, the catalog is unavailable right now. Please try again later.";

/// Drives fetch, sample, resolve and deliver for one command invocation.
///
/// Items are processed strictly one after another; a failed item is skipped
/// and its siblings still go out. A failed fetch produces a single
/// "unavailable" notice and nothing else.
pub struct CommandPipeline {
    fetcher: CatalogFetcher,
    resolver: DetailResolver,
    delivery: MediaDelivery,
}

impl CommandPipeline {
    pub fn new(fetcher: CatalogFetcher, resolver: DetailResolver, delivery: MediaDelivery) -> Self {
        Self {
            fetcher,
            resolver,
            delivery,
        }
    }

    /// Run one command invocation against `bucket`, replying to `msg`.
    pub async fn run(
        &self,
        transport: &dyn ChatTransport,
        msg: &IncomingMessage,
        bucket: Bucket,
        ack: &str,
    ) {
        if let Err(e) = transport
            .send_text(&msg.chat_id, Some(&msg.message_id), ack)
            .await
        {
            warn!(chat_id = %msg.chat_id, error = %e, "failed to send acknowledgement");
        }

        let items = match self.fetcher.fetch(bucket).await {
            Some(items) if !items.is_empty() => items,
            _ => {
                if let Err(e) = transport
                    .send_text(&msg.chat_id, Some(&msg.message_id), NOTICE_UNAVAILABLE)
                    .await
                {
                    warn!(chat_id = %msg.chat_id, error = %e, "failed to send unavailable notice");
                }
                return;
            }
        };

        let sampled = sample(&items);
        info!(
            bucket = bucket.name(),
            total = items.len(),
            sampled = sampled.len(),
            "delivering sampled titles"
        );

        for item in sampled {
            match self.resolver.resolve(item.id, bucket.kind()).await {
                Some(details) => self.delivery.deliver(transport, msg, &details).await,
                None => {
                    debug!(id = item.id, "skipping unresolved item");
                }
            }
        }
    }
}

/// Uniform random sample of `min(SAMPLE_SIZE, len)` distinct items.
fn sample(items: &[ItemSummary]) -> Vec<&ItemSummary> {
    let mut rng = rand::thread_rng();
    items
        .choose_multiple(&mut rng, SAMPLE_SIZE.min(items.len()))
        .collect()
}
