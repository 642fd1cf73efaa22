//! Detail resolution: expand a bare item id into translated, display-ready
//! metadata.

use std::sync::Arc;

use tracing::warn;

use crate::catalog::{CatalogClient, MediaKind};
use crate::error::Result;
use crate::translate::Translator;

/// Display-ready metadata for one title. Built per resolver call, consumed
/// once by media delivery, never cached.
#[derive(Debug, Clone)]
pub struct MediaDetails {
    pub title: String,
    /// Four-character year, or "N/A" when the catalog has no date.
    pub year: String,
    /// Genre names joined with ", ", translated.
    pub genres: String,
    /// Synopsis text, translated.
    pub plot: String,
    /// Vote average rounded to one decimal.
    pub rating: f64,
    pub poster_path: Option<String>,
    pub kind: MediaKind,
}

/// Resolves an item id into [`MediaDetails`].
///
/// One catalog detail call plus two translation calls per item. Any failure
/// (transport, non-2xx, translation) is logged and surfaced as `None`;
/// callers treat that as "skip this item", not as a batch abort.
pub struct DetailResolver {
    catalog: Arc<CatalogClient>,
    translator: Arc<dyn Translator>,
    language: String,
}

impl DetailResolver {
    pub fn new(catalog: Arc<CatalogClient>, translator: Arc<dyn Translator>, language: String) -> Self {
        Self {
            catalog,
            translator,
            language,
        }
    }

    /// Resolve one title, or `None` on any failure.
    pub async fn resolve(&self, id: u64, kind: MediaKind) -> Option<MediaDetails> {
        match self.resolve_inner(id, kind).await {
            Ok(details) => Some(details),
            Err(e) => {
                warn!(id, kind = %kind, error = %e, "detail resolution failed");
                None
            }
        }
    }

    async fn resolve_inner(&self, id: u64, kind: MediaKind) -> Result<MediaDetails> {
        let detail = self.catalog.detail(id, kind).await?;

        let genres = detail
            .genres
            .unwrap_or_default()
            .into_iter()
            .map(|g| g.name)
            .collect::<Vec<_>>()
            .join(", ");
        let genres = self.translator.translate(&genres, &self.language).await?;

        let plot = detail
            .overview
            .unwrap_or_else(|| "No synopsis available.".to_string());
        let plot = self.translator.translate(&plot, &self.language).await?;

        let title = match kind {
            MediaKind::Movie => detail.title,
            MediaKind::Tv => detail.name,
        }
        .unwrap_or_else(|| "N/A".to_string());

        let date = match kind {
            MediaKind::Movie => detail.release_date,
            MediaKind::Tv => detail.first_air_date,
        };

        Ok(MediaDetails {
            title,
            year: year_of(date.as_deref()),
            genres,
            plot,
            rating: round_rating(detail.vote_average.unwrap_or(0.0)),
            poster_path: detail.poster_path,
            kind,
        })
    }
}

/// First four characters of a date string like `"2023-04-15"`, or "N/A".
fn year_of(date: Option<&str>) -> String {
    match date {
        Some(d) if !d.is_empty() => d.chars().take(4).collect(),
        _ => "N/A".to_string(),
    }
}

fn round_rating(vote_average: f64) -> f64 {
    (vote_average * 10.0).round() / 10.0
}
