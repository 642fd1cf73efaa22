//! Catalog API types and query buckets.
//!
//! A bucket is a named logical query (e.g. "now playing") mapped to one
//! cache entry and one remote endpoint. The list endpoints return summaries
//! whose only contractual field is `id`; everything else is carried through
//! untouched.

mod client;
mod fetcher;

pub use client::CatalogClient;
pub use fetcher::CatalogFetcher;

use serde::{Deserialize, Serialize};

/// Whether an item is a feature film or a TV show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    /// Path segment used by the catalog detail endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed query buckets served by the bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    NowPlaying,
    PopularMovies,
    TopRatedTv,
    PopularAnime,
    PopularCartoons,
}

impl Bucket {
    /// Cache key for this bucket.
    pub fn name(self) -> &'static str {
        match self {
            Bucket::NowPlaying => "now_playing",
            Bucket::PopularMovies => "popular_movies",
            Bucket::TopRatedTv => "top_rated_tv",
            Bucket::PopularAnime => "popular_anime",
            Bucket::PopularCartoons => "popular_cartoons",
        }
    }

    /// Endpoint path (with query string where the bucket is a filtered
    /// discovery) relative to the catalog base URL.
    pub fn path(self) -> &'static str {
        match self {
            Bucket::NowPlaying => "/movie/now_playing",
            Bucket::PopularMovies => "/movie/popular",
            Bucket::TopRatedTv => "/tv/top_rated",
            Bucket::PopularAnime => "/discover/movie?with_genres=16&sort_by=vote_count.desc",
            Bucket::PopularCartoons => {
                "/discover/movie?with_genres=16,10751&sort_by=vote_count.desc"
            }
        }
    }

    /// Kind of the items this bucket lists.
    pub fn kind(self) -> MediaKind {
        match self {
            Bucket::TopRatedTv => MediaKind::Tv,
            _ => MediaKind::Movie,
        }
    }
}

/// One entry of a catalog list response.
///
/// Only `id` is interpreted; the remaining fields are passed through as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: u64,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Raw detail-endpoint response for a single title.
///
/// Movie and TV payloads differ in their title and date field names; both
/// sets are optional here and the resolver picks by [`MediaKind`].
#[derive(Debug, Clone, Deserialize)]
pub struct TitleDetail {
    /// Movie title (`title`) -- absent on TV payloads.
    pub title: Option<String>,
    /// TV title (`name`) -- absent on movie payloads.
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub poster_path: Option<String>,
    pub genres: Option<Vec<Genre>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub name: String,
}
