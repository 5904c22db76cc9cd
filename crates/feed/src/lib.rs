//! Feed retrieval: two interchangeable upstream sources behind one trait.
//!
//! The syndication feed is unauthenticated and unpaginated; the search API
//! is keyed and paginated. Which one serves a deployment is a configuration
//! choice, never a runtime fallback.

mod assemble;
mod search_api;
mod syndication;

pub use assemble::{assemble, clamp_requested};
pub use search_api::SearchApiSource;
pub use syndication::SyndicationSource;

use async_trait::async_trait;
use domain::{SourceLimits, VideoEntry};
use thiserror::Error;

/// One page of normalized entries from an upstream source.
///
/// Entries arrive in upstream reverse-chronological order and are never
/// re-sorted. `next_page_token` is `None` for the unpaginated source.
#[derive(Debug)]
pub struct FeedPage {
    pub entries: Vec<VideoEntry>,
    pub next_page_token: Option<String>,
}

/// Feed retrieval failure.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Upstream answered with a non-success transport status.
    #[error("upstream feed request returned status {0}")]
    UpstreamStatus(u16),
    /// The search API reported a structured error in the response body.
    /// Transport success does not imply logical success.
    #[error("search API error: {message}")]
    Api { status: u16, message: String },
    #[error("feed request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode search API response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The search API credential is absent from configuration. Fatal for
    /// the request; there is no fallback to the other source.
    #[error("missing YOUTUBE_API_KEY: the search API source requires a credential")]
    MissingApiKey,
}

/// A source of recent video entries for a channel.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetches up to `max` entries for `channel_id`. `page_token` is an
    /// opaque cursor forwarded unmodified; sources without pagination
    /// ignore it, and `max` too: bounding happens in the assembler.
    async fn fetch(
        &self,
        channel_id: &str,
        page_token: Option<&str>,
        max: usize,
    ) -> Result<FeedPage, FeedError>;

    /// The clamping and caching bounds for this source.
    fn limits(&self) -> SourceLimits;
}

/// Canonical watch URL for entries without an explicit link field.
pub(crate) fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Deterministic thumbnail for sources without resolution variants.
pub(crate) fn fallback_thumbnail(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg")
}
