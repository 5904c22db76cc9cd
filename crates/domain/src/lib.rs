use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single normalized video entry.
///
/// `id` and `title` are guaranteed non-empty; entries where either resolves
/// to an empty string are dropped during normalization and never reach a
/// response. `published` carries the upstream timestamp string unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoEntry {
    pub id: String,
    pub title: String,
    pub published: String,
    pub link: String,
    pub thumbnail: String,
    pub summary: String,
}

/// The response envelope returned to callers.
///
/// `count` always equals `items.len()` after filtering and truncation.
/// `next_page_token` is only present for the paginated feed source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub handle: String,
    pub channel_id: String,
    pub updated_at: DateTime<Utc>,
    pub count: usize,
    pub items: Vec<VideoEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Per-source bounds on the `max` query parameter and response caching.
#[derive(Debug, Clone, Copy)]
pub struct SourceLimits {
    /// Largest item count a caller may request.
    pub max_results: usize,
    /// Item count used when `max` is absent or not numeric.
    pub default_results: usize,
    /// `max-age` seconds for the response `cache-control` header.
    pub cache_max_age: u32,
}
