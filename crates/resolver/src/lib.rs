//! Channel identifier resolution.
//!
//! A creator handle is public and may change; the channel identifier is
//! stable. The resolver turns the former into the latter by fetching a
//! canonical document and running an ordered list of extraction patterns
//! over it, consulting a TTL-bound cache first.

mod cache;
mod patterns;

pub use cache::{Clock, IdentifierCache, SystemClock};
pub use patterns::extract_channel_id;

use async_trait::async_trait;
use reqwest::header;
use std::sync::Arc;
use thiserror::Error;

/// Failure of a single document fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(u16),
}

impl FetchError {
    fn upstream_status(&self) -> Option<u16> {
        match self {
            FetchError::Status(status) => Some(*status),
            FetchError::Transport(_) => None,
        }
    }
}

/// Resolution failure, surfaced to the request boundary.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No attempted document could be fetched. Carries the upstream status
    /// when the failure was a non-success transport status.
    #[error("failed to fetch a channel document for the handle")]
    FetchFailed { status: Option<u16> },
    /// Every fetched document was searched and nothing matched.
    #[error("no channel identifier pattern matched any attempted document")]
    NoPatternMatched,
}

/// Fetches one document body by URL.
///
/// Abstracted behind a trait so resolution logic can be tested without a
/// network; production uses [`HttpDocumentFetcher`].
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError>;
}

/// `reqwest`-backed fetcher. The client is shared and carries the service's
/// request timeout.
pub struct HttpDocumentFetcher {
    client: reqwest::Client,
}

impl HttpDocumentFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, "Mozilla/5.0")
            .header(header::ACCEPT, "text/html,application/xml,text/xml,*/*")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

/// Resolves a handle to its channel identifier, caching the result.
pub struct ChannelResolver {
    fetcher: Arc<dyn DocumentFetcher>,
    cache: IdentifierCache,
    attempts: usize,
}

impl ChannelResolver {
    /// `attempts` bounds how many candidate documents are tried in order
    /// (at least one, at most the candidate list length).
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, cache: IdentifierCache, attempts: usize) -> Self {
        Self {
            fetcher,
            cache,
            attempts: attempts.max(1),
        }
    }

    /// Candidate documents in priority order: the public profile page, then
    /// the syndication feed keyed by handle.
    fn candidate_documents(handle: &str) -> [String; 2] {
        [
            format!("https://www.youtube.com/@{handle}"),
            format!("https://www.youtube.com/feeds/videos.xml?user={handle}"),
        ]
    }

    /// Resolves `handle`, consulting the cache first.
    ///
    /// The cache is only written as the final step of a successful
    /// extraction, so a failed attempt never clobbers a previously good
    /// value.
    pub async fn resolve(&self, handle: &str) -> Result<String, ResolveError> {
        if let Some(channel_id) = self.cache.get() {
            tracing::debug!(handle, %channel_id, "identifier served from cache");
            return Ok(channel_id);
        }

        let candidates = Self::candidate_documents(handle);
        let mut fetch_failure: Option<Option<u16>> = None;
        for url in candidates.iter().take(self.attempts) {
            let doc = match self.fetcher.fetch_document(url).await {
                Ok(doc) => doc,
                Err(err) => {
                    tracing::warn!(%url, error = %err, "channel document fetch failed");
                    fetch_failure = Some(err.upstream_status());
                    continue;
                }
            };
            if let Some(channel_id) = extract_channel_id(&doc) {
                self.cache.put(&channel_id);
                tracing::info!(handle, %channel_id, "resolved channel identifier");
                return Ok(channel_id);
            }
            tracing::debug!(%url, "no identifier pattern matched, trying next document");
        }

        // A fetch failure is more actionable than a silent non-match, so it
        // wins when both happened across the attempted documents.
        match fetch_failure {
            Some(status) => Err(ResolveError::FetchFailed { status }),
            None => Err(ResolveError::NoPatternMatched),
        }
    }
}
