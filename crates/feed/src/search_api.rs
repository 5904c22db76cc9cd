use async_trait::async_trait;
use domain::{SourceLimits, VideoEntry};
use markup::decode_entities;
use serde::Deserialize;

use crate::{FeedError, FeedPage, FeedSource, fallback_thumbnail, watch_url};

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";

/// Largest page the search endpoint will serve.
const PAGE_SIZE_CAP: usize = 50;

/// Keyed, paginated source ordered by publish date descending.
pub struct SearchApiSource {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl SearchApiSource {
    /// The credential is optional at construction so a misconfigured
    /// deployment still starts; every fetch re-checks it and fails the
    /// request instead of silently falling back to the other source.
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl FeedSource for SearchApiSource {
    async fn fetch(
        &self,
        channel_id: &str,
        page_token: Option<&str>,
        max: usize,
    ) -> Result<FeedPage, FeedError> {
        let api_key = self.api_key.as_deref().ok_or(FeedError::MissingApiKey)?;
        let page_size = max.clamp(1, PAGE_SIZE_CAP);
        let mut query: Vec<(&str, String)> = vec![
            ("key", api_key.to_owned()),
            ("channelId", channel_id.to_owned()),
            ("part", "snippet".to_owned()),
            ("order", "date".to_owned()),
            ("type", "video".to_owned()),
            ("maxResults", page_size.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_owned()));
        }
        tracing::debug!(channel_id, page_size, "querying search API");
        let response = self.client.get(SEARCH_ENDPOINT).query(&query).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_response(status, &body)
    }

    fn limits(&self) -> SourceLimits {
        SourceLimits {
            max_results: PAGE_SIZE_CAP,
            default_results: PAGE_SIZE_CAP,
            cache_max_age: 60,
        }
    }
}

/// Interprets one search API response body.
///
/// A structured `error` object wins over the transport status: the API can
/// report quota and key failures inside a 200 response.
pub(crate) fn parse_response(status: u16, body: &str) -> Result<FeedPage, FeedError> {
    let parsed: SearchListResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            // A non-JSON body on a failed transport is just the failure.
            if !(200..300).contains(&status) {
                return Err(FeedError::UpstreamStatus(status));
            }
            return Err(FeedError::Decode(err));
        }
    };
    if let Some(api_error) = parsed.error {
        return Err(FeedError::Api {
            status: api_error.code.unwrap_or(status),
            message: api_error
                .message
                .unwrap_or_else(|| "search API request failed".to_owned()),
        });
    }
    if !(200..300).contains(&status) {
        return Err(FeedError::UpstreamStatus(status));
    }
    Ok(FeedPage {
        entries: parsed.items.into_iter().filter_map(normalize_item).collect(),
        next_page_token: parsed.next_page_token,
    })
}

fn normalize_item(item: SearchItem) -> Option<VideoEntry> {
    let id = item
        .id
        .and_then(|id| id.video_id)
        .unwrap_or_default();
    let snippet = item.snippet.unwrap_or_default();
    let title = decode_entities(&snippet.title);
    if id.is_empty() || title.is_empty() {
        return None;
    }
    let thumbnail = snippet
        .thumbnails
        .and_then(pick_thumbnail)
        .unwrap_or_else(|| fallback_thumbnail(&id));
    Some(VideoEntry {
        link: watch_url(&id),
        summary: decode_entities(&snippet.description),
        published: snippet.published_at,
        id,
        title,
        thumbnail,
    })
}

/// Resolution priority: high, then medium, then default.
fn pick_thumbnail(set: ThumbnailSet) -> Option<String> {
    set.high
        .or(set.medium)
        .or(set.default)
        .map(|thumbnail| thumbnail.url)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchListResponse {
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<SearchItem>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<u16>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<SearchItemId>,
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    published_at: String,
    thumbnails: Option<ThumbnailSet>,
}

#[derive(Debug, Deserialize)]
struct ThumbnailSet {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}
