use async_trait::async_trait;
use domain::{SourceLimits, VideoEntry};
use markup::{decode_entities, tag_attr, tag_text};
use reqwest::header;

use crate::{FeedError, FeedPage, FeedSource, fallback_thumbnail, watch_url};

/// Unauthenticated source backed by the public uploads feed.
///
/// The feed has no pagination and returns its natural item count; the
/// assembler bounds the result afterwards.
pub struct SyndicationSource {
    client: reqwest::Client,
}

impl SyndicationSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn feed_url(channel_id: &str) -> String {
        format!("https://www.youtube.com/feeds/videos.xml?channel_id={channel_id}")
    }
}

#[async_trait]
impl FeedSource for SyndicationSource {
    async fn fetch(
        &self,
        channel_id: &str,
        _page_token: Option<&str>,
        _max: usize,
    ) -> Result<FeedPage, FeedError> {
        let url = Self::feed_url(channel_id);
        tracing::debug!(%url, "fetching syndication feed");
        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, "Mozilla/5.0")
            .header(header::ACCEPT, "application/xml,text/xml,*/*")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UpstreamStatus(status.as_u16()));
        }
        let xml = response.text().await?;
        Ok(FeedPage {
            entries: parse_feed(&xml),
            next_page_token: None,
        })
    }

    fn limits(&self) -> SourceLimits {
        SourceLimits {
            max_results: 100,
            default_results: 30,
            cache_max_age: 300,
        }
    }
}

/// Splits the feed body into `<entry>` chunks and normalizes each one.
/// Entries missing an id or title are dropped.
pub(crate) fn parse_feed(xml: &str) -> Vec<VideoEntry> {
    xml.split("<entry>").skip(1).filter_map(parse_entry).collect()
}

fn parse_entry(chunk: &str) -> Option<VideoEntry> {
    let id = tag_text(chunk, "yt:videoId").unwrap_or_default();
    let title = decode_entities(tag_text(chunk, "title").unwrap_or_default());
    if id.is_empty() || title.is_empty() {
        return None;
    }
    let published = tag_text(chunk, "published").unwrap_or_default().to_owned();
    let link = tag_attr(chunk, "link", "href")
        .map(str::to_owned)
        .unwrap_or_else(|| watch_url(id));
    // The richer media description is preferred; an empty element falls
    // back to the plain summary, matching how absent elements behave.
    let summary_source = tag_text(chunk, "media:description")
        .filter(|text| !text.is_empty())
        .or_else(|| tag_text(chunk, "summary"))
        .unwrap_or_default();
    Some(VideoEntry {
        id: id.to_owned(),
        title,
        published,
        link,
        thumbnail: fallback_thumbnail(id),
        summary: decode_entities(summary_source),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/">
  <title>Uploads from Some Creator</title>
  <entry>
    <id>yt:video:vid-one-123</id>
    <yt:videoId>vid-one-123</yt:videoId>
    <title>First &amp; Best</title>
    <link rel="alternate" href="https://youtu.be/vid-one-123"/>
    <published>2024-05-30T08:00:00+00:00</published>
    <media:group>
      <media:description>Long form &quot;description&quot;</media:description>
    </media:group>
  </entry>
  <entry>
    <yt:videoId>vid-two-456</yt:videoId>
    <title>Second</title>
    <published>2024-05-28T08:00:00+00:00</published>
    <summary>Short summary</summary>
  </entry>
  <entry>
    <yt:videoId></yt:videoId>
    <title>Orphaned</title>
  </entry>
</feed>"#;

    #[test]
    fn parses_entries_in_document_order() {
        let entries = parse_feed(FEED);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "vid-one-123");
        assert_eq!(entries[1].id, "vid-two-456");
    }

    #[test]
    fn decodes_title_entities() {
        let entries = parse_feed(FEED);
        assert_eq!(entries[0].title, "First & Best");
    }

    #[test]
    fn prefers_explicit_link() {
        let entries = parse_feed(FEED);
        assert_eq!(entries[0].link, "https://youtu.be/vid-one-123");
    }

    #[test]
    fn derives_link_when_absent() {
        let entries = parse_feed(FEED);
        assert_eq!(entries[1].link, "https://www.youtube.com/watch?v=vid-two-456");
    }

    #[test]
    fn summary_falls_back_when_description_missing() {
        let entries = parse_feed(FEED);
        assert_eq!(entries[0].summary, "Long form \"description\"");
        assert_eq!(entries[1].summary, "Short summary");
    }

    #[test]
    fn thumbnail_derived_from_id() {
        let entries = parse_feed(FEED);
        assert_eq!(
            entries[0].thumbnail,
            "https://i.ytimg.com/vi/vid-one-123/hqdefault.jpg"
        );
    }

    #[test]
    fn entry_with_empty_id_is_dropped() {
        let entries = parse_feed(FEED);
        assert!(entries.iter().all(|entry| entry.title != "Orphaned"));
    }

    #[test]
    fn entry_with_missing_title_is_dropped() {
        let xml = "<feed><entry><yt:videoId>vid</yt:videoId></entry></feed>";
        assert!(parse_feed(xml).is_empty());
    }

    #[test]
    fn empty_feed_yields_no_entries() {
        assert!(parse_feed("<feed><title>empty</title></feed>").is_empty());
    }

    #[test]
    fn malformed_chunks_do_not_panic() {
        let xml = "<entry><yt:videoId>ok</yt:videoId><title>unterminated";
        assert!(parse_feed(xml).is_empty());
    }
}
