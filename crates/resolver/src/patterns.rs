use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered extraction patterns for the channel identifier.
///
/// Structured fields are tried before the loose token scan: the loose scan
/// matches any identifier-shaped substring anywhere in the document and so
/// risks picking up an unrelated channel (a recommendation, a comment
/// author). First match wins.
static CHANNEL_ID_PATTERNS: Lazy<[Regex; 5]> = Lazy::new(|| {
    [
        // Dedicated identifier field in the embedded page data.
        Regex::new(r#""channelId":"(UC[0-9A-Za-z_-]{22})""#).expect("channelId pattern"),
        // Explicit browse/external id field.
        Regex::new(r#""externalId":"(UC[0-9A-Za-z_-]{22})""#).expect("externalId pattern"),
        // Meta tag carrying the identifier.
        Regex::new(r#"<meta[^>]*itemprop="(?:channelId|identifier)"[^>]*content="(UC[0-9A-Za-z_-]{22})""#)
            .expect("meta pattern"),
        // Canonical channel URL embedded anywhere in the document.
        Regex::new(r#"youtube\.com/channel/(UC[0-9A-Za-z_-]{22})"#).expect("canonical URL pattern"),
        // Last resort: any identifier-shaped token.
        Regex::new(r"(UC[0-9A-Za-z_-]{22})").expect("loose pattern"),
    ]
});

/// Runs the pattern list against a fetched document, in priority order.
pub fn extract_channel_id(doc: &str) -> Option<String> {
    CHANNEL_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(doc)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_A: &str = "UCaaaaaaaaaaaaaaaaaaaaaa";
    const ID_B: &str = "UCbbbbbbbbbbbbbbbbbbbbbb";

    #[test]
    fn extracts_channel_id_field() {
        let doc = format!(r#"<script>var x = {{"channelId":"{ID_A}"}};</script>"#);
        assert_eq!(extract_channel_id(&doc), Some(ID_A.to_string()));
    }

    #[test]
    fn extracts_external_id_field() {
        let doc = format!(r#"{{"header":{{"externalId":"{ID_A}"}}}}"#);
        assert_eq!(extract_channel_id(&doc), Some(ID_A.to_string()));
    }

    #[test]
    fn extracts_meta_tag() {
        let doc = format!(r#"<meta itemprop="identifier" content="{ID_A}">"#);
        assert_eq!(extract_channel_id(&doc), Some(ID_A.to_string()));
    }

    #[test]
    fn extracts_canonical_url() {
        let doc = format!(r#"<link rel="canonical" href="https://www.youtube.com/channel/{ID_A}">"#);
        assert_eq!(extract_channel_id(&doc), Some(ID_A.to_string()));
    }

    #[test]
    fn loose_scan_matches_bare_token() {
        let doc = format!("<yt:channelId>{ID_A}</yt:channelId>");
        assert_eq!(extract_channel_id(&doc), Some(ID_A.to_string()));
    }

    #[test]
    fn structured_field_beats_loose_token() {
        // A loose token appears first in the document; the structured field
        // must still win because pattern order is a priority, not position.
        let doc = format!(r#"stray {ID_B} then {{"channelId":"{ID_A}"}}"#);
        assert_eq!(extract_channel_id(&doc), Some(ID_A.to_string()));
    }

    #[test]
    fn external_id_beats_canonical_url() {
        let doc = format!(
            r#"<link href="https://www.youtube.com/channel/{ID_B}">{{"externalId":"{ID_A}"}}"#
        );
        assert_eq!(extract_channel_id(&doc), Some(ID_A.to_string()));
    }

    #[test]
    fn rejects_wrong_shape() {
        assert_eq!(extract_channel_id(r#"{"channelId":"notAChannel"}"#), None);
        assert_eq!(extract_channel_id("UCtooshort"), None);
        assert_eq!(extract_channel_id(""), None);
    }
}
