use std::env;
use thiserror::Error;

/// Which upstream feed source serves this deployment.
///
/// Chosen once from configuration; there is no runtime fallback between
/// sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Syndication,
    SearchApi,
}

impl SourceKind {
    /// Parses the `FEED_SOURCE` setting. Unrecognized values yield `None`
    /// so the caller can log and apply the default explicitly.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "syndication" | "rss" | "feed" => Some(SourceKind::Syndication),
            "search-api" | "search_api" | "api" => Some(SourceKind::SearchApi),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CHANNEL_HANDLE is not set")]
    MissingHandle,
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Creator handle this deployment serves (leading `@` accepted).
    pub channel_handle: String,
    /// Which feed source to use.
    pub source: SourceKind,
    /// Search API credential; checked per request by the search API source.
    pub api_key: Option<String>,
    /// HTTP server port.
    pub server_port: u16,
    /// Channel identifier cache TTL in seconds.
    pub cache_ttl_secs: u64,
    /// How many candidate documents the resolver may try.
    pub resolve_attempts: usize,
    /// Outbound request timeout in seconds.
    pub http_timeout_secs: u64,
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// # Environment Variables
    /// - `CHANNEL_HANDLE` - creator handle to serve (required)
    /// - `FEED_SOURCE` - `syndication` (default) or `search-api`
    /// - `YOUTUBE_API_KEY` - credential for the search API source
    /// - `SERVER_PORT` - HTTP port (default: 3000)
    /// - `CHANNEL_CACHE_TTL` - identifier cache TTL seconds (default: 3600)
    /// - `RESOLVE_ATTEMPTS` - resolver document attempts (default: 2)
    /// - `HTTP_TIMEOUT` - outbound timeout seconds (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let channel_handle = env::var("CHANNEL_HANDLE")
            .ok()
            .map(|handle| handle.trim().trim_start_matches('@').to_owned())
            .filter(|handle| !handle.is_empty())
            .ok_or(ConfigError::MissingHandle)?;

        let source = match env::var("FEED_SOURCE") {
            Ok(raw) => SourceKind::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unrecognized FEED_SOURCE, using syndication");
                SourceKind::Syndication
            }),
            Err(_) => SourceKind::Syndication,
        };

        Ok(Self {
            channel_handle,
            source,
            api_key: env::var("YOUTUBE_API_KEY").ok().filter(|key| !key.is_empty()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(3000),
            cache_ttl_secs: env::var("CHANNEL_CACHE_TTL")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(3600),
            resolve_attempts: env::var("RESOLVE_ATTEMPTS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(2),
            http_timeout_secs: env::var("HTTP_TIMEOUT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(10),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_syndication_aliases() {
        assert_eq!(SourceKind::parse("syndication"), Some(SourceKind::Syndication));
        assert_eq!(SourceKind::parse("RSS"), Some(SourceKind::Syndication));
        assert_eq!(SourceKind::parse(" feed "), Some(SourceKind::Syndication));
    }

    #[test]
    fn parses_search_api_aliases() {
        assert_eq!(SourceKind::parse("search-api"), Some(SourceKind::SearchApi));
        assert_eq!(SourceKind::parse("SEARCH_API"), Some(SourceKind::SearchApi));
        assert_eq!(SourceKind::parse("api"), Some(SourceKind::SearchApi));
    }

    #[test]
    fn rejects_unknown_source() {
        assert_eq!(SourceKind::parse("graphql"), None);
        assert_eq!(SourceKind::parse(""), None);
    }
}
