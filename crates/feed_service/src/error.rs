use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use feed::FeedError;
use resolver::ResolveError;
use serde_json::json;
use thiserror::Error;

/// Request-boundary error: everything the pipeline can fail with, converted
/// into the JSON failure body in one place. Nothing escapes unhandled.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Response status and the upstream status to embed in the body.
    ///
    /// Feed failures mirror the upstream status; resolution and
    /// configuration failures answer 500 with the upstream status (when
    /// known) carried in the body only.
    fn status_codes(&self) -> (StatusCode, Option<u16>) {
        match self {
            ServiceError::Resolve(ResolveError::FetchFailed { status }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, *status)
            }
            ServiceError::Resolve(ResolveError::NoPatternMatched) => {
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
            ServiceError::Feed(FeedError::UpstreamStatus(status)) => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                Some(*status),
            ),
            ServiceError::Feed(FeedError::Api { status, .. }) => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                Some(*status),
            ),
            ServiceError::Feed(FeedError::MissingApiKey) => {
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
            ServiceError::Feed(_) | ServiceError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, upstream) = self.status_codes();
        tracing::warn!(error = %self, response_status = status.as_u16(), "request failed");
        let mut body = json!({ "error": self.to_string() });
        if let Some(code) = upstream {
            body["status"] = code.into();
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_fetch_failure_is_500_with_upstream_in_body() {
        let error = ServiceError::from(ResolveError::FetchFailed { status: Some(404) });
        let (status, upstream) = error.status_codes();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream, Some(404));
    }

    #[test]
    fn feed_failure_mirrors_upstream_status() {
        let error = ServiceError::from(FeedError::UpstreamStatus(503));
        let (status, upstream) = error.status_codes();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(upstream, Some(503));
    }

    #[test]
    fn api_error_mirrors_reported_status() {
        let error = ServiceError::from(FeedError::Api {
            status: 403,
            message: "quotaExceeded".to_owned(),
        });
        let (status, upstream) = error.status_codes();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(upstream, Some(403));
    }

    #[test]
    fn missing_credential_is_500() {
        let error = ServiceError::from(FeedError::MissingApiKey);
        let (status, upstream) = error.status_codes();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream, None);
        assert!(error.to_string().contains("YOUTUBE_API_KEY"));
    }

    #[test]
    fn no_pattern_matched_is_500() {
        let error = ServiceError::from(ResolveError::NoPatternMatched);
        let (status, _) = error.status_codes();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
