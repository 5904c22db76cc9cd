use chrono::{DateTime, Utc};
use domain::{ResultEnvelope, SourceLimits, VideoEntry};

/// Clamps the caller-requested item count into the source's valid range.
///
/// Absent or non-numeric input maps to the source default; numeric input is
/// clamped into `1..=max_results`, so an oversized request caps out and a
/// non-positive one floors at a single item.
pub fn clamp_requested(raw: Option<&str>, limits: &SourceLimits) -> usize {
    match raw.and_then(|value| value.trim().parse::<i64>().ok()) {
        Some(requested) => requested.clamp(1, limits.max_results as i64) as usize,
        None => limits.default_results,
    }
}

/// Builds the response envelope: truncates to `max` preserving upstream
/// order (entries arrive reverse-chronological and are never re-sorted) and
/// counts only what survived.
pub fn assemble(
    handle: &str,
    channel_id: &str,
    mut entries: Vec<VideoEntry>,
    max: usize,
    next_page_token: Option<String>,
    updated_at: DateTime<Utc>,
) -> ResultEnvelope {
    entries.truncate(max);
    ResultEnvelope {
        handle: handle.to_owned(),
        channel_id: channel_id.to_owned(),
        updated_at,
        count: entries.len(),
        items: entries,
        next_page_token,
    }
}
