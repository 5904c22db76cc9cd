//! Lightweight extraction helpers for the bounded upstream markup.
//!
//! The feed format is small and well-known, so these are plain scanning
//! functions rather than a full XML parser. They are pure and independent of
//! any network code, which keeps them easy to test against malformed input.

/// Returns the trimmed text content of the first `<tag ...>text</tag>`
/// element in `doc`, or `None` if the tag is absent or unterminated.
///
/// Self-closing occurrences are skipped. Tag names may carry a namespace
/// prefix (`yt:videoId`, `media:description`).
pub fn tag_text<'a>(doc: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut search = 0;
    while let Some(found) = doc[search..].find(&open) {
        let rest = &doc[search + found + open.len()..];
        // The hit must be the whole tag name, not a prefix of a longer one.
        if !rest.starts_with(['>', ' ', '\t', '\r', '\n']) {
            search += found + open.len();
            continue;
        }
        let gt = rest.find('>')?;
        if rest[..gt].ends_with('/') {
            search = doc.len() - rest.len() + gt + 1;
            continue;
        }
        let body = &rest[gt + 1..];
        let end = body.find(&close)?;
        return Some(body[..end].trim());
    }
    None
}

/// Returns the value of `attr` on the first `<tag ...>` element carrying it,
/// or `None` if no such element exists.
pub fn tag_attr<'a>(doc: &'a str, tag: &str, attr: &str) -> Option<&'a str> {
    let open = format!("<{tag}");
    let needle = format!(" {attr}=\"");
    let mut search = 0;
    while let Some(found) = doc[search..].find(&open) {
        let rest = &doc[search + found + open.len()..];
        if !rest.starts_with(['>', ' ', '\t', '\r', '\n', '/']) {
            search += found + open.len();
            continue;
        }
        let gt = rest.find('>')?;
        let head = &rest[..gt];
        if let Some(at) = head.find(&needle) {
            let value = &head[at + needle.len()..];
            if let Some(quote) = value.find('"') {
                return Some(&value[..quote]);
            }
        }
        search = doc.len() - rest.len() + gt + 1;
    }
    None
}

/// Decodes the five reserved-character entities (`&amp;` `&lt;` `&gt;`
/// `&quot;` `&#39;`) in a single left-to-right pass.
///
/// A replaced occurrence is never rescanned, so `&amp;lt;` decodes one level
/// to `&lt;` and a string without entities passes through unchanged.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let (decoded, len) = if tail.starts_with("&amp;") {
            ("&", 5)
        } else if tail.starts_with("&lt;") {
            ("<", 4)
        } else if tail.starts_with("&gt;") {
            (">", 4)
        } else if tail.starts_with("&quot;") {
            ("\"", 6)
        } else if tail.starts_with("&#39;") {
            ("'", 5)
        } else {
            ("&", 1)
        };
        out.push_str(decoded);
        rest = &tail[len..];
    }
    out.push_str(rest);
    out
}
