//! Synthetic redirect documents
//!
//! When a route responds 301/302 the builder persists a small HTML
//! document instead of the body. The deployer later re-reads that
//! exact shape to decide whether an object should carry a redirect
//! location instead of being served as content. Writer and reader
//! share the one template below so the two sides can never drift.

/// Everything before the redirect target
const PREFIX: &str = "<html><body>You are being <a href=\"";

/// Everything after the redirect target
const SUFFIX: &str = "\">redirected</a>.</body></html>";

/// Render the redirect document for a target location
pub fn render(location: &str) -> String {
    format!("{PREFIX}{location}{SUFFIX}")
}

/// Recover the redirect target from a persisted file body
///
/// Returns `None` for any body that is not exactly the rendered
/// template, including non-UTF-8 content.
pub fn parse_location(body: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(body).ok()?;
    let location = text.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
    if location.is_empty() {
        return None;
    }
    Some(location.to_string())
}
