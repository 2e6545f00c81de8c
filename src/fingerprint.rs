//! Content fingerprints and cache policy
//!
//! A [`Fingerprint`] is an immutable content hash used to decide
//! whether a file's bytes changed since the last deploy. Remote
//! listings must report fingerprints in the same `sha256:<hex>` form;
//! comparison is exact string match.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Cache-control for filenames that embed a content hash (~1 year)
pub const CACHE_CONTROL_FOREVER: &str = "public,max-age=31556926";

/// Cache-control for everything else (~10 seconds)
pub const CACHE_CONTROL_SHORT: &str = "public,max-age=10";

// Unanchored on purpose: the heuristic matches a bare 16-hex run
// anywhere in the basename, false positives included.
static FINGERPRINTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[0-9a-f]{16}").expect("static pattern"));

/// Content fingerprint value object
///
/// Wraps a SHA-256 hash with the `sha256:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Prefix for SHA-256 fingerprints
    pub const PREFIX: &'static str = "sha256:";

    /// Compute the fingerprint of raw content
    pub fn from_bytes(content: &[u8]) -> Self {
        use sha2::{Digest, Sha256};
        let hash = Sha256::digest(content);
        Self(format!("{}{:x}", Self::PREFIX, hash))
    }

    /// Get the full fingerprint string with prefix
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check against a fingerprint string from a remote listing
    pub fn matches_str(&self, s: &str) -> bool {
        self.0 == s
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Test whether a key's basename looks like it embeds a content hash
///
/// Fingerprinted files are safe to cache effectively forever because a
/// content change produces a new name.
pub fn is_fingerprinted(key: &str) -> bool {
    let basename = key.rsplit('/').next().unwrap_or(key);
    FINGERPRINTED.is_match(basename)
}

/// Cache-control header value for an object key
pub fn cache_control_for(key: &str) -> &'static str {
    if is_fingerprinted(key) {
        CACHE_CONTROL_FOREVER
    } else {
        CACHE_CONTROL_SHORT
    }
}
