//! Incremental deployer
//!
//! Walks the built tree, fingerprints each file, and uploads only what
//! changed since the last deploy - decided by comparing local
//! fingerprints against a listing fetched once from the remote storage
//! client at the start of the run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::error::{BakeryError, BakeryResult};
use crate::events::{Event, EventBus, EventSink, SkipReason};
use crate::fingerprint::{cache_control_for, Fingerprint};
use crate::fs::walk_files;
use crate::mime;
use crate::redirect;

/// Error type for storage clients (boxed, collaborator-defined)
pub type StorageError = Box<dyn std::error::Error + Send + Sync>;

/// One object currently in remote storage
#[derive(Debug, Clone)]
pub struct RemoteObject {
    pub key: String,
    /// Content fingerprint in `sha256:<hex>` form
    pub fingerprint: String,
}

/// Properties attached to an uploaded object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectProperties {
    pub acl: String,
    pub content_type: String,
    pub cache_control: String,
    /// Set when the body is a persisted redirect document; the target
    /// should serve a redirect instead of the body
    pub redirect_location: Option<String>,
}

/// The remote storage the deployer writes to
///
/// Transport concerns (credentials, timeouts, retries) belong to the
/// implementor; the core never retries.
pub trait StorageClient: Send + Sync {
    /// List every object currently stored, with its fingerprint
    fn list_objects(&self) -> Result<Vec<RemoteObject>, StorageError>;

    /// Store an object
    fn put_object(
        &self,
        key: &str,
        body: &[u8],
        properties: &ObjectProperties,
    ) -> Result<(), StorageError>;
}

/// Key -> fingerprint lookup table, rebuilt fresh each run
#[derive(Debug, Default)]
pub struct RemoteIndex {
    fingerprints: HashMap<String, String>,
}

impl RemoteIndex {
    /// Build the index from a remote listing
    pub fn from_listing(objects: Vec<RemoteObject>) -> Self {
        Self {
            fingerprints: objects
                .into_iter()
                .map(|object| (object.key, object.fingerprint))
                .collect(),
        }
    }

    /// Fingerprint recorded for a key, if the object exists remotely
    pub fn fingerprint(&self, key: &str) -> Option<&str> {
        self.fingerprints.get(key).map(String::as_str)
    }

    /// Whether a local fingerprint matches the stored one
    ///
    /// Absence of a remote entry counts as changed.
    pub fn is_unchanged(&self, key: &str, local: &Fingerprint) -> bool {
        self.fingerprint(key)
            .is_some_and(|remote| local.matches_str(remote))
    }
}

/// Options for a single deploy run
#[derive(Debug, Clone, Copy, Default)]
pub struct DeployOptions {
    /// Perform all decisioning but skip network writes
    pub dry_run: bool,
    /// Upload every eligible file regardless of fingerprints
    pub force_all: bool,
}

/// Result of a deploy run
#[derive(Debug, Clone, Serialize)]
pub struct DeploySummary {
    /// Files uploaded (or that would have been, under dry-run)
    pub uploaded: usize,
    /// Files skipped as ignored or unchanged
    pub skipped: usize,
    pub dry_run: bool,
}

/// Uploads changed files from the build root to remote storage
pub struct Deployer {
    source_dir: PathBuf,
    ignored_filenames: Vec<String>,
    charset_utf8: bool,
    client: Box<dyn StorageClient>,
    events: EventBus,
}

impl Deployer {
    /// Create a deployer over the configured build root
    pub fn new(client: impl StorageClient + 'static, config: &Config) -> Self {
        Self {
            source_dir: config.build_dir.clone(),
            ignored_filenames: config.ignored_filenames.clone(),
            charset_utf8: config.charset_utf8,
            client: Box::new(client),
            events: EventBus::new(),
        }
    }

    /// Register an event sink
    pub fn add_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.events.add_sink(sink);
    }

    /// Deploy the build root
    pub fn run(&self, options: DeployOptions) -> BakeryResult<DeploySummary> {
        if !self.source_dir.is_dir() {
            return Err(BakeryError::DirectoryMissing {
                path: self.source_dir.clone(),
            });
        }

        self.events.emit(Event::DeployStarted);

        // fetched once; never refreshed mid-run
        let index = RemoteIndex::from_listing(
            self.client
                .list_objects()
                .map_err(|e| BakeryError::Storage {
                    message: e.to_string(),
                })?,
        );

        let mut summary = DeploySummary {
            uploaded: 0,
            skipped: 0,
            dry_run: options.dry_run,
        };

        for relative in walk_files(&self.source_dir)? {
            if self.ignored(&relative) {
                summary.skipped += 1;
                self.events.emit(Event::FileSkipped {
                    path: relative,
                    reason: SkipReason::Ignored,
                });
                continue;
            }

            let key = object_key(&relative);
            let content = std::fs::read(self.source_dir.join(&relative))?;
            let fingerprint = Fingerprint::from_bytes(&content);

            if !options.force_all && index.is_unchanged(&key, &fingerprint) {
                summary.skipped += 1;
                self.events.emit(Event::FileSkipped {
                    path: relative,
                    reason: SkipReason::Unchanged,
                });
                continue;
            }

            let properties = self.classify(&key, &content);
            if !options.dry_run {
                self.client
                    .put_object(&key, &content, &properties)
                    .map_err(|e| BakeryError::Storage {
                        message: e.to_string(),
                    })?;
            }

            summary.uploaded += 1;
            self.events.emit(Event::FileDeployed { path: relative });
        }

        self.events.emit(Event::DeployFinished {
            uploaded: summary.uploaded,
            skipped: summary.skipped,
        });

        Ok(summary)
    }

    fn ignored(&self, relative: &Path) -> bool {
        let Some(basename) = relative.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        self.ignored_filenames.iter().any(|name| name == basename)
    }

    fn classify(&self, key: &str, content: &[u8]) -> ObjectProperties {
        ObjectProperties {
            acl: "public-read".to_string(),
            content_type: mime::content_type_for(key, self.charset_utf8),
            cache_control: cache_control_for(key).to_string(),
            redirect_location: redirect::parse_location(content),
        }
    }
}

/// Object key for a path relative to the build root
///
/// Always `/`-separated, regardless of platform.
fn object_key(relative: &Path) -> String {
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
