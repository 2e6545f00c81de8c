//! Lifecycle events and sinks
//!
//! Both pipelines publish typed events to registered sinks instead of
//! logging directly. Sinks must do bounded work per event; they are
//! invoked inline on the producing thread.

mod console;
mod json;

pub use console::ConsoleSink;
pub use json::NdjsonSink;

use std::path::PathBuf;
use std::sync::Arc;

use crate::handler::Response;
use crate::routes::Route;

/// Why the deployer skipped a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Basename matched an ignored filename
    Ignored,
    /// Local fingerprint equals the remote fingerprint
    Unchanged,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Event emitted during build and deploy runs
#[derive(Debug, Clone)]
pub enum Event {
    /// Build started
    BuildStarted,

    /// Build completed successfully
    BuildFinished { route_count: usize },

    /// Clean started
    CleanStarted,

    /// Clean completed
    CleanFinished,

    /// Public assets were mirrored into the build root
    DirectoryMirrored {
        source: PathBuf,
        destination: PathBuf,
    },

    /// A route's response was captured (published before status
    /// validation, so observers see failures too)
    RouteRequested { route: Route, response: Response },

    /// Deploy started
    DeployStarted,

    /// Deploy completed
    DeployFinished { uploaded: usize, skipped: usize },

    /// A file was skipped during deploy
    FileSkipped { path: PathBuf, reason: SkipReason },

    /// A file was uploaded (or would have been, under dry-run)
    FileDeployed { path: PathBuf },
}

/// Trait for receiving pipeline events
pub trait EventSink: Send + Sync {
    /// Handle an event
    fn on_event(&self, event: &Event);
}

/// No-op event sink for silent operation
pub struct NoopSink;

impl EventSink for NoopSink {
    fn on_event(&self, _event: &Event) {
        // Do nothing
    }
}

/// Fan-out over registered sinks
#[derive(Clone, Default)]
pub struct EventBus {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink
    pub fn add_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Deliver an event to every registered sink, in registration order
    pub fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.on_event(&event);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Test sink that records every event it sees
    pub struct RecordingSink {
        pub events: Arc<Mutex<Vec<Event>>>,
    }

    impl RecordingSink {
        pub fn new() -> (Arc<Self>, Arc<Mutex<Vec<Event>>>) {
            let events = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::new(Self {
                events: events.clone(),
            });
            (sink, events)
        }
    }

    impl EventSink for RecordingSink {
        fn on_event(&self, event: &Event) {
            self.events.lock().unwrap().push(event.clone());
        }
    }
}
