//! NDJSON event sink
//!
//! Outputs one JSON object per event for CI and automation.

use std::io::{self, Write};
use std::sync::Mutex;

use super::{Event, EventSink};

/// Event sink that writes NDJSON events
pub struct NdjsonSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl NdjsonSink {
    /// Create a sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl EventSink for NdjsonSink {
    fn on_event(&self, event: &Event) {
        let json = match event {
            Event::BuildStarted => serde_json::json!({
                "event": "build_started",
            }),

            Event::BuildFinished { route_count } => serde_json::json!({
                "event": "build_finished",
                "route_count": route_count,
            }),

            Event::CleanStarted => serde_json::json!({
                "event": "clean_started",
            }),

            Event::CleanFinished => serde_json::json!({
                "event": "clean_finished",
            }),

            Event::DirectoryMirrored {
                source,
                destination,
            } => serde_json::json!({
                "event": "directory_mirrored",
                "source": source.display().to_string(),
                "destination": destination.display().to_string(),
            }),

            Event::RouteRequested { route, response } => serde_json::json!({
                "event": "route_requested",
                "path": route.path,
                "status": response.status,
                "expected_status": route.expected_status,
                "output_path": route.output_path.display().to_string(),
            }),

            Event::DeployStarted => serde_json::json!({
                "event": "deploy_started",
            }),

            Event::DeployFinished { uploaded, skipped } => serde_json::json!({
                "event": "deploy_finished",
                "uploaded": uploaded,
                "skipped": skipped,
            }),

            Event::FileSkipped { path, reason } => serde_json::json!({
                "event": "file_skipped",
                "path": path.display().to_string(),
                "reason": reason.as_str(),
            }),

            Event::FileDeployed { path } => serde_json::json!({
                "event": "file_deployed",
                "path": path.display().to_string(),
            }),
        };

        self.write_event(json);
    }
}
