//! Console event sink
//!
//! One line per interesting event, colored when stdout is a terminal.
//! Lifecycle chatter is gated behind verbose mode; route outcomes and
//! uploads always print.

use crossterm::style::Stylize;
use is_terminal::IsTerminal;

use super::{Event, EventSink};

/// Event sink that reports progress on stdout
pub struct ConsoleSink {
    verbose: bool,
    color: bool,
}

impl ConsoleSink {
    /// Create a sink, detecting color support from stdout
    pub fn auto(verbose: bool) -> Self {
        Self {
            verbose,
            color: std::io::stdout().is_terminal(),
        }
    }

    /// Create a sink with explicit color behavior (for testing)
    pub fn with_color(verbose: bool, color: bool) -> Self {
        Self { verbose, color }
    }

    fn debug(&self, line: String) {
        if self.verbose {
            println!("{line}");
        }
    }

    fn paint(&self, color: Color, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        match color {
            Color::Green => text.green().to_string(),
            Color::Red => text.red().to_string(),
            Color::Yellow => text.yellow().to_string(),
        }
    }
}

enum Color {
    Green,
    Red,
    Yellow,
}

impl EventSink for ConsoleSink {
    fn on_event(&self, event: &Event) {
        match event {
            Event::BuildStarted => self.debug(self.paint(Color::Yellow, "Build started")),
            Event::BuildFinished { route_count } => self.debug(format!(
                "{} {route_count} routes",
                self.paint(Color::Yellow, "Built")
            )),
            Event::CleanStarted => self.debug(self.paint(Color::Yellow, "Clean started")),
            Event::CleanFinished => self.debug(self.paint(Color::Yellow, "Clean finished")),

            Event::DirectoryMirrored {
                source,
                destination,
            } => self.debug(format!(
                "{} {} -> {}",
                self.paint(Color::Yellow, "Directory copied"),
                source.display(),
                destination.display()
            )),

            Event::RouteRequested { route, response } => {
                let color = if response.status == route.expected_status {
                    Color::Green
                } else {
                    Color::Red
                };
                println!(
                    "{} {}",
                    self.paint(color, &response.status.to_string()),
                    route.path
                );
            }

            Event::DeployStarted => self.debug(self.paint(Color::Yellow, "Deploy started")),
            Event::DeployFinished { uploaded, skipped } => self.debug(format!(
                "{} {uploaded} uploaded, {skipped} skipped",
                self.paint(Color::Yellow, "Deploy finished")
            )),

            Event::FileSkipped { path, reason } => {
                // skips are the common case; only worth a line in verbose mode
                self.debug(format!(
                    "{}  {} ({})",
                    self.paint(Color::Yellow, "Skipped"),
                    path.display(),
                    reason.as_str()
                ));
            }

            Event::FileDeployed { path } => {
                println!("{} {}", self.paint(Color::Green, "Uploaded"), path.display());
            }
        }
    }
}
