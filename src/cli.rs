//! Embeddable CLI
//!
//! The request handler being frozen belongs to the embedding
//! application, so the crate ships no binary. A host wires its builder
//! and deployer into an [`App`] and delegates its `main` here:
//!
//! ```no_run
//! use bakery::{cli, App, Builder, Config};
//! # fn handler(_: &bakery::Request) -> Result<bakery::Response, bakery::HandlerError> { unimplemented!() }
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut builder = Builder::new(handler, Config::new("example.com"));
//!     builder.define_routes(|routes| routes.get("/"));
//!
//!     let mut app = App { builder: Some(builder), deployer: None };
//!     cli::run(cli::Cli::parse_args(), &mut app)
//! }
//! ```

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::builder::Builder;
use crate::deploy::{DeployOptions, Deployer};
use crate::events::{ConsoleSink, EventSink, NdjsonSink};

/// The host-wired pipeline the CLI operates on
#[derive(Default)]
pub struct App {
    pub builder: Option<Builder>,
    pub deployer: Option<Deployer>,
}

/// Bakery - static snapshot builder and incremental deployer
#[derive(Parser, Debug)]
#[command(name = "bakery")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events instead of colored output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Parse from `std::env::args`
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render all static webpages and their assets to the build directory
    Build,

    /// Write the build directory to remote storage
    Deploy {
        /// Classify and report, but issue zero network writes
        #[arg(long)]
        dry_run: bool,

        /// Upload every file regardless of fingerprint comparison
        #[arg(long)]
        force_all: bool,
    },

    /// Build and deploy in one run
    Publish {
        /// Classify and report, but issue zero network writes
        #[arg(long)]
        dry_run: bool,

        /// Upload every file regardless of fingerprint comparison
        #[arg(long)]
        force_all: bool,
    },

    /// Delete all build files
    Clean,
}

/// Run a parsed command against the host's app
///
/// Returns an error (and the host exits non-zero) on any core failure.
pub fn run(cli: Cli, app: &mut App) -> Result<()> {
    let sink: Arc<dyn EventSink> = if cli.json {
        Arc::new(NdjsonSink::stdout())
    } else {
        Arc::new(ConsoleSink::auto(cli.verbose > 0))
    };

    if let Some(builder) = app.builder.as_mut() {
        builder.add_sink(sink.clone());
    }
    if let Some(deployer) = app.deployer.as_mut() {
        deployer.add_sink(sink.clone());
    }

    match cli.command {
        Commands::Build => builder_mut(app)?.run()?,

        Commands::Deploy { dry_run, force_all } => {
            let options = DeployOptions { dry_run, force_all };
            let summary = deployer_ref(app)?.run(options)?;
            report_summary(&summary, cli.json);
        }

        Commands::Publish { dry_run, force_all } => {
            builder_mut(app)?.run()?;
            let options = DeployOptions { dry_run, force_all };
            let summary = deployer_ref(app)?.run(options)?;
            report_summary(&summary, cli.json);
        }

        Commands::Clean => builder_mut(app)?.clean()?,
    }

    Ok(())
}

fn builder_mut(app: &mut App) -> Result<&mut Builder> {
    match app.builder.as_mut() {
        Some(builder) => Ok(builder),
        None => bail!("no builder configured - set App.builder before running"),
    }
}

fn deployer_ref(app: &App) -> Result<&Deployer> {
    match app.deployer.as_ref() {
        Some(deployer) => Ok(deployer),
        None => bail!("no deployer configured - set App.deployer before running"),
    }
}

fn report_summary(summary: &crate::deploy::DeploySummary, json: bool) {
    if json {
        if let Ok(line) = serde_json::to_string(summary) {
            println!("{line}");
        }
    } else if summary.dry_run {
        println!(
            "dry run: {} to upload, {} skipped",
            summary.uploaded, summary.skipped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_publish_flags() {
        let cli = Cli::try_parse_from(["bakery", "publish", "--dry-run", "--force-all"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Publish {
                dry_run: true,
                force_all: true
            }
        ));
    }

    #[test]
    fn json_and_verbose_are_global() {
        let cli = Cli::try_parse_from(["bakery", "build", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Build));
    }

    #[test]
    fn deploy_defaults_are_off() {
        let cli = Cli::try_parse_from(["bakery", "deploy"]).unwrap();
        match cli.command {
            Commands::Deploy { dry_run, force_all } => {
                assert!(!dry_run);
                assert!(!force_all);
            }
            _ => panic!("expected deploy"),
        }
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["bakery", "frobnicate"]).is_err());
    }

    #[test]
    fn missing_builder_is_a_clear_error() {
        let cli = Cli::try_parse_from(["bakery", "build"]).unwrap();
        let mut app = App::default();

        let err = run(cli, &mut app).unwrap_err();
        assert!(err.to_string().contains("no builder configured"));
    }

    #[test]
    fn missing_deployer_is_a_clear_error() {
        let cli = Cli::try_parse_from(["bakery", "deploy"]).unwrap();
        let mut app = App::default();

        let err = run(cli, &mut app).unwrap_err();
        assert!(err.to_string().contains("no deployer configured"));
    }
}
