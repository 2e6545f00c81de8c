//! Bakery - static snapshot builder and incremental deployer
//!
//! Bakery turns a dynamically-served application into a frozen,
//! file-based snapshot, then synchronizes that snapshot to remote
//! storage uploading only what changed. The application itself is
//! modeled abstractly: the host supplies a [`RequestHandler`] the
//! builder calls once per declared route, and a [`StorageClient`]
//! the deployer uploads through.

pub mod builder;
pub mod cli;
pub mod config;
pub mod deploy;
pub mod error;
pub mod events;
pub mod fingerprint;
pub mod fs;
pub mod handler;
pub mod mime;
pub mod redirect;
pub mod routes;
pub mod terraform;

// Re-exports for convenience
pub use builder::Builder;
pub use cli::App;
pub use config::Config;
pub use deploy::{
    DeployOptions, DeploySummary, Deployer, ObjectProperties, RemoteIndex, RemoteObject,
    StorageClient, StorageError,
};
pub use error::{BakeryError, BakeryResult};
pub use events::{ConsoleSink, Event, EventBus, EventSink, NdjsonSink, NoopSink};
pub use fingerprint::{cache_control_for, is_fingerprinted, Fingerprint};
pub use handler::{HandlerError, Request, RequestHandler, Response};
pub use routes::{Route, RouteOptions, RouteSet, Routes};
pub use terraform::{resolve_bucket, OutputLookup, TerraformOutputs};
