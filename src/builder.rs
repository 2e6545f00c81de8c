//! Snapshot builder
//!
//! Drives every declared route through the abstract request handler
//! and writes the captured bodies (or synthetic redirect documents)
//! into the build root. A single status mismatch fails the whole
//! build: a broken page must never ship silently.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{BakeryError, BakeryResult};
use crate::events::{Event, EventBus, EventSink};
use crate::fs::{mirror_into, SafeWriter};
use crate::handler::{Request, RequestHandler, Response};
use crate::redirect;
use crate::routes::{Route, RouteSet, Routes};

/// Builds a frozen file tree from the declared routes
pub struct Builder {
    app: Box<dyn RequestHandler>,
    config: Config,
    routes: RouteSet,
    writer: SafeWriter,
    events: EventBus,
}

impl Builder {
    /// Create a builder around an application handler
    pub fn new(app: impl RequestHandler + 'static, config: Config) -> Self {
        let writer = SafeWriter::new(&config.build_dir);
        Self {
            app: Box::new(app),
            config,
            routes: RouteSet::new(),
            writer,
            events: EventBus::new(),
        }
    }

    /// Register an event sink
    pub fn add_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.events.add_sink(sink);
    }

    /// Register a route source
    ///
    /// Sources run on first resolution, not at registration, so
    /// declarations may depend on host state that isn't ready yet.
    pub fn define_routes<F>(&mut self, source: F)
    where
        F: FnOnce(&mut Routes) + 'static,
    {
        self.routes.register(source);
    }

    /// Build the snapshot
    ///
    /// Mirrors the public assets directory (if configured), then
    /// resolves and builds every route in declaration order.
    pub fn run(&mut self) -> BakeryResult<()> {
        self.events.emit(Event::BuildStarted);

        if let Some(public_dir) = self.config.public_dir.clone() {
            mirror_into(&public_dir, &self.config.build_dir)?;
            self.events.emit(Event::DirectoryMirrored {
                source: public_dir,
                destination: self.config.build_dir.clone(),
            });
        }

        let routes: Vec<Route> = self
            .routes
            .resolve(&self.config.index_filename)
            .to_vec();

        for route in &routes {
            self.build_route(route)?;
        }

        self.events.emit(Event::BuildFinished {
            route_count: routes.len(),
        });
        Ok(())
    }

    /// Remove the build root recursively; idempotent
    pub fn clean(&self) -> BakeryResult<()> {
        self.events.emit(Event::CleanStarted);

        match std::fs::remove_dir_all(&self.config.build_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        self.events.emit(Event::CleanFinished);
        Ok(())
    }

    fn build_route(&self, route: &Route) -> BakeryResult<()> {
        let response = self.request_route(route)?;

        if matches!(response.status, 301 | 302) {
            let location = response.header("location").ok_or_else(|| {
                BakeryError::RedirectMissingLocation {
                    path: route.path.clone(),
                }
            })?;
            self.writer
                .write(&route.output_path, redirect::render(location).as_bytes())?;
        } else {
            if response.status != route.expected_status {
                return Err(BakeryError::UnexpectedStatusCode {
                    path: route.path.clone(),
                    actual: response.status,
                    expected: route.expected_status,
                });
            }
            self.writer.write(&route.output_path, &response.body)?;
        }

        Ok(())
    }

    fn request_route(&self, route: &Route) -> BakeryResult<Response> {
        let request = Request::get(&self.config.domain, &route.path, route.headers.clone());

        let response =
            self.app
                .call(&request)
                .map_err(|e| BakeryError::HandlerFailed {
                    path: route.path.clone(),
                    message: e.to_string(),
                })?;

        // published before status validation so observers can log the
        // outcome regardless of success
        self.events.emit(Event::RouteRequested {
            route: route.clone(),
            response: response.clone(),
        });

        Ok(response)
    }
}
