//! Declared routes and lazy route sources
//!
//! Routes are declared through registration closures that only run
//! when the route list is resolved. The two-phase shape exists so
//! declaration code that depends on late-bound host state (a router
//! that isn't fully initialized when the builder is constructed) can
//! run after that state is ready. Resolution happens once; the merged
//! list is memoized for the builder's lifetime.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// A declared request path the builder resolves into an output file
#[derive(Debug, Clone)]
pub struct Route {
    /// Request path, optionally carrying a query string
    pub path: String,
    /// Status the response must carry (unless it redirects)
    pub expected_status: u16,
    /// Extra request headers for this route
    pub headers: BTreeMap<String, String>,
    /// Output file path relative to the build root; never empty
    pub output_path: PathBuf,
}

impl Route {
    /// Declare a route expecting a 200 with the default output path
    pub fn get(path: &str, index_filename: &str) -> Self {
        Self::with_options(path, index_filename, RouteOptions::default())
    }

    /// Declare a route with explicit options
    pub fn with_options(path: &str, index_filename: &str, options: RouteOptions) -> Self {
        let output_path = options
            .output_path
            .unwrap_or_else(|| default_output_path(path, index_filename));

        Self {
            path: path.to_string(),
            expected_status: options.expected_status,
            headers: options.headers,
            output_path,
        }
    }
}

/// Options for a route declaration, with documented defaults
#[derive(Debug, Clone)]
pub struct RouteOptions {
    /// Expected response status (default: 200)
    pub expected_status: u16,
    /// Extra request headers (default: none)
    pub headers: BTreeMap<String, String>,
    /// Explicit output path; defaults to the route path, with the index
    /// filename appended when the path ends in `/`
    pub output_path: Option<PathBuf>,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            expected_status: 200,
            headers: BTreeMap::new(),
            output_path: None,
        }
    }
}

fn default_output_path(path: &str, index_filename: &str) -> PathBuf {
    let without_query = path.split('?').next().unwrap_or(path);

    let mut relative = without_query.trim_start_matches('/').to_string();
    if without_query.ends_with('/') || relative.is_empty() {
        relative.push_str(index_filename);
    }

    PathBuf::from(relative)
}

/// Registration context handed to route sources
#[derive(Debug)]
pub struct Routes {
    index_filename: String,
    routes: Vec<Route>,
}

impl Routes {
    fn new(index_filename: &str) -> Self {
        Self {
            index_filename: index_filename.to_string(),
            routes: Vec::new(),
        }
    }

    /// Declare a GET route expecting a 200
    pub fn get(&mut self, path: &str) {
        self.get_with(path, RouteOptions::default());
    }

    /// Declare a GET route with explicit options
    pub fn get_with(&mut self, path: &str, options: RouteOptions) {
        self.routes
            .push(Route::with_options(path, &self.index_filename, options));
    }
}

type RouteSource = Box<dyn FnOnce(&mut Routes)>;

/// Registered route sources plus the memoized resolved list
#[derive(Default)]
pub struct RouteSet {
    sources: Vec<RouteSource>,
    resolved: Option<Vec<Route>>,
}

impl RouteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route source; it runs on the first `resolve` call
    pub fn register<F>(&mut self, source: F)
    where
        F: FnOnce(&mut Routes) + 'static,
    {
        self.sources.push(Box::new(source));
    }

    /// Run all sources once and memoize the merged route list
    pub fn resolve(&mut self, index_filename: &str) -> &[Route] {
        if self.resolved.is_none() {
            let mut context = Routes::new(index_filename);
            for source in self.sources.drain(..) {
                source(&mut context);
            }
            self.resolved = Some(context.routes);
        }

        self.resolved.as_deref().expect("resolved above")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_gets_index_filename() {
        let route = Route::get("/", "index.html");
        assert_eq!(route.output_path, PathBuf::from("index.html"));

        let route = Route::get("/posts/", "index.html");
        assert_eq!(route.output_path, PathBuf::from("posts/index.html"));
    }

    #[test]
    fn plain_path_maps_directly() {
        let route = Route::get("/404.html", "index.html");
        assert_eq!(route.output_path, PathBuf::from("404.html"));
    }

    #[test]
    fn query_string_is_not_part_of_the_output_path() {
        let route = Route::get("/search?q=x", "index.html");
        assert_eq!(route.output_path, PathBuf::from("search"));
    }

    #[test]
    fn output_path_is_never_empty() {
        let route = Route::get("/", "index.html");
        assert!(!route.output_path.as_os_str().is_empty());
    }

    #[test]
    fn explicit_output_path_wins() {
        let route = Route::with_options(
            "/feed",
            "index.html",
            RouteOptions {
                output_path: Some(PathBuf::from("feed.xml")),
                ..Default::default()
            },
        );
        assert_eq!(route.output_path, PathBuf::from("feed.xml"));
    }

    #[test]
    fn sources_run_lazily_and_once() {
        use std::cell::Cell;
        use std::rc::Rc;

        let runs = Rc::new(Cell::new(0));
        let mut set = RouteSet::new();

        let counter = runs.clone();
        set.register(move |routes| {
            counter.set(counter.get() + 1);
            routes.get("/");
        });

        assert_eq!(runs.get(), 0, "source must not run at registration");

        assert_eq!(set.resolve("index.html").len(), 1);
        assert_eq!(set.resolve("index.html").len(), 1);
        assert_eq!(runs.get(), 1, "source must run exactly once");
    }

    #[test]
    fn sources_merge_in_registration_order() {
        let mut set = RouteSet::new();
        set.register(|routes| routes.get("/"));
        set.register(|routes| {
            routes.get("/about");
            routes.get_with(
                "/old",
                RouteOptions {
                    expected_status: 301,
                    ..Default::default()
                },
            );
        });

        let resolved = set.resolve("index.html");
        let paths: Vec<_> = resolved.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/about", "/old"]);
        assert_eq!(resolved[2].expected_status, 301);
    }
}
