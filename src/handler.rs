//! The abstract application being frozen
//!
//! The builder never runs an HTTP server. It models the application as
//! a [`RequestHandler`] - one synchronous call per route - and captures
//! the `(status, headers, body)` triple the handler produces.

use std::collections::BTreeMap;

/// Error type for request handlers (boxed, collaborator-defined)
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A synthetic GET request issued for one route
#[derive(Debug, Clone)]
pub struct Request {
    /// Always `GET`
    pub method: &'static str,
    /// Always `https`
    pub scheme: &'static str,
    /// Host from the configured domain
    pub host: String,
    /// Port implied by the scheme
    pub port: u16,
    /// Path component of the route, query stripped
    pub path: String,
    /// Raw query string, if the route declared one.
    ///
    /// NOTE: only a single value per query key is supported; duplicate
    /// keys are undefined behavior.
    pub query: Option<String>,
    /// Headers declared on the route
    pub headers: BTreeMap<String, String>,
}

impl Request {
    /// Build the synthetic request for a route path against a host
    pub fn get(host: &str, route_path: &str, headers: BTreeMap<String, String>) -> Self {
        let (path, query) = match route_path.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (route_path.to_string(), None),
        };

        Self {
            method: "GET",
            scheme: "https",
            host: host.to_string(),
            port: 443,
            path,
            query,
            headers,
        }
    }
}

/// A captured response, immutable after creation
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    /// Header names are lower-cased on construction
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    /// Capture a response, standardizing header names to lowercase
    pub fn new(status: u16, headers: BTreeMap<String, String>, body: Vec<u8>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();

        Self {
            status,
            headers,
            body,
        }
    }

    /// Look up a header by (case-insensitive) name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// The application the builder drives, one call per route
pub trait RequestHandler {
    /// Handle a synthetic request and capture the response
    fn call(&self, request: &Request) -> Result<Response, HandlerError>;
}

impl<F> RequestHandler for F
where
    F: Fn(&Request) -> Result<Response, HandlerError>,
{
    fn call(&self, request: &Request) -> Result<Response, HandlerError> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_splits_query_string() {
        let request = Request::get("example.com", "/search?q=bread", BTreeMap::new());
        assert_eq!(request.method, "GET");
        assert_eq!(request.scheme, "https");
        assert_eq!(request.host, "example.com");
        assert_eq!(request.port, 443);
        assert_eq!(request.path, "/search");
        assert_eq!(request.query.as_deref(), Some("q=bread"));
    }

    #[test]
    fn get_without_query() {
        let request = Request::get("example.com", "/", BTreeMap::new());
        assert_eq!(request.path, "/");
        assert!(request.query.is_none());
    }

    #[test]
    fn response_lowercases_header_names() {
        let mut headers = BTreeMap::new();
        headers.insert("Location".to_string(), "/new".to_string());
        headers.insert("Content-Type".to_string(), "text/html".to_string());

        let response = Response::new(301, headers, Vec::new());

        assert_eq!(response.header("location"), Some("/new"));
        assert_eq!(response.header("Location"), Some("/new"));
        assert!(response.headers.contains_key("content-type"));
    }

    #[test]
    fn closures_are_handlers() {
        let handler = |request: &Request| {
            Ok(Response::new(
                200,
                BTreeMap::new(),
                request.path.as_bytes().to_vec(),
            ))
        };

        let response = handler
            .call(&Request::get("example.com", "/about", BTreeMap::new()))
            .unwrap();
        assert_eq!(response.body, b"/about");
    }
}
