//! Build and deploy configuration
//!
//! A plain struct with documented defaults. The embedding application
//! constructs one and hands it to [`Builder`](crate::Builder) and
//! [`Deployer`](crate::Deployer); nothing here is global or mutated
//! after construction.

use std::path::PathBuf;

/// Configuration shared by the snapshot builder and the deployer
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the snapshot is written into (default: `_site`, Jekyll's default)
    pub build_dir: PathBuf,

    /// Exact basenames the deployer never uploads (default: `.DS_Store`)
    pub ignored_filenames: Vec<String>,

    /// Filename appended to routes ending in `/` (default: `index.html`)
    pub index_filename: String,

    /// Optional directory whose contents are copied into the build root
    /// before routes are built (flattened, `public/404.html` lands at
    /// the build root's top level)
    pub public_dir: Option<PathBuf>,

    /// Host used for the synthetic requests issued per route
    pub domain: String,

    /// Append `; charset=utf-8` to text content types (default: true)
    pub charset_utf8: bool,

    /// Optional terraform directory used to default the bucket and domain
    pub terraform_dir: Option<PathBuf>,
}

impl Config {
    /// Create a config with defaults for the given domain
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            build_dir: PathBuf::from("_site"),
            ignored_filenames: vec![".DS_Store".to_string()],
            index_filename: "index.html".to_string(),
            public_dir: None,
            domain: domain.into(),
            charset_utf8: true,
            terraform_dir: None,
        }
    }
}
