pub mod config;
pub mod content;
pub mod error;
pub mod types;

pub use config::parse_site_toml;
pub use content::load_posts;
pub use error::{Error, Result};
pub use types::*;

/// Name of the configuration file at the root of a site directory
pub const SITE_TOML: &str = "site.toml";

/// Directory (relative to the site root) holding markdown posts
pub const POSTS_DIR: &str = "content/posts";
