use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_AVATAR_PATH: &str = "images/profile-pic.jpg";

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    site: RawSiteSettings,
    #[serde(default)]
    author: Option<Author>,
    #[serde(default)]
    social: Option<Social>,
    #[serde(default)]
    analytics: Option<RawAnalytics>,
    #[serde(default)]
    avatar: Option<RawAvatar>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSiteSettings {
    title: String,
    owner: String,
    description: Option<String>,
    #[serde(default)]
    path_prefix: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAnalytics {
    tracking_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAvatar {
    path: Option<String>,
    alt: Option<String>,
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<SiteConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let path_prefix = validate_path_prefix(raw.site.path_prefix.trim())?;

    let site = SiteSettings {
        title: raw.site.title,
        owner: raw.site.owner,
        description: raw.site.description,
        path_prefix,
    };

    let tracking_id = match raw.analytics.and_then(|a| a.tracking_id) {
        Some(id) => validate_tracking_id(id.trim())?,
        None => DEFAULT_TRACKING_ID.to_string(),
    };

    let (avatar_path, avatar_alt) = match raw.avatar {
        Some(avatar) => (avatar.path, avatar.alt),
        None => (None, None),
    };
    let avatar = AvatarConfig {
        path: validate_path(
            avatar_path.as_deref().unwrap_or(DEFAULT_AVATAR_PATH),
            "avatar.path",
        )?,
        alt: avatar_alt.unwrap_or_else(default_avatar_alt),
    };

    Ok(SiteConfig {
        site,
        metadata: SiteMetadata {
            author: raw.author,
            social: raw.social,
        },
        analytics: AnalyticsConfig { tracking_id },
        avatar,
    })
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and parent directory references (`..`) so that
/// a site.toml cannot point the build at files outside the site directory.
///
/// ```text
/// validate_path("images/me.jpg", "avatar.path")  → Ok(PathBuf)
/// validate_path("/etc/passwd", "avatar.path")    → Err("Absolute paths not allowed...")
/// validate_path("../secret.jpg", "avatar.path")  → Err("Parent directory references...")
/// ```
pub fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    // Ensure path is not empty
    if path_str.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    let path = Path::new(path_str);

    // Reject absolute paths
    if path.is_absolute() || path_str.starts_with('/') {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    // Check for parent directory references
    for component in path.components() {
        if component == std::path::Component::ParentDir {
            return Err(Error::ConfigParse(format!(
                "Parent directory references (..) not allowed in '{}': '{}'",
                field_name, path_str
            )));
        }
    }

    Ok(path.to_path_buf())
}

/// The tracking ID is spliced verbatim into an inline script and a URL,
/// so only ASCII alphanumerics and `-` are accepted.
fn validate_tracking_id(id: &str) -> Result<String> {
    if id.is_empty() {
        return Err(Error::ConfigParse(
            "Empty 'analytics.tracking_id'".to_string(),
        ));
    }

    if let Some(bad) = id.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
        return Err(Error::ConfigParse(format!(
            "Invalid character '{}' in 'analytics.tracking_id': '{}'",
            bad, id
        )));
    }

    Ok(id.to_string())
}

/// A prefix is either empty or `/segment[/segment...]` with no trailing slash.
fn validate_path_prefix(prefix: &str) -> Result<String> {
    if prefix.is_empty() {
        return Ok(String::new());
    }

    if !prefix.starts_with('/') {
        return Err(Error::ConfigParse(format!(
            "'site.path_prefix' must start with '/': '{}'",
            prefix
        )));
    }

    if prefix.ends_with('/') {
        return Err(Error::ConfigParse(format!(
            "'site.path_prefix' must not end with '/': '{}'",
            prefix
        )));
    }

    if prefix.split('/').any(|segment| segment == "..") {
        return Err(Error::ConfigParse(format!(
            "Parent directory references (..) not allowed in 'site.path_prefix': '{}'",
            prefix
        )));
    }

    Ok(prefix.to_string())
}
