use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tracking ID used when `[analytics]` does not name one.
pub const DEFAULT_TRACKING_ID: &str = "AW-16828308323";

/// Base URL of the analytics loader script; the tracking ID is appended.
pub const ANALYTICS_LOADER_BASE: &str = "https://www.googletagmanager.com/gtag/js?id=";

/// Complete site configuration, as loaded from site.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: SiteSettings,
    pub metadata: SiteMetadata,
    pub analytics: AnalyticsConfig,
    pub avatar: AvatarConfig,
}

impl SiteConfig {
    /// Path of the homepage: the path prefix followed by a slash.
    pub fn root_path(&self) -> String {
        self.site.root_path()
    }
}

/// Site-wide presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    pub title: String,
    /// Name printed in the copyright footer
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Either empty or a path starting with `/` and not ending with one
    pub path_prefix: String,
}

impl SiteSettings {
    pub fn root_path(&self) -> String {
        format!("{}/", self.path_prefix)
    }

    /// Join a site-relative path (no leading slash) onto the prefix.
    pub fn url_for(&self, relative: &str) -> String {
        format!("{}/{}", self.path_prefix, relative.trim_start_matches('/'))
    }
}

/// Read-only metadata consumed by the bio and social link components
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<Social>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Author {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Social handles plus the policy for platforms without one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Social {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default)]
    pub missing: MissingHandlePolicy,
}

impl Social {
    /// Handle for a platform, treating blank strings as absent.
    pub fn handle(&self, platform: SocialPlatform) -> Option<&str> {
        let handle = match platform {
            SocialPlatform::LinkedIn => &self.linkedin,
            SocialPlatform::Twitter => &self.twitter,
            SocialPlatform::Instagram => &self.instagram,
            SocialPlatform::Facebook => &self.facebook,
            SocialPlatform::GitHub => &self.github,
        };
        handle
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }
}

/// What to render for a platform whose handle is not configured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingHandlePolicy {
    /// Leave the platform out entirely
    #[default]
    Skip,
    /// Keep the slot with a non-link placeholder
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialPlatform {
    LinkedIn,
    Twitter,
    Instagram,
    Facebook,
    GitHub,
}

impl SocialPlatform {
    /// Rendering order of the social links
    pub const ALL: [SocialPlatform; 5] = [
        SocialPlatform::LinkedIn,
        SocialPlatform::Twitter,
        SocialPlatform::Instagram,
        SocialPlatform::Facebook,
        SocialPlatform::GitHub,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SocialPlatform::LinkedIn => "linkedin",
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::GitHub => "github",
        }
    }

    pub fn base_url(self) -> &'static str {
        match self {
            SocialPlatform::LinkedIn => "https://www.linkedin.com/in/",
            SocialPlatform::Twitter => "https://www.twitter.com/",
            SocialPlatform::Instagram => "https://www.instagram.com/",
            SocialPlatform::Facebook => "https://www.facebook.com/",
            SocialPlatform::GitHub => "https://www.github.com/",
        }
    }

    pub fn profile_url(self, handle: &str) -> String {
        format!("{}{}", self.base_url(), handle)
    }
}

/// Read-only lookup the bio and social components are built against
pub trait MetadataProvider: Send + Sync {
    fn author(&self) -> Option<&Author>;
    fn social(&self) -> Option<&Social>;
}

impl MetadataProvider for SiteMetadata {
    fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    fn social(&self) -> Option<&Social> {
        self.social.as_ref()
    }
}

/// Analytics tag configuration shared by the head injector and the layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub tracking_id: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            tracking_id: DEFAULT_TRACKING_ID.to_string(),
        }
    }
}

impl AnalyticsConfig {
    pub fn loader_url(&self) -> String {
        format!("{}{}", ANALYTICS_LOADER_BASE, self.tracking_id)
    }
}

/// Avatar image shown in the bio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    /// Source image, relative to the site directory
    pub path: PathBuf,
    #[serde(default = "default_avatar_alt")]
    pub alt: String,
}

pub(crate) fn default_avatar_alt() -> String {
    "Profile picture".to_string()
}

/// A markdown post with its front matter resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Markdown body, front matter stripped
    pub body: String,
    pub source: PathBuf,
}

impl Post {
    /// Site-relative directory of the rendered post
    pub fn output_dir(&self) -> String {
        format!("posts/{}", self.slug)
    }
}

/// Turn a file stem or title into a URL-safe slug
pub fn slugify(s: &str) -> String {
    let slug: String = s
        .to_lowercase()
        .replace(char::is_whitespace, "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect();

    slug.split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
