// Site validation: configuration, avatar asset and posts

use folio_kit_core::{
    MetadataProvider, MissingHandlePolicy, POSTS_DIR, SITE_TOML, SiteConfig, SocialPlatform,
};
use std::path::Path;

/// Smallest source avatar that still looks sharp at the displayed size
const MIN_AVATAR_SOURCE: u32 = 50;

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check a site directory. Problems are collected, never returned as `Err`.
pub fn validate_site(site_dir: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();

    let config_path = site_dir.join(SITE_TOML);
    if !config_path.exists() {
        report
            .errors
            .push(format!("{} not found in {}", SITE_TOML, site_dir.display()));
        return report;
    }

    let config = match folio_kit_core::parse_site_toml(&config_path) {
        Ok(config) => config,
        Err(e) => {
            report.errors.push(e.to_string());
            return report;
        }
    };
    report
        .info
        .push(format!("{} valid: {}", SITE_TOML, config.site.title));

    check_metadata(&config, &mut report);
    check_avatar(site_dir, &config, &mut report);
    check_posts(site_dir, &mut report);

    tracing::debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation finished"
    );
    report
}

fn check_metadata(config: &SiteConfig, report: &mut ValidationReport) {
    let metadata = &config.metadata;

    let has_name = metadata
        .author()
        .and_then(|a| a.name.as_deref())
        .is_some_and(|n| !n.trim().is_empty());
    if !has_name {
        report
            .warnings
            .push("author.name is not set; the bio byline will be hidden".to_string());
    }

    let Some(social) = metadata.social() else {
        report
            .warnings
            .push("[social] section missing; no social links will be rendered".to_string());
        return;
    };

    let missing: Vec<&str> = SocialPlatform::ALL
        .iter()
        .filter(|&&platform| social.handle(platform).is_none())
        .map(|platform| platform.name())
        .collect();

    if !missing.is_empty() {
        let effect = match social.missing {
            MissingHandlePolicy::Skip => "will be skipped",
            MissingHandlePolicy::Placeholder => "will render as placeholders",
        };
        report.warnings.push(format!(
            "No handle for {}; these platforms {}",
            missing.join(", "),
            effect
        ));
    }
}

fn check_avatar(site_dir: &Path, config: &SiteConfig, report: &mut ValidationReport) {
    let avatar_path = site_dir.join(&config.avatar.path);
    if !avatar_path.exists() {
        report.errors.push(format!(
            "Avatar image not found: {}",
            config.avatar.path.display()
        ));
        return;
    }

    match image::image_dimensions(&avatar_path) {
        Ok((width, height)) => {
            report
                .info
                .push(format!("Avatar: {}x{}", width, height));
            if width != height {
                report.warnings.push(format!(
                    "Avatar is not square ({}x{}); it will be center-cropped",
                    width, height
                ));
            }
            if width.min(height) < MIN_AVATAR_SOURCE {
                report.warnings.push(format!(
                    "Avatar is smaller than {}px; it will be upscaled",
                    MIN_AVATAR_SOURCE
                ));
            }
        }
        Err(e) => report.errors.push(format!(
            "Avatar image {} could not be read: {}",
            config.avatar.path.display(),
            e
        )),
    }
}

fn check_posts(site_dir: &Path, report: &mut ValidationReport) {
    match folio_kit_core::load_posts(site_dir.join(POSTS_DIR)) {
        Ok(posts) if posts.is_empty() => report
            .warnings
            .push(format!("No published posts in {}", POSTS_DIR)),
        Ok(posts) => report.info.push(format!("Posts: {}", posts.len())),
        Err(e) => report.errors.push(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;

    const FULL: &str = r##"
[site]
title = "Blog"
owner = "Jane"

[author]
name = "Jane"

[social]
linkedin = "jane"
twitter = "jane"
instagram = "jane"
facebook = "jane"
github = "jane"
"##;

    fn site(config: &str, avatar: Option<(u32, u32)>) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SITE_TOML), config).unwrap();
        if let Some((width, height)) = avatar {
            fs::create_dir_all(dir.path().join("images")).unwrap();
            RgbImage::from_pixel(width, height, Rgb([0, 0, 0]))
                .save(dir.path().join("images/profile-pic.jpg"))
                .unwrap();
        }
        let posts = dir.path().join(POSTS_DIR);
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("hello.md"),
            "+++\ntitle = \"Hello\"\ndate = \"2024-01-01\"\n+++\nHi\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_valid_site() {
        let dir = site(FULL, Some((100, 100)));
        let report = validate_site(dir.path());
        assert!(report.is_ok(), "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert!(report.info.iter().any(|i| i == "Posts: 1"));
    }

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let report = validate_site(dir.path());
        assert!(!report.is_ok());
        assert!(report.errors[0].contains("site.toml not found"));
    }

    #[test]
    fn test_invalid_config() {
        let dir = site("[site]\ntitle = \"Blog\"\n", Some((100, 100)));
        let report = validate_site(dir.path());
        assert!(!report.is_ok());
        assert!(report.errors[0].contains("Configuration parse error"));
    }

    #[test]
    fn test_missing_avatar_is_error() {
        let dir = site(FULL, None);
        let report = validate_site(dir.path());
        assert!(
            report
                .errors
                .iter()
                .any(|e| e.contains("Avatar image not found"))
        );
    }

    #[test]
    fn test_non_square_avatar_warns() {
        let dir = site(FULL, Some((120, 40)));
        let report = validate_site(dir.path());
        assert!(report.is_ok());
        assert!(report.warnings.iter().any(|w| w.contains("not square")));
        assert!(report.warnings.iter().any(|w| w.contains("upscaled")));
    }

    #[test]
    fn test_missing_handles_and_author_warn() {
        let config = "[site]\ntitle = \"Blog\"\nowner = \"Jane\"\n\n[social]\ngithub = \"jane\"\nmissing = \"placeholder\"\n";
        let dir = site(config, Some((100, 100)));
        let report = validate_site(dir.path());
        assert!(report.is_ok());
        assert!(report.warnings.iter().any(|w| w.contains("author.name")));
        assert!(report.warnings.iter().any(|w| {
            w.contains("linkedin, twitter, instagram, facebook")
                && w.contains("placeholders")
        }));
    }

    #[test]
    fn test_bad_post_is_error() {
        let dir = site(FULL, Some((100, 100)));
        fs::write(
            dir.path().join(POSTS_DIR).join("broken.md"),
            "no front matter here",
        )
        .unwrap();
        let report = validate_site(dir.path());
        assert!(report.errors.iter().any(|e| e.contains("broken.md")));
    }
}
