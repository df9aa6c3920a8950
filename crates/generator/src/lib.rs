// Static site generation with Leptos SSR

pub mod avatar;
pub mod clock;
pub mod components;
pub mod document;
pub mod head;
pub mod markdown;

use anyhow::{Context, Result};
use avatar::AvatarImage;
use clock::Clock;
use components::posts::format_date;
use components::{Article, Bio, NotFound, PageLayout, PostList, PostSummary};
use document::{Document, PageHead};
use folio_kit_core::{MetadataProvider, POSTS_DIR, Post, SITE_TOML, SiteConfig};
use leptos::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const INDEX_PAGE: &str = "index.html";
pub const NOT_FOUND_PAGE: &str = "404.html";

pub struct GeneratedSite {
    /// `site.path_prefix` the pages were rendered under
    pub path_prefix: String,
    pub pages: Vec<(String, String)>,   // (path, html)
    pub assets: Vec<(String, Vec<u8>)>, // (path, data)
}

impl GeneratedSite {
    pub fn page(&self, path: &str) -> Option<&str> {
        self.pages
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, html)| html.as_str())
    }

    pub fn asset(&self, path: &str) -> Option<&[u8]> {
        self.assets
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, data)| data.as_slice())
    }

    /// Write every page and asset below `output`, creating directories as needed.
    pub fn write_to(&self, output: &Path) -> Result<()> {
        let files = self
            .pages
            .iter()
            .map(|(path, html)| (path, html.as_bytes()))
            .chain(self.assets.iter().map(|(path, data)| (path, data.as_slice())));

        for (relative, contents) in files {
            let target = output.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&target, contents)
                .with_context(|| format!("Failed to write {}", target.display()))?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Append the preview server's reload script to every page
    pub live_reload: bool,
}

/// Renders individual pages for one site configuration.
pub struct SiteRenderer {
    config: SiteConfig,
    metadata: Arc<dyn MetadataProvider>,
    clock: Arc<dyn Clock>,
    avatar: AvatarImage,
    options: GenerateOptions,
}

impl SiteRenderer {
    pub fn new(config: SiteConfig, clock: Arc<dyn Clock>, options: GenerateOptions) -> Self {
        let metadata: Arc<dyn MetadataProvider> = Arc::new(config.metadata.clone());
        let avatar = AvatarImage::for_site(&config.site, &config.avatar.alt);
        Self {
            config,
            metadata,
            clock,
            avatar,
            options,
        }
    }

    pub fn render_home(&self, posts: &[Post]) -> String {
        let summaries: Vec<PostSummary> = posts
            .iter()
            .map(|post| PostSummary::from_post(post, &self.config.site))
            .collect();
        let metadata = self.metadata.clone();
        let avatar = self.avatar.clone();

        let content = view! {
            <Bio metadata=metadata avatar=avatar/>
            <PostList posts=summaries/>
        }
        .into_any();

        let head = PageHead {
            title: self.config.site.title.clone(),
            description: self.config.site.description.clone(),
        };
        self.render_page(&self.config.root_path(), &head, content)
    }

    pub fn render_post(&self, post: &Post) -> String {
        let metadata = self.metadata.clone();
        let avatar = self.avatar.clone();
        let content_html = markdown::render_markdown(&post.body);
        let title = post.title.clone();
        let date = format_date(post.date);

        let content = view! {
            <Article title=title date=date content_html=content_html/>
            <hr/>
            <aside class="post-bio">
                <Bio metadata=metadata avatar=avatar/>
            </aside>
        }
        .into_any();

        let head = PageHead {
            title: format!("{} | {}", post.title, self.config.site.title),
            description: post
                .description
                .clone()
                .or_else(|| self.config.site.description.clone()),
        };
        let current_path = self.config.site.url_for(&format!("{}/", post.output_dir()));
        self.render_page(&current_path, &head, content)
    }

    pub fn render_not_found(&self) -> String {
        let head = PageHead {
            title: format!("404: Not Found | {}", self.config.site.title),
            description: None,
        };
        let current_path = self.config.site.url_for("404/");
        self.render_page(&current_path, &head, view! { <NotFound/> }.into_any())
    }

    fn render_page(&self, current_path: &str, head: &PageHead, content: AnyView) -> String {
        tracing::debug!(path = current_path, "rendering page");

        let root_path = self.config.root_path();
        let title = self.config.site.title.clone();
        let owner = self.config.site.owner.clone();
        let analytics = self.config.analytics.clone();
        let clock = self.clock.clone();

        let body = view! {
            <PageLayout
                current_path=current_path
                root_path=root_path
                title=title
                owner=owner
                analytics=analytics
                clock=clock
            >
                {content}
            </PageLayout>
        }
        .to_html();

        let mut document = Document::new();
        head::on_render_body(&mut document, &self.config.analytics);
        document.render(head, &body, self.options.live_reload)
    }
}

/// Render every page of the site and encode the avatar.
pub fn generate_site(
    site_dir: &Path,
    config: &SiteConfig,
    posts: &[Post],
    clock: Arc<dyn Clock>,
    options: GenerateOptions,
) -> Result<GeneratedSite> {
    let renderer = SiteRenderer::new(config.clone(), clock, options);

    let mut pages = Vec::with_capacity(posts.len() + 2);
    pages.push((INDEX_PAGE.to_string(), renderer.render_home(posts)));
    for post in posts {
        pages.push((
            format!("{}/{}", post.output_dir(), INDEX_PAGE),
            renderer.render_post(post),
        ));
    }
    pages.push((NOT_FOUND_PAGE.to_string(), renderer.render_not_found()));

    let avatar_source = site_dir.join(&config.avatar.path);
    let assets = avatar::encode_avatar(&avatar_source)?;

    Ok(GeneratedSite {
        path_prefix: config.site.path_prefix.clone(),
        pages,
        assets,
    })
}

/// Load site.toml and posts from `site_dir`, then generate.
pub fn generate_from_dir(
    site_dir: &Path,
    clock: Arc<dyn Clock>,
    options: GenerateOptions,
) -> Result<GeneratedSite> {
    let config = folio_kit_core::parse_site_toml(site_dir.join(SITE_TOML))
        .with_context(|| format!("Failed to parse {}", SITE_TOML))?;
    let posts = folio_kit_core::load_posts(site_dir.join(POSTS_DIR))
        .context("Failed to load posts")?;

    generate_site(site_dir, &config, &posts, clock, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;

    const SITE: &str = r##"
[site]
title = "Jane's Notes"
owner = "Chris Hibler"
description = "Notes and projects"

[author]
name = "Jane"
summary = "writes things"

[social]
linkedin = "jane"
twitter = "jane"
instagram = "jane"
facebook = "jane"
github = "jane"
"##;

    fn site_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SITE_TOML), SITE).unwrap();

        let images = dir.path().join("images");
        fs::create_dir_all(&images).unwrap();
        RgbImage::from_pixel(64, 64, Rgb([10, 20, 30]))
            .save(images.join("profile-pic.jpg"))
            .unwrap();

        let posts = dir.path().join(POSTS_DIR);
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("hello-world.md"),
            "+++\ntitle = \"Hello World\"\ndate = \"2024-06-01\"\n+++\nSome **bold** text.\n",
        )
        .unwrap();

        dir
    }

    fn generate(dir: &Path, live_reload: bool) -> GeneratedSite {
        generate_from_dir(dir, Arc::new(FixedClock(2030)), GenerateOptions { live_reload })
            .unwrap()
    }

    #[test]
    fn test_generates_all_pages_and_assets() {
        let dir = site_dir();
        let site = generate(dir.path(), false);

        let paths: Vec<&str> = site.pages.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            paths,
            vec!["index.html", "posts/hello-world/index.html", "404.html"]
        );
        assert!(site.asset("images/avatar.webp").is_some());
        assert!(site.asset("images/avatar.png").is_some());
        assert!(site.asset("images/avatar.jpg").is_some());
    }

    #[test]
    fn test_home_page() {
        let dir = site_dir();
        let site = generate(dir.path(), false);
        let html = site.page("index.html").unwrap();

        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains(r#"class="main-heading""#));
        assert!(html.contains("<strong>Jane</strong>"));
        assert!(html.contains("https://www.github.com/jane"));
        assert!(html.contains(r#"href="/posts/hello-world/""#));
        assert!(html.contains("© 2030, Copyright Chris Hibler"));
        assert!(!html.contains("EventSource"));
    }

    #[test]
    fn test_post_page() {
        let dir = site_dir();
        let site = generate(dir.path(), false);
        let html = site.page("posts/hello-world/index.html").unwrap();

        assert!(html.contains("<title>Hello World | Jane&#x27;s Notes</title>"));
        assert!(html.contains(r#"class="header-link-home""#));
        assert!(!html.contains("main-heading"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("June 01, 2024"));
        assert!(html.contains("<strong>Jane</strong>"));
    }

    #[test]
    fn test_every_page_carries_analytics_in_head_and_body() {
        let dir = site_dir();
        let site = generate(dir.path(), false);

        for (path, html) in &site.pages {
            let head_end = html.find("</head>").unwrap();
            let (head, body) = html.split_at(head_end);
            assert_eq!(head.matches("gtag/js?id=AW-16828308323").count(), 1, "{}", path);
            assert_eq!(head.matches("gtag('config'").count(), 1, "{}", path);
            assert_eq!(body.matches("gtag/js?id=AW-16828308323").count(), 1, "{}", path);
        }
    }

    #[test]
    fn test_live_reload_only_when_requested() {
        let dir = site_dir();
        let site = generate(dir.path(), true);
        assert!(site.pages.iter().all(|(_, html)| html.contains("/_reload")));
    }

    #[test]
    fn test_generation_is_deterministic_with_fixed_clock() {
        let dir = site_dir();
        let first = generate(dir.path(), false);
        let second = generate(dir.path(), false);
        assert_eq!(first.pages, second.pages);
    }

    #[test]
    fn test_missing_avatar_fails() {
        let dir = site_dir();
        fs::remove_file(dir.path().join("images/profile-pic.jpg")).unwrap();
        let result = generate_from_dir(
            dir.path(),
            Arc::new(FixedClock(2030)),
            GenerateOptions::default(),
        );
        let err = result.err().unwrap();
        assert!(err.to_string().contains("Failed to read avatar image"));
    }

    #[test]
    fn test_write_to_creates_tree() {
        let dir = site_dir();
        let site = generate(dir.path(), false);
        let output = tempfile::tempdir().unwrap();
        site.write_to(output.path()).unwrap();

        let expected: [PathBuf; 4] = [
            output.path().join("index.html"),
            output.path().join("posts/hello-world/index.html"),
            output.path().join("404.html"),
            output.path().join("images/avatar.jpg"),
        ];
        for path in expected {
            assert!(path.is_file(), "{} missing", path.display());
        }
    }
}
