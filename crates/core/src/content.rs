use crate::error::{Error, Result};
use crate::types::{Post, slugify};
use chrono::NaiveDate;
use gray_matter::{Matter, engine::TOML};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

const FRONT_MATTER_DELIMITER: &str = "+++";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFrontMatter {
    title: String,
    date: String, // Parse as NaiveDate
    description: Option<String>,
    slug: Option<String>,
    #[serde(default)]
    draft: bool,
}

/// Load every published post under `dir`, newest first.
///
/// A missing directory is an empty site, not an error. Drafts are skipped.
pub fn load_posts<P: AsRef<Path>>(dir: P) -> Result<Vec<Post>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "no posts directory");
        return Ok(Vec::new());
    }

    let mut posts = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        let path = entry.path();

        let is_markdown = path.extension().is_some_and(|ext| ext == "md");
        let is_hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !entry.file_type().is_file() || !is_markdown || is_hidden {
            continue;
        }

        let content = fs::read_to_string(path)?;
        match parse_post(path, &content)? {
            Some(post) => posts.push(post),
            None => tracing::debug!(path = %path.display(), "skipping draft"),
        }
    }

    let mut seen = HashSet::new();
    for post in &posts {
        if !seen.insert(post.slug.as_str()) {
            return Err(Error::InvalidData(format!(
                "Duplicate post slug '{}' ({})",
                post.slug,
                post.source.display()
            )));
        }
    }

    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
    Ok(posts)
}

/// Parse one post file. Returns `None` for drafts.
pub fn parse_post(path: &Path, content: &str) -> Result<Option<Post>> {
    let front_matter_error = |message: String| Error::FrontMatter {
        path: path.to_path_buf(),
        message,
    };
    let missing_front_matter = || {
        front_matter_error(format!(
            "expected a '{}' delimited TOML block at the top of the file",
            FRONT_MATTER_DELIMITER
        ))
    };

    let content = content.trim_start_matches('\u{feff}');
    if !has_closing_delimiter(content) {
        return Err(missing_front_matter());
    }

    let parsed = front_matter_parser()
        .parse::<RawFrontMatter>(content)
        .map_err(|e| front_matter_error(e.to_string()))?;
    let raw = parsed.data.ok_or_else(missing_front_matter)?;

    if raw.draft {
        return Ok(None);
    }

    let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d")
        .map_err(|e| front_matter_error(format!("Invalid date '{}': {}", raw.date, e)))?;

    let slug = match raw.slug {
        Some(slug) => slugify(&slug),
        None => slugify(&default_slug_source(path)),
    };
    if slug.is_empty() {
        return Err(front_matter_error("post slug is empty".to_string()));
    }

    Ok(Some(Post {
        slug,
        title: raw.title,
        date,
        description: raw.description.filter(|d| !d.trim().is_empty()),
        body: parsed.content,
        source: path.to_path_buf(),
    }))
}

fn front_matter_parser() -> Matter<TOML> {
    let mut matter = Matter::<TOML>::new();
    matter.delimiter = FRONT_MATTER_DELIMITER.to_string();
    matter
}

/// An unterminated block would otherwise swallow the whole post as front matter.
fn has_closing_delimiter(content: &str) -> bool {
    let mut lines = content.lines();
    lines.next().is_some_and(|first| first.trim_end() == FRONT_MATTER_DELIMITER)
        && lines.any(|line| line.trim_end() == FRONT_MATTER_DELIMITER)
}

/// `posts/hello.md` → "hello", `posts/hello/index.md` → "hello"
fn default_slug_source(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if stem == "index" {
        path.parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(stem)
    } else {
        stem
    }
}
