use anyhow::{Context, Result};
use chrono::Local;
use folio_kit_core::config::parse_site_toml_str;
use folio_kit_core::{POSTS_DIR, SITE_TOML};
use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

use super::build::STATIC_DIR;

const AVATAR_NAMES: &[&str] = &[
    "profile-pic.jpg",
    "profile-pic.png",
    "avatar.jpg",
    "avatar.png",
    "me.jpg",
    "me.png",
];
const PLACEHOLDER_AVATAR: &str = "images/profile-pic.png";
const PLACEHOLDER_AVATAR_SIZE: u32 = 100;

/// Escape a string for safe inclusion in a TOML basic string
///
/// The template keeps its comments, so it is assembled by hand rather than
/// serialized with the toml crate.
///
/// See: https://toml.io/en/v1.0.0#string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Initialize a new site directory.
///
/// - Looks for an existing profile picture (site root, then `images/`)
/// - Creates `content/posts/`, `images/` and `static/`
/// - Writes a placeholder avatar when none was found
/// - Generates site.toml and a first post
pub async fn run(path: PathBuf, title: Option<String>, author: Option<String>) -> Result<()> {
    println!("Initializing site directory: {}", path.display());

    if !path.exists() {
        anyhow::bail!(
            "Directory '{}' does not exist. Create it first: mkdir {}",
            path.display(),
            path.display()
        );
    }

    let site_toml_path = path.join(SITE_TOML);
    if site_toml_path.exists() {
        anyhow::bail!(
            "{} already exists at {}\nHint: Delete it first or use a different directory",
            SITE_TOML,
            site_toml_path.display()
        );
    }

    create_directory_structure(&path)?;

    let avatar = match detect_avatar(&path) {
        Some(found) => {
            println!("✓ Detected profile picture: {}", found.display());
            found
        }
        None => {
            write_placeholder_avatar(&path)?;
            println!("⚠ No profile picture found, wrote a placeholder");
            PathBuf::from(PLACEHOLDER_AVATAR)
        }
    };

    generate_site_toml(&path, title.as_deref(), author.as_deref(), &avatar)?;
    generate_first_post(&path)?;

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  ├── site.toml            ← Edit this to set your name and social handles");
    println!("  ├── content/");
    println!("  │   └── posts/");
    println!("  │       └── hello-world.md");
    println!("  ├── images/");
    println!("  │   └── {}", avatar.display());
    println!("  └── static/              ← Copied to the output as-is");

    println!("\nNext steps:");
    println!("  1. Edit site.toml (author, summary, social handles)");
    println!("  2. Write posts in content/posts/");
    println!("  3. Preview: folio-kit preview {}", path.display());

    Ok(())
}

fn create_directory_structure(base: &Path) -> Result<()> {
    fs::create_dir_all(base.join(POSTS_DIR))?;
    fs::create_dir_all(base.join("images"))?;
    fs::create_dir_all(base.join(STATIC_DIR))?;
    Ok(())
}

/// Find a profile picture, returned relative to `dir`
fn detect_avatar(dir: &Path) -> Option<PathBuf> {
    for folder in ["", "images"] {
        for name in AVATAR_NAMES {
            let relative = if folder.is_empty() {
                PathBuf::from(name)
            } else {
                Path::new(folder).join(name)
            };
            if dir.join(&relative).is_file() {
                return Some(relative);
            }
        }
    }

    None
}

/// Flat-colour square so a fresh site builds before a real photo is added
fn write_placeholder_avatar(base: &Path) -> Result<()> {
    let placeholder = RgbImage::from_pixel(
        PLACEHOLDER_AVATAR_SIZE,
        PLACEHOLDER_AVATAR_SIZE,
        Rgb([0x3A, 0x3D, 0x40]),
    );
    placeholder
        .save(base.join(PLACEHOLDER_AVATAR))
        .context("Failed to write placeholder avatar")?;
    Ok(())
}

fn generate_site_toml(
    base: &Path,
    title: Option<&str>,
    author: Option<&str>,
    avatar: &Path,
) -> Result<()> {
    let author_name = toml_escape_string(author.unwrap_or("Your Name"));
    let site_title = match title {
        Some(title) => toml_escape_string(title),
        None => format!("{}'s Blog", author_name),
    };
    let avatar_path = toml_escape_string(&avatar.to_string_lossy().replace('\\', "/"));

    let title_comment = if title.is_some() {
        ""
    } else {
        "  # TODO: Set site title"
    };
    let author_comment = if author.is_some() {
        ""
    } else {
        "  # TODO: Set your name"
    };

    let toml = format!(
        "# Generated by folio-kit init\n\
# Edit this file to customize your site\n\
\n\
[site]\n\
title = \"{site_title}\"{title_comment}\n\
owner = \"{author_name}\"{author_comment}\n\
description = \"A personal blog\"\n\
# path_prefix = \"/blog\"  # Set when the site is not served from the domain root\n\
\n\
[author]\n\
name = \"{author_name}\"{author_comment}\n\
summary = \"who writes about things.\"  # TODO: Add a short bio\n\
\n\
[social]\n\
# One handle per platform; URLs are built from these\n\
# linkedin = \"your-handle\"\n\
# twitter = \"your-handle\"\n\
# instagram = \"your-handle\"\n\
# facebook = \"your-handle\"\n\
# github = \"your-handle\"\n\
missing = \"skip\"  # or \"placeholder\"\n\
\n\
[analytics]\n\
# tracking_id = \"AW-16828308323\"\n\
\n\
[avatar]\n\
path = \"{avatar_path}\"\n\
alt = \"Profile picture\"\n"
    );

    // Validate the generated TOML can be parsed
    parse_site_toml_str(&toml)
        .context("Generated site.toml is invalid - this is a bug in the template generator")?;

    fs::write(base.join(SITE_TOML), toml)?;

    Ok(())
}

fn generate_first_post(base: &Path) -> Result<()> {
    let today = Local::now().format("%Y-%m-%d");
    let post = format!(
        r##"+++
title = "Hello World"
date = "{today}"
description = "The first post on this site"
+++

Welcome! This is markdown, so you can use:

- **Bold** and *italic* text
- Lists and [links](https://commonmark.org/help/)
- Tables, footnotes and ~~strikethrough~~

Delete this post or set `draft = true` in its front matter to hide it.
"##
    );

    fs::write(base.join(POSTS_DIR).join("hello-world.md"), post)?;

    Ok(())
}
