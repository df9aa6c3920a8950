use anyhow::{Context, Result};
use folio_kit_core::{POSTS_DIR, SITE_TOML, load_posts, parse_site_toml};
use folio_kit_generator::clock::SystemClock;
use folio_kit_generator::{GenerateOptions, generate_site};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Files under this directory are copied to the output unchanged
pub const STATIC_DIR: &str = "static";

/// Build static site for deployment
pub async fn run(path: PathBuf, output: PathBuf) -> Result<()> {
    println!("🔨 Building static site...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    // Validate site directory exists
    if !path.exists() {
        anyhow::bail!("Site directory does not exist: {}", path.display());
    }

    let site_toml_path = path.join(SITE_TOML);
    if !site_toml_path.exists() {
        anyhow::bail!(
            "{} not found in {}\nRun 'folio-kit init {}' first",
            SITE_TOML,
            path.display(),
            path.display()
        );
    }

    let config = parse_site_toml(&site_toml_path).context("Failed to parse site.toml")?;
    let posts = load_posts(path.join(POSTS_DIR)).context("Failed to load posts")?;

    println!("✓ Loaded: {}", config.site.title);
    println!("  Owner: {}", config.site.owner);
    println!("  Posts: {}", posts.len());
    println!();

    println!("📄 Rendering pages...");
    let site = generate_site(
        &path,
        &config,
        &posts,
        Arc::new(SystemClock),
        GenerateOptions::default(),
    )?;
    println!("   ✓ Rendered {} pages", site.pages.len());
    println!("   ✓ Encoded {} avatar images", site.assets.len());

    println!("📁 Writing output...");
    fs::create_dir_all(&output).context("Failed to create output directory")?;
    site.write_to(&output)?;

    let copied = copy_static(&path.join(STATIC_DIR), &output)?;
    println!("   ✓ Copied {} static files", copied);

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();
    println!("To test locally:");
    println!("   cd {} && python3 -m http.server 8000", output.display());
    println!();

    Ok(())
}

/// Copy every file below `static_dir` into `output`, keeping relative paths.
fn copy_static(static_dir: &Path, output: &Path) -> Result<usize> {
    if !static_dir.exists() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(static_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(static_dir)
            .context("Static file outside static directory")?;
        let dst = output.join(relative);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dst)
            .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        copied += 1;
    }

    Ok(copied)
}
