use anyhow::{Context, Result};
use folio_kit_core::SiteSettings;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

/// Displayed width and height of the avatar, in CSS pixels
pub const AVATAR_SIZE: u32 = 50;

/// JPEG encoding quality
pub const AVATAR_QUALITY: u8 = 95;

const AVATAR_STEM: &str = "images/avatar";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarFormat {
    WebP,
    Png,
    Jpeg,
}

impl AvatarFormat {
    /// `<source>` candidates in preference order; JPEG is the `<img>` fallback.
    pub const SOURCES: [AvatarFormat; 2] = [AvatarFormat::WebP, AvatarFormat::Png];
    pub const FALLBACK: AvatarFormat = AvatarFormat::Jpeg;

    pub fn extension(self) -> &'static str {
        match self {
            AvatarFormat::WebP => "webp",
            AvatarFormat::Png => "png",
            AvatarFormat::Jpeg => "jpg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            AvatarFormat::WebP => "image/webp",
            AvatarFormat::Png => "image/png",
            AvatarFormat::Jpeg => "image/jpeg",
        }
    }

    /// Output path relative to the site root
    pub fn asset_path(self) -> String {
        format!("{}.{}", AVATAR_STEM, self.extension())
    }
}

/// Everything the bio needs to render the `<picture>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarImage {
    /// (mime type, url) per `<source>`
    pub sources: Vec<(String, String)>,
    pub fallback_src: String,
    pub size: u32,
    pub alt: String,
}

impl AvatarImage {
    pub fn for_site(settings: &SiteSettings, alt: &str) -> Self {
        Self {
            sources: AvatarFormat::SOURCES
                .iter()
                .map(|format| {
                    (
                        format.mime().to_string(),
                        settings.url_for(&format.asset_path()),
                    )
                })
                .collect(),
            fallback_src: settings.url_for(&AvatarFormat::FALLBACK.asset_path()),
            size: AVATAR_SIZE,
            alt: alt.to_string(),
        }
    }
}

/// Crop the source image to a square and encode it in every avatar format.
///
/// Returns `(asset path, bytes)` pairs ready to be written under the output
/// directory.
pub fn encode_avatar(source: &Path) -> Result<Vec<(String, Vec<u8>)>> {
    let original = image::open(source)
        .with_context(|| format!("Failed to read avatar image {}", source.display()))?;

    let resized = original.resize_to_fill(AVATAR_SIZE, AVATAR_SIZE, FilterType::Lanczos3);
    let rgba = DynamicImage::ImageRgba8(resized.to_rgba8());

    let mut assets = Vec::with_capacity(3);
    for format in [AvatarFormat::WebP, AvatarFormat::Png, AvatarFormat::Jpeg] {
        let bytes = match format {
            AvatarFormat::WebP => write_with(&rgba, ImageFormat::WebP)?,
            AvatarFormat::Png => write_with(&rgba, ImageFormat::Png)?,
            AvatarFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = resized.to_rgb8();
                let mut bytes = Vec::new();
                JpegEncoder::new_with_quality(&mut bytes, AVATAR_QUALITY)
                    .encode_image(&rgb)
                    .context("Failed to encode avatar as JPEG")?;
                bytes
            }
        };
        tracing::debug!(format = format.extension(), bytes = bytes.len(), "encoded avatar");
        assets.push((format.asset_path(), bytes));
    }

    Ok(assets)
}

fn write_with(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, format)
        .with_context(|| format!("Failed to encode avatar as {:?}", format))?;
    Ok(cursor.into_inner())
}
