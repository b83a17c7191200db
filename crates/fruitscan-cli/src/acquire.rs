//! Image acquisition.
//!
//! Turns a file path, an image URL or a sample name into a base64 data URL
//! the relay accepts.

use anyhow::{Context, Result};
use base64::Engine;
use std::path::Path;
use tracing::debug;

/// A built-in sample image.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub name: &'static str,
    pub emoji: &'static str,
    pub url: &'static str,
}

pub const SAMPLES: &[Sample] = &[
    Sample {
        name: "Apple",
        emoji: "🍎",
        url: "https://images.unsplash.com/photo-1560806887-1e4cd0b6cbd6?w=400&q=80",
    },
    Sample {
        name: "Orange",
        emoji: "🍊",
        url: "https://images.unsplash.com/photo-1547514701-42782101795e?w=400&q=80",
    },
    Sample {
        name: "Banana",
        emoji: "🍌",
        url: "https://images.unsplash.com/photo-1571771894821-ce9b6c11b08e?w=400&q=80",
    },
    Sample {
        name: "Strawberry",
        emoji: "🍓",
        url: "https://images.unsplash.com/photo-1601004890684-d8cbf643f5f2?w=400&q=80",
    },
];

/// Look up a sample by name, ignoring case.
pub fn find_sample(name: &str) -> Option<&'static Sample> {
    SAMPLES.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Load an image from a local path or an http(s) URL as a data URL.
pub async fn load_image(source: &str) -> Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        download_image(source).await
    } else {
        read_image_file(Path::new(source))
    }
}

/// Read a local image file and encode it.
pub fn read_image_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let media_type = media_type_from_path(&path.to_string_lossy());
    debug!(path = %path.display(), size = bytes.len(), media_type, "Image read");
    Ok(to_data_url(media_type, &bytes))
}

/// Download an image and encode it.
pub async fn download_image(url: &str) -> Result<String> {
    debug!(url, "Downloading image");
    let response = reqwest::get(url)
        .await
        .context("Failed to download image")?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("Failed to download image: HTTP {}", status);
    }

    let media_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(';').next().unwrap_or(s).trim().to_string())
        .filter(|s| s.starts_with("image/"))
        .unwrap_or_else(|| media_type_from_path(url).to_string());

    let bytes = response
        .bytes()
        .await
        .context("Failed to read image bytes")?;

    debug!(size = bytes.len(), media_type = %media_type, "Image downloaded");
    Ok(to_data_url(&media_type, &bytes))
}

pub fn to_data_url(media_type: &str, bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", media_type, b64)
}

/// Guess a media type from a path or URL extension. Defaults to JPEG.
pub fn media_type_from_path(path: &str) -> &'static str {
    let lower = path.to_lowercase();
    let lower = lower.split(['?', '#']).next().unwrap_or(&lower);
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".gif") {
        "image/gif"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else if lower.ends_with(".bmp") {
        "image/bmp"
    } else {
        "image/jpeg"
    }
}
