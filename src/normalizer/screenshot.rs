//! Screenshot downscaling and re-encoding before transport

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::debug;

use crate::utils::{SCREENSHOT_MAX_WIDTH, SCREENSHOT_QUALITY};

/// Downscale to at most [`SCREENSHOT_MAX_WIDTH`] and re-encode as JPEG
///
/// `None` when the image cannot be decoded or the re-encoded image would not
/// be smaller; callers then keep the screenshot exactly as they received it.
#[must_use]
pub fn compact_screenshot(bytes: &[u8]) -> Option<Vec<u8>> {
    match reencode(bytes) {
        Ok(jpeg) if jpeg.len() < bytes.len() => {
            debug!("Screenshot re-encoded: {} -> {} bytes", bytes.len(), jpeg.len());
            Some(jpeg)
        }
        Ok(_) => None,
        Err(e) => {
            debug!("Keeping original screenshot: {e:#}");
            None
        }
    }
}

fn reencode(bytes: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes).context("Failed to decode screenshot")?;

    let img = if img.width() > SCREENSHOT_MAX_WIDTH {
        let height = (u64::from(img.height()) * u64::from(SCREENSHOT_MAX_WIDTH) / u64::from(img.width()))
            .max(1);
        img.resize_exact(
            SCREENSHOT_MAX_WIDTH,
            u32::try_from(height).unwrap_or(u32::MAX),
            FilterType::Triangle,
        )
    } else {
        img
    };

    let rgb = img.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, SCREENSHOT_QUALITY)
        .encode_image(&rgb)
        .context("Failed to encode screenshot")?;
    Ok(out)
}
