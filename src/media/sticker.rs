//! Image to sticker conversion: 512x512 cover crop, lossless WebP.

use crate::error::MediaError;
use crate::Result;
use bytes::Bytes;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::ExtendedColorType;

/// Edge length of a sticker in pixels.
pub const STICKER_SIZE: u32 = 512;

/// Convert any decodable image into sticker WebP bytes on the blocking pool.
pub async fn image_to_sticker(data: Bytes) -> Result<Vec<u8>> {
    let webp = tokio::task::spawn_blocking(move || encode_sticker(&data))
        .await
        .map_err(MediaError::from)??;
    Ok(webp)
}

pub fn encode_sticker(data: &[u8]) -> std::result::Result<Vec<u8>, MediaError> {
    let img = image::load_from_memory(data)?;
    let rgba = img
        .resize_to_fill(STICKER_SIZE, STICKER_SIZE, FilterType::Lanczos3)
        .to_rgba8();
    let mut out = Vec::new();
    WebPEncoder::new_lossless(&mut out).encode(
        rgba.as_raw(),
        rgba.width(),
        rgba.height(),
        ExtendedColorType::Rgba8,
    )?;
    tracing::debug!(input = data.len(), output = out.len(), "sticker encoded");
    Ok(out)
}
