//! Decoding of signature images supplied as `data:` URLs.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{GenericImageView, ImageFormat};

use crate::error::GenerationError;
use crate::layout::EmbeddedImage;

/// Decode a `data:image/png;base64,...` or `data:image/jpeg;base64,...` URL.
///
/// JPEG bytes are passed through untouched. Other formats are flattened
/// onto a white background, since signature pads usually emit transparent
/// PNGs.
pub fn decode_data_url(url: &str) -> Result<EmbeddedImage, GenerationError> {
    let (header, payload) = url
        .split_once(',')
        .ok_or_else(|| GenerationError::InvalidInput("Signature is not a data URL".to_string()))?;

    if !header.starts_with("data:image/") || !header.ends_with(";base64") {
        return Err(GenerationError::InvalidInput(
            "Signature must be a base64 image data URL".to_string(),
        ));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| GenerationError::InvalidInput(format!("Signature is not valid base64: {e}")))?;

    let format = image::guess_format(&bytes)
        .map_err(|e| GenerationError::InvalidInput(format!("Unrecognized signature image: {e}")))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| GenerationError::InvalidInput(format!("Failed to decode signature: {e}")))?;
    let (width, height) = img.dimensions();

    if format == ImageFormat::Jpeg {
        return Ok(EmbeddedImage {
            width,
            height,
            data: bytes,
            jpeg: true,
        });
    }

    let rgba = img.to_rgba8();
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        for channel in [r, g, b] {
            rgb.push(over_white(channel, a));
        }
    }

    Ok(EmbeddedImage {
        width,
        height,
        data: rgb,
        jpeg: false,
    })
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let a = u16::from(alpha);
    ((u16::from(channel) * a + 255 * (255 - a)) / 255) as u8
}

/// Largest box with the image's aspect ratio that fits `max_w` x `max_h`.
pub fn fit(image: &EmbeddedImage, max_w: f64, max_h: f64) -> (f64, f64) {
    if image.width == 0 || image.height == 0 {
        return (0.0, 0.0);
    }
    let scale = (max_w / f64::from(image.width)).min(max_h / f64::from(image.height));
    (f64::from(image.width) * scale, f64::from(image.height) * scale)
}
