use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::shared::error::DecodeError;
use crate::shared::frame::Frame;

/// Turns a base64 or data-URI image payload into an RGB [`Frame`].
///
/// Any raster format the `image` crate can sniff is accepted; alpha and
/// palette data are flattened to three channels.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageDecoder;

impl ImageDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, payload: &str) -> Result<Frame, DecodeError> {
        let encoded: String = strip_data_uri(payload)
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        if encoded.is_empty() {
            return Err(DecodeError::Empty);
        }

        let bytes = STANDARD.decode(encoded.as_bytes())?;
        let image = image::load_from_memory(&bytes)?;
        Ok(Frame::from_rgb_image(image.to_rgb8()))
    }
}

/// Drops everything up to and including the first comma, if any.
fn strip_data_uri(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    }
}
