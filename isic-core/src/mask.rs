//! Segmentation mask loading and binarization

use crate::error::{Result, ScoreError};
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageReader};
use ndarray::Array2;
use std::collections::BTreeSet;
use std::path::Path;

/// Pixel value marking the segmented region
pub const FOREGROUND: u8 = 255;

/// Pixel value marking the background
pub const BACKGROUND: u8 = 0;

/// A two-valued segmentation mask
///
/// Every pixel is either [`BACKGROUND`] or [`FOREGROUND`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    pixels: Array2<u8>,
}

impl BinaryMask {
    /// Raw pixel values, rows x columns
    pub fn pixels(&self) -> &Array2<u8> {
        &self.pixels
    }

    /// Dimensions as `(height, width)`
    pub fn dim(&self) -> (usize, usize) {
        self.pixels.dim()
    }

    /// `true` wherever the pixel is foreground
    pub fn to_bool(&self) -> Array2<bool> {
        self.pixels.mapv(|v| v == FOREGROUND)
    }

    /// Number of foreground pixels
    pub fn foreground_count(&self) -> usize {
        self.pixels.iter().filter(|&&v| v == FOREGROUND).count()
    }

    /// Consume the mask, returning its pixels
    pub fn into_pixels(self) -> Array2<u8> {
        self.pixels
    }
}

/// Decode a single-channel image file into a pixel array
///
/// 1-bit greyscale sources are expanded to 8-bit values 0 and 255 while
/// decoding. Anything that does not decode to 8-bit greyscale is rejected.
pub fn load_segmentation_image(path: &Path) -> Result<Array2<u8>> {
    let name = file_name(path);
    let decode_error = |reason: String| ScoreError::ImageDecode {
        name: name.clone(),
        reason,
    };

    let decoder = ImageReader::open(path)
        .map_err(|e| decode_error(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_error(e.to_string()))?
        .into_decoder()
        .map_err(|e| decode_error(e.to_string()))?;
    let bilevel = decoder.original_color_type() == ExtendedColorType::L1;
    let image = DynamicImage::from_decoder(decoder).map_err(|e| decode_error(e.to_string()))?;
    if bilevel {
        tracing::debug!(image = %name, "expanded 1-bit mask to 8-bit greyscale");
    }

    let luma = match image {
        DynamicImage::ImageLuma8(luma) => luma,
        other => {
            tracing::debug!(image = %name, color = ?other.color(), "rejected non-greyscale image");
            return Err(ScoreError::NotGreyscale(name.clone()));
        }
    };

    let (width, height) = luma.dimensions();
    Array2::from_shape_vec((height as usize, width as usize), luma.into_raw())
        .map_err(|e| decode_error(e.to_string()))
}

/// Ensure an image holds only 0 and 255, correcting it if possible
///
/// An image with exactly one non-zero value other than 255 is rescaled so
/// that value becomes 255. Anything else fails.
pub fn assert_binary_image(image: Array2<u8>, image_name: &str) -> Result<BinaryMask> {
    let values: BTreeSet<u8> = image.iter().copied().collect();
    if values.iter().all(|&v| v == BACKGROUND || v == FOREGROUND) {
        return Ok(BinaryMask { pixels: image });
    }

    let high_values: Vec<u8> = values.iter().copied().filter(|&v| v != BACKGROUND).collect();
    if values.len() > 2 || high_values.len() != 1 {
        return Err(ScoreError::NotBinary(image_name.to_string()));
    }

    let high = u32::from(high_values[0]);
    let corrected = image.mapv(|v| (u32::from(v) / high * u32::from(FOREGROUND)) as u8);
    if corrected
        .iter()
        .any(|&v| v != BACKGROUND && v != FOREGROUND)
    {
        return Err(ScoreError::NotBinary(image_name.to_string()));
    }

    tracing::warn!(image = image_name, high, "rescaled mask to 0/255");
    Ok(BinaryMask { pixels: corrected })
}

/// Load a mask file and validate that it is binary
pub fn load_binary_mask(path: &Path) -> Result<BinaryMask> {
    let image = load_segmentation_image(path)?;
    assert_binary_image(image, &file_name(path))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
