//! Page normalization
//!
//! Turns an arbitrary uploaded image into a page raster of exactly the
//! target pixel size:
//! 1. Decode and copy the pixels into a fresh RGB raster (drops EXIF,
//!    ICC profiles and any other side data; orientation tags are not applied)
//! 2. Centre-crop to the page aspect ratio
//! 3. Resize to the target pixel size with a Lanczos filter

use crate::types::*;
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Crop rectangle in source pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Normalize encoded image bytes into a page raster
pub fn normalize_page(bytes: &[u8], page: &PageSize) -> Result<RgbImage> {
    let decoded = image::load_from_memory(bytes)?;
    let clean = strip_metadata(decoded)?;
    Ok(fit_to_page(&clean, page))
}

/// Copy the decoded pixels into a freshly allocated RGB raster.
///
/// Nothing but the pixel grid survives; the result has the decoded
/// dimensions in their stored orientation.
pub fn strip_metadata(decoded: image::DynamicImage) -> Result<RgbImage> {
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(ScanError::EmptyImage { width, height });
    }

    let pixels = decoded.into_rgb8().into_raw();
    RgbImage::from_raw(width, height, pixels).ok_or(ScanError::EmptyImage { width, height })
}

/// Centre-crop a clean raster to the page ratio and resize it to the page
pub fn fit_to_page(image: &RgbImage, page: &PageSize) -> RgbImage {
    let crop = crop_box(image.width(), image.height(), page);
    let cropped = imageops::crop_imm(image, crop.x, crop.y, crop.width, crop.height).to_image();

    if cropped.dimensions() == (page.width_px, page.height_px) {
        return cropped;
    }
    imageops::resize(&cropped, page.width_px, page.height_px, FilterType::Lanczos3)
}

/// Compute the centred crop that gives a source image the page's aspect ratio.
///
/// Ratios are compared by cross-multiplication so an image that already has
/// the page ratio is never trimmed by rounding. Extents are truncated, so an
/// odd remainder leaves the extra pixel on the trailing edge.
pub fn crop_box(width: u32, height: u32, page: &PageSize) -> CropBox {
    let (w, h) = (width as u64, height as u64);
    let (tw, th) = (page.width_px as u64, page.height_px as u64);

    if w * th > h * tw {
        // Wider than the page: trim left and right
        let new_width = ((h * tw / th) as u32).max(1).min(width);
        CropBox {
            x: (width - new_width) / 2,
            y: 0,
            width: new_width,
            height,
        }
    } else {
        // Taller than (or exactly) the page: trim top and bottom
        let new_height = ((w * th / tw) as u32).max(1).min(height);
        CropBox {
            x: 0,
            y: (height - new_height) / 2,
            width,
            height: new_height,
        }
    }
}

/// Normalize a batch of uploads, failing on the first bad image.
///
/// The failing position is reported so the caller can tell the user which
/// file broke the batch; no partial result is returned.
pub fn normalize_batch(images: &[SourceImage], page: &PageSize) -> Result<Vec<RgbImage>> {
    if images.is_empty() {
        return Err(ScanError::UploadEmpty);
    }

    images
        .iter()
        .enumerate()
        .map(|(index, source)| {
            normalize_page(&source.bytes, page).map_err(|e| {
                log::warn!(
                    "Rejecting upload batch: image {} ({}) failed: {}",
                    index + 1,
                    source.file_name.as_deref().unwrap_or("unnamed"),
                    e
                );
                ScanError::ImageProcessing {
                    index,
                    source: Box::new(e),
                }
            })
        })
        .collect()
}
