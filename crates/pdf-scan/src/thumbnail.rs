use crate::constants::THUMBNAIL_QUALITY;
use crate::options::ThumbnailBox;
use crate::types::Result;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops;

/// Largest size with the image's aspect ratio that fits inside the box
pub fn fit_within(width: u32, height: u32, bounds: ThumbnailBox) -> (u32, u32) {
    if width <= bounds.width && height <= bounds.height {
        return (width, height);
    }

    let scale = f64::min(
        bounds.width as f64 / width as f64,
        bounds.height as f64 / height as f64,
    );
    let fitted_width = ((width as f64 * scale).round() as u32).clamp(1, bounds.width.max(1));
    let fitted_height = ((height as f64 * scale).round() as u32).clamp(1, bounds.height.max(1));
    (fitted_width, fitted_height)
}

/// Render a small JPEG preview of a page for the edit view
pub fn render_thumbnail(page: &RgbImage, bounds: ThumbnailBox) -> Result<Vec<u8>> {
    let (width, height) = fit_within(page.width(), page.height(), bounds);
    let small = imageops::thumbnail(page, width, height);

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, THUMBNAIL_QUALITY).encode_image(&small)?;
    Ok(bytes)
}
