//! File-based entry points for building documents outside a session

use crate::encode::encode_document;
use crate::normalize::normalize_batch;
use crate::options::ScanOptions;
use crate::types::*;
use std::path::Path;

/// Load image files as upload sources
pub async fn load_images(paths: &[impl AsRef<Path>]) -> Result<Vec<SourceImage>> {
    let mut images = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        images.push(SourceImage::named(bytes, name));
    }
    Ok(images)
}

/// Normalize and encode images into a size-constrained PDF
pub async fn build_pdf(images: Vec<SourceImage>, options: &ScanOptions) -> Result<EncodedPdf> {
    options.validate()?;
    let options = options.clone();

    // Decode, resize and encode are CPU-bound
    tokio::task::spawn_blocking(move || {
        let pages = normalize_batch(&images, &options.page_size())?;
        encode_document(&pages, &options)
    })
    .await?
}

/// Save an encoded document
pub async fn save_pdf(pdf: &EncodedPdf, path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path, &pdf.bytes).await?;
    Ok(())
}
