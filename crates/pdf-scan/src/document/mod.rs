//! Document operations on a session
//!
//! Every operation takes the session by `&mut` and the artifact store by
//! reference. New artifacts are written first and the session is only
//! touched once everything needed for the new state is stored; replaced
//! artifacts are then discarded best-effort.

mod edit;
mod lifecycle;
mod selection;

pub use edit::{DeleteOutcome, delete_pages, normalize_title, rename_title, reorder_pages};
pub use lifecycle::{
    Download, PreviewOutcome, delete_document, preview, read_artifact, read_thumbnail,
    take_download,
};
pub use selection::{parse_page_order, parse_page_set};

use crate::encode::encode_document;
use crate::normalize::normalize_batch;
use crate::options::ScanOptions;
use crate::session::{ActiveDocument, DocumentSession};
use crate::store::{ArtifactHandle, ArtifactKind, ArtifactStore, discard_all};
use crate::thumbnail::render_thumbnail;
use crate::types::*;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

/// Normalize uploads into a new document, replacing any existing one.
///
/// One undecodable image aborts the whole batch and leaves the session
/// untouched.
pub fn create_document(
    session: &mut DocumentSession,
    store: &dyn ArtifactStore,
    uploads: &[SourceImage],
    options: &ScanOptions,
) -> Result<()> {
    let pages = normalize_batch(uploads, &options.page_size())?;

    let mut pending = PendingArtifacts::new(store);
    let mut page_handles = Vec::with_capacity(pages.len());
    let mut thumbnail_handles = Vec::with_capacity(pages.len());
    for page in &pages {
        page_handles.push(pending.put(ArtifactKind::PageImage, &encode_page_image(page)?)?);
        thumbnail_handles.push(pending.put(
            ArtifactKind::Thumbnail,
            &render_thumbnail(page, options.thumbnail_box)?,
        )?);
    }

    let encoded = encode_document(&pages, options)?;
    let artifact = pending.put(ArtifactKind::Pdf, &encoded.bytes)?;
    pending.commit();

    log::info!(
        "Created {}-page document ({} bytes, quality {})",
        pages.len(),
        encoded.len(),
        encoded.quality
    );

    let previous = session.document.replace(ActiveDocument {
        artifact,
        artifact_size: encoded.len() as u64,
        quality: encoded.quality,
        title: options.default_title.clone(),
        viewed: false,
        pages: page_handles,
        thumbnails: thumbnail_handles,
    });
    if let Some(previous) = previous {
        log::info!("Replacing previous document '{}'", previous.title);
        discard_all(store, previous.handles());
    }

    Ok(())
}

/// Re-encode a document from its stored page images and store the result.
///
/// Returns the new artifact handle together with its size and quality.
pub(crate) fn rebuild_artifact(
    store: &dyn ArtifactStore,
    pages: &[ArtifactHandle],
    options: &ScanOptions,
) -> Result<(ArtifactHandle, EncodedPdf)> {
    let rasters = pages
        .iter()
        .map(|handle| decode_page_image(&store.get(handle)?))
        .collect::<Result<Vec<_>>>()?;

    let encoded = encode_document(&rasters, options)?;
    let artifact = store.put(ArtifactKind::Pdf, &encoded.bytes)?;
    Ok((artifact, encoded))
}

/// Remove the session's document and everything it owns
pub(crate) fn teardown(session: &mut DocumentSession, store: &dyn ArtifactStore) -> bool {
    match session.document.take() {
        Some(document) => {
            let removed = discard_all(store, document.handles());
            log::info!(
                "Removed document '{}' ({} artifact(s) deleted)",
                document.title,
                removed
            );
            true
        }
        None => false,
    }
}

/// Page images are kept lossless so re-encodes never compound JPEG loss
fn encode_page_image(page: &RgbImage) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    page.write_to(&mut cursor, ImageFormat::Png)?;
    Ok(cursor.into_inner())
}

fn decode_page_image(bytes: &[u8]) -> Result<RgbImage> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.into_rgb8())
}

/// Artifacts written during an operation that has not finished yet.
///
/// Dropped without `commit` (an error returned half way) they are discarded.
struct PendingArtifacts<'a> {
    store: &'a dyn ArtifactStore,
    handles: Vec<ArtifactHandle>,
}

impl<'a> PendingArtifacts<'a> {
    fn new(store: &'a dyn ArtifactStore) -> Self {
        Self {
            store,
            handles: Vec::new(),
        }
    }

    fn put(&mut self, kind: ArtifactKind, bytes: &[u8]) -> Result<ArtifactHandle> {
        let handle = self.store.put(kind, bytes)?;
        self.handles.push(handle.clone());
        Ok(handle)
    }

    fn commit(mut self) {
        self.handles.clear();
    }
}

impl Drop for PendingArtifacts<'_> {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            log::debug!("Rolling back {} stored artifact(s)", self.handles.len());
            discard_all(self.store, self.handles.iter());
        }
    }
}
