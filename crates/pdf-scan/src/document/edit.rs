use super::selection::{parse_page_order, parse_page_set};
use super::{rebuild_artifact, teardown};
use crate::options::ScanOptions;
use crate::session::DocumentSession;
use crate::store::{ArtifactStore, discard, discard_all};
use crate::types::*;

/// What remains after deleting pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The document was rebuilt with this many pages
    Remaining(usize),
    /// Every page was selected, so the document was removed
    DocumentRemoved,
}

/// Clean up a user-supplied title and give it a `.pdf` suffix
pub fn normalize_title(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScanError::Validation("PDF name cannot be empty".to_string()));
    }

    let cleaned: String = trimmed
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | '"') {
                '_'
            } else {
                c
            }
        })
        .collect();

    if cleaned.to_lowercase().ends_with(".pdf") {
        Ok(cleaned)
    } else {
        Ok(format!("{}.pdf", cleaned))
    }
}

/// Change the download name of the document. The PDF is not re-encoded.
pub fn rename_title(session: &mut DocumentSession, raw: &str) -> Result<String> {
    let doc = session
        .document
        .as_mut()
        .ok_or(ScanError::ArtifactMissing)?;

    let title = normalize_title(raw)?;
    log::info!("Renaming '{}' to '{}'", doc.title, title);
    doc.title = title.clone();
    Ok(title)
}

/// Delete the pages named by a `-`-joined list of 1-based numbers.
///
/// Deleting every page removes the document instead of producing an
/// empty PDF.
pub fn delete_pages(
    session: &mut DocumentSession,
    store: &dyn ArtifactStore,
    raw: &str,
    options: &ScanOptions,
) -> Result<DeleteOutcome> {
    let doc = session.document.as_ref().ok_or(ScanError::ArtifactMissing)?;
    let selected = parse_page_set(raw, doc.page_count())?;

    if selected.len() == doc.page_count() {
        teardown(session, store);
        return Ok(DeleteOutcome::DocumentRemoved);
    }

    let (mut kept_pages, mut kept_thumbnails) = (Vec::new(), Vec::new());
    let (mut removed_pages, mut removed_thumbnails) = (Vec::new(), Vec::new());
    for (index, (page, thumbnail)) in doc.pages.iter().zip(&doc.thumbnails).enumerate() {
        if selected.contains(&index) {
            removed_pages.push(page.clone());
            removed_thumbnails.push(thumbnail.clone());
        } else {
            kept_pages.push(page.clone());
            kept_thumbnails.push(thumbnail.clone());
        }
    }

    let (artifact, encoded) = rebuild_artifact(store, &kept_pages, options)?;
    let remaining = kept_pages.len();

    let Some(doc) = session.document.as_mut() else {
        return Err(ScanError::ArtifactMissing);
    };
    let old_artifact = std::mem::replace(&mut doc.artifact, artifact);
    doc.artifact_size = encoded.len() as u64;
    doc.quality = encoded.quality;
    doc.pages = kept_pages;
    doc.thumbnails = kept_thumbnails;

    let _ = discard(store, &old_artifact);
    discard_all(store, removed_pages.iter().chain(&removed_thumbnails));

    log::info!(
        "Deleted {} page(s), {} remaining",
        selected.len(),
        remaining
    );
    Ok(DeleteOutcome::Remaining(remaining))
}

/// Reorder pages by a `,`-joined permutation of 1-based numbers
pub fn reorder_pages(
    session: &mut DocumentSession,
    store: &dyn ArtifactStore,
    raw: &str,
    options: &ScanOptions,
) -> Result<()> {
    let doc = session.document.as_ref().ok_or(ScanError::ArtifactMissing)?;
    let order = parse_page_order(raw, doc.page_count())?;

    let pages: Vec<_> = order.iter().map(|&i| doc.pages[i].clone()).collect();
    let thumbnails: Vec<_> = order.iter().map(|&i| doc.thumbnails[i].clone()).collect();

    let (artifact, encoded) = rebuild_artifact(store, &pages, options)?;

    let Some(doc) = session.document.as_mut() else {
        return Err(ScanError::ArtifactMissing);
    };
    let old_artifact = std::mem::replace(&mut doc.artifact, artifact);
    doc.artifact_size = encoded.len() as u64;
    doc.quality = encoded.quality;
    doc.pages = pages;
    doc.thumbnails = thumbnails;

    let _ = discard(store, &old_artifact);

    log::info!("Reordered pages to {:?}", order);
    Ok(())
}
