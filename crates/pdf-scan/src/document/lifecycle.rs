//! View-once lifecycle of a document artifact
//!
//! - Created → preview → Shown (artifact still served)
//! - Shown → preview → Absent (artifact deleted)
//! - Created/Shown → download → Absent
//! - any → delete → Absent

use super::teardown;
use crate::session::{ActiveDocument, DocumentSession, DocumentSummary};
use crate::store::ArtifactStore;
use crate::types::*;

/// Result of a preview request
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    /// First view: the document is now marked as viewed
    Shown(DocumentSummary),
    /// Repeat view: the document has been removed
    Expired,
}

/// A document handed out for download
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub title: String,
    pub bytes: Vec<u8>,
}

/// The session's document, if its artifact still exists
fn live_document<'a>(
    session: &'a DocumentSession,
    store: &dyn ArtifactStore,
) -> Result<&'a ActiveDocument> {
    session
        .document
        .as_ref()
        .filter(|doc| store.contains(&doc.artifact))
        .ok_or(ScanError::ArtifactMissing)
}

/// Show the document once; a second preview destroys it
pub fn preview(session: &mut DocumentSession, store: &dyn ArtifactStore) -> Result<PreviewOutcome> {
    let viewed = live_document(session, store)?.viewed;

    if viewed {
        teardown(session, store);
        return Ok(PreviewOutcome::Expired);
    }

    if let Some(doc) = session.document.as_mut() {
        doc.viewed = true;
    }
    session
        .summary()
        .map(PreviewOutcome::Shown)
        .ok_or(ScanError::ArtifactMissing)
}

/// Raw PDF bytes for an embedded viewer; does not change any state
pub fn read_artifact(session: &DocumentSession, store: &dyn ArtifactStore) -> Result<Vec<u8>> {
    let doc = live_document(session, store)?;
    store.get(&doc.artifact)
}

/// Hand out the PDF and clear the session, whatever its viewed state
pub fn take_download(session: &mut DocumentSession, store: &dyn ArtifactStore) -> Result<Download> {
    let doc = live_document(session, store)?;
    let download = Download {
        title: doc.title.clone(),
        bytes: store.get(&doc.artifact)?,
    };

    teardown(session, store);
    Ok(download)
}

/// Delete the document if there is one. Returns whether anything was removed.
pub fn delete_document(session: &mut DocumentSession, store: &dyn ArtifactStore) -> bool {
    teardown(session, store)
}

/// Thumbnail of a 1-based page
pub fn read_thumbnail(
    session: &DocumentSession,
    store: &dyn ArtifactStore,
    page: usize,
) -> Result<Vec<u8>> {
    let doc = session.document.as_ref().ok_or(ScanError::ArtifactMissing)?;
    let handle = page
        .checked_sub(1)
        .and_then(|index| doc.thumbnails.get(index))
        .ok_or(ScanError::ArtifactMissing)?;
    store.get(handle)
}
