//! Per-session document state
//!
//! A `DocumentSession` is owned by whoever scopes a user's interaction (the
//! HTTP server keeps one per cookie) and is passed by `&mut` into every
//! document operation.

use crate::store::ArtifactHandle;

/// Lifecycle state of a session's document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DocumentState {
    /// No document
    Absent,
    /// Artifact exists and has not been previewed
    Created,
    /// Artifact has been previewed once
    Shown,
}

/// The live document of a session
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDocument {
    /// Current encoded PDF
    pub artifact: ArtifactHandle,
    /// Size of the encoded PDF in bytes
    pub artifact_size: u64,
    /// Quality level the PDF was encoded at
    pub quality: u8,
    /// Download file name, always `.pdf`-suffixed
    pub title: String,
    /// Set once the preview has been shown
    pub viewed: bool,
    /// Normalized page images, in page order
    pub pages: Vec<ArtifactHandle>,
    /// Thumbnails, parallel to `pages`
    pub thumbnails: Vec<ArtifactHandle>,
}

impl ActiveDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every artifact the document owns
    pub fn handles(&self) -> impl Iterator<Item = &ArtifactHandle> {
        std::iter::once(&self.artifact)
            .chain(self.pages.iter())
            .chain(self.thumbnails.iter())
    }
}

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message shown to the user on their next visit to the start page
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Snapshot of a document for display
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DocumentSummary {
    pub state: DocumentState,
    pub title: String,
    pub page_count: usize,
    pub size_bytes: u64,
    pub quality: u8,
}

/// State of one user's interaction
#[derive(Debug, Default, Clone)]
pub struct DocumentSession {
    pub document: Option<ActiveDocument>,
    notices: Vec<Notice>,
}

impl DocumentSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DocumentState {
        match &self.document {
            None => DocumentState::Absent,
            Some(doc) if doc.viewed => DocumentState::Shown,
            Some(_) => DocumentState::Created,
        }
    }

    pub fn summary(&self) -> Option<DocumentSummary> {
        let state = self.state();
        self.document.as_ref().map(|doc| DocumentSummary {
            state,
            title: doc.title.clone(),
            page_count: doc.page_count(),
            size_bytes: doc.artifact_size,
            quality: doc.quality,
        })
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    /// Remove and return all queued notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}
