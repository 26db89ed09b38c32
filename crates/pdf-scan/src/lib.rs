pub mod constants;
pub mod document;
pub mod encode;
mod io;
pub mod normalize;
mod options;
pub mod session;
pub mod store;
pub mod thumbnail;
mod types;

pub use document::{
    DeleteOutcome, Download, PreviewOutcome, create_document, delete_document, delete_pages,
    preview, read_artifact, read_thumbnail, rename_title, reorder_pages, take_download,
};
pub use encode::{encode_at_quality, encode_document};
pub use io::{build_pdf, load_images, save_pdf};
pub use normalize::{normalize_batch, normalize_page};
pub use options::*;
pub use session::{DocumentSession, DocumentState, DocumentSummary, Notice, NoticeLevel};
pub use store::{ArtifactHandle, ArtifactKind, ArtifactStore, MemoryStore, TempDirStore};
pub use types::*;
