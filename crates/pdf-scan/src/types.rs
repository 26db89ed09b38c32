use crate::constants::{A4_DIMENSIONS_MM, mm_to_pt, mm_to_px};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("No files selected")]
    UploadEmpty,
    #[error("Error processing image {}: {}", .index + 1, .source)]
    ImageProcessing {
        /// Zero-based position in the batch
        index: usize,
        #[source]
        source: Box<ScanError>,
    },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("No PDF available")]
    ArtifactMissing,
    #[error("{0}")]
    Validation(String),
    #[error("No pages to encode")]
    NoPages,
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ScanError {
    /// Whether the error is caused by user input rather than the system
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ScanError::UploadEmpty
                | ScanError::ImageProcessing { .. }
                | ScanError::ArtifactMissing
                | ScanError::Validation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Legal,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A4 => A4_DIMENSIONS_MM,
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Resolve the paper into a rasterized page at the given resolution
    pub fn page_size(self, dpi: u32) -> PageSize {
        let (width_mm, height_mm) = self.dimensions_mm();
        PageSize {
            width_px: mm_to_px(width_mm, dpi),
            height_px: mm_to_px(height_mm, dpi),
            width_pt: mm_to_pt(width_mm),
            height_pt: mm_to_pt(height_mm),
        }
    }
}

/// Target geometry of a normalized page.
///
/// The pixel size is what every page raster is resized to; the point size
/// is the physical media box the raster is painted onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_px: u32,
    pub height_px: u32,
    pub width_pt: f32,
    pub height_pt: f32,
}

/// An uploaded image, as received
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
}

impl SourceImage {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: None,
        }
    }

    pub fn named(bytes: impl Into<Vec<u8>>, file_name: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: Some(file_name.into()),
        }
    }
}

/// Result of encoding a document under a size budget
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPdf {
    pub bytes: Vec<u8>,
    /// Quality level the pages were encoded at
    pub quality: u8,
    /// False when even the last attempted quality exceeded the budget
    pub within_budget: bool,
}

impl EncodedPdf {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
