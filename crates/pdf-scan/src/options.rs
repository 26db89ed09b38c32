use crate::constants::*;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Quality levels tried by the size-constrained encoder.
///
/// Levels run from `start` downwards in steps of `step` and stop before
/// going below `floor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QualitySweep {
    pub start: u8,
    pub step: u8,
    pub floor: u8,
}

impl Default for QualitySweep {
    fn default() -> Self {
        Self {
            start: QUALITY_START,
            step: QUALITY_STEP,
            floor: QUALITY_FLOOR,
        }
    }
}

impl QualitySweep {
    /// Every quality level the sweep may attempt, highest first
    pub fn levels(&self) -> Vec<u8> {
        let step = self.step.max(1);
        let floor = self.floor;
        std::iter::successors(Some(self.start), |q| q.checked_sub(step))
            .take_while(|q| *q >= floor)
            .collect()
    }
}

/// Bounding box thumbnails are fitted into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThumbnailBox {
    pub width: u32,
    pub height: u32,
}

impl Default for ThumbnailBox {
    fn default() -> Self {
        Self {
            width: THUMBNAIL_BOX.0,
            height: THUMBNAIL_BOX.1,
        }
    }
}

/// Scan pipeline configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScanOptions {
    // Page geometry
    pub paper_size: PaperSize,
    pub dpi: u32,

    // Size budget
    pub max_pdf_bytes: u64,
    pub quality: QualitySweep,

    // Edit view
    pub thumbnail_box: ThumbnailBox,

    // Naming
    pub default_title: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            dpi: DEFAULT_DPI,
            max_pdf_bytes: DEFAULT_MAX_PDF_BYTES,
            quality: QualitySweep::default(),
            thumbnail_box: ThumbnailBox::default(),
            default_title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl ScanOptions {
    /// Target page geometry derived from paper size and resolution
    pub fn page_size(&self) -> PageSize {
        self.paper_size.page_size(self.dpi)
    }

    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ScanError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ScanError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(ScanError::Config("DPI must be greater than zero".to_string()));
        }

        let page = self.page_size();
        if page.width_px == 0 || page.height_px == 0 {
            return Err(ScanError::Config(format!(
                "Page size {:?} at {} DPI has no pixels",
                self.paper_size, self.dpi
            )));
        }
        if page.width_px > MAX_PAGE_SIDE_PX || page.height_px > MAX_PAGE_SIDE_PX {
            return Err(ScanError::Config(format!(
                "Page size {:?} at {} DPI is {}x{} px, above the {} px limit",
                self.paper_size, self.dpi, page.width_px, page.height_px, MAX_PAGE_SIDE_PX
            )));
        }

        let QualitySweep { start, step, floor } = self.quality;
        if step == 0 {
            return Err(ScanError::Config("Quality step must be greater than zero".to_string()));
        }
        if floor == 0 || floor > start || start > 100 {
            return Err(ScanError::Config(format!(
                "Quality range {}..={} must satisfy 1 <= floor <= start <= 100",
                floor, start
            )));
        }

        if self.max_pdf_bytes == 0 {
            return Err(ScanError::Config("Maximum PDF size must be greater than zero".to_string()));
        }

        if self.thumbnail_box.width == 0 || self.thumbnail_box.height == 0 {
            return Err(ScanError::Config("Thumbnail box must not be empty".to_string()));
        }

        if self.default_title.trim().is_empty() {
            return Err(ScanError::Config("Default title is empty".to_string()));
        }

        Ok(())
    }
}
