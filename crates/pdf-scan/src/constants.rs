//! Shared constants for page normalization and PDF assembly
//!
//! This module centralizes the page geometry, size budget and quality sweep
//! defaults used throughout the scan pipeline.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Millimeters per inch
pub const MM_PER_INCH: f32 = 25.4;

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / MM_PER_INCH; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert millimeters to whole pixels at the given resolution
#[inline]
pub fn mm_to_px(mm: f32, dpi: u32) -> u32 {
    (mm / MM_PER_INCH * dpi as f32).round() as u32
}

// =============================================================================
// Page Geometry
// =============================================================================

/// Default raster resolution of normalized pages
pub const DEFAULT_DPI: u32 = 150;

/// A4 portrait dimensions in millimeters (8.27" × 11.69")
pub const A4_DIMENSIONS_MM: (f32, f32) = (210.0, 297.0);

/// Largest page raster side accepted from configuration
pub const MAX_PAGE_SIDE_PX: u32 = 20_000;

// =============================================================================
// Size Budget
// =============================================================================

/// Default maximum size of an encoded document (1 MiB)
pub const DEFAULT_MAX_PDF_BYTES: u64 = 1024 * 1024;

/// First quality level attempted by the sweep
pub const QUALITY_START: u8 = 95;

/// Quality decrement between attempts
pub const QUALITY_STEP: u8 = 10;

/// The sweep stops before going below this quality
pub const QUALITY_FLOOR: u8 = 20;

// =============================================================================
// Thumbnails
// =============================================================================

/// Bounding box for page thumbnails (width, height)
pub const THUMBNAIL_BOX: (u32, u32) = (200, 300);

/// JPEG quality used for thumbnails
pub const THUMBNAIL_QUALITY: u8 = 80;

// =============================================================================
// Documents
// =============================================================================

/// Title given to freshly created documents
pub const DEFAULT_TITLE: &str = "converted.pdf";

/// Producer string written into the document information dictionary
pub const PRODUCER: &str = concat!("pdf-scan ", env!("CARGO_PKG_VERSION"));
