//! Size-constrained PDF encoding
//!
//! Every page becomes a JPEG image XObject painted over the full media box.
//! The whole document is re-encoded at decreasing quality levels until it
//! fits the byte budget; all pages share one quality per attempt.

use crate::constants::PRODUCER;
use crate::options::ScanOptions;
use crate::types::*;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Name the page image is registered under in each page's resources
const PAGE_IMAGE_NAME: &[u8] = b"Im0";

/// Encode pages into a PDF no larger than the configured budget, if possible.
///
/// When no quality level meets the budget the last attempt is returned with
/// `within_budget` unset rather than failing.
pub fn encode_document(pages: &[RgbImage], options: &ScanOptions) -> Result<EncodedPdf> {
    if pages.is_empty() {
        return Err(ScanError::NoPages);
    }

    let page = options.page_size();
    let mut last = None;

    for quality in options.quality.levels() {
        let bytes = encode_at_quality(pages, quality, &page)?;
        let size = bytes.len() as u64;
        log::debug!(
            "Encoded {} page(s) at quality {}: {} bytes",
            pages.len(),
            quality,
            size
        );

        if size <= options.max_pdf_bytes {
            return Ok(EncodedPdf {
                bytes,
                quality,
                within_budget: true,
            });
        }
        last = Some((bytes, quality));
    }

    let (bytes, quality) = last.ok_or_else(|| {
        ScanError::Config("Quality sweep contains no levels".to_string())
    })?;
    log::warn!(
        "Document of {} page(s) is {} bytes at lowest quality {} (budget {} bytes)",
        pages.len(),
        bytes.len(),
        quality,
        options.max_pdf_bytes
    );

    Ok(EncodedPdf {
        bytes,
        quality,
        within_budget: false,
    })
}

/// Encode every page at a single quality level into a fresh PDF
pub fn encode_at_quality(pages: &[RgbImage], quality: u8, page: &PageSize) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(ScanError::NoPages);
    }

    let mut doc = Document::with_version("1.5");
    let pages_tree_id = doc.new_object_id();

    let mut page_refs = Vec::with_capacity(pages.len());
    for raster in pages {
        let image_id = doc.add_object(jpeg_xobject(raster, quality)?);
        let page_id = add_image_page(&mut doc, pages_tree_id, image_id, page)?;
        page_refs.push(Object::Reference(page_id));
    }

    // Create pages tree
    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    doc.objects.insert(pages_tree_id, Object::Dictionary(pages_dict));

    // Create catalog
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));
    let info_id = doc.add_object(Dictionary::from_iter(vec![(
        "Producer",
        Object::string_literal(PRODUCER),
    )]));

    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

/// Build a DCTDecode image stream for one page raster
fn jpeg_xobject(raster: &RgbImage, quality: u8) -> Result<Stream> {
    let mut jpeg_bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg_bytes, quality).encode_image(raster)?;

    let (width, height) = raster.dimensions();
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));

    // Already JPEG compressed
    Ok(Stream::new(dict, jpeg_bytes).with_compression(false))
}

/// Add a page that paints the given image over its whole media box
fn add_image_page(
    doc: &mut Document,
    parent_pages_id: ObjectId,
    image_id: ObjectId,
    page: &PageSize,
) -> Result<ObjectId> {
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(page.width_pt),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page.height_pt),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(PAGE_IMAGE_NAME.to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

    let mut xobjects = Dictionary::new();
    xobjects.set(PAGE_IMAGE_NAME, Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page.width_pt),
            Object::Real(page.height_pt),
        ]),
    );
    page_dict.set("Resources", Object::Dictionary(resources));
    page_dict.set("Contents", Object::Reference(content_id));

    Ok(doc.add_object(page_dict))
}
