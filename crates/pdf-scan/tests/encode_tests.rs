mod common;

use common::*;
use lopdf::{Document, Object};
use pdf_scan::*;

fn noisy_pages(count: u32, options: &ScanOptions) -> Vec<image::RgbImage> {
    let page = options.page_size();
    (0..count)
        .map(|seed| noise_image(page.width_px, page.height_px, seed))
        .collect()
}

#[test]
fn test_default_quality_levels() {
    assert_eq!(
        QualitySweep::default().levels(),
        vec![95, 85, 75, 65, 55, 45, 35, 25]
    );
}

#[test]
fn test_custom_quality_levels_stop_at_floor() {
    let sweep = QualitySweep {
        start: 50,
        step: 15,
        floor: 20,
    };
    assert_eq!(sweep.levels(), vec![50, 35, 20]);
}

#[test]
fn test_pages_become_valid_pdf_pages() {
    let options = small_options();
    let pages = noisy_pages(2, &options);

    let bytes = encode_at_quality(&pages, 80, &options.page_size()).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let page_ids: Vec<_> = doc.get_pages().values().copied().collect();
    assert_eq!(page_ids.len(), 2);

    let media_box = doc
        .get_dictionary(page_ids[0])
        .unwrap()
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .clone();
    let width = match &media_box[2] {
        Object::Real(w) => *w,
        Object::Integer(w) => *w as f32,
        other => panic!("Unexpected MediaBox entry {:?}", other),
    };
    assert!((width - 595.28).abs() < 0.01);
}

#[test]
fn test_generous_budget_keeps_top_quality() {
    let options = small_options();
    let pages = noisy_pages(1, &options);

    let encoded = encode_document(&pages, &options).unwrap();
    assert_eq!(encoded.quality, 95);
    assert!(encoded.within_budget);
    assert!(encoded.len() as u64 <= options.max_pdf_bytes);
}

#[test]
fn test_budget_met_whenever_lowest_quality_meets_it() {
    let mut options = small_options();
    let pages = noisy_pages(2, &options);

    let lowest = *options.quality.levels().last().unwrap();
    let lowest_size = encode_at_quality(&pages, lowest, &options.page_size())
        .unwrap()
        .len() as u64;
    let top_size = encode_at_quality(&pages, options.quality.start, &options.page_size())
        .unwrap()
        .len() as u64;
    assert!(top_size > lowest_size);

    options.max_pdf_bytes = lowest_size;
    let encoded = encode_document(&pages, &options).unwrap();
    assert!(encoded.within_budget);
    assert!(encoded.len() as u64 <= lowest_size);
    assert!(encoded.quality >= lowest);
    assert_eq!(pdf_page_count(&encoded.bytes), 2);
}

#[test]
fn test_unreachable_budget_returns_last_attempt() {
    let mut options = small_options();
    options.max_pdf_bytes = 100;
    let pages = noisy_pages(2, &options);

    let encoded = encode_document(&pages, &options).unwrap();
    assert!(!encoded.within_budget);
    assert_eq!(encoded.quality, 25);
    assert!(!encoded.is_empty());
    assert_eq!(pdf_page_count(&encoded.bytes), 2);
}

#[test]
fn test_encoding_is_deterministic() {
    let mut options = small_options();
    let pages = noisy_pages(3, &options);
    options.max_pdf_bytes = encode_at_quality(&pages, 60, &options.page_size())
        .unwrap()
        .len() as u64;

    let first = encode_document(&pages, &options).unwrap();
    let second = encode_document(&pages, &options).unwrap();
    assert_eq!(first.quality, second.quality);
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn test_no_pages_is_an_error() {
    let options = small_options();
    assert!(matches!(
        encode_document(&[], &options),
        Err(ScanError::NoPages)
    ));
}

#[tokio::test]
async fn test_build_pdf_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("landscape.jpg");
    let second = dir.path().join("portrait.png");
    std::fs::write(&first, jpeg_bytes(&gradient_image(300, 200))).unwrap();
    std::fs::write(&second, png_bytes(&gradient_image(80, 120))).unwrap();

    let images = load_images(&[&first, &second]).await.unwrap();
    assert_eq!(images[0].file_name.as_deref(), Some("landscape.jpg"));

    let pdf = build_pdf(images, &small_options()).await.unwrap();
    let output = dir.path().join("out.pdf");
    save_pdf(&pdf, &output).await.unwrap();

    assert_eq!(pdf_page_count(&std::fs::read(&output).unwrap()), 2);
}
