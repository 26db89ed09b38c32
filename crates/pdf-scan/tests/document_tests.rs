mod common;

use common::*;
use pdf_scan::*;

fn uploads(count: usize) -> Vec<SourceImage> {
    (0..count)
        .map(|i| {
            let image = noise_image(120 + i as u32 * 10, 90, i as u32);
            SourceImage::named(jpeg_bytes(&image), format!("page{}.jpg", i + 1))
        })
        .collect()
}

fn created_session(store: &dyn ArtifactStore, pages: usize) -> DocumentSession {
    let mut session = DocumentSession::new();
    create_document(&mut session, store, &uploads(pages), &small_options()).unwrap();
    session
}

#[test]
fn test_create_populates_session() {
    let store = MemoryStore::new();
    let session = created_session(&store, 2);

    assert_eq!(session.state(), DocumentState::Created);
    let doc = session.document.as_ref().unwrap();
    assert_eq!(doc.title, "converted.pdf");
    assert!(!doc.viewed);
    assert_eq!(doc.pages.len(), 2);
    assert_eq!(doc.thumbnails.len(), 2);
    assert!(store.contains(&doc.artifact));
    assert_eq!(doc.artifact.kind(), ArtifactKind::Pdf);
    // artifact + 2 page images + 2 thumbnails
    assert_eq!(store.len(), 5);

    let pdf = read_artifact(&session, &store).unwrap();
    assert_eq!(pdf.len() as u64, doc.artifact_size);
    assert_eq!(pdf_page_count(&pdf), 2);
}

#[test]
fn test_create_with_bad_image_leaves_session_untouched() {
    let store = MemoryStore::new();
    let mut session = created_session(&store, 1);
    let before = session.document.clone();

    let mut batch = uploads(2);
    batch.push(SourceImage::named(b"broken".to_vec(), "broken.jpg"));
    let result = create_document(&mut session, &store, &batch, &small_options());

    assert!(matches!(
        result,
        Err(ScanError::ImageProcessing { index: 2, .. })
    ));
    assert_eq!(session.document, before);
    assert_eq!(store.len(), 3);
}

#[test]
fn test_create_without_files_is_rejected() {
    let store = MemoryStore::new();
    let mut session = DocumentSession::new();
    let result = create_document(&mut session, &store, &[], &small_options());
    assert!(matches!(result, Err(ScanError::UploadEmpty)));
    assert_eq!(session.state(), DocumentState::Absent);
    assert!(store.is_empty());
}

#[test]
fn test_create_replaces_previous_document() {
    let store = MemoryStore::new();
    let mut session = created_session(&store, 3);
    let old_artifact = session.document.as_ref().unwrap().artifact.clone();

    create_document(&mut session, &store, &uploads(1), &small_options()).unwrap();

    assert!(!store.contains(&old_artifact));
    assert_eq!(session.document.as_ref().unwrap().page_count(), 1);
    assert_eq!(store.len(), 3);
}

#[test]
fn test_preview_is_view_once() {
    let store = MemoryStore::new();
    let mut session = created_session(&store, 1);

    match preview(&mut session, &store).unwrap() {
        PreviewOutcome::Shown(summary) => {
            assert_eq!(summary.state, DocumentState::Shown);
            assert_eq!(summary.page_count, 1);
        }
        other => panic!("Expected first preview to show, got {:?}", other),
    }
    assert_eq!(session.state(), DocumentState::Shown);
    assert!(read_artifact(&session, &store).is_ok());

    assert_eq!(
        preview(&mut session, &store).unwrap(),
        PreviewOutcome::Expired
    );
    assert_eq!(session.state(), DocumentState::Absent);
    assert!(store.is_empty());

    assert!(matches!(
        preview(&mut session, &store),
        Err(ScanError::ArtifactMissing)
    ));
}

#[test]
fn test_preview_with_vanished_artifact_is_missing() {
    let store = MemoryStore::new();
    let mut session = created_session(&store, 1);
    let artifact = session.document.as_ref().unwrap().artifact.clone();
    store.delete(&artifact).unwrap();

    assert!(matches!(
        preview(&mut session, &store),
        Err(ScanError::ArtifactMissing)
    ));
    assert!(matches!(
        read_artifact(&session, &store),
        Err(ScanError::ArtifactMissing)
    ));
}

#[test]
fn test_download_clears_session_regardless_of_view_state() {
    for previewed in [false, true] {
        let store = MemoryStore::new();
        let mut session = created_session(&store, 2);
        rename_title(&mut session, "receipts").unwrap();
        if previewed {
            preview(&mut session, &store).unwrap();
        }

        let download = take_download(&mut session, &store).unwrap();
        assert_eq!(download.title, "receipts.pdf");
        assert_eq!(pdf_page_count(&download.bytes), 2);
        assert_eq!(session.state(), DocumentState::Absent);
        assert!(store.is_empty());

        assert!(matches!(
            take_download(&mut session, &store),
            Err(ScanError::ArtifactMissing)
        ));
    }
}

#[test]
fn test_delete_document_is_idempotent() {
    let store = MemoryStore::new();
    let mut session = created_session(&store, 2);

    assert!(delete_document(&mut session, &store));
    assert!(store.is_empty());
    assert!(!delete_document(&mut session, &store));
    assert_eq!(session.state(), DocumentState::Absent);
}

#[test]
fn test_delete_some_pages_rebuilds() {
    let store = MemoryStore::new();
    let mut session = created_session(&store, 4);
    let before = session.document.clone().unwrap();

    let outcome = delete_pages(&mut session, &store, "2-4", &small_options()).unwrap();
    assert_eq!(outcome, DeleteOutcome::Remaining(2));

    let doc = session.document.as_ref().unwrap();
    assert_eq!(doc.pages, vec![before.pages[0].clone(), before.pages[2].clone()]);
    assert_eq!(
        doc.thumbnails,
        vec![before.thumbnails[0].clone(), before.thumbnails[2].clone()]
    );
    assert_ne!(doc.artifact, before.artifact);
    assert!(!store.contains(&before.artifact));
    assert!(!store.contains(&before.pages[1]));
    assert!(!store.contains(&before.thumbnails[3]));
    assert_eq!(store.len(), 5);

    let pdf = read_artifact(&session, &store).unwrap();
    assert_eq!(pdf_page_count(&pdf), 2);
}

#[test]
fn test_delete_all_pages_removes_document() {
    let store = MemoryStore::new();
    let mut session = created_session(&store, 3);

    let outcome = delete_pages(&mut session, &store, "1-2-3", &small_options()).unwrap();
    assert_eq!(outcome, DeleteOutcome::DocumentRemoved);
    assert_eq!(session.state(), DocumentState::Absent);
    assert!(session.document.is_none());
    assert!(store.is_empty());
}

#[test]
fn test_delete_pages_rejects_bad_selection() {
    let store = MemoryStore::new();
    let mut session = created_session(&store, 2);
    let before = session.document.clone();

    for raw in ["", "x", "3", "0-1"] {
        let result = delete_pages(&mut session, &store, raw, &small_options());
        assert!(matches!(result, Err(ScanError::Validation(_))), "{raw:?}");
    }
    assert_eq!(session.document, before);
    assert_eq!(store.len(), 5);
}

#[test]
fn test_reorder_length_mismatch_is_rejected() {
    let store = MemoryStore::new();
    let mut session = created_session(&store, 3);
    let before = session.document.clone();

    let result = reorder_pages(&mut session, &store, "2,1", &small_options());
    assert!(matches!(result, Err(ScanError::Validation(_))));
    assert_eq!(session.document, before);
    assert_eq!(store.len(), 7);
}

#[test]
fn test_reorder_permutes_pages_and_thumbnails() {
    let store = MemoryStore::new();
    let mut session = created_session(&store, 3);
    let before = session.document.clone().unwrap();

    reorder_pages(&mut session, &store, "3,1,2", &small_options()).unwrap();

    let doc = session.document.as_ref().unwrap();
    assert_eq!(
        doc.pages,
        vec![
            before.pages[2].clone(),
            before.pages[0].clone(),
            before.pages[1].clone()
        ]
    );
    assert_eq!(doc.thumbnails[0], before.thumbnails[2]);
    assert!(!store.contains(&before.artifact));
    assert!(store.contains(&doc.artifact));
    assert_eq!(store.len(), 7);
    assert_eq!(pdf_page_count(&read_artifact(&session, &store).unwrap()), 3);
}

#[test]
fn test_rename_title() {
    let store = MemoryStore::new();
    let mut session = created_session(&store, 1);

    assert_eq!(rename_title(&mut session, "  tax return ").unwrap(), "tax return.pdf");
    assert_eq!(rename_title(&mut session, "SCAN.PDF").unwrap(), "SCAN.PDF");
    assert_eq!(rename_title(&mut session, "a/b").unwrap(), "a_b.pdf");

    assert!(matches!(
        rename_title(&mut session, "   "),
        Err(ScanError::Validation(_))
    ));
    assert_eq!(session.document.as_ref().unwrap().title, "a_b.pdf");

    let mut empty = DocumentSession::new();
    assert!(matches!(
        rename_title(&mut empty, "x"),
        Err(ScanError::ArtifactMissing)
    ));
}

#[test]
fn test_thumbnails_by_page_number() {
    let store = MemoryStore::new();
    let session = created_session(&store, 2);

    let bytes = read_thumbnail(&session, &store, 2).unwrap();
    let thumb = image::load_from_memory(&bytes).unwrap();
    assert!(thumb.width() <= 200 && thumb.height() <= 300);

    assert!(read_thumbnail(&session, &store, 0).is_err());
    assert!(read_thumbnail(&session, &store, 3).is_err());
}

#[test]
fn test_notices_are_drained() {
    let mut session = DocumentSession::new();
    session.notify(NoticeLevel::Error, "No files selected");
    session.notify(NoticeLevel::Info, "PDF removed after refresh.");
    assert_eq!(session.notices().len(), 2);

    let notices = session.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(session.notices().is_empty());
}

#[test]
fn test_end_to_end_upload_and_download() {
    let dir = tempfile::tempdir().unwrap();
    let store = TempDirStore::new(dir.path()).unwrap();
    let options = ScanOptions::default();

    let batch = vec![
        SourceImage::named(jpeg_bytes(&gradient_image(3000, 2000)), "wide.jpg"),
        SourceImage::named(jpeg_bytes(&gradient_image(800, 1200)), "tall.jpg"),
    ];

    let mut session = DocumentSession::new();
    create_document(&mut session, &store, &batch, &options).unwrap();

    let doc = session.document.clone().unwrap();
    assert_eq!(doc.pages.len(), 2);
    let artifact_path = store.path_of(&doc.artifact).unwrap();
    assert!(artifact_path.is_file());
    assert!(std::fs::metadata(&artifact_path).unwrap().len() <= 1024 * 1024);

    let download = take_download(&mut session, &store).unwrap();
    assert_eq!(pdf_page_count(&download.bytes), 2);
    assert!(download.bytes.len() <= 1024 * 1024);

    assert!(!artifact_path.exists());
    assert!(session.document.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
