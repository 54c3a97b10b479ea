//! Integration tests for the HandbookBuilder API

use std::fs;

use proofpass_handbook::{
    HandbookBuilder,
    config::{HandbookConfig, StyleConfig},
    content,
};

#[test]
fn test_build_writes_pdf_and_diagrams() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join(content::OUTPUT_FILE);

    let builder = HandbookBuilder::default();
    let report = builder
        .build(&content::proofpass_handbook(), &output)
        .expect("Failed to build handbook");

    assert_eq!(report.pdf_path, output);
    assert!(report.page_count >= 5, "pages: {}", report.page_count);

    let pdf = fs::read(&output).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(pdf.len(), report.pdf_bytes);

    assert_eq!(
        report.diagrams,
        vec![
            dir.path().join("architecture_diagram.png"),
            dir.path().join("sequence_flow.png"),
        ]
    );
    for path in &report.diagrams {
        let png = fs::read(path).unwrap();
        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"), "{}", path.display());
    }
    assert!(!dir.path().join("architecture_diagram.svg").exists());
}

#[test]
fn test_rebuild_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("handbook.pdf");
    let builder = HandbookBuilder::default();
    let document = content::proofpass_handbook();

    builder.build(&document, &output).unwrap();
    let first = fs::read(&output).unwrap();
    builder.build(&document, &output).unwrap();
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_build_overwrites_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("handbook.pdf");
    fs::write(&output, b"stale").unwrap();

    HandbookBuilder::default()
        .build(&content::proofpass_handbook(), &output)
        .unwrap();

    assert!(fs::read(&output).unwrap().starts_with(b"%PDF-"));
}

#[test]
fn test_diagrams_removed_when_not_kept() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("handbook.pdf");
    let builder = HandbookBuilder::new(HandbookConfig::new(false, StyleConfig::default()));

    let report = builder
        .build(&content::proofpass_handbook(), &output)
        .unwrap();

    assert!(report.diagrams.is_empty());
    assert!(output.exists());
    assert!(!dir.path().join("architecture_diagram.png").exists());
    assert!(!dir.path().join("sequence_flow.png").exists());
}

#[test]
fn test_missing_output_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing").join("handbook.pdf");

    let err = HandbookBuilder::default()
        .build(&content::proofpass_handbook(), &output)
        .unwrap_err();

    assert!(err.to_string().contains("I/O error"), "{err}");
}

#[test]
fn test_transparent_background() {
    let builder = HandbookBuilder::new(HandbookConfig::new(true, StyleConfig::new(None)));
    let layout = builder.layout_diagram(&content::ARCHITECTURE).unwrap();
    assert!(layout.background().is_none());
}
