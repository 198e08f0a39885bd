//! End-to-end runs against real PDF files on disk

use folio_domain::{ProcessingMode, TextExtractor};
use folio_extractor::{
    discover_pdfs, write_results, ExtractionSchema, Extractor, ExtractorConfig, FieldValue,
    Fields, OutputFormat, PdfTextBackend,
};
use folio_llm::MockProvider;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::fs;
use std::path::Path;

/// Write a one-page PDF showing `text` in Courier
fn write_text_pdf(path: &Path, text: &str) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn schema() -> ExtractionSchema {
    ExtractionSchema::from_json(
        r#"{"fields": [{"name": "title", "description": "Document title"}]}"#,
    )
    .unwrap()
}

#[test]
fn test_backend_reads_generated_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.pdf");
    write_text_pdf(&path, "Hello World");

    let extracted = PdfTextBackend::new().extract_text(&path).unwrap();

    assert_eq!(extracted.page_count, 1);
    assert!(extracted.text.contains("Hello"));
    assert!(!extracted.is_blank());
}

#[tokio::test]
async fn test_valid_and_corrupt_pdf_yield_one_result() {
    let input = tempfile::tempdir().unwrap();
    write_text_pdf(&input.path().join("good.pdf"), "Hello World");
    fs::write(input.path().join("broken.pdf"), b"").unwrap();

    let paths = discover_pdfs(input.path(), false).unwrap();
    assert_eq!(paths.len(), 2);

    let llm = MockProvider::new(r#"{"title": "Grüße", "filename": "made-up.pdf"}"#);
    let extractor = Extractor::new(llm.clone(), PdfTextBackend::new(), ExtractorConfig::default());
    let outcome = extractor
        .extract_batch(&paths, &schema(), ProcessingMode::Text, |_| {})
        .await;

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].filename, "broken.pdf");
    assert_eq!(llm.call_count(), 1);

    let result = &outcome.results[0];
    assert_eq!(result.get("filename"), Some(&FieldValue::from("good.pdf")));
    assert_eq!(result.get("processing_mode"), Some(&FieldValue::from("text")));
    assert_eq!(result.metadata().page_count, Some(1));
    assert!(llm.prompts()[0].contains("Hello"));

    let output = tempfile::tempdir().unwrap();
    let json_path = output.path().join("results.json");
    write_results(&outcome.results, &json_path, OutputFormat::Json).unwrap();
    let written = fs::read_to_string(&json_path).unwrap();
    assert!(written.contains("Grüße"));
    let parsed: Vec<Fields> = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed, vec![result.record().clone()]);

    let csv_path = output.path().join("results.csv");
    write_results(&outcome.results, &csv_path, OutputFormat::Csv).unwrap();
    let csv = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("filename,page_count,processing_mode,title"));
    assert_eq!(lines.next(), Some("good.pdf,1,text,Grüße"));
}

#[tokio::test]
async fn test_file_mode_uploads_each_document() {
    let input = tempfile::tempdir().unwrap();
    write_text_pdf(&input.path().join("a.pdf"), "First");
    write_text_pdf(&input.path().join("b.pdf"), "Second");

    let paths = discover_pdfs(input.path(), false).unwrap();
    let llm = MockProvider::new(r#"{"title": null}"#);
    let extractor = Extractor::new(llm.clone(), PdfTextBackend::new(), ExtractorConfig::default());
    let outcome = extractor
        .extract_batch(&paths, &schema(), ProcessingMode::File, |_| {})
        .await;

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(llm.upload_count(), 2);
    assert_eq!(llm.delete_count(), 2);
    assert_eq!(outcome.results[0].get("title"), Some(&FieldValue::Null));
    assert!(outcome.results[0].get("page_count").is_none());
}
