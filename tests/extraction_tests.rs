mod common;

use common::{docx, pdf, pdf_with_pages};
use resume_ranker::input::{FileType, InputManager};
use resume_ranker::RankerError;

#[test]
fn test_pdf_pages_are_concatenated_in_order() {
    let bytes = pdf_with_pages(&["Summary Rust engineer", "", "Experience payments platform"]);
    let text = InputManager::new()
        .extract_document(&bytes, FileType::Pdf, "cv.pdf")
        .unwrap();

    let summary = text.find("Summary").unwrap();
    let experience = text.find("Experience").unwrap();
    assert!(summary < experience);
    assert!(text.contains("payments"));
}

#[test]
fn test_pdf_without_text_is_empty() {
    let err = InputManager::new()
        .extract_document(&pdf(""), FileType::Pdf, "scan.pdf")
        .unwrap_err();
    assert!(matches!(err, RankerError::EmptyText(name) if name == "scan.pdf"));
}

#[test]
fn test_docx_paragraphs() {
    let bytes = docx(&["Jane Roe", "Platform engineer", "Kubernetes and Terraform"]);
    let text = InputManager::new()
        .extract_document(&bytes, FileType::Docx, "jane.docx")
        .unwrap();
    assert_eq!(text, "Jane Roe\nPlatform engineer\nKubernetes and Terraform");
}

#[test]
fn test_docx_with_blank_paragraphs_is_empty() {
    let err = InputManager::new()
        .extract_document(&docx(&["", "   "]), FileType::Docx, "blank.docx")
        .unwrap_err();
    assert!(matches!(err, RankerError::EmptyText(_)));
}

#[test]
fn test_resume_formats_are_restricted() {
    let manager = InputManager::new();
    for file_type in [FileType::Text, FileType::Markdown, FileType::Unknown] {
        let err = manager
            .extract_document(b"Rust engineer", file_type, "resume")
            .unwrap_err();
        assert!(matches!(err, RankerError::UnsupportedFormat(_)));
    }
}

