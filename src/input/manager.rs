//! Routes documents to the right extractor and screens out unusable text

use crate::error::{RankerError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{debug, info};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Extract text from a downloaded resume.
    ///
    /// Only PDF and DOCX are accepted for resumes. A document that parses but
    /// holds nothing but whitespace is reported as `EmptyText`.
    pub fn extract_document(&self, bytes: &[u8], file_type: FileType, name: &str) -> Result<String> {
        let text = match file_type {
            FileType::Pdf => {
                debug!("Extracting text from PDF: {}", name);
                PdfExtractor.extract(bytes)?
            }
            FileType::Docx => {
                debug!("Extracting text from DOCX: {}", name);
                DocxExtractor.extract(bytes)?
            }
            FileType::Text | FileType::Markdown | FileType::Unknown => {
                return Err(RankerError::UnsupportedFormat(name.to_string()));
            }
        };

        if text.trim().is_empty() {
            return Err(RankerError::EmptyText(name.to_string()));
        }
        Ok(text)
    }

    /// Read a job description from a `.txt` or `.md` file
    pub async fn read_job_description(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(RankerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(FileType::from_extension)
            .unwrap_or(FileType::Text);

        let bytes = fs::read(path).await?;
        let text = match file_type {
            FileType::Markdown => {
                info!("Processing markdown job description: {}", path.display());
                MarkdownExtractor.extract(&bytes)?
            }
            FileType::Text => PlainTextExtractor.extract(&bytes)?,
            _ => {
                return Err(RankerError::UnsupportedFormat(format!(
                    "job descriptions must be .txt or .md: {}",
                    path.display()
                )))
            }
        };

        if text.trim().is_empty() {
            return Err(RankerError::InvalidInput(format!(
                "Job description is empty: {}",
                path.display()
            )));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_resume_format() {
        let err = InputManager::new()
            .extract_document(b"col1,col2", FileType::Unknown, "scores.csv")
            .unwrap_err();
        assert!(matches!(err, RankerError::UnsupportedFormat(name) if name == "scores.csv"));
    }

    #[test]
    fn test_plain_text_is_not_a_resume_format() {
        let err = InputManager::new()
            .extract_document(b"hello", FileType::Text, "notes.txt")
            .unwrap_err();
        assert!(matches!(err, RankerError::UnsupportedFormat(_)));
    }
}
