//! File type detection

use crate::config::{MIME_DOCX, MIME_PDF};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileType {
    Pdf,
    Docx,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "docx" => FileType::Docx,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn from_mime(mime: &str) -> Self {
        match mime {
            MIME_PDF => FileType::Pdf,
            MIME_DOCX => FileType::Docx,
            "text/plain" => FileType::Text,
            "text/markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    /// MIME type wins; the file name extension is the fallback
    pub fn detect(mime: &str, file_name: &str) -> Self {
        match Self::from_mime(mime) {
            FileType::Unknown => Path::new(file_name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(Self::from_extension)
                .unwrap_or(FileType::Unknown),
            known => known,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_prefers_mime() {
        assert_eq!(FileType::detect(MIME_PDF, "resume.docx"), FileType::Pdf);
        assert_eq!(FileType::detect("", "Resume.DOCX"), FileType::Docx);
        assert_eq!(FileType::detect("application/octet-stream", "cv.pdf"), FileType::Pdf);
        assert_eq!(FileType::detect("image/png", "scan.png"), FileType::Unknown);
        assert_eq!(FileType::detect("", "no_extension"), FileType::Unknown);
    }
}
