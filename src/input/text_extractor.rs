//! Text extraction from in-memory documents

use crate::error::{RankerError, Result};
use pulldown_cmark::{Event, Parser, TagEnd};
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        // pdf-extract panics on some malformed inputs instead of returning an error
        let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|_| RankerError::PdfExtraction("PDF parser aborted on malformed input".to_string()))?
            .map_err(|e| RankerError::PdfExtraction(format!("Failed to extract text from PDF: {}", e)))?;

        Ok(pages
            .into_iter()
            .filter(|page| !page.trim().is_empty())
            .collect::<Vec<_>>()
            .concat())
    }
}

/// Word-processor documents: paragraph texts joined by newlines
pub struct DocxExtractor;

impl DocxExtractor {
    fn document_xml(bytes: &[u8]) -> Result<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| RankerError::DocxExtraction(format!("not a DOCX container: {}", e)))?;
        let mut entry = archive
            .by_name("word/document.xml")
            .map_err(|e| RankerError::DocxExtraction(format!("missing word/document.xml: {}", e)))?;

        let mut xml = String::new();
        entry.read_to_string(&mut xml)?;
        Ok(xml)
    }

    /// Paragraphs in document order. Text-box paragraphs nest inside a run
    /// of their host paragraph, so each open paragraph keeps its slot.
    fn paragraphs(xml: &str) -> Result<Vec<String>> {
        let mut reader = Reader::from_str(xml);
        let mut paragraphs: Vec<String> = Vec::new();
        let mut open: Vec<usize> = Vec::new();
        let mut run_depth = 0usize;
        let mut in_text_run = false;

        loop {
            let current = open.last().copied();
            match reader.read_event() {
                Ok(XmlEvent::Start(e)) => match e.local_name().as_ref() {
                    b"p" => {
                        open.push(paragraphs.len());
                        paragraphs.push(String::new());
                    }
                    b"r" => run_depth += 1,
                    b"t" => in_text_run = true,
                    _ => {}
                },
                Ok(XmlEvent::End(e)) => match e.local_name().as_ref() {
                    b"p" => {
                        open.pop();
                    }
                    b"r" => run_depth = run_depth.saturating_sub(1),
                    b"t" => in_text_run = false,
                    _ => {}
                },
                // tab stops in paragraph properties are also `w:tab`
                Ok(XmlEvent::Empty(e)) => match (e.local_name().as_ref(), current) {
                    (b"tab", Some(i)) if run_depth > 0 => paragraphs[i].push('\t'),
                    (b"br" | b"cr", Some(i)) if run_depth > 0 => paragraphs[i].push('\n'),
                    (b"p", _) => paragraphs.push(String::new()),
                    _ => {}
                },
                Ok(XmlEvent::Text(t)) if in_text_run => {
                    let text = t
                        .unescape()
                        .map_err(|e| RankerError::DocxExtraction(format!("bad text node: {}", e)))?;
                    if let Some(i) = current {
                        paragraphs[i].push_str(&text);
                    }
                }
                Ok(XmlEvent::Eof) => break,
                Err(e) => {
                    return Err(RankerError::DocxExtraction(format!(
                        "malformed document.xml at byte {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
        }

        Ok(paragraphs)
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let xml = Self::document_xml(bytes)?;
        Ok(Self::paragraphs(&xml)?.join("\n"))
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Markdown rendered down to its text content, one block per line
pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let source = String::from_utf8_lossy(bytes);
        let mut text = String::new();

        for event in Parser::new(&source) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                Event::End(TagEnd::Paragraph)
                | Event::End(TagEnd::Heading(_))
                | Event::End(TagEnd::Item)
                | Event::End(TagEnd::CodeBlock) => text.push('\n'),
                _ => {}
            }
        }

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_with(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_docx_paragraphs_in_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Chef with 10 years</w:t></w:r><w:r><w:t xml:space="preserve"> experience</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Pastry &amp; bread</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let text = DocxExtractor.extract(&docx_with(xml)).unwrap();
        assert_eq!(text, "Chef with 10 years experience\n\nPastry & bread");
    }

    #[test]
    fn test_docx_text_box_keeps_host_paragraph() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>Senior Python engineer</w:t></w:r><w:r><w:pict><w:txbxContent><w:p><w:r><w:t>Sidebar</w:t></w:r></w:p></w:txbxContent></w:pict></w:r><w:r><w:t xml:space="preserve"> tail</w:t></w:r></w:p>
</w:body></w:document>"#;

        let text = DocxExtractor.extract(&docx_with(xml)).unwrap();
        assert_eq!(text, "Senior Python engineer tail\nSidebar");
    }

    #[test]
    fn test_docx_tab_stops_are_not_text() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Name</w:t><w:tab/><w:t>Jane Roe</w:t><w:br/><w:t>Berlin</w:t></w:r></w:p>
</w:body></w:document>"#;

        let text = DocxExtractor.extract(&docx_with(xml)).unwrap();
        assert_eq!(text, "Name\tJane Roe\nBerlin");
    }

    #[test]
    fn test_docx_rejects_non_zip() {
        let err = DocxExtractor.extract(b"plain bytes").unwrap_err();
        assert!(matches!(err, RankerError::DocxExtraction(_)));
    }

    #[test]
    fn test_pdf_rejects_garbage() {
        let err = PdfExtractor.extract(b"%PDF-1.4 this is not really a pdf").unwrap_err();
        assert!(matches!(err, RankerError::PdfExtraction(_)));
    }

    #[test]
    fn test_markdown_strips_formatting() {
        let md = "# Senior Engineer\n\nWe need **Rust** and `tokio`.\n\n- APIs\n- Databases\n";
        let text = MarkdownExtractor.extract(md.as_bytes()).unwrap();
        assert!(!text.contains('#'));
        assert!(!text.contains("**"));
        assert!(text.contains("We need Rust and tokio."));
        assert!(text.contains("Databases"));
    }
}
