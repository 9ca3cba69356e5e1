//! Shared fakes and document builders for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use resume_ranker::config::{MIME_DOCX, MIME_PDF};
use resume_ranker::drive::{DriveReference, FileDescriptor, StorageGateway};
use resume_ranker::processing::{Embedding, Encoder};
use resume_ranker::{RankerError, Result};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const FOLDER_URL: &str = "https://drive.google.com/drive/folders/resumes42?usp=sharing";

/// Bag-of-words encoder: identical word sets give similarity 1.0
pub struct HashingEncoder {
    dims: usize,
    calls: AtomicUsize,
}

impl HashingEncoder {
    pub fn new() -> Self {
        Self {
            dims: 512,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Encoder for HashingEncoder {
    fn encode(&self, text: &str) -> Result<Embedding> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut vector = vec![0.0f32; self.dims];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            vector[(hasher.finish() as usize) % self.dims] += 1.0;
        }
        Ok(vector)
    }

    fn model_name(&self) -> &str {
        "hashing-test-encoder"
    }
}

enum StoredFile {
    Bytes(Vec<u8>),
    Fails(String),
}

/// In-memory folder keyed by folder id
#[derive(Default)]
pub struct FakeGateway {
    folder_id: String,
    listing: Vec<FileDescriptor>,
    contents: HashMap<String, StoredFile>,
    list_error: Option<String>,
    downloads: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new(folder_id: &str) -> Self {
        Self {
            folder_id: folder_id.to_string(),
            ..Self::default()
        }
    }

    pub fn with_file(mut self, id: &str, name: &str, mime: &str, bytes: Vec<u8>) -> Self {
        self.listing.push(descriptor(id, name, mime));
        self.contents.insert(id.to_string(), StoredFile::Bytes(bytes));
        self
    }

    pub fn with_failing_file(mut self, id: &str, name: &str, mime: &str, error: &str) -> Self {
        self.listing.push(descriptor(id, name, mime));
        self.contents
            .insert(id.to_string(), StoredFile::Fails(error.to_string()));
        self
    }

    pub fn with_list_error(mut self, error: &str) -> Self {
        self.list_error = Some(error.to_string());
        self
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

fn descriptor(id: &str, name: &str, mime: &str) -> FileDescriptor {
    FileDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: mime.to_string(),
    }
}

#[async_trait]
impl StorageGateway for FakeGateway {
    async fn list_files(&self, folder: &DriveReference) -> Result<Vec<FileDescriptor>> {
        if let Some(error) = &self.list_error {
            return Err(RankerError::Gateway(error.clone()));
        }
        if folder.as_str() != self.folder_id {
            return Ok(Vec::new());
        }
        Ok(self.listing.clone())
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        self.downloads.lock().unwrap().push(file_id.to_string());
        match self.contents.get(file_id) {
            Some(StoredFile::Bytes(bytes)) => Ok(bytes.clone()),
            Some(StoredFile::Fails(error)) => Err(RankerError::Gateway(error.clone())),
            None => Err(RankerError::Gateway(format!("not found: {}", file_id))),
        }
    }
}

/// A PDF with one page per entry; an empty entry gives a page without text
pub fn pdf_with_pages(pages_text: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages_text {
        let operations = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub fn pdf(text: &str) -> Vec<u8> {
    pdf_with_pages(&[text])
}

/// A minimal DOCX container with one paragraph per entry
pub fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", p))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

pub const PDF: &str = MIME_PDF;
pub const DOCX: &str = MIME_DOCX;
