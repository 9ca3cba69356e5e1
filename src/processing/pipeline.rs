//! One "run match" pass: list, download, extract, encode and rank

use crate::drive::{parse_reference, DriveReference, FileDescriptor, StorageGateway};
use crate::error::{RankerError, Result};
use crate::input::{FileType, InputManager};
use crate::processing::embeddings::{Embedding, SharedEncoder};
use crate::processing::ranker::{rank, MatchResult};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub job_description: String,
    pub folder_url: String,
}

impl MatchRequest {
    pub fn new(job_description: impl Into<String>, folder_url: impl Into<String>) -> Self {
        Self {
            job_description: job_description.into(),
            folder_url: folder_url.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.job_description.trim().is_empty() || self.folder_url.trim().is_empty() {
            return Err(RankerError::InvalidInput(
                "Please provide both the job description and a valid Drive folder link".to_string(),
            ));
        }
        Ok(())
    }
}

/// Why a listed file did not make it into the ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    UnsupportedFormat,
    NoText,
    Download(String),
    Extraction(String),
    Embedding(String),
}

impl From<&RankerError> for SkipReason {
    fn from(err: &RankerError) -> Self {
        match err {
            RankerError::UnsupportedFormat(_) => SkipReason::UnsupportedFormat,
            RankerError::EmptyText(_) => SkipReason::NoText,
            RankerError::Gateway(msg) => SkipReason::Download(msg.clone()),
            RankerError::Embedding(msg) | RankerError::ModelError(msg) => SkipReason::Embedding(msg.clone()),
            other => SkipReason::Extraction(other.to_string()),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedFormat => write!(f, "unsupported file format"),
            SkipReason::NoText => write!(f, "no text found"),
            SkipReason::Download(msg) => write!(f, "download failed: {}", msg),
            SkipReason::Extraction(msg) => write!(f, "text extraction failed: {}", msg),
            SkipReason::Embedding(msg) => write!(f, "embedding failed: {}", msg),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub name: String,
    pub file_id: String,
    pub reason: SkipReason,
}

/// Per-file result of the download/extract/encode steps
#[derive(Debug)]
pub enum FileOutcome {
    Encoded(FileDescriptor, Embedding),
    Skipped(SkippedFile),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub folder_id: String,
    pub files_listed: usize,
    pub ranked: Vec<MatchResult>,
    pub skipped: Vec<SkippedFile>,
    pub model_name: String,
    pub processing_time_ms: u64,
}

impl RunReport {
    pub fn no_files_found(&self) -> bool {
        self.files_listed == 0
    }
}

pub struct MatchPipeline {
    gateway: Arc<dyn StorageGateway>,
    encoder: SharedEncoder,
    input: InputManager,
    show_progress: bool,
}

impl MatchPipeline {
    pub fn new(gateway: Arc<dyn StorageGateway>, encoder: SharedEncoder) -> Self {
        Self {
            gateway,
            encoder,
            input: InputManager::new(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Rank every resume in the request's folder.
    ///
    /// Missing inputs, a bad folder link and a failed listing stop the run.
    /// Anything that goes wrong with a single file is recorded in
    /// `RunReport::skipped` and the remaining files are still processed.
    pub async fn run(&self, request: &MatchRequest) -> Result<RunReport> {
        let start_time = Instant::now();
        request.validate()?;

        let folder = parse_reference(&request.folder_url)?;
        info!("Fetching resume files from Drive folder {}", folder);
        let files = self.gateway.list_files(&folder).await?;

        if files.is_empty() {
            warn!("No resume files found in folder {}", folder);
            return Ok(self.report(&folder, 0, Vec::new(), Vec::new(), start_time));
        }

        let job_embedding = self.encoder.encode(&request.job_description)?;
        let files_listed = files.len();

        let progress = self.progress_bar(files_listed);
        let mut encoded = Vec::with_capacity(files_listed);
        let mut skipped = Vec::new();

        for file in files {
            progress.set_message(file.name.clone());
            match self.process_file(file).await {
                FileOutcome::Encoded(file, embedding) => encoded.push((file, embedding)),
                FileOutcome::Skipped(skip) => skipped.push(skip),
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        let ranked = rank(&job_embedding, encoded)?;
        info!(
            "Ranked {} of {} files ({} skipped)",
            ranked.len(),
            files_listed,
            skipped.len()
        );

        Ok(self.report(&folder, files_listed, ranked, skipped, start_time))
    }

    async fn process_file(&self, file: FileDescriptor) -> FileOutcome {
        match self.encode_file(&file).await {
            Ok(embedding) => FileOutcome::Encoded(file, embedding),
            Err(err) => {
                let reason = SkipReason::from(&err);
                warn!("Skipping {}: {}", file.name, reason);
                FileOutcome::Skipped(SkippedFile {
                    name: file.name,
                    file_id: file.id,
                    reason,
                })
            }
        }
    }

    async fn encode_file(&self, file: &FileDescriptor) -> Result<Embedding> {
        let file_type = FileType::detect(&file.mime_type, &file.name);
        if !matches!(file_type, FileType::Pdf | FileType::Docx) {
            return Err(RankerError::UnsupportedFormat(file.name.clone()));
        }

        let bytes = self.gateway.download_file(&file.id).await?;
        let text = self.input.extract_document(&bytes, file_type, &file.name)?;
        self.encoder.encode(&text)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        ProgressBar::new(len as u64).with_style(style)
    }

    fn report(
        &self,
        folder: &DriveReference,
        files_listed: usize,
        ranked: Vec<MatchResult>,
        skipped: Vec<SkippedFile>,
        start_time: Instant,
    ) -> RunReport {
        RunReport {
            folder_id: folder.to_string(),
            files_listed,
            ranked,
            skipped,
            model_name: self.encoder.model_name().to_string(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        }
    }
}
