//! Presentation model for a ranking run

use crate::processing::pipeline::{RunReport, SkippedFile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ranked results as shown to the user and sent by email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedTable {
    pub rows: Vec<TableRow>,
    pub skipped: Vec<SkippedFile>,
    pub metadata: TableMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    pub rank: usize,
    pub name: String,
    /// Similarity rounded to four decimals
    pub score: String,
    pub share_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetadata {
    pub generated_at: DateTime<Utc>,
    pub folder_id: String,
    pub files_listed: usize,
    pub model_name: String,
    pub processing_time_ms: u64,
    pub ranker_version: String,
}

pub fn format_score(score: f32) -> String {
    format!("{:.4}", score)
}

impl RankedTable {
    pub fn from_report(report: &RunReport) -> Self {
        let rows = report
            .ranked
            .iter()
            .enumerate()
            .map(|(i, result)| TableRow {
                rank: i + 1,
                name: result.name.clone(),
                score: format_score(result.score),
                share_link: result.download_link.clone(),
            })
            .collect();

        Self {
            rows,
            skipped: report.skipped.clone(),
            metadata: TableMetadata {
                generated_at: Utc::now(),
                folder_id: report.folder_id.clone(),
                files_listed: report.files_listed,
                model_name: report.model_name.clone(),
                processing_time_ms: report.processing_time_ms,
                ranker_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
