//! Similarity ranking of resumes against a job description

use crate::drive::{share_link, FileDescriptor};
use crate::error::Result;
use crate::processing::embeddings::{cosine_similarity, Embedding};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub name: String,
    pub file_id: String,
    /// Unrounded cosine similarity
    pub score: f32,
    pub download_link: String,
}

impl MatchResult {
    fn new(file: FileDescriptor, score: f32) -> Self {
        let download_link = share_link(&file.id);
        Self {
            name: file.name,
            file_id: file.id,
            score,
            download_link,
        }
    }
}

/// Score every document against the job vector and sort best-first.
///
/// The sort is stable, so equal scores keep their listing order.
pub fn rank(job: &Embedding, documents: Vec<(FileDescriptor, Embedding)>) -> Result<Vec<MatchResult>> {
    let mut results = documents
        .into_iter()
        .map(|(file, embedding)| {
            let score = cosine_similarity(job, &embedding)?;
            Ok(MatchResult::new(file, score))
        })
        .collect::<Result<Vec<_>>>()?;

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: &str) -> FileDescriptor {
        FileDescriptor {
            id: id.to_string(),
            name: format!("{id}.pdf"),
            mime_type: "application/pdf".to_string(),
        }
    }

    #[test]
    fn test_rank_orders_descending() {
        let job = vec![1.0, 0.0];
        let ranked = rank(
            &job,
            vec![
                (file("far"), vec![0.0, 1.0]),
                (file("exact"), vec![2.0, 0.0]),
                (file("near"), vec![1.0, 0.5]),
            ],
        )
        .unwrap();

        let names: Vec<_> = ranked.iter().map(|r| r.file_id.as_str()).collect();
        assert_eq!(names, ["exact", "near", "far"]);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(
            ranked[0].download_link,
            "https://drive.google.com/file/d/exact/view?usp=sharing"
        );
    }

    #[test]
    fn test_ties_keep_listing_order() {
        let job = vec![1.0, 1.0];
        let ranked = rank(
            &job,
            vec![
                (file("first"), vec![3.0, 3.0]),
                (file("low"), vec![1.0, 0.0]),
                (file("second"), vec![1.0, 1.0]),
            ],
        )
        .unwrap();
        let names: Vec<_> = ranked.iter().map(|r| r.file_id.as_str()).collect();
        assert_eq!(names, ["first", "second", "low"]);
    }

    #[test]
    fn test_scores_are_not_rounded() {
        let ranked = rank(&vec![1.0, 0.0], vec![(file("a"), vec![1.0, 0.123_456])]).unwrap();
        let score = ranked[0].score;
        assert!((score * 10_000.0).fract().abs() > 1e-6);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(&vec![1.0], vec![]).unwrap().is_empty());
    }
}
