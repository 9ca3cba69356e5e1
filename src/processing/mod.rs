//! Embedding, ranking and run orchestration

pub mod embedding_manager;
pub mod embeddings;
pub mod pipeline;
pub mod ranker;

pub use embeddings::{cosine_similarity, Embedding, EmbeddingEngine, Encoder, SharedEncoder};
pub use pipeline::{MatchPipeline, MatchRequest, RunReport, SkipReason, SkippedFile};
pub use ranker::{rank, MatchResult};
