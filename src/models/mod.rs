use serde::{Deserialize, Serialize};

// Re-export types from book.rs
pub use book::BookRecord;

mod book;

/// Request structure for book recommendations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// The search query or description to find book recommendations
    pub query: String,
    /// Number of recommendations to return (default: 5)
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Response structure for book recommendations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    /// Recommended books, most similar first
    pub recommendations: Vec<BookRecord>,
}

/// Health check response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in RFC3339 format
    pub timestamp: String,
}

fn default_top_k() -> usize {
    crate::services::DEFAULT_TOP_K
}
