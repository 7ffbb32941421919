use crate::error::{ApiError, Result};
use crate::models::BookRecord;
use crate::services::catalog::CatalogStore;
use crate::services::vector_index::{SearchMatch, SimilaritySearch};
use log::{debug, warn};
use std::sync::Arc;

/// How many books a plain "Recommend" press asks for.
pub const DEFAULT_TOP_K: usize = 5;

/// Joins similarity-search hits back to catalog rows.
///
/// Stateless between calls: both collaborators are read-only after startup,
/// so concurrent requests share one instance without locking.
pub struct RecommendationService {
    search: Arc<dyn SimilaritySearch>,
    catalog: Arc<CatalogStore>,
}

impl RecommendationService {
    pub fn new(search: Arc<dyn SimilaritySearch>, catalog: Arc<CatalogStore>) -> Self {
        Self { search, catalog }
    }

    /// Recommend up to `k` books for a free-text query, most similar first.
    ///
    /// Matches whose metadata lacks a usable id, or whose id falls outside
    /// the catalog, are logged and dropped rather than failing the request;
    /// a stale index then degrades to fewer results instead of an error page.
    /// Duplicate ids are returned as duplicate books, preserving rank order.
    pub async fn recommend(&self, query: &str, k: usize) -> Result<Vec<BookRecord>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ApiError::EmptyQuery);
        }

        let matches = self.search.search(trimmed, k).await?;
        debug!("Similarity search returned {} matches for {:?}", matches.len(), trimmed);

        let mut books = Vec::with_capacity(matches.len());
        for m in &matches {
            let id = match record_id(m) {
                Ok(id) => id,
                Err(e) => {
                    warn!("Dropping match (score {:.4}): {}", m.score, e);
                    continue;
                }
            };
            match self.catalog.get(id) {
                Ok(book) => books.push(book.clone()),
                Err(e) => warn!("Dropping match for row {}: {}", id, e),
            }
        }

        Ok(books)
    }
}

fn record_id(m: &SearchMatch) -> Result<i64> {
    m.metadata
        .get("id")
        .and_then(serde_json::Value::as_i64)
        .ok_or(ApiError::MissingRecordId)
}
