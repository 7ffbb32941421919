pub mod catalog;
pub mod recommendation;
pub mod vector_index;

// Re-export public types
pub use catalog::CatalogStore;
pub use recommendation::{RecommendationService, DEFAULT_TOP_K};
pub use vector_index::{SearchMatch, SimilaritySearch, VectorIndex};
