use serde::{Deserialize, Serialize};

/// A single row of the book catalog.
///
/// `id` is the 0-based row position in the catalog file. The vector index is
/// built over the same file, so this is the identifier space its match
/// metadata refers back to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: usize,
    pub title: String,
    pub author: String,
    pub description: String,
    #[serde(rename = "coverImageUrl")]
    pub cover_image_url: String,
}
