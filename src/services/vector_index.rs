use crate::error::{ApiError, Result};
use crate::ml::Embedder;
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A ranked hit from a similarity search. `metadata` carries whatever was
/// attached when the vector was indexed; the recommendation pipeline only
/// relies on its integer `id` field.
#[derive(Debug, Clone)]
pub struct SearchMatch {
    pub score: f32,
    pub metadata: serde_json::Value,
}

/// The one capability the recommendation pipeline needs from the embedding
/// model and the vector store combined: rank stored entries against a piece
/// of free text. Any implementation of this contract will do.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    async fn search(&self, text: &str, k: usize) -> Result<Vec<SearchMatch>>;
}

/// Describes a persisted collection. Lives next to the vectors so a reader
/// can sanity-check dimensions before serving from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionManifest {
    pub model: String,
    pub dimension: usize,
    pub vector_count: usize,
}

/// One indexed entry: the embedding plus the metadata document attached at
/// indexing time (must include `id` = catalog row position).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredVector {
    pub embedding: Vec<f32>,
    pub metadata: serde_json::Value,
}

/// On-disk vector collection served fully from memory.
///
/// Search embeds the query text through the configured [`Embedder`] and ranks
/// every stored vector by cosine similarity. The collection is read once at
/// startup and never mutated; `index-books` is the only writer.
pub struct VectorIndex {
    vectors: Vec<StoredVector>,
    manifest: CollectionManifest,
    embedder: Arc<dyn Embedder>,
}

impl VectorIndex {
    /// Open a persisted collection under `dir/collection`.
    ///
    /// Fails when the directory is missing or the manifest disagrees with the
    /// stored vectors; callers treat this as fatal at startup.
    pub fn open(dir: &Path, collection: &str, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let root = dir.join(collection);

        let manifest: CollectionManifest = read_json(&manifest_path(&root))?;
        let vectors: Vec<StoredVector> = read_json(&vectors_path(&root))?;

        if vectors.len() != manifest.vector_count {
            return Err(ApiError::IndexUnavailable(format!(
                "collection {} holds {} vectors but manifest says {}",
                collection,
                vectors.len(),
                manifest.vector_count
            )));
        }
        if let Some(bad) = vectors.iter().find(|v| v.embedding.len() != manifest.dimension) {
            return Err(ApiError::IndexUnavailable(format!(
                "collection {} contains a {}-dimensional vector, expected {}",
                collection,
                bad.embedding.len(),
                manifest.dimension
            )));
        }

        info!(
            "Opened collection {} ({} vectors, dim {}, model {})",
            collection,
            vectors.len(),
            manifest.dimension,
            manifest.model
        );
        Ok(Self {
            vectors,
            manifest,
            embedder,
        })
    }

    pub fn manifest(&self) -> &CollectionManifest {
        &self.manifest
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

#[async_trait]
impl SimilaritySearch for VectorIndex {
    async fn search(&self, text: &str, k: usize) -> Result<Vec<SearchMatch>> {
        let query = self.embedder.embed(text).await?;
        if query.len() != self.manifest.dimension {
            return Err(ApiError::IndexUnavailable(format!(
                "embedder produced {} dimensions, collection expects {}",
                query.len(),
                self.manifest.dimension
            )));
        }

        let query_norm = l2_norm(&query);
        let mut matches: Vec<SearchMatch> = self
            .vectors
            .iter()
            .map(|stored| SearchMatch {
                score: cosine_similarity(&query, &stored.embedding, query_norm),
                metadata: stored.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(k);

        debug!("Ranked {} stored vectors, returning {}", self.len(), matches.len());
        Ok(matches)
    }
}

/// Persist a collection under `dir/collection`, replacing any previous one.
pub fn write_collection(
    dir: &Path,
    collection: &str,
    model: &str,
    vectors: &[StoredVector],
) -> Result<CollectionManifest> {
    let dimension = vectors.first().map(|v| v.embedding.len()).unwrap_or(0);
    if let Some(bad) = vectors.iter().find(|v| v.embedding.len() != dimension) {
        return Err(ApiError::InternalError(format!(
            "refusing to write mixed dimensions ({} and {})",
            dimension,
            bad.embedding.len()
        )));
    }

    let manifest = CollectionManifest {
        model: model.to_string(),
        dimension,
        vector_count: vectors.len(),
    };

    let root = dir.join(collection);
    std::fs::create_dir_all(&root)?;

    let file = File::create(manifest_path(&root))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &manifest)
        .map_err(|e| ApiError::InternalError(format!("failed to write manifest: {}", e)))?;

    let file = File::create(vectors_path(&root))?;
    serde_json::to_writer(BufWriter::new(file), vectors)
        .map_err(|e| ApiError::InternalError(format!("failed to write vectors: {}", e)))?;

    Ok(manifest)
}

fn manifest_path(root: &Path) -> PathBuf {
    root.join("manifest.json")
}

fn vectors_path(root: &Path) -> PathBuf {
    root.join("vectors.json")
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .map_err(|e| ApiError::IndexUnavailable(format!("{}: {}", path.display(), e)))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| ApiError::IndexUnavailable(format!("{}: {}", path.display(), e)))
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Zero-norm vectors score 0 instead of producing NaN.
fn cosine_similarity(query: &[f32], target: &[f32], query_norm: f32) -> f32 {
    let target_norm = l2_norm(target);
    if query_norm < f32::EPSILON || target_norm < f32::EPSILON {
        return 0.0;
    }

    let dot: f32 = query.iter().zip(target.iter()).map(|(a, b)| a * b).sum();
    dot / (query_norm * target_norm)
}
