use crate::{
    config::Config,
    error::Result,
    ml::{Embedder, HuggingFaceEmbedder},
    services::catalog::CatalogStore,
    services::vector_index::{write_collection, StoredVector},
};
use log::{info, warn};
use serde_json::json;

const PROGRESS_EVERY: usize = 100;

/// Build the persisted vector collection from the catalog CSV.
///
/// Embeds every row's description and stores it with metadata `id` equal to
/// the row position, the join key the serving path relies on. Re-run this
/// whenever the catalog file changes; the server never rebuilds on its own.
pub async fn run(config: &Config) -> Result<()> {
    info!("Indexing catalog {} into {}/{}",
        config.catalog_path.display(),
        config.index_dir.display(),
        config.index_collection
    );

    let catalog = CatalogStore::load(&config.catalog_path)?;
    if catalog.is_empty() {
        warn!("Catalog is empty; writing an empty collection");
    }

    let embedder = HuggingFaceEmbedder::new(config)?;

    let mut vectors = Vec::with_capacity(catalog.len());
    for book in catalog.iter() {
        let embedding = embedder.embed(&book.description).await?;
        vectors.push(StoredVector {
            embedding,
            metadata: json!({
                "id": book.id,
                "title": book.title,
            }),
        });

        if vectors.len() % PROGRESS_EVERY == 0 {
            info!("Embedded {}/{} rows", vectors.len(), catalog.len());
        }
    }

    let manifest = write_collection(
        &config.index_dir,
        &config.index_collection,
        &config.huggingface_model,
        &vectors,
    )?;

    info!(
        "Indexing complete: {} vectors, dim {}, model {}",
        manifest.vector_count, manifest.dimension, manifest.model
    );
    Ok(())
}
