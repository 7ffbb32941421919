use crate::{
    config::Config,
    error::Result,
    ml::{Embedder, HuggingFaceEmbedder},
    routes::api_routes,
    services::{CatalogStore, RecommendationService, VectorIndex},
};
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use log::{info, warn};
use std::net::TcpListener;
use std::sync::Arc;

pub struct Application {
    port: u16,
    host: String,
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: &Config) -> Self {
        Self {
            port: config.port,
            host: config.host.clone(),
            config: config.clone(),
        }
    }

    /// Build and run the server
    pub async fn run(&self) -> Result<()> {
        // Always bind to 0.0.0.0 for container compatibility
        let bind_address = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&bind_address)?;
        info!("Starting server at http://{}:{}", self.host, self.port);

        self.run_with_listener(listener).await
    }

    /// Run the server with a specific TCP listener
    /// This is useful for testing where we want to use a random port
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<()> {
        // Both stores are loaded once here and never mutated afterwards, so
        // request handlers share them without locking.
        let catalog = Arc::new(
            CatalogStore::load(&self.config.catalog_path).context("Failed to load book catalog")?,
        );

        let embedder: Arc<dyn Embedder> = Arc::new(
            HuggingFaceEmbedder::new(&self.config).context("Failed to initialize embedder")?,
        );

        let index = VectorIndex::open(
            &self.config.index_dir,
            &self.config.index_collection,
            embedder,
        )
        .context("Failed to open vector index")?;

        if index.len() != catalog.len() {
            warn!(
                "Vector index holds {} entries but catalog holds {} rows; out-of-range matches will be dropped",
                index.len(),
                catalog.len()
            );
        }

        let recommendation_service =
            web::Data::new(RecommendationService::new(Arc::new(index), catalog));

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header();

            App::new()
                .wrap(cors)
                .wrap(Logger::default())
                .app_data(recommendation_service.clone())
                .service(api_routes())
        })
        .listen(listener)?
        .run()
        .await?;

        Ok(())
    }
}
