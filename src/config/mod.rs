use crate::error::{ApiError, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CATALOG_PATH: &str = "books_df.csv";
const DEFAULT_INDEX_DIR: &str = "db";
const DEFAULT_INDEX_COLLECTION: &str = "books";
const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_HF_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub catalog_path: PathBuf,
    pub index_dir: PathBuf,
    pub index_collection: String,
    pub huggingface_api_key: String,
    pub huggingface_base_url: String,
    pub huggingface_model: String,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Config {
            host: env::var("APP_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parse_var("APP_PORT", DEFAULT_PORT)?,
            catalog_path: env::var("APP_CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CATALOG_PATH)),
            index_dir: env::var("APP_INDEX_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_INDEX_DIR)),
            index_collection: env::var("APP_INDEX_COLLECTION")
                .unwrap_or_else(|_| DEFAULT_INDEX_COLLECTION.to_string()),
            huggingface_api_key: required_var("APP_HUGGINGFACE_API_KEY")?,
            huggingface_base_url: env::var("APP_HUGGINGFACE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_HF_BASE_URL.to_string()),
            huggingface_model: env::var("APP_HUGGINGFACE_MODEL_NAME")
                .unwrap_or_else(|_| DEFAULT_HF_MODEL.to_string()),
            timeout_seconds: parse_var("APP_HUGGINGFACE_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS)?,
            connect_timeout_seconds: parse_var(
                "APP_EXTERNAL_SERVICE_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECONDS,
            )?,
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    let value = env::var(name)
        .map_err(|_| ApiError::Config(format!("Missing required environment variable {}", name)))?;
    if value.trim().is_empty() {
        return Err(ApiError::Config(format!("{} is empty", name)));
    }
    Ok(value)
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ApiError::Config(format!("{} has invalid value {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}
