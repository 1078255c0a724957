//! Build a memory bank from configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use membank_config::{membank_dir, Config, ConfigLoader, ConfigValidator};
use membank_memory_hybrid::{MemoryBank, NormalizedEmbedder, OpenAIEmbedding, OpenAIEmbeddingConfig};
use membank_memory_vector::{DistanceMetric, EmbeddingProvider, SimpleHashEmbedding};

/// Default configuration file location.
pub(crate) fn default_config_path() -> PathBuf {
    membank_dir().join("config.toml")
}

/// Load and validate configuration. An explicit path must exist; the default
/// path falls back to built-in defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => ConfigLoader::load(path)?,
        None => {
            let path = default_config_path();
            if !path.exists() {
                info!("No config at {}, using defaults", path.display());
            }
            ConfigLoader::load_or_default(&path)?
        }
    };

    let result = ConfigValidator::validate(&config)?;
    for warning in &result.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    result.into_result()?;

    Ok(config)
}

/// Build the embedding provider named by the config, wrapped so it always
/// yields normalized vectors of the configured dimension.
pub(crate) fn build_embedder(config: &Config) -> Result<Arc<dyn EmbeddingProvider>, Box<dyn std::error::Error>> {
    let embedding = &config.embedding;

    let embedder: Arc<dyn EmbeddingProvider> = match embedding.provider.as_str() {
        "openai" => {
            let api_key = embedding
                .api_key
                .clone()
                .ok_or("embedding.api_key is required for the openai provider")?;
            let provider = OpenAIEmbedding::new(
                OpenAIEmbeddingConfig::new(api_key)
                    .with_model(&embedding.model)
                    .with_base_url(&embedding.base_url)
                    .with_dimension(embedding.dimension),
            );
            Arc::new(NormalizedEmbedder::new(provider).with_dimension(embedding.dimension))
        }
        "hash" => Arc::new(
            NormalizedEmbedder::new(SimpleHashEmbedding::new(embedding.dimension))
                .with_dimension(embedding.dimension),
        ),
        other => return Err(format!("Unknown embedding provider: {}", other).into()),
    };

    Ok(embedder)
}

/// Open the memory bank described by `config`.
pub(crate) async fn open_bank(config: &Config) -> Result<MemoryBank, Box<dyn std::error::Error>> {
    let embedder = build_embedder(config)?;
    let metric: DistanceMetric = config.embedding.metric.parse()?;

    let bank = MemoryBank::open(&config.storage.path, embedder, metric)
        .await?
        .with_fetch_multiplier(config.search.fetch_multiplier);

    Ok(bank)
}
