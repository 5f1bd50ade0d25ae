use crate::models::{DEFAULT_METRICS, ProviderTarget, Statistic};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
    /// Profile/region pairs visited by each collection pass.
    #[serde(default)]
    pub targets: Vec<ProviderTarget>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    /// Skip metric samples already stored for the same instance, metric and timestamp.
    #[serde(default)]
    pub dedupe_metrics: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub api_token: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,
    #[serde(default = "default_period_secs")]
    pub period_secs: u32,
    /// How far back each pass asks for metric data.
    #[serde(default = "default_lookback_secs")]
    pub lookback_secs: u64,
    #[serde(default)]
    pub statistic: Statistic,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            metrics: default_metrics(),
            period_secs: default_period_secs(),
            lookback_secs: default_lookback_secs(),
            statistic: Statistic::default(),
        }
    }
}

fn default_metrics() -> Vec<String> {
    DEFAULT_METRICS.iter().map(|m| m.to_string()).collect()
}

fn default_period_secs() -> u32 {
    300
}

/// Fifteen months, the provider's longest metric retention.
pub const MAX_LOOKBACK_SECS: u64 = 455 * 24 * 60 * 60;

fn default_lookback_secs() -> u64 {
    24 * 60 * 60
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.provider.endpoint.starts_with("http://")
                || self.provider.endpoint.starts_with("https://"),
            "provider.endpoint must be an http(s) URL, got {:?}",
            self.provider.endpoint
        );
        anyhow::ensure!(
            self.provider.timeout_secs > 0,
            "provider.timeout_secs must be > 0, got {}",
            self.provider.timeout_secs
        );
        anyhow::ensure!(
            self.collection.period_secs > 0,
            "collection.period_secs must be > 0, got {}",
            self.collection.period_secs
        );
        anyhow::ensure!(
            self.collection.lookback_secs > 0 && self.collection.lookback_secs <= MAX_LOOKBACK_SECS,
            "collection.lookback_secs must be in 1..={}, got {}",
            MAX_LOOKBACK_SECS,
            self.collection.lookback_secs
        );
        anyhow::ensure!(
            self.collection.metrics.iter().all(|m| !m.is_empty()),
            "collection.metrics entries must be non-empty"
        );
        anyhow::ensure!(
            !self.targets.is_empty(),
            "targets must list at least one profile/region pair"
        );
        for (i, t) in self.targets.iter().enumerate() {
            anyhow::ensure!(
                !t.profile.is_empty(),
                "targets[{}].profile must be non-empty",
                i
            );
            anyhow::ensure!(
                !t.region.is_empty(),
                "targets[{}].region must be non-empty",
                i
            );
        }
        Ok(())
    }
}
