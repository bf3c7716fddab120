use std::sync::Arc;

use anyhow::Context;
use scout_config::ScoutConfig;
use scout_db::service::ScoutService;
use scout_providers::{OpenAiStatusModel, RapidApiFetcher, parse_examples};
use scout_refresh::RefreshOrchestrator;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: Arc<ScoutService>,
    pub config: ScoutConfig,
}

impl AppContext {
    pub async fn init(config: ScoutConfig) -> anyhow::Result<Self> {
        let service = ScoutService::open(&config.store)
            .await
            .with_context(|| format!("failed to open scout store at {}", config.store.db_path))?;
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    /// Orchestrator wired to the configured providers. Commands that reach
    /// the network call [`Self::require_collaborators`] first.
    pub fn orchestrator(&self) -> anyhow::Result<RefreshOrchestrator> {
        let classifier = &self.config.classifier;
        let mut model = OpenAiStatusModel::new(classifier.clone());
        if let Some(path) = &classifier.examples_path {
            let jsonl = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read classifier examples at {path}"))?;
            model = model.with_examples(&parse_examples(&jsonl, classifier.examples_per_status));
        }
        Ok(RefreshOrchestrator::new(
            Arc::clone(&self.service),
            Arc::new(RapidApiFetcher::new(self.config.fetcher.clone())),
            Arc::new(model),
            self.config.refresh.clone(),
        ))
    }

    pub fn require_collaborators(&self) -> anyhow::Result<()> {
        self.config.require_collaborators().context(
            "set SCOUT_FETCHER__API_KEY and SCOUT_CLASSIFIER__API_KEY (or the matching config.toml keys)",
        )
    }
}
