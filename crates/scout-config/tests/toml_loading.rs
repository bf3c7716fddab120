//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use scout_config::ScoutConfig;

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
db_path = "/var/lib/scout/scout.db"

[refresh]
staleness_hours = 24
max_concurrency = 2
batch_limit = 50
rate_limit_max_attempts = 5
reference_companies = ["Stripe", "Plaid"]

[fetcher]
api_key = "rapid-key"
timeout_secs = 10

[classifier]
api_key = "sk-test"
model = "gpt-4o-mini"
temperature = 0.2
examples_path = "labels/status_examples.jsonl"
examples_per_status = 2
"#,
        )?;

        let config: ScoutConfig = Figment::from(Serialized::defaults(ScoutConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.store.db_path, "/var/lib/scout/scout.db");
        assert_eq!(config.refresh.staleness_hours, 24);
        assert_eq!(config.refresh.max_concurrency, 2);
        assert_eq!(config.refresh.batch_limit, 50);
        assert_eq!(config.refresh.rate_limit_max_attempts, 5);
        assert_eq!(config.refresh.reference_companies, vec!["Stripe", "Plaid"]);
        assert_eq!(config.refresh.timeout_retries, 1);
        assert_eq!(config.fetcher.api_key, "rapid-key");
        assert_eq!(config.fetcher.timeout_secs, 10);
        assert!(config.fetcher.is_configured());
        assert_eq!(config.classifier.model, "gpt-4o-mini");
        assert!(config.classifier.is_configured());
        assert_eq!(
            config.classifier.examples_path.as_deref(),
            Some("labels/status_examples.jsonl")
        );
        assert_eq!(config.classifier.examples_per_status, 2);
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".scout")?;
        jail.create_file(
            ".scout/config.toml",
            r#"
[refresh]
max_concurrency = 8
"#,
        )?;

        let config = ScoutConfig::load().expect("config loads");
        assert_eq!(config.refresh.max_concurrency, 8);
        Ok(())
    });
}

#[test]
fn invalid_values_fail_loading() {
    Jail::expect_with(|jail| {
        jail.create_dir(".scout")?;
        jail.create_file(
            ".scout/config.toml",
            r#"
[refresh]
max_concurrency = 0
"#,
        )?;

        assert!(ScoutConfig::load().is_err());
        Ok(())
    });
}
