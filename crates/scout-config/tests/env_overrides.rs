use figment::Jail;
use scout_config::ScoutConfig;

#[test]
fn env_vars_fill_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("SCOUT_FETCHER__API_KEY", "rapid-from-env");
        jail.set_env("SCOUT_CLASSIFIER__API_KEY", "sk-from-env");
        jail.set_env("SCOUT_REFRESH__STALENESS_HOURS", "12");

        let config = ScoutConfig::load().expect("config loads");
        assert_eq!(config.fetcher.api_key, "rapid-from-env");
        assert_eq!(config.classifier.api_key, "sk-from-env");
        assert_eq!(config.refresh.staleness_hours, 12);
        assert!(config.require_collaborators().is_ok());
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".scout")?;
        jail.create_file(
            ".scout/config.toml",
            r#"
[store]
db_path = "from-file.db"
"#,
        )?;
        jail.set_env("SCOUT_STORE__DB_PATH", "from-env.db");

        let config = ScoutConfig::load().expect("config loads");
        assert_eq!(config.store.db_path, "from-env.db");
        Ok(())
    });
}
