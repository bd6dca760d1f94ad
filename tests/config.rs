#[cfg(test)]
mod tests {
    use brainclock::libs::config::{Config, IngestConfig, LlmConfig, LlmProvider, SchedulerConfig, TelegramConfig, DEFAULT_MODEL};
    use std::collections::HashMap;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            ConfigTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_file_gives_defaults(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.scheduler_settings().resync_interval_secs, 30);
        assert!(!config.scheduler_settings().display_utc);
        assert_eq!(config.ingest_settings().max_file_size_mb, 20);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read(ctx: &mut ConfigTestContext) {
        let path = ctx.temp_dir.path().join("config.json");
        let config = Config {
            llm: Some(LlmConfig {
                provider: LlmProvider::DeepSeek,
                api_key: "sk-test".to_string(),
                ..LlmConfig::default()
            }),
            telegram: Some(TelegramConfig {
                bot_token: "123:abc".to_string(),
            }),
            scheduler: Some(SchedulerConfig {
                resync_interval_secs: 5,
                display_utc: true,
            }),
            ingest: None,
        };
        config.save_to(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"deepseek\""));
        assert!(!raw.contains("ingest"));

        let loaded = Config::read_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.ingest_settings(), IngestConfig::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_sections_use_defaults(ctx: &mut ConfigTestContext) {
        let path = ctx.temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"llm": {"api_key": "k"}, "ingest": {}}"#).unwrap();
        let config = Config::read_from(&path).unwrap();
        let llm = config.llm.unwrap();
        assert_eq!(llm.api_key, "k");
        assert_eq!(llm.model, DEFAULT_MODEL);
        assert_eq!(llm.provider, LlmProvider::OpenRouter);
        assert_eq!(config.ingest.unwrap().max_file_size_mb, 20);
    }

    #[test]
    fn test_resolve_without_key_is_mock() {
        assert!(LlmConfig::resolve(None, env(&[])).is_none());
        assert!(LlmConfig::resolve(None, env(&[("OPENROUTER_API_KEY", "  ")])).is_none());
        assert!(LlmConfig::resolve(None, env(&[("LLM_MODEL", "some/model")])).is_none());
    }

    #[test]
    fn test_resolve_openrouter_wins() {
        let llm = LlmConfig::resolve(None, env(&[("OPENROUTER_API_KEY", "or"), ("DEEPSEEK_API_KEY", "ds")])).unwrap();
        assert_eq!(llm.provider, LlmProvider::OpenRouter);
        assert_eq!(llm.api_key, "or");
        assert_eq!(llm.provider.endpoint(), "https://openrouter.ai/api/v1/chat/completions");

        let llm = LlmConfig::resolve(None, env(&[("DEEPSEEK_API_KEY", "ds")])).unwrap();
        assert_eq!(llm.provider, LlmProvider::DeepSeek);
    }

    #[test]
    fn test_resolve_env_overrides_file() {
        let base = LlmConfig {
            api_key: "from-file".to_string(),
            temperature: 0.7,
            ..LlmConfig::default()
        };
        let llm = LlmConfig::resolve(Some(base.clone()), env(&[])).unwrap();
        assert_eq!(llm, base);

        let llm = LlmConfig::resolve(Some(base), env(&[("LLM_MODEL", "other/model"), ("DEEPSEEK_API_KEY", "ds")])).unwrap();
        assert_eq!(llm.model, "other/model");
        assert_eq!(llm.api_key, "ds");
        assert_eq!(llm.temperature, 0.7);
    }
}
