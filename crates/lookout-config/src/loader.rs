use anyhow::{anyhow, Result};
use config::{Config, Environment, File, FileFormat};
use lookout_core::Category;
use std::path::{Path, PathBuf};

use crate::AppConfig;

const ENV_PREFIX: &str = "LOOKOUT";

/// 配置加载器
///
/// 读取 TOML 文件，再用 `LOOKOUT__SECTION__KEY` 形式的环境变量覆盖。
pub struct ConfigLoader {
    path: PathBuf,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// 加载配置，文件不存在时使用默认值
    pub fn load(&self) -> Result<AppConfig> {
        let config = Config::builder()
            .add_source(
                File::from(self.path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// 加载并验证
    pub fn load_validated(&self) -> Result<AppConfig> {
        let config = self.load()?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<()> {
        if config.monitor.interval_secs == 0 {
            return Err(anyhow!("monitor.interval_secs must be greater than 0"));
        }

        if config.monitor.probe_timeout_secs == 0 {
            return Err(anyhow!("monitor.probe_timeout_secs must be greater than 0"));
        }

        if config.targets.is_empty() {
            return Err(anyhow!("at least one [[targets]] entry is required"));
        }

        config.registry()?;

        for target in &config.targets {
            if target.category != Category::Bot && !is_http_url(&target.address) {
                return Err(anyhow!(
                    "target {} must have an http(s) address, got {}",
                    target.name,
                    target.address
                ));
            }
        }

        if let Some(publisher) = &config.publisher {
            if !is_http_url(&publisher.webhook_url) {
                return Err(anyhow!("publisher.webhook_url must be an http(s) URL"));
            }
            if publisher.timeout_secs == 0 {
                return Err(anyhow!("publisher.timeout_secs must be greater than 0"));
            }
        }

        if let Some(alert) = &config.alert {
            if !is_http_url(&alert.webhook_url) {
                return Err(anyhow!("alert.webhook_url must be an http(s) URL"));
            }
            if alert.recipient.trim().is_empty() {
                return Err(anyhow!("alert.recipient must not be empty"));
            }
            if alert.timeout_secs == 0 {
                return Err(anyhow!("alert.timeout_secs must be greater than 0"));
            }
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogFormat;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
[monitor]
interval_secs = 30

[api]
port = 9090

[publisher]
webhook_url = "https://discord.example/api/webhooks/1/abc"
footer = "Made by the ops team"

[alert]
webhook_url = "https://discord.example/api/webhooks/2/def"
recipient = "664491067814445056"
timeout_secs = 5

[logging]
level = "debug"
format = "json"

[[targets]]
name = "Panel"
category = "Web"
address = "http://node.example:40009"

[[targets]]
name = "Music"
category = "Bot"
address = "1305248707213787166"

[[targets]]
name = "Cube"
category = "Minecraft"
address = "https://minecraft.example"
"#;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path().join("lookout.toml"))
            .with_env_prefix("LOOKOUT_TEST_MISSING");

        let config = loader.load().unwrap();
        assert_eq!(config.monitor.interval_secs, 60);
        assert!(config.publisher.is_none());

        // 没有目标时验证失败
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lookout.toml");
        fs::write(&path, SAMPLE).unwrap();

        let config = ConfigLoader::new(&path)
            .with_env_prefix("LOOKOUT_TEST_FILE")
            .load_validated()
            .unwrap();

        assert_eq!(config.monitor.interval_secs, 30);
        assert_eq!(config.monitor.probe_timeout_secs, 10);
        assert_eq!(config.api.port, 9090);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.recipient(), "664491067814445056");

        let publisher = config.publisher.as_ref().unwrap();
        assert_eq!(publisher.title, "Service Status");
        assert_eq!(publisher.footer.as_deref(), Some("Made by the ops team"));
        assert_eq!(publisher.timeout_secs, 10);
        assert_eq!(config.alert.as_ref().unwrap().timeout_secs, 5);

        let registry = config.registry().unwrap();
        let names: Vec<_> = registry.all().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Panel", "Music", "Cube"]);
        assert_eq!(registry.find("Cube").unwrap().category, Category::Minecraft);
    }

    #[test]
    fn test_env_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lookout.toml");
        fs::write(&path, SAMPLE).unwrap();

        std::env::set_var("LOOKOUT_TEST_ENV__MONITOR__INTERVAL_SECS", "15");
        let config = ConfigLoader::new(&path)
            .with_env_prefix("LOOKOUT_TEST_ENV")
            .load()
            .unwrap();
        std::env::remove_var("LOOKOUT_TEST_ENV__MONITOR__INTERVAL_SECS");

        assert_eq!(config.monitor.interval_secs, 15);
    }

    #[test]
    fn test_validate_rejects_bad_targets() {
        let mut config = AppConfig::default();
        config.targets = vec![lookout_core::Target::web("Panel", "ftp://panel")];
        assert!(ConfigLoader::validate(&config).is_err());

        config.targets = vec![
            lookout_core::Target::web("Panel", "http://a"),
            lookout_core::Target::web("Panel", "http://b"),
        ];
        assert!(ConfigLoader::validate(&config).is_err());

        config.targets = vec![lookout_core::Target::bot("Music", "1305248707213787166")];
        assert!(ConfigLoader::validate(&config).is_ok());

        config.monitor.interval_secs = 0;
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_bundled_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../lookout.toml");
        let config = ConfigLoader::new(path)
            .with_env_prefix("LOOKOUT_TEST_BUNDLED")
            .load_validated()
            .unwrap();

        assert_eq!(config.targets.len(), 3);
        assert!(config.publisher.is_none());
        assert_eq!(config.recipient(), "operator");
    }

    #[test]
    fn test_zero_webhook_timeout_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lookout.toml");
        fs::write(&path, SAMPLE).unwrap();

        let mut config = ConfigLoader::new(&path)
            .with_env_prefix("LOOKOUT_TEST_TIMEOUT")
            .load_validated()
            .unwrap();
        config.alert.as_mut().unwrap().timeout_secs = 0;

        let err = ConfigLoader::validate(&config).unwrap_err();
        assert!(err.to_string().contains("alert.timeout_secs"));
    }
}
