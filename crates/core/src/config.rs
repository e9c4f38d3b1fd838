use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Resolve configuration once at startup: built-in defaults, then an optional
/// TOML file, then the `TAGLENS_BASE_URL` environment override.
pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder()
        .set_default("api.base_url", DEFAULT_BASE_URL)?
        .set_default("api.timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?;
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let mut cfg: AppConfig = settings.build()?.try_deserialize()?;
    if let Some(base) = std::env::var_os("TAGLENS_BASE_URL") {
        cfg.api.base_url = base.to_string_lossy().into_owned();
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let cfg = ApiConfig::default();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taglens.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://example:9000\"\ntimeout_secs = 5\n")
            .unwrap();
        let cfg = load(path.to_str()).unwrap();
        assert_eq!(cfg.api.base_url, "http://example:9000");
        assert_eq!(cfg.api.timeout_secs, 5);
    }
}
