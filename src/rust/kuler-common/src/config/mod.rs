//! 共通設定管理モジュール

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use crate::error::{KulerError, Result};

/// 既定のフィードサービスURL
pub const DEFAULT_BASE_URL: &str = "http://kuler-api.adobe.com/";

/// API接続設定
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// APIキー（そのままリクエストに付与する）
    pub key: Option<String>,

    /// フィードサービスのベースURL（末尾は `/`）
    pub base_url: String,

    /// リクエストタイムアウト（秒）
    pub timeout_secs: u64,

    /// User-Agent
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

/// ページング既定値
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PagingConfig {
    /// 1ページあたりの件数
    pub items_per_page: u32,

    /// 取得する最大件数（None または 0 は無制限）
    pub max_items: Option<usize>,
}

impl PagingConfig {
    /// 実際に適用する最大件数（0 は無制限として None）
    pub fn limit(&self) -> Option<usize> {
        self.max_items.filter(|&max| max > 0)
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        PagingConfig {
            items_per_page: 20,
            max_items: Some(100),
        }
    }
}

/// ロギング設定
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// ログレベル
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiConfig,
    pub paging: PagingConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// 設定を読み込む
    ///
    /// 読み込み優先順位：
    /// 1. 環境変数
    /// 2. 設定ファイル（KULER_CONFIG_FILE で指定された場合）
    /// 3. デフォルト値
    pub fn new() -> Result<Self> {
        let mut settings = match env::var("KULER_CONFIG_FILE") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        settings.override_from_env();

        Ok(settings)
    }

    /// 設定ファイルから読み込む（拡張子で形式を判定）
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| KulerError::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| KulerError::Config(format!("Failed to parse JSON config: {}", e))),
            Some("toml") => toml::from_str(&content)
                .map_err(|e| KulerError::Config(format!("Failed to parse TOML config: {}", e))),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| KulerError::Config(format!("Failed to parse YAML config: {}", e))),
            _ => Err(KulerError::Config(format!(
                "Unsupported config file format: {}",
                path.display()
            ))),
        }
    }

    /// 環境変数で設定を上書き
    fn override_from_env(&mut self) {
        self.apply_overrides(|name| env::var(name).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // API設定
        if let Some(key) = lookup("KULER_API_KEY") {
            self.api.key = Some(key);
        }
        if let Some(base_url) = lookup("KULER_BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Some(timeout) = lookup("KULER_TIMEOUT") {
            if let Ok(timeout) = timeout.parse() {
                self.api.timeout_secs = timeout;
            }
        }

        // ページング設定
        if let Some(per_page) = lookup("KULER_ITEMS_PER_PAGE") {
            if let Ok(per_page) = per_page.parse() {
                self.paging.items_per_page = per_page;
            }
        }
        if let Some(max_items) = lookup("KULER_MAX_ITEMS") {
            match max_items.trim().to_lowercase().as_str() {
                "unlimited" | "0" => self.paging.max_items = None,
                other => {
                    if let Ok(max) = other.parse() {
                        self.paging.max_items = Some(max);
                    }
                }
            }
        }

        // ロギング設定
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// 設定を検証
    pub fn validate(&self) -> Result<()> {
        let base_url = &self.api.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(KulerError::Config(format!("Base URL must be http(s): {}", base_url)));
        }
        if !base_url.ends_with('/') {
            return Err(KulerError::Config(format!("Base URL must end with '/': {}", base_url)));
        }

        if self.api.timeout_secs == 0 {
            return Err(KulerError::Config("Timeout must be greater than 0".to_string()));
        }

        if self.paging.items_per_page == 0 {
            return Err(KulerError::Config("Items per page must be greater than 0".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.paging.items_per_page, 20);
        assert_eq!(settings.paging.max_items, Some(100));
        assert!(settings.api.key.is_none());
        settings.validate().unwrap();
    }

    #[test]
    fn test_from_toml_file_partial() {
        let file = write_config(".toml", "[api]\nkey = \"abc\"\ntimeout_secs = 5\n\n[paging]\nitems_per_page = 50\n");
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.api.key.as_deref(), Some("abc"));
        assert_eq!(settings.api.timeout_secs, 5);
        assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.paging.items_per_page, 50);
        assert_eq!(settings.paging.max_items, Some(100));
    }

    #[test]
    fn test_from_json_file() {
        let file = write_config(".json", r#"{"paging": {"max_items": null}, "logging": {"level": "debug"}}"#);
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.paging.max_items, None);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn test_from_yaml_file() {
        let file = write_config(".yml", "api:\n  base_url: \"https://example.test/\"\n");
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.api.base_url, "https://example.test/");
    }

    #[test]
    fn test_unsupported_format() {
        let file = write_config(".ini", "key=abc");
        assert!(matches!(Settings::from_file(file.path()), Err(KulerError::Config(_))));
    }

    #[test]
    fn test_broken_file_is_config_error() {
        let file = write_config(".toml", "[api\nkey = ");
        assert!(matches!(Settings::from_file(file.path()), Err(KulerError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("KULER_API_KEY", "env-key"),
            ("KULER_BASE_URL", "https://mirror.test/"),
            ("KULER_TIMEOUT", "12"),
            ("KULER_ITEMS_PER_PAGE", "not-a-number"),
            ("KULER_MAX_ITEMS", "unlimited"),
            ("LOG_LEVEL", "trace"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(settings.api.key.as_deref(), Some("env-key"));
        assert_eq!(settings.api.base_url, "https://mirror.test/");
        assert_eq!(settings.api.timeout_secs, 12);
        // 数値でない値は無視
        assert_eq!(settings.paging.items_per_page, 20);
        assert_eq!(settings.paging.max_items, None);
        assert_eq!(settings.logging.level, "trace");
    }

    #[test]
    fn test_env_max_items_number() {
        let mut settings = Settings::default();
        settings.apply_overrides(|name| (name == "KULER_MAX_ITEMS").then(|| "250".to_string()));
        assert_eq!(settings.paging.max_items, Some(250));
    }

    #[test]
    fn test_zero_max_items_means_unlimited() {
        let file = write_config(".toml", "[paging]\nmax_items = 0\n");
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.paging.max_items, Some(0));
        assert_eq!(settings.paging.limit(), None);

        let mut settings = Settings::default();
        settings.apply_overrides(|name| (name == "KULER_MAX_ITEMS").then(|| "0".to_string()));
        assert_eq!(settings.paging.limit(), None);

        assert_eq!(PagingConfig::default().limit(), Some(100));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.api.base_url = "ftp://kuler/".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.api.base_url = "http://kuler-api.adobe.com".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.api.timeout_secs = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.paging.items_per_page = 0;
        assert!(settings.validate().is_err());
    }
}
