//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. unichat.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::language::Language;
use crate::Error;

/// Default configuration file name, looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "unichat.toml";

/// Main configuration for unichat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Chat behaviour configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the chat backend (without trailing slash)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Chat behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Initially selected language code (en, tr, ar, fr, ur, fa)
    #[serde(default = "default_language")]
    pub language: String,

    /// Interval between backend health probes, in seconds
    #[serde(default = "default_health_interval_secs")]
    pub health_interval_secs: u64,

    /// Delay before the canned offline reply, in milliseconds
    #[serde(default = "default_offline_delay_ms")]
    pub offline_delay_ms: u64,

    /// Directory transcripts are exported into
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            health_interval_secs: default_health_interval_secs(),
            offline_delay_ms: default_offline_delay_ms(),
            export_dir: default_export_dir(),
        }
    }
}

impl ChatConfig {
    pub fn language(&self) -> Language {
        Language::from_code(&self.language)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs.max(1))
    }

    pub fn offline_delay(&self) -> Duration {
        Duration::from_millis(self.offline_delay_ms)
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_language() -> String {
    Language::default().code().to_string()
}

fn default_health_interval_secs() -> u64 {
    30
}

fn default_offline_delay_ms() -> u64 {
    1500
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    /// 設定ファイルから環境変数を展開する
    ///
    /// `${VAR_NAME}` 形式の文字列を環境変数の値に置換します。
    /// 環境変数が存在しない場合は空文字列になります。
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // '{' を消費

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// 設定ファイル内の `${VAR_NAME}` は環境変数の値に置換されます。
    /// 読み込み後、環境変数による上書きを適用します。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&toml_content)?;

        // 環境変数が優先
        cfg.apply_env_overrides();

        Ok(cfg)
    }

    /// TOML 文字列から設定を構築（環境変数の上書きなし）
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded_content = Self::expand_env_vars(content);

        let toml: TomlConfig = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        Ok(Self::from_toml_config(toml))
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// `./unichat.toml` があればそれを使い、なければ環境変数とデフォルト値のみ。
    pub fn load() -> crate::Result<Self> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_toml_file(DEFAULT_CONFIG_FILE);
        }

        Ok(Self::from_env())
    }

    /// Load configuration from defaults and environment variables only
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg
    }

    /// TOML 構造から Config を構築
    fn from_toml_config(toml: TomlConfig) -> Self {
        let api = toml.api.unwrap_or_default();
        let chat = toml.chat.unwrap_or_default();

        Config {
            api: ApiConfig {
                base_url: api
                    .base_url
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_base_url),
                timeout_secs: api.timeout_secs.unwrap_or_else(default_timeout_secs),
            },
            chat: ChatConfig {
                language: chat.language.unwrap_or_else(default_language),
                health_interval_secs: chat
                    .health_interval_secs
                    .unwrap_or_else(default_health_interval_secs),
                offline_delay_ms: chat.offline_delay_ms.unwrap_or_else(default_offline_delay_ms),
                export_dir: chat.export_dir.unwrap_or_else(default_export_dir),
            },
        }
    }

    /// 環境変数で設定を上書きする
    fn apply_env_overrides(&mut self) {
        // Only use UNICHAT_API_BASE_URL if explicitly set and non-empty
        if let Ok(base_url) = std::env::var("UNICHAT_API_BASE_URL") {
            if !base_url.is_empty() {
                self.api.base_url = base_url.trim_end_matches('/').to_string();
            }
        }
        if let Ok(timeout) = std::env::var("UNICHAT_API_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.api.timeout_secs = t;
            }
        }

        if let Ok(language) = std::env::var("UNICHAT_LANGUAGE") {
            if !language.is_empty() {
                self.chat.language = language;
            }
        }
        if let Ok(interval) = std::env::var("UNICHAT_HEALTH_INTERVAL_SECS") {
            if let Ok(i) = interval.parse() {
                self.chat.health_interval_secs = i;
            }
        }
        if let Ok(delay) = std::env::var("UNICHAT_OFFLINE_DELAY_MS") {
            if let Ok(d) = delay.parse() {
                self.chat.offline_delay_ms = d;
            }
        }
        if let Ok(dir) = std::env::var("UNICHAT_EXPORT_DIR") {
            if !dir.is_empty() {
                self.chat.export_dir = PathBuf::from(dir);
            }
        }
    }
}

// ============================================================================
// TOML 構造体定義（ファイル解析用）
// ============================================================================

/// TOML ファイル用のトップレベル構造
#[derive(Debug, Deserialize)]
struct TomlConfig {
    /// バックエンド API 設定
    api: Option<TomlApiConfig>,
    /// チャット設定
    chat: Option<TomlChatConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlApiConfig {
    /// ベース URL
    #[serde(default)]
    base_url: Option<String>,
    /// タイムアウト（秒）
    #[serde(default)]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlChatConfig {
    /// 言語コード
    #[serde(default)]
    language: Option<String>,
    /// ヘルスチェック間隔（秒）
    #[serde(default)]
    health_interval_secs: Option<u64>,
    /// オフライン応答までの遅延（ミリ秒）
    #[serde(default)]
    offline_delay_ms: Option<u64>,
    /// エクスポート先ディレクトリ
    #[serde(default)]
    export_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_default() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_chat_config_default() {
        let config = ChatConfig::default();
        assert_eq!(config.language(), Language::En);
        assert_eq!(config.health_interval(), Duration::from_secs(30));
        assert_eq!(config.offline_delay(), Duration::from_millis(1500));
        assert_eq!(config.export_dir, PathBuf::from("."));
    }

    #[test]
    fn test_health_interval_never_zero() {
        let config = ChatConfig {
            health_interval_secs: 0,
            ..ChatConfig::default()
        };
        assert_eq!(config.health_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_expand_env_vars() {
        // テスト用環境変数を設定
        unsafe {
            std::env::set_var("UNICHAT_CONFIG_TEST_VAR", "test_value");
        }

        let result = Config::expand_env_vars("prefix_${UNICHAT_CONFIG_TEST_VAR}_suffix");
        assert_eq!(result, "prefix_test_value_suffix");

        // 存在しない環境変数
        let result = Config::expand_env_vars("prefix_${UNICHAT_NONEXISTENT_VAR}_suffix");
        assert_eq!(result, "prefix__suffix");

        unsafe {
            std::env::remove_var("UNICHAT_CONFIG_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_no_braces() {
        let result = Config::expand_env_vars("cost is $5");
        assert_eq!(result, "cost is $5");
    }

    #[test]
    fn test_toml_config_parsing() {
        let toml_content = r#"
[api]
base_url = "https://assistant.example.edu/api/"
timeout_secs = 10

[chat]
language = "tr"
health_interval_secs = 5
offline_delay_ms = 0
export_dir = "/tmp/transcripts"
"#;

        let config = Config::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api.base_url, "https://assistant.example.edu/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.chat.language(), Language::Tr);
        assert_eq!(config.chat.health_interval_secs, 5);
        assert_eq!(config.chat.offline_delay_ms, 0);
        assert_eq!(config.chat.export_dir, PathBuf::from("/tmp/transcripts"));
    }

    #[test]
    fn test_toml_config_partial() {
        let config = Config::from_toml_str("[chat]\nlanguage = \"fr\"\n").unwrap();

        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.chat.language(), Language::Fr);
        assert_eq!(config.chat.offline_delay_ms, 1500);
    }

    #[test]
    fn test_toml_config_invalid() {
        let result = Config::from_toml_str("[api\nbase_url = ");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
