use std::time::Duration;
use thiserror::Error;

/// APIのベースURLを指定する環境変数
pub const ENV_API_URL: &str = "NEWSMIND_API_URL";
/// HTTPタイムアウト（秒）を指定する環境変数
pub const ENV_API_TIMEOUT_SECS: &str = "NEWSMIND_API_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 設定関連のエラー型
/// 環境変数から読み込んだ設定値の検証エラーを定義
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 設定値が不正
    #[error("設定値が不正です: {reason}")]
    InvalidValue { reason: String },
}

impl ConfigError {
    /// 不正な設定値エラーを作成
    pub fn invalid_value<R: Into<String>>(reason: R) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }
}

/// 設定エラーのResult型エイリアス
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// リモートAPIへの接続設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// 例: `http://localhost:8000`（末尾のスラッシュは取り除かれる）
    pub base_url: String,
    /// トランスポート層のタイムアウト。ストア自身はタイムアウトを持たない
    pub timeout: Duration,
}

impl ApiConfig {
    /// ベースURLを指定して設定を作成（タイムアウトはデフォルト値）
    pub fn new<U: Into<String>>(base_url: U) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 環境変数から設定を読み込む
    ///
    /// 未設定の項目はデフォルト値を使用する。`.env`の読み込みは呼び出し側で行う。
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意のルックアップ関数から設定を組み立てる
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::invalid_value(format!(
                "{}はhttp(s)のURLである必要があります: {}",
                ENV_API_URL, base_url
            )));
        }

        let timeout_secs = match lookup(ENV_API_TIMEOUT_SECS) {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::invalid_value(format!(
                        "{}は正の整数である必要があります: {}",
                        ENV_API_TIMEOUT_SECS, raw
                    )))
                }
            },
        };

        Ok(Self::new(base_url).with_timeout(Duration::from_secs(timeout_secs)))
    }

    /// APIパスから完全なURLを組み立てる
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
