//! 型定義モジュール
//!
//! アプリケーション全体で使用される共通的な型定義を管理します。
//! - APIエラー型: 通信・ステータス・デコードの3種別
//! - 設定型: リモートAPIへの接続設定

pub mod config;
pub mod error;

// 便利な再エクスポート
pub use config::{ApiConfig, ConfigError, ConfigResult};
pub use error::{ApiError, ApiResult, ErrorKind};
