//! 記事ストア
//!
//! リモートAPIから取得した記事一覧・処理済み記事・表示中の記事・統計情報を保持し、
//! 表示層へ変更を通知する状態管理層。

pub mod article_store;
pub mod state;

pub use article_store::{ArticleStore, DEFAULT_PROCESS_LIMIT};
pub use state::{PendingGuard, PendingTracker, StateCell};
