use super::state::{PendingTracker, StateCell};
use crate::domain::article::{
    Article, ArticleList, ArticleQuery, ProcessResult, SearchResult, Statistics,
};
use crate::infra::api::{decode_json, ApiClient};
use crate::types::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::watch;

pub const ARTICLES_PATH: &str = "/api/v1/news/articles";
pub const STATISTICS_PATH: &str = "/api/v1/news/statistics";
pub const SEARCH_PATH: &str = "/api/v1/news/search";
pub const PROCESS_PATH: &str = "/api/v1/ai/process";

/// `process_articles`でlimit未指定時に使う件数
pub const DEFAULT_PROCESS_LIMIT: u32 = 10;

/// 記事ストア
///
/// 記事一覧・処理済み記事一覧・表示中の記事・統計情報の4つのセルと、
/// 実行中操作のカウンターを保持する。各操作はリモートAPIを1回だけ呼び出し、
/// 成功時にのみ対象セルを更新する。失敗時はセルを変更せず、エラーを記録して
/// そのまま呼び出し側に返す。
///
/// 操作同士の排他は行わない。同じセルへの書き込みが重なった場合は
/// 最後に完了した操作の結果が残る（追記は完了時点のセルの内容に連結される）。
pub struct ArticleStore {
    client: Arc<dyn ApiClient>,
    articles: StateCell<Vec<Article>>,
    processed_articles: StateCell<Vec<Article>>,
    current_article: StateCell<Option<Article>>,
    statistics: StateCell<Statistics>,
    pending: PendingTracker,
}

impl ArticleStore {
    /// 空の状態でストアを作成
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self {
            client,
            articles: StateCell::default(),
            processed_articles: StateCell::default(),
            current_article: StateCell::default(),
            statistics: StateCell::default(),
            pending: PendingTracker::new(),
        }
    }

    /// 記事一覧を取得する
    ///
    /// `query.append`が真なら既存の一覧の後ろに連結し、偽なら丸ごと置き換える。
    /// 重複排除は行わない。
    pub async fn fetch_articles(&self, query: ArticleQuery) -> ApiResult<ArticleList> {
        let _guard = self.pending.begin();
        let list: ArticleList = self
            .get_decoded("記事一覧の取得", ARTICLES_PATH, &query.to_query_pairs())
            .await?;

        apply_page(&self.articles, &list.articles, query.append);
        tracing::info!(
            received = list.articles.len(),
            total = self.total_articles(),
            append = query.append,
            "記事一覧を更新"
        );
        Ok(list)
    }

    /// 処理済み記事の一覧を取得する
    ///
    /// `is_processed=true`はストアが付与する。追記・置き換えの規則は
    /// `fetch_articles`と同じで、対象は処理済み一覧のみ。
    pub async fn fetch_processed_articles(&self, query: ArticleQuery) -> ApiResult<ArticleList> {
        let _guard = self.pending.begin();
        let query = ArticleQuery {
            is_processed: Some(true),
            ..query
        };
        let list: ArticleList = self
            .get_decoded("処理済み記事の取得", ARTICLES_PATH, &query.to_query_pairs())
            .await?;

        apply_page(&self.processed_articles, &list.articles, query.append);
        tracing::info!(
            received = list.articles.len(),
            total = self.processed_count(),
            append = query.append,
            "処理済み記事一覧を更新"
        );
        Ok(list)
    }

    /// 記事詳細を取得し、表示中の記事を置き換える
    ///
    /// IDの検証は行わない。存在しない・不正なIDはステータスエラーとして返る。
    pub async fn fetch_article_detail(&self, id: i64) -> ApiResult<Article> {
        let _guard = self.pending.begin();
        let path = format!("{}/{}", ARTICLES_PATH, id);
        let article: Article = self.get_decoded("記事詳細の取得", &path, &[]).await?;

        self.current_article.replace(Some(article.clone()));
        tracing::info!(id = article.id, "表示中の記事を更新");
        Ok(article)
    }

    /// AI処理ジョブを起動する（`limit`未指定時は10件）
    ///
    /// ローカルの状態は変更しない。結果を見るには一覧を取得し直す必要がある。
    pub async fn process_articles(&self, limit: Option<u32>) -> ApiResult<ProcessResult> {
        let _guard = self.pending.begin();
        let limit = limit.unwrap_or(DEFAULT_PROCESS_LIMIT);
        let query = vec![("limit".to_string(), limit.to_string())];

        let result = self.client.post(PROCESS_PATH, &query).await;
        let result: ProcessResult =
            logged("AI処理", result.and_then(|v| decode_json(v, "AI処理")))?;
        tracing::info!(limit, message = %result.message, "AI処理が完了");
        Ok(result)
    }

    /// 統計情報を取得し、丸ごと置き換える
    ///
    /// 他の操作と異なり、実行中カウンターには計上しない。
    pub async fn fetch_statistics(&self) -> ApiResult<Statistics> {
        let statistics: Statistics = self
            .get_decoded("統計情報の取得", STATISTICS_PATH, &[])
            .await?;

        self.statistics.replace(statistics.clone());
        Ok(statistics)
    }

    /// キーワードで記事を検索する
    ///
    /// 結果はどのセルにもマージせず、そのまま返す。
    pub async fn search_articles(&self, keyword: &str) -> ApiResult<SearchResult> {
        let _guard = self.pending.begin();
        let query = vec![("keyword".to_string(), keyword.to_string())];
        self.get_decoded("記事の検索", SEARCH_PATH, &query).await
    }

    async fn get_decoded<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(String, String)],
    ) -> ApiResult<T> {
        tracing::debug!(operation, path, "リクエスト開始");
        let result = self.client.get(path, query).await;
        logged(operation, result.and_then(|v| decode_json(v, operation)))
    }

    pub fn articles(&self) -> Vec<Article> {
        self.articles.get()
    }

    pub fn processed_articles(&self) -> Vec<Article> {
        self.processed_articles.get()
    }

    pub fn current_article(&self) -> Option<Article> {
        self.current_article.get()
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics.get()
    }

    /// 記事一覧の件数（読み出しのたびに現在の一覧から計算）
    pub fn total_articles(&self) -> usize {
        self.articles.read(Vec::len)
    }

    /// 処理済み記事一覧の件数
    pub fn processed_count(&self) -> usize {
        self.processed_articles.read(Vec::len)
    }

    /// いずれかの操作（統計情報の取得を除く）が実行中かどうか
    pub fn is_loading(&self) -> bool {
        self.pending.is_pending()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.count()
    }

    /// 実行中の操作が無くなるまで待機する
    pub async fn wait_until_idle(&self) {
        self.pending.wait_until_idle().await;
    }

    pub fn subscribe_articles(&self) -> watch::Receiver<Vec<Article>> {
        self.articles.subscribe()
    }

    pub fn subscribe_processed_articles(&self) -> watch::Receiver<Vec<Article>> {
        self.processed_articles.subscribe()
    }

    pub fn subscribe_current_article(&self) -> watch::Receiver<Option<Article>> {
        self.current_article.subscribe()
    }

    pub fn subscribe_statistics(&self) -> watch::Receiver<Statistics> {
        self.statistics.subscribe()
    }

    /// 実行中操作数の変更を購読する
    pub fn subscribe_loading(&self) -> watch::Receiver<usize> {
        self.pending.subscribe()
    }
}

fn apply_page(cell: &StateCell<Vec<Article>>, page: &[Article], append: bool) {
    if append {
        cell.modify(|articles| articles.extend_from_slice(page));
    } else {
        cell.replace(page.to_vec());
    }
}

/// 失敗を記録し、エラーは変更せずにそのまま返す
fn logged<T>(operation: &'static str, result: ApiResult<T>) -> ApiResult<T> {
    if let Err(ref e) = result {
        log_failure(operation, e);
    }
    result
}

fn log_failure(operation: &'static str, error: &ApiError) {
    tracing::error!(operation, kind = ?error.kind(), error = %error, "{}に失敗", operation);
}
