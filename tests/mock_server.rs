//! NewsMind API モックサーバー
//!
//! httpmockでバックエンドAPIをモックし、reqwest実装のクライアントと
//! 記事ストアを外部通信なしで結合テストする。

use httpmock::prelude::*;
use newsmind::domain::article::ArticleQuery;
use newsmind::infra::api::{ApiClient, ReqwestApiClient};
use newsmind::store::ArticleStore;
use newsmind::types::{ApiConfig, ErrorKind};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// NewsMind APIのモックサーバー
pub struct NewsApiMockServer {
    server: MockServer,
}

impl NewsApiMockServer {
    pub async fn start() -> Self {
        let server = MockServer::start_async().await;
        Self { server }
    }

    /// 記事一覧の応答をモック（`is_processed`を指定した場合はそのクエリのみ一致）
    pub async fn mock_articles(&self, is_processed: Option<bool>, ids: &[i64]) {
        let body = articles_body(ids);
        self.server
            .mock_async(|when, then| {
                let when = when.method(GET).path("/api/v1/news/articles");
                // Whenは内部状態を共有しているため、戻り値を使わなくても条件が追加される
                if let Some(flag) = is_processed {
                    when.query_param("is_processed", flag.to_string());
                }
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(body);
            })
            .await;
    }

    /// 記事詳細の応答をモック
    pub async fn mock_article_detail(&self, id: i64, body: Value) {
        self.server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/api/v1/news/articles/{}", id));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(body);
            })
            .await;
    }

    /// 記事が見つからない応答をモック
    pub async fn mock_article_not_found(&self, id: i64) {
        self.server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/api/v1/news/articles/{}", id));
                then.status(404)
                    .header("content-type", "application/json")
                    .json_body(json!({"detail": "Article not found"}));
            })
            .await;
    }

    /// モックサーバーのベースURL取得
    pub fn url(&self) -> String {
        self.server.url("")
    }

    pub fn client(&self) -> ReqwestApiClient {
        ReqwestApiClient::new(ApiConfig::new(self.url())).expect("クライアントの作成に失敗")
    }

    pub fn inner(&self) -> &MockServer {
        &self.server
    }
}

fn articles_body(ids: &[i64]) -> Value {
    let articles: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "original_title": format!("Article {}", id),
                "display_title": format!("记事 {}", id),
                "publish_time": "2025-01-15T08:00:00",
                "created_at": "2025-01-15T09:30:00.250000",
                "is_processed": false
            })
        })
        .collect();
    json!({"articles": articles, "total": ids.len(), "skip": 0, "limit": 100})
}

#[tokio::test]
async fn test_reqwest_client_get_with_query() {
    let mock_server = NewsApiMockServer::start().await;
    let search = mock_server
        .inner()
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/news/search")
                .query_param("keyword", "测试");
            then.status(200)
                .json_body(json!({"articles": [], "keyword": "测试", "total": 0}));
        })
        .await;

    let client = mock_server.client();
    let query = vec![("keyword".to_string(), "测试".to_string())];
    let value = client
        .get("/api/v1/news/search", &query)
        .await
        .expect("検索リクエストが失敗");

    assert_eq!(value["keyword"], "测试");
    search.assert_async().await;

    println!("✅ クエリ付きGETテスト成功");
}

#[tokio::test]
async fn test_reqwest_client_maps_errors() {
    let mock_server = NewsApiMockServer::start().await;
    mock_server.mock_article_not_found(45).await;
    mock_server
        .inner()
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/news/statistics");
            then.status(200)
                .header("content-type", "text/html")
                .body("<html>not json</html>");
        })
        .await;

    let client = mock_server.client();

    let not_found = client
        .get("/api/v1/news/articles/45", &[])
        .await
        .unwrap_err();
    assert_eq!(not_found.kind(), ErrorKind::Status);
    assert!(not_found.is_not_found());
    assert!(not_found.to_string().contains("Article not found"));

    let malformed = client.get("/api/v1/news/statistics", &[]).await.unwrap_err();
    assert_eq!(malformed.kind(), ErrorKind::Decode);

    // 待ち受けていないポートへの接続は通信エラー
    let unreachable = ReqwestApiClient::new(
        ApiConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2)),
    )
    .expect("クライアントの作成に失敗");
    let refused = unreachable
        .get("/api/v1/news/statistics", &[])
        .await
        .unwrap_err();
    assert_eq!(refused.kind(), ErrorKind::Transport);

    println!("✅ エラー種別マッピングテスト成功");
}

#[tokio::test]
async fn test_reqwest_client_post_limit() {
    let mock_server = NewsApiMockServer::start().await;
    let process = mock_server
        .inner()
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/ai/process")
                .query_param("limit", "10");
            then.status(200).json_body(json!({
                "message": "AI processing completed",
                "results": {"processed": 2}
            }));
        })
        .await;

    let store = ArticleStore::new(Arc::new(mock_server.client()));
    let result = store.process_articles(None).await.expect("AI処理が失敗");

    assert_eq!(result.message, "AI processing completed");
    process.assert_async().await;
}

#[tokio::test]
async fn test_store_end_to_end() {
    let mock_server = NewsApiMockServer::start().await;
    mock_server.mock_articles(Some(true), &[10, 11]).await;
    mock_server.mock_articles(None, &[1, 2, 3]).await;
    mock_server
        .mock_article_detail(1, json!({"id": 1, "title": "X"}))
        .await;
    mock_server.mock_article_not_found(45).await;
    mock_server
        .inner()
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/news/statistics");
            then.status(200).json_body(json!({
                "total_articles": 3,
                "processed_articles": 2,
                "unprocessed_articles": 1,
                "total_sources": 1,
                "processing_rate": 66.7
            }));
        })
        .await;

    let store = ArticleStore::new(Arc::new(mock_server.client()));

    let processed = store
        .fetch_processed_articles(ArticleQuery::default())
        .await
        .expect("処理済み記事の取得が失敗");
    assert_eq!(processed.articles.len(), 2);
    assert_eq!(store.processed_count(), 2);
    assert_eq!(store.total_articles(), 0);

    store
        .fetch_articles(ArticleQuery::page(0, 3))
        .await
        .expect("記事一覧の取得が失敗");
    store
        .fetch_articles(ArticleQuery::page(0, 3).next_page(3))
        .await
        .expect("次ページの取得が失敗");
    assert_eq!(store.total_articles(), 6);
    assert_eq!(store.processed_count(), 2);
    let first = &store.articles()[0];
    assert_eq!(first.title(), Some("记事 1"));
    assert!(first.publish_time.is_some());

    let article = store.fetch_article_detail(1).await.expect("詳細取得が失敗");
    assert_eq!(article.title.as_deref(), Some("X"));

    let err = store.fetch_article_detail(45).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(store.current_article().map(|a| a.id), Some(1));

    let stats = store.fetch_statistics().await.expect("統計取得が失敗");
    assert_eq!(stats.total_articles, 3);
    assert!(!store.is_loading());

    println!("✅ ストア結合テスト成功");
}
