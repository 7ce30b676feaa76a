use anyhow::{Context, Result};
use newsmind::domain::article::ArticleQuery;
use newsmind::infra::api::ReqwestApiClient;
use newsmind::infra::logging::init_tracing;
use newsmind::store::ArticleStore;
use newsmind::types::ApiConfig;
use std::sync::Arc;

const PAGE_SIZE: u32 = 20;

#[tokio::main]
async fn main() -> Result<()> {
    // 環境変数を読み込み（.envファイルがあれば使用）
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ApiConfig::from_env().context("API設定の読み込みに失敗")?;
    println!("接続先: {}", config.base_url);
    let client = ReqwestApiClient::new(config).context("APIクライアントの初期化に失敗")?;
    let store = ArticleStore::new(Arc::new(client));

    // 統計情報
    println!("=== 統計情報を取得 ===");
    match store.fetch_statistics().await {
        Ok(stats) => {
            println!(
                "記事総数{}件、処理済み{}件、未処理{}件、ニュースソース{}件（処理率{:.1}%）",
                stats.total_articles,
                stats.processed_articles,
                stats.unprocessed_articles,
                stats.total_sources,
                stats.processing_rate
            );
        }
        Err(e) => eprintln!("統計情報の取得中にエラーが発生しました: {}", e),
    }

    // 記事一覧（2ページ分を追記で読み込む）
    println!("\n=== 記事一覧を取得 ===");
    let first_page = ArticleQuery::page(0, PAGE_SIZE);
    match store.fetch_articles(first_page.clone()).await {
        Ok(_) => {
            let next = first_page.next_page(store.total_articles());
            if let Err(e) = store.fetch_articles(next).await {
                eprintln!("次ページの取得中にエラーが発生しました: {}", e);
            }
            println!("{}件の記事を読み込みました。", store.total_articles());
            for article in store.articles().iter().take(5) {
                println!(
                    "  [{}] {}",
                    article.id,
                    article.title().unwrap_or("（タイトルなし）")
                );
            }
        }
        Err(e) => eprintln!("記事一覧の取得中にエラーが発生しました: {}", e),
    }

    // 処理済み記事
    println!("\n=== 処理済み記事を取得 ===");
    match store
        .fetch_processed_articles(ArticleQuery::page(0, PAGE_SIZE))
        .await
    {
        Ok(_) => println!("処理済み記事: {}件", store.processed_count()),
        Err(e) => eprintln!("処理済み記事の取得中にエラーが発生しました: {}", e),
    }

    // 先頭記事の詳細
    if let Some(first) = store.articles().first() {
        println!("\n=== 記事詳細を取得 ===");
        match store.fetch_article_detail(first.id).await {
            Ok(article) => println!(
                "ID {}: {}（公開日時: {}）",
                article.id,
                article.title().unwrap_or("（タイトルなし）"),
                article
                    .publish_time
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "不明".to_string())
            ),
            Err(e) => eprintln!("記事詳細の取得中にエラーが発生しました: {}", e),
        }
    }

    Ok(())
}
