use crate::types::{ApiConfig, ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// クエリパラメータの並び（送信順を保持する）
pub type QueryPairs = Vec<(String, String)>;

/// リモートAPIクライアントの抽象化トレイト
///
/// このトレイトは、実際のHTTP通信とモック実装の両方を
/// 統一的に扱えるようにするためのインターフェースです。
/// 戻り値はデコード済みのJSON本文で、型付けは呼び出し側で行います。
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// GETリクエストを送信する
    ///
    /// # Arguments
    /// * `path` - `/api/v1/...` 形式のパス
    /// * `query` - クエリパラメータ
    async fn get(&self, path: &str, query: &[(String, String)]) -> ApiResult<Value>;

    /// POSTリクエストを送信する（本文なし、パラメータはクエリで渡す）
    async fn post(&self, path: &str, query: &[(String, String)]) -> ApiResult<Value>;
}

/// JSON値を指定の型にデコードする
pub fn decode_json<T: DeserializeOwned>(value: Value, context: &str) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::decode(context, e))
}

/// `reqwest` を使用した本番用のAPIクライアント実装
pub struct ReqwestApiClient {
    client: Client,
    config: ApiConfig,
}

impl ReqwestApiClient {
    /// 設定からAPIクライアントを作成
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::transport(&config.base_url, e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> ApiResult<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(url, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(url, e.to_string()))?;
        tracing::debug!(url, status = status.as_u16(), bytes = body.len(), "レスポンス受信");

        if !status.is_success() {
            return Err(ApiError::status(url, status.as_u16(), body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::decode(format!("{} のレスポンス本文", url), e))
    }
}

#[async_trait]
impl ApiClient for ReqwestApiClient {
    async fn get(&self, path: &str, query: &[(String, String)]) -> ApiResult<Value> {
        let url = self.config.url_for(path);
        let request = self.client.get(&url).query(query);
        self.send(request, &url).await
    }

    async fn post(&self, path: &str, query: &[(String, String)]) -> ApiResult<Value> {
        let url = self.config.url_for(path);
        let request = self.client.post(&url).query(query);
        self.send(request, &url).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

/// モッククライアントが受け付けた呼び出しの記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub query: QueryPairs,
}

impl RecordedCall {
    /// 指定キーのクエリ値を取得
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
enum MockOutcome {
    Json(Value),
    Status { status: u16, body: String },
    Transport(String),
}

/// モッククライアントが返す1回分の応答
#[derive(Debug, Clone)]
pub struct MockReply {
    outcome: MockOutcome,
    delay: Option<Duration>,
}

impl MockReply {
    /// JSON本文を返す成功応答
    pub fn json(value: Value) -> Self {
        Self {
            outcome: MockOutcome::Json(value),
            delay: None,
        }
    }

    /// 2xx以外のステータスを返す応答
    pub fn status(status: u16, body: &str) -> Self {
        Self {
            outcome: MockOutcome::Status {
                status,
                body: body.to_string(),
            },
            delay: None,
        }
    }

    /// 通信エラーを返す応答
    pub fn transport_error(message: &str) -> Self {
        Self {
            outcome: MockOutcome::Transport(message.to_string()),
            delay: None,
        }
    }

    /// 応答までの遅延を設定
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// テスト用のモックAPIクライアント
///
/// この実装はテスト時にDIされ、実際のHTTPリクエストを行わずに
/// (メソッド, パス)ごとに登録された応答を順番に返します。
/// 最後の1件は使い切らずに繰り返し返します。
pub struct MockApiClient {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<MockReply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// GETの応答を登録
    pub fn on_get(self, path: &str, reply: MockReply) -> Self {
        self.register(HttpMethod::Get, path, reply)
    }

    /// POSTの応答を登録
    pub fn on_post(self, path: &str, reply: MockReply) -> Self {
        self.register(HttpMethod::Post, path, reply)
    }

    fn register(self, method: HttpMethod, path: &str, reply: MockReply) -> Self {
        self.routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    /// これまでに受け付けた呼び出しの一覧
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 指定パスへの呼び出し回数
    pub fn call_count(&self, path: &str) -> usize {
        self.calls().iter().filter(|c| c.path == path).count()
    }

    fn next_reply(&self, method: HttpMethod, path: &str) -> Option<MockReply> {
        let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    async fn respond(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(String, String)],
    ) -> ApiResult<Value> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                method,
                path: path.to_string(),
                query: query.to_vec(),
            });

        // 応答は呼び出し開始時点で確定させる（遅延中に後続の呼び出しが来ても順序が崩れない）
        let Some(reply) = self.next_reply(method, path) else {
            return Err(ApiError::status(path, 404, "モックルートが未登録です"));
        };

        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }

        match reply.outcome {
            MockOutcome::Json(value) => Ok(value),
            MockOutcome::Status { status, body } => Err(ApiError::status(path, status, body)),
            MockOutcome::Transport(message) => {
                Err(ApiError::transport(path, format!("モック通信エラー: {}", message)))
            }
        }
    }
}

impl Default for MockApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn get(&self, path: &str, query: &[(String, String)]) -> ApiResult<Value> {
        self.respond(HttpMethod::Get, path, query).await
    }

    async fn post(&self, path: &str, query: &[(String, String)]) -> ApiResult<Value> {
        self.respond(HttpMethod::Post, path, query).await
    }
}
