use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 記事エンティティ
///
/// APIが返した値のスナップショットとして扱い、ストアは`id`以外を解釈しない。
/// 未知のフィールドは`extra`にそのまま保持される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_zh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_summary_zh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    /// 元記事の公開日時（ソースによっては存在しない）。オフセット付きの値はUTCに揃える
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub publish_time: Option<NaiveDateTime>,
    /// 収集日時
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<NaiveDateTime>,
    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub quality_score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_processed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    /// 表示用タイトルを取得
    ///
    /// 表示タイトル → 翻訳タイトル → タイトル → 原題 の順で最初に見つかったもの
    pub fn title(&self) -> Option<&str> {
        self.display_title
            .as_deref()
            .or(self.translated_title.as_deref())
            .or(self.title.as_deref())
            .or(self.original_title.as_deref())
    }
}

/// 日時文字列を解析する
///
/// RFC 3339（オフセット付き）・RFC 2822・オフセット無しのISO 8601を受け付ける。
/// オフセット付きの値はUTCの日時に変換する。解析できなければ`None`。
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

// 以下のフィールドは不正な値やnullを既定値として受け取り、一覧全体のデコードを失敗させない

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// 記事一覧レスポンス（`GET /news/articles`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleList {
    pub articles: Vec<Article>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 統計情報（`GET /news/statistics`）
///
/// 取得のたびに丸ごと置き換えられる。初期値は全て0の空レコード。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub total_articles: u64,
    #[serde(default)]
    pub processed_articles: u64,
    #[serde(default)]
    pub unprocessed_articles: u64,
    #[serde(default)]
    pub total_sources: u64,
    /// 処理率（%）
    #[serde(default)]
    pub processing_rate: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// AI処理ジョブの結果（`POST /ai/process`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub results: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 検索結果（`GET /news/search`）
///
/// どのコレクションにもマージされず、呼び出し側にそのまま返される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
