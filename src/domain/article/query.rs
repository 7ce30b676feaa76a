use crate::infra::api::QueryPairs;
use std::fmt;

/// 記事一覧の並び順キー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleOrder {
    CreatedAt,
    PublishTime,
    OriginalTitle,
    TranslatedTitle,
}

impl ArticleOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::PublishTime => "publish_time",
            Self::OriginalTitle => "original_title",
            Self::TranslatedTitle => "translated_title",
        }
    }
}

impl fmt::Display for ArticleOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 記事一覧取得のパラメータ
///
/// `append`はローカルのマージ指示であり、サーバーには送信されない。
/// それ以外の項目は指定されたものだけがクエリに含まれる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub source_id: Option<i64>,
    pub language: Option<String>,
    pub is_processed: Option<bool>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub order_by: Option<ArticleOrder>,
    pub order_desc: Option<bool>,
    pub append: bool,
}

impl ArticleQuery {
    /// ページ指定のクエリを作成
    pub fn page(skip: u32, limit: u32) -> Self {
        Self {
            skip: Some(skip),
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// 追記モードに切り替える
    pub fn appending(mut self) -> Self {
        self.append = true;
        self
    }

    pub fn with_date<D: Into<String>>(mut self, date: D) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_category<C: Into<String>>(mut self, category: C) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn ordered_by(mut self, order: ArticleOrder, desc: bool) -> Self {
        self.order_by = Some(order);
        self.order_desc = Some(desc);
        self
    }

    /// 読み込み済み件数から次ページ用のクエリを作成する
    ///
    /// フィルター条件は引き継ぎ、`skip`を読み込み済み件数に進めて追記モードにする。
    pub fn next_page(&self, loaded: usize) -> Self {
        Self {
            skip: Some(u32::try_from(loaded).unwrap_or(u32::MAX)),
            append: true,
            ..self.clone()
        }
    }

    /// サーバーへ送信するクエリパラメータに変換する（`append`は含まない）
    pub fn to_query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        let mut push = |key: &str, value: String| pairs.push((key.to_string(), value));

        if let Some(skip) = self.skip {
            push("skip", skip.to_string());
        }
        if let Some(limit) = self.limit {
            push("limit", limit.to_string());
        }
        if let Some(ref category) = self.category {
            push("category", category.clone());
        }
        if let Some(source_id) = self.source_id {
            push("source_id", source_id.to_string());
        }
        if let Some(ref language) = self.language {
            push("language", language.clone());
        }
        if let Some(is_processed) = self.is_processed {
            push("is_processed", is_processed.to_string());
        }
        if let Some(ref date) = self.date {
            push("date", date.clone());
        }
        if let Some(order_by) = self.order_by {
            push("order_by", order_by.as_str().to_string());
        }
        if let Some(order_desc) = self.order_desc {
            push("order_desc", order_desc.to_string());
        }

        pairs
    }
}
