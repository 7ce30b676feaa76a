use thiserror::Error;

/// リモートAPI呼び出しのエラー種別
///
/// 呼び出し側がメッセージ文字列ではなく種別で分岐できるようにするための分類。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// ネットワーク障害・接続拒否・タイムアウト
    Transport,
    /// 2xx以外のレスポンス（存在しない記事IDや不正なIDを含む）
    Status,
    /// レスポンス本文が期待する形式と一致しない
    Decode,
}

/// リモートAPIクライアントのエラー型
/// ストアはこのエラーを記録したうえで、そのまま呼び出し側に返す
#[derive(Error, Debug)]
pub enum ApiError {
    /// 通信エラー
    #[error("通信エラー: {url} - {message}")]
    Transport { url: String, message: String },

    /// ステータスエラー
    #[error("ステータスエラー({status}): {url} - {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// デコードエラー
    #[error("レスポンスのデコードに失敗: {context} - {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// 通信エラーを作成
    pub fn transport<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// ステータスエラーを作成
    pub fn status<U: Into<String>, B: Into<String>>(url: U, status: u16, body: B) -> Self {
        Self::Status {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// デコードエラーを作成
    pub fn decode<C: Into<String>>(context: C, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    /// エラー種別を取得
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Status { .. } => ErrorKind::Status,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// HTTPステータスコード（ステータスエラーの場合のみ）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 404 Not Found かどうかを判定
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// APIエラーのResult型エイリアス
pub type ApiResult<T> = std::result::Result<T, ApiError>;
