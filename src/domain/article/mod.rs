pub mod model;
pub mod query;

// 公開APIの再エクスポート

// model.rsから
pub use model::{parse_timestamp, Article, ArticleList, ProcessResult, SearchResult, Statistics};

// query.rsから
pub use query::{ArticleOrder, ArticleQuery};
