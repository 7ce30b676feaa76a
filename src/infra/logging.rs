use tracing_subscriber::EnvFilter;

/// トレーシングを初期化する
///
/// `RUST_LOG` が未設定の場合は `info` レベルで標準エラーに出力する。
/// 既にグローバルなサブスクライバーが設定済みなら何もせず `false` を返す。
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
