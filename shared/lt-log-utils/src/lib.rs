//! ログユーティリティ（tracing-subscriber の初期化）
//!
//! ライブラリ側は subscriber を勝手に入れない。インストーラ等の呼び出し側が
//! 起動時に一度 `init_logging` を呼ぶ。

use tracing_subscriber::EnvFilter;

/// フィルタを読む環境変数
pub const LOG_ENV_VAR: &str = "LOGON_TASK_LOG";

/// 環境変数がないときのフィルタ
pub const DEFAULT_FILTER: &str = "warn";

/// 環境変数（なければ既定値）からフィルタを作る。不正な指定は既定値に戻す。
pub fn env_filter() -> EnvFilter {
    match std::env::var(LOG_ENV_VAR) {
        Ok(directives) => filter_from_directives(&directives),
        Err(_) => EnvFilter::new(DEFAULT_FILTER),
    }
}

fn filter_from_directives(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// stderr への fmt subscriber をグローバルに設定する。
/// 既に設定済みなら何もしない（false を返す）。
pub fn init_logging() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
