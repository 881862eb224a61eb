//! ドメインモデル
//!
//! 値オブジェクトと設定型を定義（永続化はホストのスケジューラ側）

mod config;    // スケジューラ設定（登録先フォルダ等）
mod run_level; // 起動時の特権レベル
mod task;      // タスク記述子、タスク定義のビュー

pub use config::*;
pub use run_level::*;
pub use task::*;
