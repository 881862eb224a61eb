//! ドメインサービス
//!
//! ロケータ（実行ファイル→タスクの照合）とレジストラ（二段階登録）。
//! どちらも状態を持たず、呼び出しごとにセッションを開いて閉じる。

pub mod task_locator;
pub mod task_registrar;

#[cfg(test)]
pub(crate) mod fake;

// 便宜のため公開操作を再エクスポート
pub use task_locator::{is_task_active, locate, matches_executable, remove_task};
pub use task_registrar::add_task;
