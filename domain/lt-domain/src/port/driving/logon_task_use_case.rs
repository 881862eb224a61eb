//! ログオンタスク用ユースケースポート

use crate::error::RegistrationFailure;
use crate::model::RunLevel;

/// ログオン時起動タスクの作成・存在確認・削除
pub trait LogonTaskUseCase {
    /// ログオン時に `executable_path` を起動するタスクを登録。
    /// 名前あり→名前なしの順に試し、両方拒否されたら `Ok(false)`。
    fn add_task(
        &self,
        task_name: &str,
        executable_path: &str,
        run_level: RunLevel,
    ) -> Result<bool, RegistrationFailure>;

    /// 実行ファイルを起動するタスクが存在し、トリガーが有効か
    fn is_task_active(&self, executable_path: &str) -> bool;

    /// 実行ファイルを起動するタスクを削除。見つかって削除できたら true。
    fn remove_task(&self, executable_path: &str) -> bool;
}
