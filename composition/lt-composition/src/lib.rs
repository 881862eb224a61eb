//! lt-composition: 依存の組み立てと公開エントリポイント。
//!
//! ログオン時起動タスクの作成・存在確認・削除を、プラットフォームの
//! タスクスケジューラに対して行う自由関数を提供する。状態は持たない。

pub mod config;
pub mod task;

pub use lt_app::{LogonTaskDeps, LogonTaskService};
pub use lt_domain::model::{RunLevel, SchedulerConfig};
pub use lt_domain::naming::sanitize;
pub use lt_domain::port::driven::TaskSchedulerHost;
pub use lt_domain::port::driving::LogonTaskUseCase;
pub use lt_domain::{DomainError, RegistrationFailure};
pub use lt_log_utils::init_logging;

use lt_adapter_task::WindowsTaskScheduler;
use tracing::warn;

/// 任意のスケジューラに対するユースケース
pub fn service_for(host: &dyn TaskSchedulerHost) -> LogonTaskService<'_> {
    LogonTaskService::new(LogonTaskDeps { host })
}

/// 環境変数の設定でプラットフォームのスケジューラを作る
pub fn platform_scheduler() -> Result<WindowsTaskScheduler, DomainError> {
    Ok(WindowsTaskScheduler::new(config::config_from_env()?))
}

/// 照会系は設定が読めなくても既定値で続ける（列挙は全フォルダが対象）
fn query_scheduler() -> WindowsTaskScheduler {
    platform_scheduler().unwrap_or_else(|e| {
        warn!(error = %e, "scheduler config unusable; using defaults");
        WindowsTaskScheduler::default()
    })
}

/// ログオン時に `executable_path` を起動するタスクを追加する。
///
/// `task_name` の禁止文字は空白に置き換えられる。名前付き登録が拒否されたら
/// 名前なしで再試行し、両方拒否されたら `Ok(false)`。
pub fn add_task(
    task_name: &str,
    executable_path: &str,
    run_level: RunLevel,
) -> Result<bool, RegistrationFailure> {
    let scheduler = platform_scheduler()?;
    service_for(&scheduler).add_task(task_name, executable_path, run_level)
}

/// 実行ファイルのタスクが存在し、有効か
pub fn is_task_active(executable_path: &str) -> bool {
    let scheduler = query_scheduler();
    service_for(&scheduler).is_task_active(executable_path)
}

/// 実行ファイルのタスクを削除。見つかって削除できたら true。
pub fn remove_task(executable_path: &str) -> bool {
    let scheduler = query_scheduler();
    service_for(&scheduler).remove_task(executable_path)
}
