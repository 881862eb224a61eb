//! ログオン時起動タスクの登録。
//!
//! 受け付ける名前の文法や「名前必須かどうか」はスケジューラのバージョンで異なる。
//! バージョン判定はせず、組み立てた1つの定義で名前あり→名前なしの順に2回だけ試す。

use crate::error::RegistrationFailure;
use crate::model::{RunLevel, TaskDescriptor};
use crate::naming::sanitize;
use crate::port::driven::{TaskDraft, TaskSchedulerHost};
use tracing::{debug, info, warn};

/// タスクを登録する。
///
/// - 成功: `Ok(true)`
/// - 名前あり/名前なしの両方がホストに拒否された: `Ok(false)`
/// - 接続失敗、記述子やトリガー/アクションの構築失敗: `Err(RegistrationFailure)`
///
/// 空の `executable_path` はそのままホストに渡す（拒否されれば `Ok(false)`）。
pub fn add_task(
    host: &dyn TaskSchedulerHost,
    task_name: &str,
    executable_path: &str,
    run_level: RunLevel,
) -> Result<bool, RegistrationFailure> {
    let name = sanitize(task_name);
    let session = host.open_session()?;
    let descriptor = TaskDescriptor::logon(executable_path, run_level)?;
    let draft = session.build(&descriptor)?;

    // 新しいスケジューラは名前必須
    if try_register(draft.as_ref(), Some(name.as_str()), &descriptor) {
        return Ok(true);
    }

    // 古いスケジューラは名前なしのみ受け付ける
    if try_register(draft.as_ref(), None, &descriptor) {
        return Ok(true);
    }

    warn!(
        task_name = %name,
        executable_path,
        "task scheduler rejected both named and unnamed registration"
    );
    Ok(false)
}

/// 1回分の登録。失敗はここで握りつぶし、次の試行に影響させない。
fn try_register(draft: &dyn TaskDraft, name: Option<&str>, descriptor: &TaskDescriptor) -> bool {
    match draft.register(name) {
        Ok(task) => {
            info!(
                task = %task.handle.path,
                run_level = descriptor.run_level().as_str(),
                "registered logon task"
            );
            true
        }
        Err(e) => {
            debug!(named = name.is_some(), error = %e, "registration attempt rejected");
            false
        }
    }
}
