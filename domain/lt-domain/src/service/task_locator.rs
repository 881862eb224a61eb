//! 実行ファイルパスから登録済みタスクを探すロケータ。
//!
//! スケジューラは呼び出し側が決めたキーでは引けないため、全タスクを列挙して
//! 唯一のアクションのパスで照合する。最初に一致したタスクだけを対象にする。

use crate::model::{TaskDefinition, TaskHandle};
use crate::naming::ExecutableKey;
use crate::port::driven::{SchedulerSession, TaskSchedulerHost};
use crate::DomainError;
use tracing::{debug, info, warn};

/// タスク定義が実行ファイルキーを指しているか。
///
/// - アクション・トリガーともにちょうど1つ
/// - アクションはプログラム実行
/// - パスがキーで終わり、かつファイル名がキーと一致（大文字小文字を区別）
pub fn matches_executable(definition: &TaskDefinition, key: &ExecutableKey) -> bool {
    let Some((action, _trigger)) = definition.single_action_and_trigger() else {
        return false;
    };
    action
        .exec_path()
        .map(|path| key.matches_path(path))
        .unwrap_or(false)
}

/// 実行ファイルに一致する最初のタスクを探し、`on_match` を実行する。
///
/// 戻り値は `on_match` の結果（見つからなければ None）。
/// 個々のタスクの読み出し失敗や `on_match` の失敗は「一致しない」扱いで走査を続ける。
/// セッション接続や列挙そのものの失敗は走査を打ち切って None を返す。
pub fn locate<T, F>(host: &dyn TaskSchedulerHost, executable_path: &str, mut on_match: F) -> Option<T>
where
    F: FnMut(&dyn SchedulerSession, &TaskHandle, &TaskDefinition) -> Result<T, DomainError>,
{
    let Some(key) = ExecutableKey::from_path(executable_path) else {
        debug!(executable_path, "no file name in executable path; nothing to match");
        return None;
    };

    let session = match host.open_session() {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "task scheduler session failed; treating as not found");
            return None;
        }
    };

    let tasks = match session.tasks() {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!(error = %e, "task enumeration failed; treating as not found");
            return None;
        }
    };

    for task in &tasks {
        let definition = match session.definition(task) {
            Ok(definition) => definition,
            Err(e) => {
                debug!(task = %task.path, error = %e, "skipping unreadable task");
                continue;
            }
        };
        if !matches_executable(&definition, &key) {
            continue;
        }
        match on_match(session.as_ref(), task, &definition) {
            Ok(value) => return Some(value),
            Err(e) => {
                debug!(task = %task.path, error = %e, "matched task handler failed; continuing scan");
            }
        }
    }

    None
}

/// 実行ファイルのタスクが存在し、ログオントリガーが有効か
pub fn is_task_active(host: &dyn TaskSchedulerHost, executable_path: &str) -> bool {
    locate(host, executable_path, |_session, _task, definition| {
        // 無効なトリガーはログオンで起動しないので「非アクティブ」
        Ok(definition
            .single_action_and_trigger()
            .map(|(_, trigger)| trigger.enabled)
            .unwrap_or(false))
    })
    .unwrap_or(false)
}

/// 実行ファイルのタスクを所属フォルダから削除。見つかって削除できたら true。
pub fn remove_task(host: &dyn TaskSchedulerHost, executable_path: &str) -> bool {
    locate(host, executable_path, |session, task, _definition| {
        session.delete(task)?;
        info!(task = %task.path, "removed logon task");
        Ok(())
    })
    .is_some()
}
