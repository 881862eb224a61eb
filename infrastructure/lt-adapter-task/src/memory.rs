//! プロセス内で完結するタスクスケジューラ。
//!
//! 作成または更新、名前なし登録時の名前生成、セッション数の記録、
//! 失敗の注入（接続/列挙/定義の組み立て/登録/削除/定義読み出し）を持つ。

use lt_domain::model::{
    RegisteredTask, SchedulerConfig, TaskAction, TaskDefinition, TaskDescriptor, TaskHandle,
    TaskTrigger,
};
use lt_domain::naming::is_reserved_char;
use lt_domain::port::driven::{SchedulerSession, TaskDraft, TaskSchedulerHost};
use lt_domain::DomainError;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// 注入する失敗
#[derive(Debug, Clone, Default)]
pub struct FailurePlan {
    /// セッション接続を失敗させる
    pub fail_open: bool,
    /// タスク列挙を失敗させる
    pub fail_enumerate: bool,
    /// 定義の組み立て（トリガー/アクション作成）を失敗させる
    pub fail_build: bool,
    /// 名前付き登録を拒否する
    pub reject_named: bool,
    /// 名前なし登録を拒否する
    pub reject_unnamed: bool,
    /// 削除を失敗させる
    pub fail_delete: bool,
    /// 定義を読み出せないタスクのパス
    pub unreadable: Vec<String>,
}

#[derive(Debug, Clone)]
struct StoredTask {
    handle: TaskHandle,
    definition: TaskDefinition,
    hidden: bool,
}

#[derive(Debug, Default)]
struct State {
    tasks: Vec<StoredTask>,
    failures: FailurePlan,
    next_generated: u64,
    sessions_opened: usize,
    open_sessions: usize,
}

/// インメモリのタスクスケジューラ
#[derive(Debug, Default)]
pub struct InMemoryTaskScheduler {
    config: SchedulerConfig,
    state: Mutex<State>,
}

impl InMemoryTaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            state: Mutex::default(),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // パニックで汚染されても中身はそのまま使える
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_failures(&self, failures: FailurePlan) {
        self.state().failures = failures;
    }

    /// 任意の形のタスクを直接置く（他ツールが作ったタスクの再現用）
    pub fn insert_raw(
        &self,
        path: &str,
        actions: Vec<TaskAction>,
        triggers: Vec<TaskTrigger>,
    ) -> TaskHandle {
        let name = path.rsplit('\\').next().unwrap_or(path).to_string();
        let handle = TaskHandle::new(name, path);
        let definition = TaskDefinition {
            actions,
            triggers,
            run_level: Default::default(),
        };
        let mut state = self.state();
        state.tasks.retain(|t| t.handle.path != path);
        state.tasks.push(StoredTask {
            handle: handle.clone(),
            definition,
            hidden: false,
        });
        handle
    }

    /// ログオントリガーの有効/無効を切り替える。対象がなければ false。
    pub fn set_trigger_enabled(&self, path: &str, enabled: bool) -> bool {
        let mut state = self.state();
        match state.tasks.iter_mut().find(|t| t.handle.path == path) {
            Some(task) => {
                for trigger in &mut task.definition.triggers {
                    trigger.enabled = enabled;
                }
                true
            }
            None => false,
        }
    }

    pub fn set_hidden(&self, path: &str, hidden: bool) -> bool {
        let mut state = self.state();
        match state.tasks.iter_mut().find(|t| t.handle.path == path) {
            Some(task) => {
                task.hidden = hidden;
                true
            }
            None => false,
        }
    }

    pub fn task_count(&self) -> usize {
        self.state().tasks.len()
    }

    pub fn task_paths(&self) -> Vec<String> {
        self.state()
            .tasks
            .iter()
            .map(|t| t.handle.path.clone())
            .collect()
    }

    pub fn definition_of(&self, path: &str) -> Option<TaskDefinition> {
        self.state()
            .tasks
            .iter()
            .find(|t| t.handle.path == path)
            .map(|t| t.definition.clone())
    }

    /// これまでに開かれたセッション数
    pub fn sessions_opened(&self) -> usize {
        self.state().sessions_opened
    }

    /// 現在開いているセッション数
    pub fn open_sessions(&self) -> usize {
        self.state().open_sessions
    }

    fn generated_name(state: &mut State) -> String {
        state.next_generated += 1;
        format!("{{00000000-0000-4000-8000-{:012X}}}", state.next_generated)
    }
}

impl TaskSchedulerHost for InMemoryTaskScheduler {
    fn open_session(&self) -> Result<Box<dyn SchedulerSession + '_>, DomainError> {
        let mut state = self.state();
        if state.failures.fail_open {
            return Err(DomainError::ServiceUnavailable(
                "in-memory scheduler configured to refuse connections".into(),
            ));
        }
        state.sessions_opened += 1;
        state.open_sessions += 1;
        Ok(Box::new(InMemorySession { host: self }))
    }
}

struct InMemorySession<'a> {
    host: &'a InMemoryTaskScheduler,
}

impl Drop for InMemorySession<'_> {
    fn drop(&mut self) {
        let mut state = self.host.state();
        state.open_sessions = state.open_sessions.saturating_sub(1);
    }
}

impl SchedulerSession for InMemorySession<'_> {
    fn tasks(&self) -> Result<Vec<TaskHandle>, DomainError> {
        let state = self.host.state();
        if state.failures.fail_enumerate {
            return Err(DomainError::host_call("GetTasks failed", "enumeration refused"));
        }
        let include_hidden = self.host.config.include_hidden;
        Ok(state
            .tasks
            .iter()
            .filter(|t| include_hidden || !t.hidden)
            .map(|t| t.handle.clone())
            .collect())
    }

    fn definition(&self, task: &TaskHandle) -> Result<TaskDefinition, DomainError> {
        let state = self.host.state();
        if state.failures.unreadable.iter().any(|p| *p == task.path) {
            return Err(DomainError::host_call(
                "Definition failed",
                format!("task definition unreadable: {}", task.path),
            ));
        }
        state
            .tasks
            .iter()
            .find(|t| t.handle.path == task.path)
            .map(|t| t.definition.clone())
            .ok_or_else(|| DomainError::TaskNotFound(task.path.clone()))
    }

    fn build(&self, descriptor: &TaskDescriptor) -> Result<Box<dyn TaskDraft + '_>, DomainError> {
        if self.host.state().failures.fail_build {
            return Err(DomainError::host_call("Create trigger failed", "trigger creation refused"));
        }
        Ok(Box::new(InMemoryDraft {
            host: self.host,
            definition: descriptor.to_definition(),
        }))
    }

    fn delete(&self, task: &TaskHandle) -> Result<(), DomainError> {
        let mut state = self.host.state();
        if state.failures.fail_delete {
            debug!(task = %task.path, "in-memory delete refused");
            return Err(DomainError::host_call("DeleteTask failed", "access denied"));
        }
        let before = state.tasks.len();
        state.tasks.retain(|t| t.handle.path != task.path);
        if state.tasks.len() == before {
            return Err(DomainError::TaskNotFound(task.path.clone()));
        }
        debug!(task = %task.path, "in-memory task deleted");
        Ok(())
    }
}

struct InMemoryDraft<'a> {
    host: &'a InMemoryTaskScheduler,
    definition: TaskDefinition,
}

impl InMemoryDraft<'_> {
    fn reject(&self, reason: String) -> DomainError {
        debug!(%reason, "in-memory registration rejected");
        DomainError::host_call("RegisterTaskDefinition failed", reason)
    }
}

impl TaskDraft for InMemoryDraft<'_> {
    fn register(&self, name: Option<&str>) -> Result<RegisteredTask, DomainError> {
        let mut state = self.host.state();
        let refused = match name {
            Some(_) => state.failures.reject_named,
            None => state.failures.reject_unnamed,
        };
        if refused {
            return Err(self.reject("registration refused".into()));
        }
        if self.definition.actions.iter().any(|a| a.exec_path() == Some("")) {
            return Err(self.reject("exec action has no path".into()));
        }

        let name = match name {
            Some(n) if n.chars().any(is_reserved_char) => {
                return Err(self.reject(format!("invalid task name: {n:?}")));
            }
            Some(n) if !n.is_empty() => n.to_string(),
            _ => InMemoryTaskScheduler::generated_name(&mut state),
        };

        let handle = TaskHandle::new(name.as_str(), self.host.config.task_path(&name));
        let stored = StoredTask {
            handle: handle.clone(),
            definition: self.definition.clone(),
            hidden: false,
        };
        // 作成または更新: 同名は置き換える
        match state.tasks.iter_mut().find(|t| t.handle.path == handle.path) {
            Some(existing) => *existing = stored,
            None => state.tasks.push(stored),
        }
        Ok(RegisteredTask { handle })
    }
}
