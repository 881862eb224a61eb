//! lt-app: アプリケーション層のファサード。
//! ドメインサービスとスケジューラポートを組み合わせて、
//! ログオンタスクの作成・存在確認・削除のユースケースを実装する。

use lt_domain::model::RunLevel;
use lt_domain::port::driven::TaskSchedulerHost;
use lt_domain::port::driving::LogonTaskUseCase;
use lt_domain::service;
use lt_domain::RegistrationFailure;
use tracing::debug_span;

pub struct LogonTaskDeps<'a> {
    pub host: &'a dyn TaskSchedulerHost,
}

/// 状態を持たないユースケース実装。呼び出しごとにセッションを開閉する。
pub struct LogonTaskService<'a> {
    deps: LogonTaskDeps<'a>,
}

impl<'a> LogonTaskService<'a> {
    pub fn new(deps: LogonTaskDeps<'a>) -> Self {
        Self { deps }
    }
}

impl LogonTaskUseCase for LogonTaskService<'_> {
    fn add_task(
        &self,
        task_name: &str,
        executable_path: &str,
        run_level: RunLevel,
    ) -> Result<bool, RegistrationFailure> {
        let _span = debug_span!("add_task", task_name, executable_path).entered();
        service::add_task(self.deps.host, task_name, executable_path, run_level)
    }

    fn is_task_active(&self, executable_path: &str) -> bool {
        let _span = debug_span!("is_task_active", executable_path).entered();
        service::is_task_active(self.deps.host, executable_path)
    }

    fn remove_task(&self, executable_path: &str) -> bool {
        let _span = debug_span!("remove_task", executable_path).entered();
        service::remove_task(self.deps.host, executable_path)
    }
}
