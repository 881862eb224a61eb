//! タスクスケジューラ用アダプタポート（接続/列挙/登録/削除APIをラップ）

use crate::error::DomainError;
use crate::model::{RegisteredTask, TaskDefinition, TaskDescriptor, TaskHandle};

/// ホストのタスクスケジューラ
pub trait TaskSchedulerHost {
    /// セッションを開く。戻り値を drop した時点で解放される。
    fn open_session(&self) -> Result<Box<dyn SchedulerSession + '_>, DomainError>;
}

/// 1操作の間だけ保持するスケジューラへの接続
pub trait SchedulerSession {
    /// 全フォルダの登録済みタスクを列挙（順序はホスト依存）
    fn tasks(&self) -> Result<Vec<TaskHandle>, DomainError>;

    /// タスク定義を読み出す
    fn definition(&self, task: &TaskHandle) -> Result<TaskDefinition, DomainError>;

    /// トリガー・アクション・実行レベルを組み立てる。ホストへの登録はまだしない。
    fn build(&self, descriptor: &TaskDescriptor) -> Result<Box<dyn TaskDraft + '_>, DomainError>;

    /// 所属フォルダからタスクを削除（実行中インスタンスの強制終了はしない）
    fn delete(&self, task: &TaskHandle) -> Result<(), DomainError>;
}

/// 組み立て済みで未登録のタスク定義。同じ下書きで何度でも登録を試せる。
pub trait TaskDraft {
    /// 登録（作成または更新）。`name` が None なら名前なしで登録する。
    fn register(&self, name: Option<&str>) -> Result<RegisteredTask, DomainError>;
}
