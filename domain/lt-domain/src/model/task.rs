use super::RunLevel;
use crate::DomainError;

/// トリガー種別（このシステムが作るのはログオンのみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Logon,
    /// ログオン以外（時刻、起動時、イベント等）
    Other,
}

/// タスク定義内のトリガー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTrigger {
    pub kind: TriggerKind,
    pub enabled: bool,
}

impl TaskTrigger {
    pub fn logon() -> Self {
        Self {
            kind: TriggerKind::Logon,
            enabled: true,
        }
    }
}

/// タスク定義内のアクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// プログラム実行
    Exec { path: String },
    /// メール送信、COMハンドラ等
    Other,
}

impl TaskAction {
    pub fn exec_path(&self) -> Option<&str> {
        match self {
            Self::Exec { path } => Some(path),
            Self::Other => None,
        }
    }
}

/// 登録済みタスクの定義（スケジューラから読み出したビュー）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    pub actions: Vec<TaskAction>,
    pub triggers: Vec<TaskTrigger>,
    pub run_level: RunLevel,
}

impl TaskDefinition {
    /// 単一アクション・単一トリガーの場合のみ、その組を返す。
    /// 複数持つタスクはこのシステムが作る形と異なるので対象外。
    pub fn single_action_and_trigger(&self) -> Option<(&TaskAction, &TaskTrigger)> {
        match (self.actions.as_slice(), self.triggers.as_slice()) {
            ([action], [trigger]) => Some((action, trigger)),
            _ => None,
        }
    }
}

/// 登録済みタスクの識別子（列挙結果）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    /// タスク名
    pub name: String,
    /// フルパス（例: `\Folder\Name`）
    pub path: String,
}

impl TaskHandle {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// 所属フォルダのパス。ルート直下なら `\`。
    pub fn folder_path(&self) -> &str {
        match self.path.rfind('\\') {
            Some(0) | None => "\\",
            Some(index) => &self.path[..index],
        }
    }
}

/// 登録に成功したタスク
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredTask {
    pub handle: TaskHandle,
}

/// 登録要求（ログオントリガー + プログラム実行アクション + 実行レベル）
///
/// ホストへの登録呼び出しの引数としてのみ存在し、保存はしない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    trigger: TaskTrigger,
    action: TaskAction,
    run_level: RunLevel,
}

impl TaskDescriptor {
    /// ログオン時に `executable_path` を起動する記述子を作る。
    /// 空のパスは通す（受け付けるかはホストが決める）。
    pub fn logon(executable_path: &str, run_level: RunLevel) -> Result<Self, DomainError> {
        if executable_path.contains('\0') {
            return Err(DomainError::InvalidArgument(format!(
                "executable path contains NUL: {:?}",
                executable_path
            )));
        }
        Ok(Self {
            trigger: TaskTrigger::logon(),
            action: TaskAction::Exec {
                path: executable_path.to_string(),
            },
            run_level,
        })
    }

    pub fn executable_path(&self) -> &str {
        self.action.exec_path().unwrap_or_default()
    }

    pub fn run_level(&self) -> RunLevel {
        self.run_level
    }

    /// 登録後にスケジューラが保持する定義の形
    pub fn to_definition(&self) -> TaskDefinition {
        TaskDefinition {
            actions: vec![self.action.clone()],
            triggers: vec![self.trigger.clone()],
            run_level: self.run_level,
        }
    }
}
