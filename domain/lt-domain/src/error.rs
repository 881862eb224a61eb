//! ドメインエラー型

use thiserror::Error;

/// ドメイン層のエラー型
/// 各バリアントは特定の失敗シナリオを表現
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 引数の前提条件違反（呼び出し側のバグ）
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// タスクスケジューラに接続できない
    #[error("Task scheduler unavailable: {0}")]
    ServiceUnavailable(String),

    /// タスクスケジューラAPI呼び出しの失敗
    #[error("{context}: {message}")]
    HostCall { context: String, message: String },

    /// 対象タスクが見つからない
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// 設定値が無効
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// 設定ファイルの読み込み失敗
    #[error("Configuration load failed: {0}")]
    ConfigLoadFailed(String),
}

impl DomainError {
    /// ホスト呼び出し失敗を文脈付きで作る
    pub fn host_call(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HostCall {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// タスク登録の失敗（公開APIが返す唯一のエラー）
///
/// 表示は原因のメッセージそのまま。原因は `source()` で辿れる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source}")]
pub struct RegistrationFailure {
    #[source]
    source: DomainError,
}

impl RegistrationFailure {
    pub fn new(source: DomainError) -> Self {
        Self { source }
    }

    /// 原因のドメインエラー
    pub fn cause(&self) -> &DomainError {
        &self.source
    }

    pub fn into_cause(self) -> DomainError {
        self.source
    }
}

impl From<DomainError> for RegistrationFailure {
    fn from(source: DomainError) -> Self {
        Self::new(source)
    }
}
