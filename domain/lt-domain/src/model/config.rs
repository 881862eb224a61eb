use crate::DomainError;

/// 既定の登録先フォルダ（ルート）
pub const DEFAULT_TASK_FOLDER: &str = "\\";

/// スケジューラアダプタの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// 新規タスクの登録先フォルダ（`\` で始まる）
    pub task_folder: String,
    /// 列挙時に隠しタスクも含めるか
    pub include_hidden: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            task_folder: DEFAULT_TASK_FOLDER.to_string(),
            include_hidden: true,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.task_folder.starts_with('\\') {
            return Err(DomainError::InvalidConfig(format!(
                "task_folder must start with '\\' (got {:?})",
                self.task_folder
            )));
        }
        if self.task_folder.len() > 1 && self.task_folder.ends_with('\\') {
            return Err(DomainError::InvalidConfig(format!(
                "task_folder must not end with '\\' (got {:?})",
                self.task_folder
            )));
        }
        // フォルダ名の各要素は予約文字を含められない
        let invalid = self
            .task_folder
            .split('\\')
            .filter(|part| !part.is_empty())
            .find(|part| part.chars().any(crate::naming::is_reserved_char));
        if let Some(part) = invalid {
            return Err(DomainError::InvalidConfig(format!(
                "task_folder component contains a reserved character: {:?}",
                part
            )));
        }
        Ok(())
    }

    /// 登録先フォルダ内のタスクパス
    pub fn task_path(&self, name: &str) -> String {
        if self.task_folder == DEFAULT_TASK_FOLDER {
            format!("\\{name}")
        } else {
            format!("{}\\{name}", self.task_folder)
        }
    }
}
