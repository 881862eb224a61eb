//! スケジューラ設定の読み込み（JSON）。

use lt_domain::model::{SchedulerConfig, DEFAULT_TASK_FOLDER};
use lt_domain::DomainError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 設定ファイルのパスを指定する環境変数
pub const CONFIG_ENV_VAR: &str = "LOGON_TASK_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigDto {
    task_folder: String,
    include_hidden: bool,
}

impl Default for ConfigDto {
    fn default() -> Self {
        Self {
            task_folder: DEFAULT_TASK_FOLDER.to_string(),
            include_hidden: true,
        }
    }
}

impl From<ConfigDto> for SchedulerConfig {
    fn from(dto: ConfigDto) -> Self {
        SchedulerConfig {
            task_folder: dto.task_folder,
            include_hidden: dto.include_hidden,
        }
    }
}

/// JSON 文字列から設定を作る。欠けた項目は既定値。
pub fn config_from_json(json: &str) -> Result<SchedulerConfig, DomainError> {
    let dto: ConfigDto =
        serde_json::from_str(json).map_err(|e| DomainError::ConfigLoadFailed(e.to_string()))?;
    let config = SchedulerConfig::from(dto);
    config.validate()?;
    Ok(config)
}

/// ファイルから設定を読む
pub fn load_config(path: &Path) -> Result<SchedulerConfig, DomainError> {
    let data = fs::read_to_string(path)
        .map_err(|e| DomainError::ConfigLoadFailed(format!("read {}: {e}", path.display())))?;
    config_from_json(&data)
}

/// 環境変数が指すファイルから設定を読む。未設定なら既定値。
pub fn config_from_env() -> Result<SchedulerConfig, DomainError> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => load_config(Path::new(&path)),
        _ => Ok(SchedulerConfig::default()),
    }
}
