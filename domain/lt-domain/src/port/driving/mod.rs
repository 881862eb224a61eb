//! 駆動ポート（入力インターフェース）。

mod logon_task_use_case;

pub use logon_task_use_case::*;
