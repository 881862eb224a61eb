//! タスクスケジューラのアダプタ再公開。
//!
//! 呼び出し側から adapter クレートへの直接依存を避けるための再公開。

pub use lt_adapter_task::{FailurePlan, InMemoryTaskScheduler, WindowsTaskScheduler};
