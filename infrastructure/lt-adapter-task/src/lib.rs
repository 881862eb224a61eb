//! lt-adapter-task: タスクスケジューラポートのアダプタ。
//! Windows では Task Scheduler 2.0 の COM API（ITaskService）を使う。
//! インメモリ実装はテストとドライランに使う。

mod com;
mod memory;

pub use memory::{FailurePlan, InMemoryTaskScheduler};
pub use com::WindowsTaskScheduler;
