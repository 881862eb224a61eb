//! logon-task ドメイン層
//!
//! ログオン時起動タスクの照合ルールと登録プロトコルの中核。
//! ホストのタスクスケジューラはポート越しにのみ扱う。

pub mod error;   // ドメインエラー定義
pub mod model;   // ドメインモデル（値オブジェクト、設定型）
pub mod naming;  // タスク名サニタイズ、実行ファイルキー
pub mod port;    // ポート（driving/driven）
pub mod service; // ドメインサービス（ロケータ、レジストラ）

pub use error::{DomainError, RegistrationFailure}; // エラー型を再エクスポート
