//! ポート定義
//!
//! driving: 外部からドメインを呼び出す入力側
//! driven: ドメインが外部に求める出力側

pub mod driven;
pub mod driving;
