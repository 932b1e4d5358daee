// アプリケーション層モジュール
pub mod alert_task;

// 再エクスポート
pub use alert_task::{failure_result, AlertOutcome, AlertTask, AlertTaskError};
