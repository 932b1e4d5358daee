/// ログ基盤モジュール
///
/// tracingクレートによる構造化ログ設定を提供する。
/// Lambda環境ではCloudWatch向けのJSON形式、ローカル実行では人が読みやすい形式で出力する。
use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログサブスクライバー初期化用の同期プリミティブ
static INIT: Once = Once::new();

/// Lambda環境を示す環境変数
const LAMBDA_FUNCTION_NAME_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON形式（Lambda/CloudWatch向け）
    Json,
    /// コンパクトなテキスト形式（ローカル実行向け）
    Compact,
}

impl LogFormat {
    /// 実行環境から出力形式を判定する
    pub fn detect() -> Self {
        Self::for_lambda(std::env::var(LAMBDA_FUNCTION_NAME_ENV).is_ok())
    }

    /// Lambda環境かどうかから出力形式を決定する
    pub fn for_lambda(in_lambda: bool) -> Self {
        if in_lambda {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// ログサブスクライバーを初期化する
///
/// 環境変数`RUST_LOG`またはデフォルトのログレベル（info）でフィルタリングを行う。
/// 複数回呼び出しても最初の呼び出しのみ初期化を実行する。
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        // 環境変数からログレベルを取得、デフォルトはinfo
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                let json_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .flatten_event(true)
                    .with_current_span(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(json_layer)
                    .init();
            }
            LogFormat::Compact => {
                // 標準出力は実行結果のJSONに使うため、ログは標準エラーへ
                let fmt_layer = tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact();

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .init();
            }
        }
    });
}

/// テスト用のログサブスクライバーを初期化する
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_for_lambda() {
        assert_eq!(LogFormat::for_lambda(true), LogFormat::Json);
        assert_eq!(LogFormat::for_lambda(false), LogFormat::Compact);
    }

    #[test]
    fn test_init_test_logging_idempotent() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_log_with_context() {
        init_test_logging();

        tracing::info!(
            certificate_count = 2,
            alert_days = 30,
            "証明書アラート送信"
        );
    }
}
