/// 証明書アラート設定
///
/// 起動時に一度だけ環境変数から読み込み、以降は読み取り専用で各invocationに渡す。
///
/// 環境変数:
/// - API_ENDPOINT: インベントリAPIのベースURL（デフォルト: http://localhost:8080/api/v1）
/// - SNS_TOPIC_ARN: 通知先SNSトピックARN（通知時に必須）
/// - ALERT_DAYS: アラート閾値の日数（デフォルト: 30）
use thiserror::Error;

/// インベントリAPIエンドポイントの環境変数名
pub const API_ENDPOINT_ENV: &str = "API_ENDPOINT";

/// 通知先SNSトピックARNの環境変数名
pub const SNS_TOPIC_ARN_ENV: &str = "SNS_TOPIC_ARN";

/// アラート閾値の環境変数名
pub const ALERT_DAYS_ENV: &str = "ALERT_DAYS";

/// アラート設定のエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertConfigError {
    /// 閾値が整数として解釈できない
    #[error("invalid integer for {name}: '{value}'")]
    InvalidAlertDays { name: String, value: String },
}

/// 証明書アラート設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertConfig {
    /// インベントリAPIのベースURL
    api_endpoint: String,
    /// 通知先SNSトピックARN
    sns_topic_arn: Option<String>,
    /// アラート閾値（日数）
    alert_days: i32,
}

impl AlertConfig {
    /// デフォルトのインベントリAPIエンドポイント
    pub const DEFAULT_API_ENDPOINT: &'static str = "http://localhost:8080/api/v1";

    /// デフォルトのアラート閾値（日数）
    pub const DEFAULT_ALERT_DAYS: i32 = 30;

    /// 明示的な値で設定を作成
    pub fn new(
        api_endpoint: impl Into<String>,
        sns_topic_arn: Option<String>,
        alert_days: i32,
    ) -> Self {
        Self {
            api_endpoint: api_endpoint.into(),
            sns_topic_arn: sns_topic_arn.filter(|arn| !arn.is_empty()),
            alert_days,
        }
    }

    /// 環境変数から設定を読み込む
    ///
    /// # エラー
    /// ALERT_DAYSが整数でない場合は`InvalidAlertDays`を返す
    pub fn from_env() -> Result<Self, AlertConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の値取得関数から設定を読み込む
    ///
    /// ローカル実行時のコマンドライン引数による上書きやテストで使用する。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AlertConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_endpoint =
            lookup(API_ENDPOINT_ENV).unwrap_or_else(|| Self::DEFAULT_API_ENDPOINT.to_string());

        let sns_topic_arn = lookup(SNS_TOPIC_ARN_ENV);

        let alert_days = match lookup(ALERT_DAYS_ENV) {
            Some(raw) => Self::parse_alert_days(&raw)?,
            None => Self::DEFAULT_ALERT_DAYS,
        };

        Ok(Self::new(api_endpoint, sns_topic_arn, alert_days))
    }

    /// 閾値の文字列を整数に変換（前後の空白は無視）
    pub fn parse_alert_days(raw: &str) -> Result<i32, AlertConfigError> {
        raw.trim()
            .parse::<i32>()
            .map_err(|_| AlertConfigError::InvalidAlertDays {
                name: ALERT_DAYS_ENV.to_string(),
                value: raw.to_string(),
            })
    }

    /// インベントリAPIのベースURLを取得
    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    /// 通知先SNSトピックARNを取得（未設定の場合はNone）
    pub fn sns_topic_arn(&self) -> Option<&str> {
        self.sns_topic_arn.as_deref()
    }

    /// アラート閾値（日数）を取得
    pub fn alert_days(&self) -> i32 {
        self.alert_days
    }
}
