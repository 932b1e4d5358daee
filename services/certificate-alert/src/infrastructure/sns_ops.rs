//! SNS操作モジュール
//!
//! 証明書アラートのSNSトピックへの発行を提供する。
//! - AwsSnsOps: AWS SDKによる実際の発行
//! - DryRunSnsOps: 発行せずに内容を標準出力へ表示（ローカル実行用）

use async_trait::async_trait;
use aws_sdk_sns::Client as SnsClient;
use aws_sdk_sns::error::DisplayErrorContext;
use thiserror::Error;
use tracing::{info, warn};

/// SNS操作のエラー型
#[derive(Debug, Error)]
pub enum SnsOpsError {
    /// AWS SDK エラー
    #[error("SNS publish failed: {0}")]
    AwsSdkError(String),
}

/// SNSメッセージ発行の受領情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    /// メッセージID
    pub message_id: String,
}

impl PublishReceipt {
    /// 受領情報を作成
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
        }
    }
}

/// SNS操作トレイト（テスト用の抽象化）
#[async_trait]
pub trait SnsOps: Send + Sync {
    /// メッセージをSNSトピックに発行する
    ///
    /// # 引数
    /// * `topic_arn` - SNSトピックARN
    /// * `message` - 発行するメッセージ本文
    /// * `subject` - メッセージの件名（オプション）
    ///
    /// # 戻り値
    /// * `Ok(PublishReceipt)` - 発行結果
    /// * `Err(SnsOpsError)` - エラー
    async fn publish(
        &self,
        topic_arn: &str,
        message: &str,
        subject: Option<&str>,
    ) -> Result<PublishReceipt, SnsOpsError>;
}

/// 実際のAWS SNS SDKを使用したSNS操作実装
pub struct AwsSnsOps {
    client: SnsClient,
}

impl AwsSnsOps {
    /// 新しいAwsSnsOpsを作成
    pub fn new(client: SnsClient) -> Self {
        Self { client }
    }

    /// AWS設定からデフォルトのクライアントを作成
    pub async fn from_config() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = SnsClient::new(&config);
        Self::new(client)
    }
}

#[async_trait]
impl SnsOps for AwsSnsOps {
    async fn publish(
        &self,
        topic_arn: &str,
        message: &str,
        subject: Option<&str>,
    ) -> Result<PublishReceipt, SnsOpsError> {
        info!(
            topic_arn = %topic_arn,
            message_length = message.len(),
            "SNSメッセージ発行開始"
        );

        let response = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .message(message)
            .set_subject(subject.map(str::to_string))
            .send()
            .await
            .map_err(|err| {
                let detail = DisplayErrorContext(&err).to_string();
                warn!(topic_arn = %topic_arn, error = %detail, "SNS Publishエラー");
                SnsOpsError::AwsSdkError(detail)
            })?;

        let message_id = response.message_id().unwrap_or("unknown").to_string();
        info!(
            topic_arn = %topic_arn,
            message_id = %message_id,
            "SNS Publish成功"
        );

        Ok(PublishReceipt::new(message_id))
    }
}

/// 発行を行わないSNS操作実装
///
/// 件名と本文を標準出力に表示する。
#[derive(Debug, Default)]
pub struct DryRunSnsOps;

#[async_trait]
impl SnsOps for DryRunSnsOps {
    async fn publish(
        &self,
        topic_arn: &str,
        message: &str,
        subject: Option<&str>,
    ) -> Result<PublishReceipt, SnsOpsError> {
        info!(topic_arn = %topic_arn, "ドライラン: SNS発行をスキップ");

        println!("Topic: {}", topic_arn);
        println!("Subject: {}", subject.unwrap_or("(no subject)"));
        println!("{}", message);

        Ok(PublishReceipt::new("dry-run"))
    }
}
