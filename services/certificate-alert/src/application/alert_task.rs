/// 証明書アラートタスク
///
/// スケジュール実行ごとに以下を順に行う:
/// 1. インベントリAPIから期限切れ間近の証明書を取得
/// 2. 1件以上あればレポートを整形してSNSトピックに発行（0件なら発行しない）
/// 3. 結果を`InvocationResult`として返却
///
/// 再試行は行わず、失敗時は500の結果を返して次回の実行に委ねる。
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info};

use crate::domain::{alert_subject, format_report, InvocationResult};
use crate::infrastructure::{
    AlertConfig, AlertConfigError, CertificateInventory, InventoryError, SnsOps, SnsOpsError,
};

/// アラートタスクのエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertTaskError {
    /// インベントリAPIへの到達失敗または非成功ステータス
    #[error("Failed to connect to API: {0}")]
    Transport(String),
    /// それ以外のすべての失敗
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<InventoryError> for AlertTaskError {
    fn from(err: InventoryError) -> Self {
        if err.is_transport() {
            AlertTaskError::Transport(err.to_string())
        } else {
            AlertTaskError::Unexpected(err.to_string())
        }
    }
}

impl From<SnsOpsError> for AlertTaskError {
    fn from(err: SnsOpsError) -> Self {
        AlertTaskError::Unexpected(err.to_string())
    }
}

impl From<AlertConfigError> for AlertTaskError {
    fn from(err: AlertConfigError) -> Self {
        AlertTaskError::Unexpected(err.to_string())
    }
}

/// 1回の実行で起きたこと
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// アラートを発行した
    AlertSent {
        /// 通知した証明書の件数
        certificate_count: usize,
        /// SNSメッセージID
        message_id: String,
    },
    /// 期限切れ間近の証明書がなかった
    NothingExpiring,
}

/// 証明書アラートタスク
pub struct AlertTask<I, S>
where
    I: CertificateInventory,
    S: SnsOps,
{
    /// アラート設定
    config: AlertConfig,
    /// インベントリAPIクライアント
    inventory: I,
    /// SNS操作
    sns_ops: S,
}

impl<I, S> AlertTask<I, S>
where
    I: CertificateInventory,
    S: SnsOps,
{
    /// 新しいAlertTaskを作成
    pub fn new(config: AlertConfig, inventory: I, sns_ops: S) -> Self {
        Self {
            config,
            inventory,
            sns_ops,
        }
    }

    /// 現在時刻でタスクを実行
    pub async fn run(&self) -> InvocationResult {
        self.run_at(Utc::now()).await
    }

    /// 指定時刻でタスクを実行
    ///
    /// `now`はレポートの生成時刻と結果のタイムスタンプに使用する。
    /// エラーはすべて500の結果に変換されるため、この関数自体は失敗しない。
    pub async fn run_at(&self, now: DateTime<Utc>) -> InvocationResult {
        match self.check_and_notify(now).await {
            Ok(AlertOutcome::AlertSent {
                certificate_count,
                message_id,
            }) => {
                info!(
                    certificate_count = certificate_count,
                    alert_days = self.config.alert_days(),
                    message_id = %message_id,
                    "証明書アラートを送信"
                );
                InvocationResult::alert_sent(certificate_count, now)
            }
            Ok(AlertOutcome::NothingExpiring) => {
                info!(
                    alert_days = self.config.alert_days(),
                    "期限切れ間近の証明書なし"
                );
                InvocationResult::nothing_expiring(self.config.alert_days(), now)
            }
            Err(err) => failure_result(err, now),
        }
    }

    /// 証明書を取得し、必要であればアラートを発行する
    ///
    /// # 戻り値
    /// * `Ok(AlertOutcome)` - 発行した、または対象がなかった
    /// * `Err(AlertTaskError)` - 取得または発行に失敗
    pub async fn check_and_notify(
        &self,
        now: DateTime<Utc>,
    ) -> Result<AlertOutcome, AlertTaskError> {
        let alert_days = self.config.alert_days();
        let certificates = self.inventory.fetch_expiring(alert_days).await?;

        if certificates.is_empty() {
            return Ok(AlertOutcome::NothingExpiring);
        }

        let topic_arn = self.config.sns_topic_arn().ok_or_else(|| {
            AlertTaskError::Unexpected("SNS_TOPIC_ARN is not set".to_string())
        })?;

        let subject = alert_subject(certificates.len(), alert_days);
        let message = format_report(&certificates, alert_days, now);

        let receipt = self
            .sns_ops
            .publish(topic_arn, &message, Some(&subject))
            .await?;

        Ok(AlertOutcome::AlertSent {
            certificate_count: certificates.len(),
            message_id: receipt.message_id,
        })
    }
}

/// エラーを500の結果に変換する
///
/// 設定読み込みに失敗してタスクを構築できない場合にも使用する。
pub fn failure_result(err: AlertTaskError, now: DateTime<Utc>) -> InvocationResult {
    let error_msg = err.to_string();
    error!(error = %error_msg, "証明書アラート処理失敗");
    InvocationResult::failure(error_msg, now)
}
