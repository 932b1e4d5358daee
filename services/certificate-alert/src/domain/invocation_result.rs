/// Lambda関数の実行結果
///
/// `{statusCode, body}`形式で返却する。`body`はJSONエンコードされた文字列として
/// シリアライズされる（API Gateway互換のレスポンス形式）。
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// 成功時のステータスコード
pub const STATUS_OK: u16 = 200;

/// 失敗時のステータスコード
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// レスポンスボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    /// 結果メッセージ（成功時のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 取得した証明書の件数（成功時のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_count: Option<usize>,
    /// エラーメッセージ（失敗時のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// タイムスタンプ（RFC 3339, UTC）
    pub timestamp: String,
}

/// 1回のinvocationの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    /// ステータスコード（200または500）
    pub status_code: u16,
    /// レスポンスボディ（JSON文字列としてシリアライズ）
    #[serde(serialize_with = "serialize_body_as_json_string")]
    pub body: ResponseBody,
}

impl InvocationResult {
    /// アラートを送信した場合の結果を作成
    pub fn alert_sent(certificate_count: usize, now: DateTime<Utc>) -> Self {
        Self::success(
            format!("Alert sent for {} expiring certificates", certificate_count),
            certificate_count,
            now,
        )
    }

    /// 期限切れ間近の証明書がなかった場合の結果を作成
    pub fn nothing_expiring(alert_days: i32, now: DateTime<Utc>) -> Self {
        Self::success(
            format!("No certificates expiring within {} days", alert_days),
            0,
            now,
        )
    }

    /// 失敗結果を作成
    pub fn failure(error: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            status_code: STATUS_INTERNAL_ERROR,
            body: ResponseBody {
                message: None,
                certificate_count: None,
                error: Some(error.into()),
                timestamp: format_timestamp(now),
            },
        }
    }

    fn success(message: String, certificate_count: usize, now: DateTime<Utc>) -> Self {
        Self {
            status_code: STATUS_OK,
            body: ResponseBody {
                message: Some(message),
                certificate_count: Some(certificate_count),
                error: None,
                timestamp: format_timestamp(now),
            },
        }
    }

    /// 成功結果かどうか
    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn serialize_body_as_json_string<S>(body: &ResponseBody, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let json = serde_json::to_string(body).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&json)
}
