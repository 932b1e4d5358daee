/// 証明書レコード
///
/// インベントリAPIの`GET /certificates/expiring`が返す1件分のレコード。
/// 各フィールドは欠落・nullを許容し、表示時に"Unknown"へ置き換える。
/// 想定外の型の値が1件混ざっても一覧全体の読み込みは失敗させない。
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 期限切れ間近の証明書
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// ドメイン名（インベントリAPIのDTOでは`domainName`）
    #[serde(
        default,
        alias = "domainName",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub domain: Option<String>,
    /// 有効期限（APIが返した文字列をそのまま保持）
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_date: Option<String>,
    /// 有効期限までの残り日数
    #[serde(
        default,
        deserialize_with = "lenient_days",
        skip_serializing_if = "Option::is_none"
    )]
    pub days_until_expiry: Option<i64>,
}

impl CertificateRecord {
    /// 全フィールドを指定してレコードを作成
    pub fn new(
        domain: impl Into<String>,
        expiry_date: impl Into<String>,
        days_until_expiry: i64,
    ) -> Self {
        Self {
            domain: Some(domain.into()),
            expiry_date: Some(expiry_date.into()),
            days_until_expiry: Some(days_until_expiry),
        }
    }
}

/// 文字列以外の値はJSON表記のまま文字列として保持する
///
/// 例: `123` → `"123"`、`[2024,4,1,0,0]` → `"[2024,4,1,0,0]"`
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }))
}

/// 整数として解釈できない値は欠落扱い（表示時はUnknown）
fn lenient_days<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(days_from_value))
}

fn days_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            // 25.0 のような整数値の浮動小数点は受け付ける
            number
                .as_f64()
                .filter(|days| days.is_finite() && days.fract() == 0.0)
                .map(|days| days as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
