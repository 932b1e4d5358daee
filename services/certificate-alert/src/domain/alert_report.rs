/// アラートレポート整形モジュール
///
/// SNSで配信するプレーンテキストのレポート本文と件名を生成する。
/// 生成時刻は呼び出し側から注入するため、同じ入力に対して常に同じ文字列を返す。
use chrono::{DateTime, Utc};

use super::CertificateRecord;

/// レポートの見出し（件名の先頭にも使用）
pub const REPORT_TITLE: &str = "SSL Certificate Expiry Alert";

/// 欠落フィールドの代替表示
pub const UNKNOWN_FIELD: &str = "Unknown";

/// 対応を促す結びの一文
const CALL_TO_ACTION: &str =
    "Please take immediate action to renew these certificates to avoid service disruption.";

/// SNSメッセージの件名を生成
///
/// # 例
/// `SSL Certificate Expiry Alert - 2 certificates expiring within 30 days`
pub fn alert_subject(certificate_count: usize, alert_days: i32) -> String {
    format!(
        "{} - {} certificates expiring within {} days",
        REPORT_TITLE, certificate_count, alert_days
    )
}

/// アラートレポート本文を生成
///
/// 見出し、証明書ごとの詳細ブロック、生成時刻、結びの一文で構成される。
/// 空のリストでも見出しと結びは出力し、詳細ブロックのみ0件となる。
///
/// # 引数
/// * `records` - 期限切れ間近の証明書
/// * `alert_days` - アラート閾値（日数）
/// * `generated_at` - レポート生成時刻
pub fn format_report(
    records: &[CertificateRecord],
    alert_days: i32,
    generated_at: DateTime<Utc>,
) -> String {
    let mut report = format!(
        "\n{}\n\nFound {} certificate(s) expiring within {} days.\n\nCertificate Details:\n",
        REPORT_TITLE,
        records.len(),
        alert_days
    );

    for record in records {
        // 欠落フィールドはUnknownで置き換える
        let domain = record.domain.as_deref().unwrap_or(UNKNOWN_FIELD);
        let expiry_date = record.expiry_date.as_deref().unwrap_or(UNKNOWN_FIELD);
        let days_until_expiry = record
            .days_until_expiry
            .map(|days| days.to_string())
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string());

        report.push_str(&format!(
            "\n- Domain: {}\n  Expiry Date: {}\n  Days Until Expiry: {}\n",
            domain, expiry_date, days_until_expiry
        ));
    }

    report.push_str(&format!(
        "\nGenerated at: {}\n\n{}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        CALL_TO_ACTION
    ));

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 9, 30, 15).unwrap()
    }

    fn sample_records() -> Vec<CertificateRecord> {
        vec![
            CertificateRecord::new("example.com", "2024-04-01T00:00:00Z", 25),
            CertificateRecord::new("test.com", "2024-04-15T00:00:00Z", 39),
        ]
    }

    // ==================== alert_subject テスト ====================

    #[test]
    fn test_alert_subject() {
        assert_eq!(
            alert_subject(2, 30),
            "SSL Certificate Expiry Alert - 2 certificates expiring within 30 days"
        );
    }

    #[test]
    fn test_alert_subject_fits_sns_limit() {
        // SNSの件名は100文字まで
        assert!(alert_subject(usize::MAX, i32::MAX).len() <= 100);
    }

    // ==================== format_report テスト ====================

    #[test]
    fn test_format_report_with_certificates() {
        let report = format_report(&sample_records(), 30, fixed_time());

        assert!(report.contains("SSL Certificate Expiry Alert"));
        assert!(report.contains("Found 2 certificate(s) expiring within 30 days."));
        assert!(report.contains("- Domain: example.com"));
        assert!(report.contains("  Expiry Date: 2024-04-01T00:00:00Z"));
        assert!(report.contains("  Days Until Expiry: 25"));
        assert!(report.contains("- Domain: test.com"));
        assert!(report.contains("  Days Until Expiry: 39"));
        assert!(report.contains("Please take immediate action"));
    }

    #[test]
    fn test_format_report_empty_list() {
        let report = format_report(&[], 30, fixed_time());

        assert!(report.contains("SSL Certificate Expiry Alert"));
        assert!(report.contains("Found 0 certificate(s) expiring within 30 days."));
        assert!(!report.contains("- Domain:"));
        assert!(report.contains("Generated at: 2024-03-07 09:30:15 UTC"));
        assert!(report.contains("Please take immediate action"));
    }

    #[test]
    fn test_format_report_exact_layout() {
        let records = vec![CertificateRecord::new("example.com", "2024-04-01T00:00:00Z", 25)];
        let report = format_report(&records, 30, fixed_time());

        let expected = "\nSSL Certificate Expiry Alert\n\n\
Found 1 certificate(s) expiring within 30 days.\n\n\
Certificate Details:\n\
\n- Domain: example.com\n  Expiry Date: 2024-04-01T00:00:00Z\n  Days Until Expiry: 25\n\
\nGenerated at: 2024-03-07 09:30:15 UTC\n\n\
Please take immediate action to renew these certificates to avoid service disruption.\n";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_format_report_unknown_fields() {
        let records = vec![CertificateRecord::default()];
        let report = format_report(&records, 7, fixed_time());

        assert!(report.contains("- Domain: Unknown"));
        assert!(report.contains("  Expiry Date: Unknown"));
        assert!(report.contains("  Days Until Expiry: Unknown"));
    }

    #[test]
    fn test_format_report_is_deterministic() {
        let first = format_report(&sample_records(), 30, fixed_time());
        let second = format_report(&sample_records(), 30, fixed_time());

        assert_eq!(first, second);
    }
}
