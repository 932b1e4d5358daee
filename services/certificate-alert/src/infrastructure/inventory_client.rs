// InventoryClient - 証明書インベントリAPI用HTTPクライアント
//
// `GET {endpoint}/certificates/expiring?days={N}`で期限切れ間近の証明書一覧を取得する。
// 再試行は行わず、失敗は次回のスケジュール実行に委ねる。

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::domain::CertificateRecord;
use crate::infrastructure::AlertConfig;

/// インベントリAPI呼び出しのエラー型
///
/// # エラー種別
/// - `InvalidEndpoint`: エンドポイントURLが無効
/// - `Request`: 接続失敗・タイムアウト等のネットワークエラー
/// - `HttpStatus`: 非成功ステータスコード
/// - `Decode`: レスポンスが証明書一覧として解釈できない
#[derive(Debug, Clone, Error)]
pub enum InventoryError {
    /// 無効なエンドポイントURL
    #[error("invalid endpoint URL {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// ネットワークエラー
    #[error("{0}")]
    Request(String),

    /// HTTPエラー（ステータスコード付き）
    #[error("HTTP {status} for url {url}: {message}")]
    HttpStatus {
        /// HTTPステータスコード
        status: u16,
        /// リクエストURL
        url: String,
        /// レスポンスボディ
        message: String,
    },

    /// レスポンスのデコードエラー
    #[error("malformed certificate list: {0}")]
    Decode(String),
}

impl InventoryError {
    /// API到達不能・非成功ステータスに起因するエラーかどうか
    pub fn is_transport(&self) -> bool {
        !matches!(self, InventoryError::Decode(_))
    }
}

/// 証明書インベントリ取得トレイト（テスト用の抽象化）
#[async_trait]
pub trait CertificateInventory: Send + Sync {
    /// 指定日数以内に期限切れとなる証明書を取得する
    ///
    /// # 引数
    /// * `alert_days` - アラート閾値（日数）
    ///
    /// # 戻り値
    /// * `Ok(Vec<CertificateRecord>)` - 証明書一覧（0件の場合は空）
    /// * `Err(InventoryError)` - エラー
    async fn fetch_expiring(&self, alert_days: i32)
    -> Result<Vec<CertificateRecord>, InventoryError>;
}

/// reqwestを使用したインベントリAPIクライアント
#[derive(Clone)]
pub struct HttpInventoryClient {
    client: Client,
    endpoint: String,
}

impl std::fmt::Debug for HttpInventoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpInventoryClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl HttpInventoryClient {
    /// デフォルトのHTTPクライアントで作成
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// 設定から作成
    pub fn from_config(config: &AlertConfig) -> Self {
        info!(endpoint = config.api_endpoint(), "InventoryClientを初期化");
        Self::new(config.api_endpoint())
    }

    /// エンドポイントURLを取得
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 期限切れ間近の証明書一覧URLを構築
    ///
    /// # 戻り値
    /// 例: "http://localhost:8080/api/v1/certificates/expiring?days=30"
    pub fn expiring_url(&self, alert_days: i32) -> Result<Url, InventoryError> {
        let base = format!(
            "{}/certificates/expiring",
            self.endpoint.trim_end_matches('/')
        );

        let mut url = Url::parse(&base).map_err(|e| InventoryError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        url.query_pairs_mut()
            .append_pair("days", &alert_days.to_string());

        Ok(url)
    }
}

#[async_trait]
impl CertificateInventory for HttpInventoryClient {
    #[instrument(skip(self))]
    async fn fetch_expiring(
        &self,
        alert_days: i32,
    ) -> Result<Vec<CertificateRecord>, InventoryError> {
        let url = self.expiring_url(alert_days)?;
        debug!(endpoint = %self.endpoint, url = %url, "期限切れ間近の証明書一覧をリクエスト");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(error = %e, is_timeout = e.is_timeout(), is_connect = e.is_connect(), "インベントリAPIリクエスト失敗");
            InventoryError::Request(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "インベントリAPIエラーレスポンス");
            return Err(InventoryError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
                message: body,
            });
        }

        let body = response.text().await.map_err(|e| {
            warn!(error = %e, "レスポンスボディの読み込みに失敗");
            InventoryError::Request(e.to_string())
        })?;

        // nullは0件として扱う
        let records: Option<Vec<CertificateRecord>> =
            serde_json::from_str(&body).map_err(|e| {
                warn!(error = %e, "証明書一覧のデコードに失敗");
                InventoryError::Decode(e.to_string())
            })?;
        let records = records.unwrap_or_default();

        info!(
            status = %status,
            certificate_count = records.len(),
            "期限切れ間近の証明書を取得"
        );

        Ok(records)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// テスト用のモックインベントリ
    #[derive(Clone)]
    pub struct MockInventory {
        /// 返却する結果
        response: Result<Vec<CertificateRecord>, InventoryError>,
        /// 呼び出し時に渡された閾値
        requested_days: Arc<Mutex<Vec<i32>>>,
    }

    impl MockInventory {
        /// 指定した証明書一覧を返すモックを作成
        pub fn returning(records: Vec<CertificateRecord>) -> Self {
            Self {
                response: Ok(records),
                requested_days: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// 指定したエラーを返すモックを作成
        pub fn failing(error: InventoryError) -> Self {
            Self {
                response: Err(error),
                requested_days: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// 呼び出し時に渡された閾値の履歴
        pub fn requested_days(&self) -> Vec<i32> {
            self.requested_days.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CertificateInventory for MockInventory {
        async fn fetch_expiring(
            &self,
            alert_days: i32,
        ) -> Result<Vec<CertificateRecord>, InventoryError> {
            self.requested_days.lock().unwrap().push(alert_days);
            self.response.clone()
        }
    }

    // ==================== URL構築テスト ====================

    #[test]
    fn test_expiring_url() {
        let client = HttpInventoryClient::new("http://localhost:8080/api/v1");

        assert_eq!(
            client.expiring_url(30).unwrap().as_str(),
            "http://localhost:8080/api/v1/certificates/expiring?days=30"
        );
    }

    #[test]
    fn test_expiring_url_with_trailing_slash() {
        let client = HttpInventoryClient::new("https://inventory.example.com/api/v1/");

        assert_eq!(
            client.expiring_url(7).unwrap().as_str(),
            "https://inventory.example.com/api/v1/certificates/expiring?days=7"
        );
    }

    #[test]
    fn test_expiring_url_invalid_endpoint() {
        let client = HttpInventoryClient::new("");

        let error = client.expiring_url(30).unwrap_err();
        assert!(matches!(error, InventoryError::InvalidEndpoint { .. }));
        assert!(error.is_transport());
    }

    #[test]
    fn test_from_config() {
        let config = AlertConfig::new("https://inventory.example.com/api/v1", None, 30);
        let client = HttpInventoryClient::from_config(&config);

        assert_eq!(client.endpoint(), "https://inventory.example.com/api/v1");
    }

    // ==================== InventoryError テスト ====================

    #[test]
    fn test_inventory_error_classification() {
        assert!(InventoryError::Request("connection refused".to_string()).is_transport());
        assert!(
            InventoryError::HttpStatus {
                status: 503,
                url: "http://localhost/".to_string(),
                message: String::new(),
            }
            .is_transport()
        );
        assert!(!InventoryError::Decode("expected a sequence".to_string()).is_transport());
    }

    #[test]
    fn test_inventory_error_display() {
        let error = InventoryError::HttpStatus {
            status: 404,
            url: "http://localhost:8080/api/v1/certificates/expiring?days=30".to_string(),
            message: "Not Found".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "HTTP 404 for url http://localhost:8080/api/v1/certificates/expiring?days=30: Not Found"
        );

        let error = InventoryError::Decode("expected a sequence".to_string());
        assert_eq!(
            error.to_string(),
            "malformed certificate list: expected a sequence"
        );
    }

    // ==================== MockInventory テスト ====================

    #[tokio::test]
    async fn test_mock_inventory_records_requested_days() {
        let mock = MockInventory::returning(vec![CertificateRecord::new(
            "example.com",
            "2024-04-01T00:00:00Z",
            25,
        )]);

        let records = mock.fetch_expiring(30).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(mock.requested_days(), vec![30]);
    }
}
