/// 証明書期限アラートLambda関数
///
/// EventBridgeスケジュール（例: 1日1回）からトリガーされ、
/// インベントリAPIから期限切れ間近のSSL証明書を取得してSNSトピックに通知する。
/// Lambda関数としても、ローカルスクリプトとしても実行可能。
///
/// # 環境変数
/// - API_ENDPOINT: インベントリAPIのベースURL（デフォルト: http://localhost:8080/api/v1）
/// - SNS_TOPIC_ARN: 通知先SNSトピックARN（通知時に必須）
/// - ALERT_DAYS: アラート閾値の日数（デフォルト: 30）
///
/// # ローカル実行
/// ```bash
/// export SNS_TOPIC_ARN=arn:aws:sns:us-east-1:123456789012:cert-alerts
///
/// # 実際にSNSへ発行
/// cargo run --bin certificate_alert
///
/// # 発行せずにレポートを表示
/// cargo run --bin certificate_alert -- --dry-run --alert-days 60
/// ```
use chrono::Utc;
use clap::Parser;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{debug, error, info};

use certificate_alert::application::{failure_result, AlertTask, AlertTaskError};
use certificate_alert::domain::InvocationResult;
use certificate_alert::infrastructure::alert_config::{
    ALERT_DAYS_ENV, API_ENDPOINT_ENV, SNS_TOPIC_ARN_ENV,
};
use certificate_alert::infrastructure::{
    init_logging, AlertConfig, AlertConfigError, AwsSnsOps, CertificateInventory,
    DryRunSnsOps, HttpInventoryClient, LogFormat, SnsOps,
};

/// コマンドライン引数（ローカル実行用）
///
/// 指定した値は環境変数より優先される。
#[derive(Parser, Debug)]
#[command(name = "certificate_alert")]
#[command(about = "期限切れ間近のSSL証明書を確認してSNSに通知")]
struct CliArgs {
    /// インベントリAPIのベースURL
    #[arg(long)]
    api_endpoint: Option<String>,

    /// 通知先SNSトピックARN
    #[arg(long)]
    topic_arn: Option<String>,

    /// アラート閾値（日数）
    #[arg(long, short = 'd')]
    alert_days: Option<String>,

    /// SNSに発行せず、件名と本文を標準出力に表示する
    #[arg(long)]
    dry_run: bool,
}

impl CliArgs {
    /// 環境変数名に対応する上書き値を取得
    fn override_for(&self, key: &str) -> Option<String> {
        match key {
            API_ENDPOINT_ENV => self.api_endpoint.clone(),
            SNS_TOPIC_ARN_ENV => self.topic_arn.clone(),
            ALERT_DAYS_ENV => self.alert_days.clone(),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging(LogFormat::detect());

    // Lambda環境かどうかを判定
    if std::env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
        info!("Lambda関数として起動");
        run_lambda().await
    } else {
        info!("ローカルスクリプトとして起動");
        run_local().await
    }
}

/// Lambda関数として実行
///
/// 設定とクライアントはコールドスタート時に一度だけ構築し、各invocationで共有する。
async fn run_lambda() -> Result<(), Error> {
    let config = load_config(AlertConfig::from_env());
    let sns_ops = AwsSnsOps::from_config().await;

    let task = config.map(|config| {
        let inventory = HttpInventoryClient::from_config(&config);
        AlertTask::new(config, inventory, sns_ops)
    });

    let task = &task;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(task, event).await
    }))
    .await
}

/// Lambda関数のメインハンドラー
///
/// トリガーのペイロードは使用しない。
/// 処理の失敗は500の結果として返却し、Lambda自体はエラーにしない。
async fn handler<I, S>(
    task: &Result<AlertTask<I, S>, AlertConfigError>,
    event: LambdaEvent<Value>,
) -> Result<InvocationResult, Error>
where
    I: CertificateInventory,
    S: SnsOps,
{
    debug!(
        request_id = %event.context.request_id,
        "証明書アラートLambdaがトリガーされました"
    );

    Ok(run_task(task).await)
}

/// ローカルで1回だけ実行し、結果を標準出力に表示
async fn run_local() -> Result<(), Error> {
    let args = CliArgs::parse();

    info!(
        api_endpoint = ?args.api_endpoint,
        topic_arn = ?args.topic_arn,
        alert_days = ?args.alert_days,
        dry_run = args.dry_run,
        "コマンドライン引数をパース"
    );

    let config = load_config(AlertConfig::from_lookup(|key| {
        args.override_for(key).or_else(|| std::env::var(key).ok())
    }));

    let result = match config {
        Ok(config) if args.dry_run => run_once(config, DryRunSnsOps).await,
        Ok(config) => run_once(config, AwsSnsOps::from_config().await).await,
        Err(err) => failure_result(AlertTaskError::from(err), Utc::now()),
    };

    let result_json = serde_json::to_string_pretty(&result)?;
    println!("{}", result_json);

    Ok(())
}

/// 指定したSNS操作でタスクを構築して1回実行
async fn run_once<S: SnsOps>(config: AlertConfig, sns_ops: S) -> InvocationResult {
    let inventory = HttpInventoryClient::from_config(&config);
    AlertTask::new(config, inventory, sns_ops).run().await
}

/// 設定タスクを実行（設定エラーは500の結果に変換）
async fn run_task<I, S>(task: &Result<AlertTask<I, S>, AlertConfigError>) -> InvocationResult
where
    I: CertificateInventory,
    S: SnsOps,
{
    match task {
        Ok(task) => task.run().await,
        Err(err) => failure_result(AlertTaskError::from(err.clone()), Utc::now()),
    }
}

/// 設定読み込み結果をログ出力
fn load_config(
    config: Result<AlertConfig, AlertConfigError>,
) -> Result<AlertConfig, AlertConfigError> {
    match &config {
        Ok(config) => info!(
            api_endpoint = config.api_endpoint(),
            sns_topic_arn = ?config.sns_topic_arn(),
            alert_days = config.alert_days(),
            "証明書アラート設定を読み込み"
        ),
        Err(err) => error!(error = %err, "証明書アラート設定読み込み失敗"),
    }
    config
}
