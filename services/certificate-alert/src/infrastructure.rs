// Infrastructure layer modules
pub mod alert_config;
pub mod inventory_client;
pub mod logging;
pub mod sns_ops;

// Re-exports
pub use alert_config::{AlertConfig, AlertConfigError};
pub use inventory_client::{CertificateInventory, HttpInventoryClient, InventoryError};
pub use logging::{init_logging, LogFormat};
pub use sns_ops::{AwsSnsOps, DryRunSnsOps, PublishReceipt, SnsOps, SnsOpsError};
