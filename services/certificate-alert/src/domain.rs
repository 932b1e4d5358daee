// Domain layer modules
pub mod alert_report;
pub mod certificate_record;
pub mod invocation_result;

// Re-exports
pub use alert_report::{alert_subject, format_report, REPORT_TITLE, UNKNOWN_FIELD};
pub use certificate_record::CertificateRecord;
pub use invocation_result::{InvocationResult, ResponseBody};
