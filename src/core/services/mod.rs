pub mod report_service;
pub mod savings_service;

pub use report_service::{LedgerReport, ReportService, TransactionRow, TransactionTotals};
pub use savings_service::{OperationOutcome, OutcomeStatus, SavingsService};
