//! Call-report and deposit logging.
//!
//! Besides storing records, the service is the retrieval side of the performance
//! engine: it narrows calls to one agent and deposits to the counterparties those
//! calls reached.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    deposits_matching_calls, AgentActivity, CallId, DepositId, LoggedCall, LoggedDeposit,
    RecordValidationError,
};
pub use repository::{RecordError, RecordRepository};
pub use router::records_router;
pub use service::{RecordService, RecordServiceError};
