use super::domain::{CallId, DepositId, LoggedCall, LoggedDeposit};

/// Storage abstraction for logged calls and deposits.
pub trait RecordRepository: Send + Sync {
    fn insert_call(&self, call: LoggedCall) -> Result<LoggedCall, RecordError>;
    fn insert_deposit(&self, deposit: LoggedDeposit) -> Result<LoggedDeposit, RecordError>;
    fn calls(&self) -> Result<Vec<LoggedCall>, RecordError>;
    fn deposits(&self) -> Result<Vec<LoggedDeposit>, RecordError>;
    fn remove_call(&self, id: &CallId) -> Result<(), RecordError>;
    fn remove_deposit(&self, id: &DepositId) -> Result<(), RecordError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}
