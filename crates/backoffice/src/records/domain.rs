use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::performance::{CallRecord, DepositRecord};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepositId(pub String);

/// A call report as stored, keyed by its assigned id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedCall {
    pub id: CallId,
    #[serde(flatten)]
    pub record: CallRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedDeposit {
    pub id: DepositId,
    #[serde(flatten)]
    pub record: DepositRecord,
}

/// Records the performance engine runs against for a single agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentActivity {
    pub calls: Vec<CallRecord>,
    pub deposits: Vec<DepositRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordValidationError {
    #[error("agent name is required")]
    MissingAgent,
    #[error("counterparty name is required")]
    MissingCounterparty,
    #[error("call status is required")]
    MissingStatus,
    #[error("depositor name is required")]
    MissingDepositor,
}

pub(crate) fn validate_call(record: &CallRecord) -> Result<(), RecordValidationError> {
    if record.agent_name.is_blank() {
        return Err(RecordValidationError::MissingAgent);
    }
    if record.counterparty_name.is_blank() {
        return Err(RecordValidationError::MissingCounterparty);
    }
    if record.status.trim().is_empty() {
        return Err(RecordValidationError::MissingStatus);
    }
    Ok(())
}

pub(crate) fn validate_deposit(record: &DepositRecord) -> Result<(), RecordValidationError> {
    if record.depositor_name.is_blank() {
        return Err(RecordValidationError::MissingDepositor);
    }
    Ok(())
}

/// Deposits whose depositor matches any counterparty reached by `calls`.
pub fn deposits_matching_calls<I>(calls: &[CallRecord], deposits: I) -> Vec<DepositRecord>
where
    I: IntoIterator<Item = DepositRecord>,
{
    let counterparties = counterparty_keys(calls);
    deposits
        .into_iter()
        .filter(|deposit| counterparties.contains(deposit.depositor_name.key()))
        .collect()
}

pub(crate) fn counterparty_keys(calls: &[CallRecord]) -> HashSet<&str> {
    calls
        .iter()
        .map(|call| call.counterparty_name.key())
        .collect()
}
