use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    counterparty_keys, deposits_matching_calls, validate_call, validate_deposit, AgentActivity,
    CallId, DepositId, LoggedCall, LoggedDeposit, RecordValidationError,
};
use super::repository::{RecordError, RecordRepository};
use crate::performance::{CallRecord, DepositRecord, PartyName};

/// Logs call reports and deposits and serves them back per agent.
pub struct RecordService<R> {
    repository: Arc<R>,
    call_sequence: AtomicU64,
    deposit_sequence: AtomicU64,
}

impl<R> RecordService<R>
where
    R: RecordRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            call_sequence: AtomicU64::new(1),
            deposit_sequence: AtomicU64::new(1),
        }
    }

    pub fn log_call(&self, record: CallRecord) -> Result<LoggedCall, RecordServiceError> {
        if let Err(error) = validate_call(&record) {
            warn!(%error, "rejected call report");
            return Err(error.into());
        }

        let id = CallId(format!(
            "call-{:06}",
            self.call_sequence.fetch_add(1, Ordering::Relaxed)
        ));
        let stored = self.repository.insert_call(LoggedCall { id, record })?;
        info!(
            call_id = %stored.id.0,
            agent = %stored.record.agent_name,
            status = %stored.record.status,
            "call report logged"
        );
        Ok(stored)
    }

    pub fn log_deposit(&self, record: DepositRecord) -> Result<LoggedDeposit, RecordServiceError> {
        if let Err(error) = validate_deposit(&record) {
            warn!(%error, "rejected deposit");
            return Err(error.into());
        }

        let id = DepositId(format!(
            "dep-{:06}",
            self.deposit_sequence.fetch_add(1, Ordering::Relaxed)
        ));
        let stored = self
            .repository
            .insert_deposit(LoggedDeposit { id, record })?;
        info!(
            deposit_id = %stored.id.0,
            depositor = %stored.record.depositor_name,
            ftd = stored.record.is_first_time_deposit,
            "deposit logged"
        );
        Ok(stored)
    }

    /// Stored calls, optionally narrowed to one agent.
    pub fn list_calls(
        &self,
        agent: Option<&PartyName>,
    ) -> Result<Vec<LoggedCall>, RecordServiceError> {
        let calls = self.repository.calls()?;
        Ok(match agent {
            Some(agent) => calls
                .into_iter()
                .filter(|call| &call.record.agent_name == agent)
                .collect(),
            None => calls,
        })
    }

    /// Stored deposits, optionally narrowed to those attributable to one agent.
    pub fn list_deposits(
        &self,
        agent: Option<&PartyName>,
    ) -> Result<Vec<LoggedDeposit>, RecordServiceError> {
        let deposits = self.repository.deposits()?;
        let Some(agent) = agent else {
            return Ok(deposits);
        };

        let calls = self.calls_for_agent(agent)?;
        let counterparties = counterparty_keys(&calls);
        Ok(deposits
            .into_iter()
            .filter(|deposit| counterparties.contains(deposit.record.depositor_name.key()))
            .collect())
    }

    pub fn calls_for_agent(
        &self,
        agent: &PartyName,
    ) -> Result<Vec<CallRecord>, RecordServiceError> {
        Ok(self
            .list_calls(Some(agent))?
            .into_iter()
            .map(|call| call.record)
            .collect())
    }

    pub fn deposits_for_calls(
        &self,
        calls: &[CallRecord],
    ) -> Result<Vec<DepositRecord>, RecordServiceError> {
        let deposits = self.repository.deposits()?;
        Ok(deposits_matching_calls(
            calls,
            deposits.into_iter().map(|deposit| deposit.record),
        ))
    }

    /// The agent's calls and the deposits made by parties those calls reached.
    pub fn activity_for_agent(
        &self,
        agent: &PartyName,
    ) -> Result<AgentActivity, RecordServiceError> {
        let calls = self.calls_for_agent(agent)?;
        let deposits = self.deposits_for_calls(&calls)?;
        Ok(AgentActivity { calls, deposits })
    }

    pub fn delete_call(&self, id: &CallId) -> Result<(), RecordServiceError> {
        self.repository.remove_call(id)?;
        info!(call_id = %id.0, "call report deleted");
        Ok(())
    }

    pub fn delete_deposit(&self, id: &DepositId) -> Result<(), RecordServiceError> {
        self.repository.remove_deposit(id)?;
        info!(deposit_id = %id.0, "deposit deleted");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordServiceError {
    #[error(transparent)]
    Invalid(#[from] RecordValidationError),
    #[error(transparent)]
    Repository(#[from] RecordError),
}
