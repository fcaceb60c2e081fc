use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;

use crate::performance::domain::parse_timestamp;
use crate::performance::{CallRecord, DepositRecord};
use crate::records::domain::{CallId, DepositId, LoggedCall, LoggedDeposit};
use crate::records::repository::{RecordError, RecordRepository};
use crate::records::service::RecordService;

pub(super) fn at(raw: &str) -> NaiveDateTime {
    parse_timestamp(raw).expect("valid timestamp")
}

pub(super) fn call(agent: &str, counterparty: &str, status: &str, when: &str) -> CallRecord {
    CallRecord {
        agent_name: agent.into(),
        counterparty_name: counterparty.into(),
        timestamp: at(when),
        status: status.to_string(),
    }
}

pub(super) fn deposit(depositor: &str, when: &str) -> DepositRecord {
    DepositRecord {
        depositor_name: depositor.into(),
        timestamp: at(when),
        is_deposit: true,
        deposit_bonus_units: Some(1),
        ..DepositRecord::default()
    }
}

pub(super) fn build_service() -> (RecordService<MemoryRecords>, Arc<MemoryRecords>) {
    let repository = Arc::new(MemoryRecords::default());
    (RecordService::new(repository.clone()), repository)
}

#[derive(Default)]
pub(super) struct MemoryRecords {
    calls: Mutex<Vec<LoggedCall>>,
    deposits: Mutex<Vec<LoggedDeposit>>,
}

impl RecordRepository for MemoryRecords {
    fn insert_call(&self, call: LoggedCall) -> Result<LoggedCall, RecordError> {
        let mut guard = self.calls.lock().expect("calls mutex");
        if guard.iter().any(|existing| existing.id == call.id) {
            return Err(RecordError::Conflict);
        }
        guard.push(call.clone());
        Ok(call)
    }

    fn insert_deposit(&self, deposit: LoggedDeposit) -> Result<LoggedDeposit, RecordError> {
        let mut guard = self.deposits.lock().expect("deposits mutex");
        if guard.iter().any(|existing| existing.id == deposit.id) {
            return Err(RecordError::Conflict);
        }
        guard.push(deposit.clone());
        Ok(deposit)
    }

    fn calls(&self) -> Result<Vec<LoggedCall>, RecordError> {
        Ok(self.calls.lock().expect("calls mutex").clone())
    }

    fn deposits(&self) -> Result<Vec<LoggedDeposit>, RecordError> {
        Ok(self.deposits.lock().expect("deposits mutex").clone())
    }

    fn remove_call(&self, id: &CallId) -> Result<(), RecordError> {
        let mut guard = self.calls.lock().expect("calls mutex");
        let before = guard.len();
        guard.retain(|call| &call.id != id);
        if guard.len() == before {
            Err(RecordError::NotFound)
        } else {
            Ok(())
        }
    }

    fn remove_deposit(&self, id: &DepositId) -> Result<(), RecordError> {
        let mut guard = self.deposits.lock().expect("deposits mutex");
        let before = guard.len();
        guard.retain(|deposit| &deposit.id != id);
        if guard.len() == before {
            Err(RecordError::NotFound)
        } else {
            Ok(())
        }
    }
}

pub(super) struct UnavailableRecords;

impl RecordRepository for UnavailableRecords {
    fn insert_call(&self, _call: LoggedCall) -> Result<LoggedCall, RecordError> {
        Err(RecordError::Unavailable("offline".to_string()))
    }

    fn insert_deposit(&self, _deposit: LoggedDeposit) -> Result<LoggedDeposit, RecordError> {
        Err(RecordError::Unavailable("offline".to_string()))
    }

    fn calls(&self) -> Result<Vec<LoggedCall>, RecordError> {
        Err(RecordError::Unavailable("offline".to_string()))
    }

    fn deposits(&self) -> Result<Vec<LoggedDeposit>, RecordError> {
        Err(RecordError::Unavailable("offline".to_string()))
    }

    fn remove_call(&self, _id: &CallId) -> Result<(), RecordError> {
        Err(RecordError::Unavailable("offline".to_string()))
    }

    fn remove_deposit(&self, _id: &DepositId) -> Result<(), RecordError> {
        Err(RecordError::Unavailable("offline".to_string()))
    }
}
