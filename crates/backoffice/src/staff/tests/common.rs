use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::performance::domain::parse_timestamp;
use crate::performance::{CallRecord, ClockSource, DepositRecord};
use crate::records::{
    CallId, DepositId, LoggedCall, LoggedDeposit, RecordError, RecordRepository, RecordService,
};
use crate::staff::domain::{StaffId, StaffMember, StaffRole, StaffSubmission};
use crate::staff::repository::{RepositoryError, StaffRepository};
use crate::staff::router::StaffRoutes;
use crate::staff::service::StaffDirectoryService;

pub(super) fn submission(name: &str, email: &str) -> StaffSubmission {
    StaffSubmission {
        full_name: name.to_string(),
        email: email.to_string(),
        phone: Some("+1 555 0100".to_string()),
        role: StaffRole::Agent,
        joined_on: NaiveDate::from_ymd_opt(2024, 1, 15),
        active: true,
    }
}

pub(super) fn build_service() -> (StaffDirectoryService<MemoryStaff>, Arc<MemoryStaff>) {
    let repository = Arc::new(MemoryStaff::default());
    (StaffDirectoryService::new(repository.clone()), repository)
}

pub(super) fn build_routes() -> StaffRoutes<MemoryStaff, MemoryRecords> {
    let (staff, _) = build_service();
    StaffRoutes {
        staff: Arc::new(staff),
        records: Arc::new(RecordService::new(Arc::new(MemoryRecords::default()))),
        clock: ClockSource::Fixed(parse_timestamp("2025-03-15T14:30:00").expect("valid")),
    }
}

pub(super) fn call(agent: &str, counterparty: &str, status: &str, when: &str) -> CallRecord {
    CallRecord {
        agent_name: agent.into(),
        counterparty_name: counterparty.into(),
        timestamp: parse_timestamp(when).expect("valid timestamp"),
        status: status.to_string(),
    }
}

pub(super) fn deposit(depositor: &str, when: &str) -> DepositRecord {
    DepositRecord {
        depositor_name: depositor.into(),
        timestamp: parse_timestamp(when).expect("valid timestamp"),
        is_first_time_deposit: true,
        is_deposit: true,
        ftd_bonus_units: Some(1),
        deposit_bonus_units: Some(1),
        total_calls_logged: Some(3),
        successful_calls_logged: Some(2),
    }
}

#[derive(Default)]
pub(super) struct MemoryStaff {
    members: Mutex<BTreeMap<StaffId, StaffMember>>,
}

impl StaffRepository for MemoryStaff {
    fn insert(&self, member: StaffMember) -> Result<StaffMember, RepositoryError> {
        let mut guard = self.members.lock().expect("staff mutex");
        if guard.contains_key(&member.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(member.id.clone(), member.clone());
        Ok(member)
    }

    fn update(&self, member: StaffMember) -> Result<(), RepositoryError> {
        let mut guard = self.members.lock().expect("staff mutex");
        match guard.get_mut(&member.id) {
            Some(slot) => {
                *slot = member;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &StaffId) -> Result<Option<StaffMember>, RepositoryError> {
        Ok(self.members.lock().expect("staff mutex").get(id).cloned())
    }

    fn list(&self) -> Result<Vec<StaffMember>, RepositoryError> {
        Ok(self
            .members
            .lock()
            .expect("staff mutex")
            .values()
            .cloned()
            .collect())
    }

    fn remove(&self, id: &StaffId) -> Result<(), RepositoryError> {
        self.members
            .lock()
            .expect("staff mutex")
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub(super) struct MemoryRecords {
    calls: Mutex<Vec<LoggedCall>>,
    deposits: Mutex<Vec<LoggedDeposit>>,
}

impl RecordRepository for MemoryRecords {
    fn insert_call(&self, call: LoggedCall) -> Result<LoggedCall, RecordError> {
        self.calls.lock().expect("calls mutex").push(call.clone());
        Ok(call)
    }

    fn insert_deposit(&self, deposit: LoggedDeposit) -> Result<LoggedDeposit, RecordError> {
        self.deposits
            .lock()
            .expect("deposits mutex")
            .push(deposit.clone());
        Ok(deposit)
    }

    fn calls(&self) -> Result<Vec<LoggedCall>, RecordError> {
        Ok(self.calls.lock().expect("calls mutex").clone())
    }

    fn deposits(&self) -> Result<Vec<LoggedDeposit>, RecordError> {
        Ok(self.deposits.lock().expect("deposits mutex").clone())
    }

    fn remove_call(&self, _id: &CallId) -> Result<(), RecordError> {
        Err(RecordError::NotFound)
    }

    fn remove_deposit(&self, _id: &DepositId) -> Result<(), RecordError> {
        Err(RecordError::NotFound)
    }
}
