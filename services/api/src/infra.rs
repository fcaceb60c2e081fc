use backoffice::performance::domain::parse_timestamp;
use backoffice::performance::ClockSource;
use backoffice::records::{
    CallId, DepositId, LoggedCall, LoggedDeposit, RecordError, RecordRepository, RecordService,
};
use backoffice::staff::{
    RepositoryError, StaffDirectoryService, StaffId, StaffMember, StaffRepository,
};
use chrono::{NaiveDate, NaiveDateTime};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// The directory and record services wired to in-memory storage.
#[derive(Clone)]
pub(crate) struct BackofficeServices {
    pub(crate) staff: Arc<StaffDirectoryService<InMemoryStaffRepository>>,
    pub(crate) records: Arc<RecordService<InMemoryRecordRepository>>,
    pub(crate) clock: ClockSource,
}

impl BackofficeServices {
    pub(crate) fn in_memory(clock: ClockSource) -> Self {
        Self {
            staff: Arc::new(StaffDirectoryService::new(Arc::new(
                InMemoryStaffRepository::default(),
            ))),
            records: Arc::new(RecordService::new(Arc::new(
                InMemoryRecordRepository::default(),
            ))),
            clock,
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryStaffRepository {
    members: Arc<Mutex<HashMap<StaffId, StaffMember>>>,
}

impl StaffRepository for InMemoryStaffRepository {
    fn insert(&self, member: StaffMember) -> Result<StaffMember, RepositoryError> {
        let mut guard = self.members.lock().expect("staff mutex poisoned");
        if guard.contains_key(&member.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(member.id.clone(), member.clone());
        Ok(member)
    }

    fn update(&self, member: StaffMember) -> Result<(), RepositoryError> {
        let mut guard = self.members.lock().expect("staff mutex poisoned");
        if guard.contains_key(&member.id) {
            guard.insert(member.id.clone(), member);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &StaffId) -> Result<Option<StaffMember>, RepositoryError> {
        let guard = self.members.lock().expect("staff mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<StaffMember>, RepositoryError> {
        let guard = self.members.lock().expect("staff mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn remove(&self, id: &StaffId) -> Result<(), RepositoryError> {
        let mut guard = self.members.lock().expect("staff mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

/// Calls and deposits kept in insertion order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordRepository {
    calls: Arc<Mutex<Vec<LoggedCall>>>,
    deposits: Arc<Mutex<Vec<LoggedDeposit>>>,
}

impl RecordRepository for InMemoryRecordRepository {
    fn insert_call(&self, call: LoggedCall) -> Result<LoggedCall, RecordError> {
        let mut guard = self.calls.lock().expect("calls mutex poisoned");
        if guard.iter().any(|existing| existing.id == call.id) {
            return Err(RecordError::Conflict);
        }
        guard.push(call.clone());
        Ok(call)
    }

    fn insert_deposit(&self, deposit: LoggedDeposit) -> Result<LoggedDeposit, RecordError> {
        let mut guard = self.deposits.lock().expect("deposits mutex poisoned");
        if guard.iter().any(|existing| existing.id == deposit.id) {
            return Err(RecordError::Conflict);
        }
        guard.push(deposit.clone());
        Ok(deposit)
    }

    fn calls(&self) -> Result<Vec<LoggedCall>, RecordError> {
        Ok(self.calls.lock().expect("calls mutex poisoned").clone())
    }

    fn deposits(&self) -> Result<Vec<LoggedDeposit>, RecordError> {
        Ok(self.deposits.lock().expect("deposits mutex poisoned").clone())
    }

    fn remove_call(&self, id: &CallId) -> Result<(), RecordError> {
        let mut guard = self.calls.lock().expect("calls mutex poisoned");
        let position = guard
            .iter()
            .position(|call| &call.id == id)
            .ok_or(RecordError::NotFound)?;
        guard.remove(position);
        Ok(())
    }

    fn remove_deposit(&self, id: &DepositId) -> Result<(), RecordError> {
        let mut guard = self.deposits.lock().expect("deposits mutex poisoned");
        let position = guard
            .iter()
            .position(|deposit| &deposit.id == id)
            .ok_or(RecordError::NotFound)?;
        guard.remove(position);
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_instant(raw: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(raw).ok_or_else(|| format!("failed to parse '{raw}' as a timestamp"))
}

pub(crate) fn deserialize_optional_instant<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_instant(&value).map_err(serde::de::Error::custom))
        .transpose()
}
