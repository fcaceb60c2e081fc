use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::{info, warn};

use super::domain::{
    validate_submission, StaffId, StaffMember, StaffSubmission, StaffValidationError,
};
use super::repository::{RepositoryError, StaffRepository};

/// Listing options for the directory.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StaffListFilter {
    #[serde(default)]
    pub active_only: bool,
}

/// CRUD façade over a [`StaffRepository`] enforcing validation and unique emails.
pub struct StaffDirectoryService<S> {
    repository: Arc<S>,
    sequence: AtomicU64,
}

impl<S> StaffDirectoryService<S>
where
    S: StaffRepository + 'static,
{
    pub fn new(repository: Arc<S>) -> Self {
        Self {
            repository,
            sequence: AtomicU64::new(1),
        }
    }

    pub fn create(&self, submission: StaffSubmission) -> Result<StaffMember, StaffServiceError> {
        let validated = validate_submission(submission).inspect_err(|error| {
            warn!(%error, "rejected staff submission");
        })?;
        self.ensure_email_available(&validated.email, None)?;

        let id = StaffId(format!(
            "staff-{:04}",
            self.sequence.fetch_add(1, Ordering::Relaxed)
        ));
        let member = validated.into_member(id, today());
        let stored = self.repository.insert(member)?;
        info!(staff_id = %stored.id.0, role = stored.role_label(), "staff member created");
        Ok(stored)
    }

    /// Replaces every editable field of an existing member.
    pub fn update(
        &self,
        id: &StaffId,
        submission: StaffSubmission,
    ) -> Result<StaffMember, StaffServiceError> {
        let existing = self.get(id)?;
        let validated = validate_submission(submission).inspect_err(|error| {
            warn!(%error, staff_id = %id.0, "rejected staff update");
        })?;
        self.ensure_email_available(&validated.email, Some(id))?;

        let member = validated.into_member(existing.id.clone(), existing.joined_on);
        self.repository.update(member.clone())?;
        info!(staff_id = %id.0, "staff member updated");
        Ok(member)
    }

    pub fn get(&self, id: &StaffId) -> Result<StaffMember, StaffServiceError> {
        let member = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(member)
    }

    /// Members sorted by name, then id.
    pub fn list(&self, filter: StaffListFilter) -> Result<Vec<StaffMember>, StaffServiceError> {
        let mut members: Vec<StaffMember> = self
            .repository
            .list()?
            .into_iter()
            .filter(|member| !filter.active_only || member.active)
            .collect();
        members.sort_by(|a, b| {
            a.full_name
                .to_lowercase()
                .cmp(&b.full_name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(members)
    }

    pub fn deactivate(&self, id: &StaffId) -> Result<StaffMember, StaffServiceError> {
        let mut member = self.get(id)?;
        if member.active {
            member.active = false;
            self.repository.update(member.clone())?;
            info!(staff_id = %id.0, "staff member deactivated");
        }
        Ok(member)
    }

    pub fn remove(&self, id: &StaffId) -> Result<(), StaffServiceError> {
        self.repository.remove(id)?;
        info!(staff_id = %id.0, "staff member removed");
        Ok(())
    }

    fn ensure_email_available(
        &self,
        email: &str,
        except: Option<&StaffId>,
    ) -> Result<(), StaffServiceError> {
        let taken = self
            .repository
            .list()?
            .into_iter()
            .any(|member| member.email == email && Some(&member.id) != except);
        if taken {
            warn!(email, "duplicate staff email");
            return Err(StaffServiceError::DuplicateEmail(email.to_string()));
        }
        Ok(())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, thiserror::Error)]
pub enum StaffServiceError {
    #[error(transparent)]
    Invalid(#[from] StaffValidationError),
    #[error("a staff member with email '{0}' already exists")]
    DuplicateEmail(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
