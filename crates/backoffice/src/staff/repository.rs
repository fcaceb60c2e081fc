use super::domain::{StaffId, StaffMember};

/// Storage abstraction for the staff directory.
pub trait StaffRepository: Send + Sync {
    fn insert(&self, member: StaffMember) -> Result<StaffMember, RepositoryError>;
    fn update(&self, member: StaffMember) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &StaffId) -> Result<Option<StaffMember>, RepositoryError>;
    fn list(&self) -> Result<Vec<StaffMember>, RepositoryError>;
    fn remove(&self, id: &StaffId) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
