//! Staff directory: CRUD over staff members and the per-member performance view.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{StaffId, StaffMember, StaffRole, StaffSubmission, StaffValidationError};
pub use repository::{RepositoryError, StaffRepository};
pub use router::{staff_router, PerformanceQuery, PerformanceQueryError, StaffRoutes};
pub use service::{StaffDirectoryService, StaffListFilter, StaffServiceError};
