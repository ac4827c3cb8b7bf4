//! Job application records: domain model, validation, storage and HTTP routes.

pub mod domain;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    parse_applied_date, JobApplication, JobApplicationRequest, NewJobApplication, SearchFilter,
};
pub use memory::InMemoryJobApplicationRepository;
pub use postgres::PgJobApplicationRepository;
pub use repository::{JobApplicationRepository, RepositoryError};
pub use router::{application_router, ErrorBody};
pub use service::{JobApplicationService, JobApplicationServiceError};
pub use validation::ValidationErrors;
