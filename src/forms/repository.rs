use async_trait::async_trait;

use super::domain::{Form, FormId, InternshipId, JobId, NewForm};

/// Storage abstraction for submitted forms.
#[async_trait]
pub trait FormRepository: Send + Sync {
    async fn insert(&self, form: NewForm) -> Result<Form, RepositoryError>;
    async fn fetch(&self, id: FormId) -> Result<Option<Form>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Form>, RepositoryError>;
    async fn by_job(&self, job_id: JobId) -> Result<Vec<Form>, RepositoryError>;
    async fn by_internship(
        &self,
        internship_id: InternshipId,
    ) -> Result<Vec<Form>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored record is malformed: {0}")]
    Corrupt(String),
}
