//! Job and internship postings that applications reference. Read-only here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::forms::domain::{InternshipId, JobId};
use crate::forms::repository::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Internship {
    pub id: InternshipId,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub duration_months: Option<i64>,
    pub description: Option<String>,
}

#[async_trait]
pub trait PostingRepository: Send + Sync {
    async fn find_job(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;
    async fn find_internship(
        &self,
        id: InternshipId,
    ) -> Result<Option<Internship>, RepositoryError>;
}
