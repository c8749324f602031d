use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::forms::domain::{InternshipId, JobId};
use crate::forms::repository::RepositoryError;
use crate::postings::{Internship, Job, PostingRepository};

/// Read-only lookups over the `jobs` and `internships` tables.
#[derive(Debug, Clone)]
pub struct SqlitePostingRepository {
    pool: SqlitePool,
}

impl SqlitePostingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostingRepository for SqlitePostingRepository {
    async fn find_job(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, title, company, location, description FROM jobs WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Job {
                id: JobId(row.try_get("id")?),
                title: row.try_get("title")?,
                company: row.try_get("company")?,
                location: row.try_get("location")?,
                description: row.try_get("description")?,
            })),
            None => Ok(None),
        }
    }

    async fn find_internship(
        &self,
        id: InternshipId,
    ) -> Result<Option<Internship>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, title, company, location, duration_months, description \
             FROM internships WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Internship {
                id: InternshipId(row.try_get("id")?),
                title: row.try_get("title")?,
                company: row.try_get("company")?,
                location: row.try_get("location")?,
                duration_months: row.try_get("duration_months")?,
                description: row.try_get("description")?,
            })),
            None => Ok(None),
        }
    }
}
