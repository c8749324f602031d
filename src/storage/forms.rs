use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::forms::domain::{
    ApplicantDetails, CvAttachment, Form, FormId, InternshipId, JobId, NewForm, PostingRef,
};
use crate::forms::repository::{FormRepository, RepositoryError};

const SELECT_FORMS: &str = "SELECT id, full_name, email, phone, address, qualification, \
     experience, skills, cover_letter, cv, cv_file_type, job_id, internship_id, submitted_at \
     FROM forms";

/// SQLite-backed implementation of [`FormRepository`].
#[derive(Debug, Clone)]
pub struct SqliteFormRepository {
    pool: SqlitePool,
}

impl SqliteFormRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_form(row: &SqliteRow) -> Result<Form, RepositoryError> {
        let id = FormId(row.try_get("id")?);

        let cv = match (
            row.try_get::<Option<Vec<u8>>, _>("cv")?,
            row.try_get::<Option<String>, _>("cv_file_type")?,
        ) {
            (Some(bytes), Some(media_type)) => Some(CvAttachment { bytes, media_type }),
            (None, None) => None,
            _ => {
                return Err(RepositoryError::Corrupt(format!(
                    "form {id} stores a CV without its media type"
                )))
            }
        };

        let posting = match (
            row.try_get::<Option<i64>, _>("job_id")?,
            row.try_get::<Option<i64>, _>("internship_id")?,
        ) {
            (Some(job_id), None) => Some(PostingRef::Job(JobId(job_id))),
            (None, Some(internship_id)) => Some(PostingRef::Internship(InternshipId(internship_id))),
            (None, None) => None,
            (Some(_), Some(_)) => {
                return Err(RepositoryError::Corrupt(format!(
                    "form {id} references both a job and an internship"
                )))
            }
        };

        Ok(Form {
            id,
            applicant: ApplicantDetails {
                full_name: row.try_get("full_name")?,
                email: row.try_get("email")?,
                phone: row.try_get("phone")?,
                address: row.try_get("address")?,
                qualification: row.try_get("qualification")?,
                experience: row.try_get("experience")?,
                skills: row.try_get("skills")?,
                cover_letter: row.try_get("cover_letter")?,
            },
            cv,
            posting,
            submitted_at: row.try_get("submitted_at")?,
        })
    }

    fn rows_to_forms(rows: Vec<SqliteRow>) -> Result<Vec<Form>, RepositoryError> {
        rows.iter().map(Self::row_to_form).collect()
    }
}

#[async_trait]
impl FormRepository for SqliteFormRepository {
    async fn insert(&self, form: NewForm) -> Result<Form, RepositoryError> {
        let (cv, cv_file_type) = match &form.cv {
            Some(attachment) => (
                Some(attachment.bytes.as_slice()),
                Some(attachment.media_type.as_str()),
            ),
            None => (None, None),
        };
        let job_id = form.posting.and_then(|posting| posting.job_id()).map(|id| id.0);
        let internship_id = form
            .posting
            .and_then(|posting| posting.internship_id())
            .map(|id| id.0);

        let result = sqlx::query(
            r#"
            INSERT INTO forms (full_name, email, phone, address, qualification, experience,
                               skills, cover_letter, cv, cv_file_type, job_id, internship_id,
                               submitted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&form.applicant.full_name)
        .bind(&form.applicant.email)
        .bind(&form.applicant.phone)
        .bind(&form.applicant.address)
        .bind(&form.applicant.qualification)
        .bind(&form.applicant.experience)
        .bind(&form.applicant.skills)
        .bind(&form.applicant.cover_letter)
        .bind(cv)
        .bind(cv_file_type)
        .bind(job_id)
        .bind(internship_id)
        .bind(form.submitted_at)
        .execute(&self.pool)
        .await?;

        let id = FormId(result.last_insert_rowid());
        Ok(form.with_id(id))
    }

    async fn fetch(&self, id: FormId) -> Result<Option<Form>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_FORMS} WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_form).transpose()
    }

    async fn list(&self) -> Result<Vec<Form>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_FORMS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Self::rows_to_forms(rows)
    }

    async fn by_job(&self, job_id: JobId) -> Result<Vec<Form>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_FORMS} WHERE job_id = ? ORDER BY id"))
            .bind(job_id.0)
            .fetch_all(&self.pool)
            .await?;
        Self::rows_to_forms(rows)
    }

    async fn by_internship(
        &self,
        internship_id: InternshipId,
    ) -> Result<Vec<Form>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{SELECT_FORMS} WHERE internship_id = ? ORDER BY id"
        ))
        .bind(internship_id.0)
        .fetch_all(&self.pool)
        .await?;
        Self::rows_to_forms(rows)
    }
}
