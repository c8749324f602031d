use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::{json, Value};

use crate::forms::domain::{Form, FormId, InternshipId, JobId, NewForm};
use crate::forms::repository::{FormRepository, RepositoryError};
use crate::forms::service::{CvUpload, FormService, FormSubmission, IntakePolicy};
use crate::forms::form_router;
use crate::postings::{Internship, Job, PostingRepository};

pub(super) const BOUNDARY: &str = "job-portal-test-boundary";

pub(super) fn form_data() -> String {
    json!({
        "fullName": "Priya Nair",
        "email": "priya.nair@example.com",
        "phone": "+91 90000 12345",
        "qualification": "B.Tech Computer Science",
        "skills": "Rust, PostgreSQL"
    })
    .to_string()
}

pub(super) fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF".to_vec()
}

pub(super) fn submission_with(content_type: &str, bytes: Vec<u8>) -> FormSubmission {
    FormSubmission {
        form_data: form_data(),
        cv: Some(CvUpload {
            content_type: Some(content_type.to_string()),
            bytes,
        }),
    }
}

pub(super) fn submission_without_cv() -> FormSubmission {
    FormSubmission {
        form_data: form_data(),
        cv: None,
    }
}

pub(super) fn build_service(
    policy: IntakePolicy,
) -> (
    FormService<MemoryFormRepository, MemoryPostings>,
    Arc<MemoryFormRepository>,
) {
    let repository = Arc::new(MemoryFormRepository::default());
    let postings = Arc::new(MemoryPostings::with_postings(&[10], &[20]));
    let service = FormService::new(repository.clone(), postings, policy);
    (service, repository)
}

pub(super) fn router_with_repository<R>(repository: Arc<R>) -> axum::Router
where
    R: FormRepository + 'static,
{
    let service = FormService::new(
        repository,
        Arc::new(MemoryPostings::default()),
        IntakePolicy::default(),
    );
    form_router(Arc::new(service))
}

#[derive(Default)]
pub(super) struct MemoryFormRepository {
    forms: Mutex<Vec<Form>>,
}

impl MemoryFormRepository {
    pub(super) fn stored(&self) -> Vec<Form> {
        self.forms.lock().expect("repository mutex poisoned").clone()
    }
}

#[async_trait]
impl FormRepository for MemoryFormRepository {
    async fn insert(&self, form: NewForm) -> Result<Form, RepositoryError> {
        let mut guard = self.forms.lock().expect("repository mutex poisoned");
        let id = FormId(guard.len() as i64 + 1);
        let stored = form.with_id(id);
        guard.push(stored.clone());
        Ok(stored)
    }

    async fn fetch(&self, id: FormId) -> Result<Option<Form>, RepositoryError> {
        let guard = self.forms.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|form| form.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Form>, RepositoryError> {
        Ok(self.stored())
    }

    async fn by_job(&self, job_id: JobId) -> Result<Vec<Form>, RepositoryError> {
        Ok(self
            .stored()
            .into_iter()
            .filter(|form| form.posting.and_then(|posting| posting.job_id()) == Some(job_id))
            .collect())
    }

    async fn by_internship(
        &self,
        internship_id: InternshipId,
    ) -> Result<Vec<Form>, RepositoryError> {
        Ok(self
            .stored()
            .into_iter()
            .filter(|form| {
                form.posting.and_then(|posting| posting.internship_id()) == Some(internship_id)
            })
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryPostings {
    jobs: HashSet<i64>,
    internships: HashSet<i64>,
}

impl MemoryPostings {
    pub(super) fn with_postings(jobs: &[i64], internships: &[i64]) -> Self {
        Self {
            jobs: jobs.iter().copied().collect(),
            internships: internships.iter().copied().collect(),
        }
    }
}

#[async_trait]
impl PostingRepository for MemoryPostings {
    async fn find_job(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.contains(&id.0).then(|| Job {
            id,
            title: "Backend Engineer".to_string(),
            company: None,
            location: None,
            description: None,
        }))
    }

    async fn find_internship(
        &self,
        id: InternshipId,
    ) -> Result<Option<Internship>, RepositoryError> {
        Ok(self.internships.contains(&id.0).then(|| Internship {
            id,
            title: "Data Intern".to_string(),
            company: None,
            location: None,
            duration_months: Some(6),
            description: None,
        }))
    }
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl FormRepository for UnavailableRepository {
    async fn insert(&self, _form: NewForm) -> Result<Form, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn fetch(&self, _id: FormId) -> Result<Option<Form>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn list(&self) -> Result<Vec<Form>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn by_job(&self, _job_id: JobId) -> Result<Vec<Form>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn by_internship(
        &self,
        _internship_id: InternshipId,
    ) -> Result<Vec<Form>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Builds a `multipart/form-data` body with a fixed boundary.
#[derive(Default)]
pub(super) struct MultipartBody {
    buffer: Vec<u8>,
}

impl MultipartBody {
    pub(super) fn text(mut self, name: &str, value: &str) -> Self {
        self.buffer.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    /// Part headers only; the file content follows separately.
    pub(super) fn file_header(mut self, name: &str, filename: &str, content_type: &str) -> Self {
        self.buffer.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub(super) fn file(self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        let mut body = self.file_header(name, filename, content_type);
        body.buffer.extend_from_slice(bytes);
        body.buffer.extend_from_slice(b"\r\n");
        body
    }

    pub(super) fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub(super) fn finish(mut self) -> Vec<u8> {
        self.buffer
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.buffer
    }
}

pub(super) fn multipart_request(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(body.into())
        .expect("request builds")
}

pub(super) async fn read_body(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body")
}

pub(super) async fn read_text(response: Response) -> String {
    String::from_utf8(read_body(response).await.to_vec()).expect("utf-8 body")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
