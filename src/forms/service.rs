use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    ApplicantDetails, CvAttachment, Form, FormId, FormValidationError, InternshipId, JobId,
    NewForm, PostingRef,
};
use super::media::CvMediaType;
use super::repository::{FormRepository, RepositoryError};
use crate::postings::PostingRepository;

/// Raw multipart content of a form submission.
#[derive(Debug, Clone, Default)]
pub struct FormSubmission {
    pub form_data: String,
    pub cv: Option<CvUpload>,
}

/// File part as received, before its media type has been checked.
#[derive(Debug, Clone)]
pub struct CvUpload {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Whether applications must reference a posting that exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakePolicy {
    pub require_existing_posting: bool,
}

/// Service turning raw submissions into stored forms and serving lookups.
pub struct FormService<R, P> {
    forms: Arc<R>,
    postings: Arc<P>,
    policy: IntakePolicy,
}

impl<R, P> FormService<R, P>
where
    R: FormRepository + 'static,
    P: PostingRepository + 'static,
{
    pub fn new(forms: Arc<R>, postings: Arc<P>, policy: IntakePolicy) -> Self {
        Self {
            forms,
            postings,
            policy,
        }
    }

    /// Store a form that is not tied to any posting.
    pub async fn save_form(&self, submission: FormSubmission) -> Result<Form, FormServiceError> {
        let form = self.prepare(submission, None)?;
        let stored = self.forms.insert(form).await?;
        tracing::debug!(form_id = %stored.id, has_cv = stored.cv.is_some(), "form stored");
        Ok(stored)
    }

    pub async fn apply_for_job(
        &self,
        submission: FormSubmission,
        job_id: JobId,
    ) -> Result<String, FormServiceError> {
        if self.policy.require_existing_posting && self.postings.find_job(job_id).await?.is_none()
        {
            return Err(FormServiceError::PostingNotFound(PostingRef::Job(job_id)));
        }

        let form = self.prepare(submission, Some(PostingRef::Job(job_id)))?;
        let stored = self.forms.insert(form).await?;
        tracing::debug!(form_id = %stored.id, %job_id, "job application stored");
        Ok(format!(
            "Application submitted successfully for job ID: {job_id}"
        ))
    }

    pub async fn apply_for_internship(
        &self,
        submission: FormSubmission,
        internship_id: InternshipId,
    ) -> Result<String, FormServiceError> {
        if self.policy.require_existing_posting
            && self
                .postings
                .find_internship(internship_id)
                .await?
                .is_none()
        {
            return Err(FormServiceError::PostingNotFound(PostingRef::Internship(
                internship_id,
            )));
        }

        let form = self.prepare(submission, Some(PostingRef::Internship(internship_id)))?;
        let stored = self.forms.insert(form).await?;
        tracing::debug!(form_id = %stored.id, %internship_id, "internship application stored");
        Ok(format!(
            "Application submitted successfully for internship ID: {internship_id}"
        ))
    }

    pub async fn get_form_by_id(&self, id: FormId) -> Result<Form, FormServiceError> {
        self.forms
            .fetch(id)
            .await?
            .ok_or(FormServiceError::FormNotFound(id))
    }

    pub async fn get_all_forms(&self) -> Result<Vec<Form>, FormServiceError> {
        Ok(self.forms.list().await?)
    }

    pub async fn get_applications_by_job(
        &self,
        job_id: JobId,
    ) -> Result<Vec<Form>, FormServiceError> {
        Ok(self.forms.by_job(job_id).await?)
    }

    pub async fn get_applications_by_internship(
        &self,
        internship_id: InternshipId,
    ) -> Result<Vec<Form>, FormServiceError> {
        Ok(self.forms.by_internship(internship_id).await?)
    }

    fn prepare(
        &self,
        submission: FormSubmission,
        posting: Option<PostingRef>,
    ) -> Result<NewForm, FormServiceError> {
        let applicant: ApplicantDetails = serde_json::from_str(&submission.form_data)
            .map_err(|err| FormServiceError::InvalidFormData(err.to_string()))?;
        applicant.validate()?;
        let cv = accept_cv(submission.cv)?;

        Ok(NewForm {
            applicant,
            cv,
            posting,
            submitted_at: Utc::now(),
        })
    }
}

/// Checks an uploaded CV. Empty or absent uploads leave the CV unset.
pub fn accept_cv(upload: Option<CvUpload>) -> Result<Option<CvAttachment>, FormServiceError> {
    let Some(upload) = upload.filter(|upload| !upload.bytes.is_empty()) else {
        return Ok(None);
    };

    let declared = upload.content_type.unwrap_or_default();
    match CvMediaType::parse(&declared) {
        Some(media_type) => Ok(Some(CvAttachment {
            bytes: upload.bytes,
            media_type: media_type.as_str().to_string(),
        })),
        None => Err(FormServiceError::UnsupportedMediaType(declared)),
    }
}

/// Error raised by the form service.
#[derive(Debug, thiserror::Error)]
pub enum FormServiceError {
    #[error("form data could not be parsed: {0}")]
    InvalidFormData(String),
    #[error(transparent)]
    Validation(#[from] FormValidationError),
    #[error("unsupported CV file type '{0}'")]
    UnsupportedMediaType(String),
    #[error("{0} does not exist")]
    PostingNotFound(PostingRef),
    #[error("form {0} not found")]
    FormNotFound(FormId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
