use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a stored form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(pub i64);

/// Identifier of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

/// Identifier of an internship posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InternshipId(pub i64);

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for InternshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Posting an application is attached to. A form references at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingRef {
    Job(JobId),
    Internship(InternshipId),
}

impl PostingRef {
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            PostingRef::Job(id) => Some(*id),
            PostingRef::Internship(_) => None,
        }
    }

    pub fn internship_id(&self) -> Option<InternshipId> {
        match self {
            PostingRef::Internship(id) => Some(*id),
            PostingRef::Job(_) => None,
        }
    }
}

impl fmt::Display for PostingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostingRef::Job(id) => write!(f, "job {id}"),
            PostingRef::Internship(id) => write!(f, "internship {id}"),
        }
    }
}

/// Applicant fields carried by the `formData` part of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetails {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
}

impl ApplicantDetails {
    pub fn validate(&self) -> Result<(), FormValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(FormValidationError::MissingField("fullName"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(FormValidationError::MissingField("email"));
        }
        if !email.contains('@') {
            return Err(FormValidationError::InvalidEmail(email.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("`{0}` is not a valid e-mail address")]
    InvalidEmail(String),
}

/// CV payload together with the media type it was uploaded as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvAttachment {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

/// Insert payload for the form store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewForm {
    pub applicant: ApplicantDetails,
    pub cv: Option<CvAttachment>,
    pub posting: Option<PostingRef>,
    pub submitted_at: DateTime<Utc>,
}

impl NewForm {
    pub fn with_id(self, id: FormId) -> Form {
        Form {
            id,
            applicant: self.applicant,
            cv: self.cv,
            posting: self.posting,
            submitted_at: self.submitted_at,
        }
    }
}

/// A stored application form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub id: FormId,
    pub applicant: ApplicantDetails,
    pub cv: Option<CvAttachment>,
    pub posting: Option<PostingRef>,
    pub submitted_at: DateTime<Utc>,
}

impl Form {
    pub fn view(&self) -> FormView {
        FormView {
            id: self.id,
            applicant: self.applicant.clone(),
            cv: self.cv.as_ref().map(|cv| BASE64.encode(&cv.bytes)),
            cv_file_type: self.cv.as_ref().map(|cv| cv.media_type.clone()),
            job_id: self.posting.and_then(|posting| posting.job_id()),
            internship_id: self.posting.and_then(|posting| posting.internship_id()),
            submitted_at: self.submitted_at,
        }
    }
}

/// JSON shape returned by the listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub id: FormId,
    #[serde(flatten)]
    pub applicant: ApplicantDetails,
    pub cv: Option<String>,
    pub cv_file_type: Option<String>,
    pub job_id: Option<JobId>,
    pub internship_id: Option<InternshipId>,
    pub submitted_at: DateTime<Utc>,
}
