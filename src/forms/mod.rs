//! Candidate form intake: CV acceptance, storage contract, service and HTTP routes.

pub mod domain;
pub mod media;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantDetails, CvAttachment, Form, FormId, FormValidationError, FormView, InternshipId,
    JobId, NewForm, PostingRef,
};
pub use media::CvMediaType;
pub use repository::{FormRepository, RepositoryError};
pub use router::form_router;
pub use service::{CvUpload, FormService, FormServiceError, FormSubmission, IntakePolicy};
