use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::domain::{Form, FormId, FormView, InternshipId, JobId};
use super::media::attachment_filename;
use super::repository::FormRepository;
use super::service::{CvUpload, FormService, FormServiceError, FormSubmission};
use crate::postings::PostingRepository;

const FORM_DATA_PART: &str = "formData";
const CV_PART: &str = "cv";
const JOB_FAILURE: &str = "Error applying for job.";
const INTERNSHIP_FAILURE: &str = "Error applying for internship.";

/// Router builder exposing the form intake and retrieval endpoints under `/api/forms`.
pub fn form_router<R, P>(service: Arc<FormService<R, P>>) -> Router
where
    R: FormRepository + 'static,
    P: PostingRepository + 'static,
{
    let routes = Router::new()
        .route("/form/saveForm", post(save_form_handler::<R, P>))
        .route(
            "/applyForJobForm/:job_id",
            post(apply_for_job_handler::<R, P>),
        )
        .route(
            "/applyForInternshipForm/:internship_id",
            post(apply_for_internship_handler::<R, P>),
        )
        .route("/downloadCv/:form_id", get(download_cv_handler::<R, P>))
        .route("/getAllForms", get(all_forms_handler::<R, P>))
        .route(
            "/getApplicationsByJob/:job_id",
            get(applications_by_job_handler::<R, P>),
        )
        .route(
            "/getApplicationsByInternship/:internship_id",
            get(applications_by_internship_handler::<R, P>),
        )
        .with_state(service);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new().nest("/api/forms", routes).layer(cors)
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum SubmissionReadError {
    #[error("multipart request is missing the `formData` part")]
    MissingFormData,
    #[error("multipart request could not be read: {0}")]
    Malformed(MultipartError),
    #[error("CV part could not be read: {0}")]
    CvRead(MultipartError),
}

/// Collects the `formData` and `cv` parts. Unknown parts are skipped.
pub(crate) async fn read_submission(
    mut multipart: Multipart,
) -> Result<FormSubmission, SubmissionReadError> {
    let mut form_data = None;
    let mut cv = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(SubmissionReadError::Malformed)?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FORM_DATA_PART) => {
                form_data = Some(field.text().await.map_err(SubmissionReadError::Malformed)?);
            }
            Some(CV_PART) => {
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(SubmissionReadError::CvRead)?;
                cv = Some(CvUpload {
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            other => {
                tracing::debug!(part = ?other, "ignoring unexpected multipart part");
            }
        }
    }

    let form_data = form_data.ok_or(SubmissionReadError::MissingFormData)?;
    Ok(FormSubmission { form_data, cv })
}

pub(crate) async fn save_form_handler<R, P>(
    State(service): State<Arc<FormService<R, P>>>,
    multipart: Multipart,
) -> Response
where
    R: FormRepository + 'static,
    P: PostingRepository + 'static,
{
    tracing::info!("received request to save form");

    let submission = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(SubmissionReadError::CvRead(error)) => {
            tracing::error!(%error, "error reading CV file");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error saving CV file.").into_response();
        }
        Err(error) => {
            tracing::warn!(%error, "rejecting unreadable form submission");
            return (StatusCode::BAD_REQUEST, error.to_string()).into_response();
        }
    };

    match service.save_form(submission).await {
        Ok(form) => {
            tracing::info!(form_id = %form.id, "form saved");
            (StatusCode::OK, "User successfully saved").into_response()
        }
        Err(FormServiceError::UnsupportedMediaType(file_type)) => {
            tracing::error!(%file_type, "unsupported CV file type");
            (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Only PDF and JPEG/JPG files are allowed.",
            )
                .into_response()
        }
        Err(error @ (FormServiceError::InvalidFormData(_) | FormServiceError::Validation(_))) => {
            tracing::warn!(%error, "rejecting invalid form data");
            (StatusCode::BAD_REQUEST, error.to_string()).into_response()
        }
        Err(error) => {
            tracing::error!(%error, "error saving form");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error saving form.").into_response()
        }
    }
}

pub(crate) async fn apply_for_job_handler<R, P>(
    State(service): State<Arc<FormService<R, P>>>,
    Path(job_id): Path<i64>,
    multipart: Multipart,
) -> Response
where
    R: FormRepository + 'static,
    P: PostingRepository + 'static,
{
    let job_id = JobId(job_id);
    tracing::info!(%job_id, "received request to apply for job");

    let submission = match read_application(multipart, JOB_FAILURE).await {
        Ok(submission) => submission,
        Err(response) => return response,
    };

    match service.apply_for_job(submission, job_id).await {
        Ok(message) => {
            tracing::info!(%job_id, "job application submitted");
            (StatusCode::CREATED, message).into_response()
        }
        Err(error) => {
            tracing::error!(%job_id, %error, "error applying for job");
            (StatusCode::INTERNAL_SERVER_ERROR, JOB_FAILURE).into_response()
        }
    }
}

pub(crate) async fn apply_for_internship_handler<R, P>(
    State(service): State<Arc<FormService<R, P>>>,
    Path(internship_id): Path<i64>,
    multipart: Multipart,
) -> Response
where
    R: FormRepository + 'static,
    P: PostingRepository + 'static,
{
    let internship_id = InternshipId(internship_id);
    tracing::info!(%internship_id, "received request to apply for internship");

    let submission = match read_application(multipart, INTERNSHIP_FAILURE).await {
        Ok(submission) => submission,
        Err(response) => return response,
    };

    match service.apply_for_internship(submission, internship_id).await {
        Ok(message) => {
            tracing::info!(%internship_id, "internship application submitted");
            (StatusCode::CREATED, message).into_response()
        }
        Err(error) => {
            tracing::error!(%internship_id, %error, "error applying for internship");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNSHIP_FAILURE).into_response()
        }
    }
}

/// Reads an apply request. CV read failures answer with the route's failure message.
async fn read_application(
    multipart: Multipart,
    failure_message: &'static str,
) -> Result<FormSubmission, Response> {
    read_submission(multipart).await.map_err(|error| {
        if matches!(error, SubmissionReadError::CvRead(_)) {
            tracing::error!(%error, "error reading application CV");
            (StatusCode::INTERNAL_SERVER_ERROR, failure_message).into_response()
        } else {
            tracing::warn!(%error, "rejecting unreadable application");
            (StatusCode::BAD_REQUEST, error.to_string()).into_response()
        }
    })
}

pub(crate) async fn download_cv_handler<R, P>(
    State(service): State<Arc<FormService<R, P>>>,
    Path(form_id): Path<i64>,
) -> Response
where
    R: FormRepository + 'static,
    P: PostingRepository + 'static,
{
    let form_id = FormId(form_id);

    let form = match service.get_form_by_id(form_id).await {
        Ok(form) => form,
        Err(error) => {
            tracing::error!(%form_id, %error, "error downloading CV");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error downloading CV.").into_response();
        }
    };

    let Some(cv) = form.cv else {
        tracing::error!(%form_id, "no CV stored for form");
        return (StatusCode::NOT_FOUND, "No CV available for this form.").into_response();
    };

    let disposition = format!(
        "attachment; filename=\"{}\"",
        attachment_filename(&cv.media_type)
    );
    tracing::info!(%form_id, media_type = %cv.media_type, "returning CV");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, cv.media_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        cv.bytes,
    )
        .into_response()
}

pub(crate) async fn all_forms_handler<R, P>(
    State(service): State<Arc<FormService<R, P>>>,
) -> Response
where
    R: FormRepository + 'static,
    P: PostingRepository + 'static,
{
    tracing::info!("received request to fetch all forms");
    list_response(service.get_all_forms().await, "all forms")
}

pub(crate) async fn applications_by_job_handler<R, P>(
    State(service): State<Arc<FormService<R, P>>>,
    Path(job_id): Path<i64>,
) -> Response
where
    R: FormRepository + 'static,
    P: PostingRepository + 'static,
{
    let job_id = JobId(job_id);
    tracing::info!(%job_id, "fetching applications for job");
    list_response(
        service.get_applications_by_job(job_id).await,
        &format!("job {job_id}"),
    )
}

pub(crate) async fn applications_by_internship_handler<R, P>(
    State(service): State<Arc<FormService<R, P>>>,
    Path(internship_id): Path<i64>,
) -> Response
where
    R: FormRepository + 'static,
    P: PostingRepository + 'static,
{
    let internship_id = InternshipId(internship_id);
    tracing::info!(%internship_id, "fetching applications for internship");
    list_response(
        service.get_applications_by_internship(internship_id).await,
        &format!("internship {internship_id}"),
    )
}

fn list_response(result: Result<Vec<Form>, FormServiceError>, scope: &str) -> Response {
    match result {
        Ok(forms) if forms.is_empty() => {
            tracing::warn!(scope, "no forms found");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(forms) => {
            let views: Vec<FormView> = forms.iter().map(Form::view).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => {
            tracing::error!(scope, %error, "error fetching forms");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
