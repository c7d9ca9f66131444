use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationStatus, NewApplication};
use crate::models::job_post::{JobPostRow, NewJobPost};
use crate::recruitment::blob::cv_object_key;
use crate::recruitment::dashboard::{build_dashboard, DashboardFilter, DashboardQuery, DashboardResponse};
use crate::recruitment::slug::{generate_slug, public_path};
use crate::state::AppState;

/// Largest accepted CV.
pub const MAX_CV_BYTES: usize = 5 * 1024 * 1024;
/// Request body cap for the application form: the CV plus the text fields.
pub const APPLICATION_BODY_LIMIT: usize = MAX_CV_BYTES + 1024 * 1024;

const MAX_SLUG_ATTEMPTS: usize = 5;

#[derive(Serialize)]
pub struct PublishedJobPost {
    #[serde(flatten)]
    pub job_post: JobPostRow,
    pub public_path: String,
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// POST /api/v1/job-posts
pub async fn handle_publish_job_post(
    State(state): State<AppState>,
    Json(request): Json<NewJobPost>,
) -> Result<(StatusCode, Json<PublishedJobPost>), AppError> {
    require_text("job_title", &request.job_title)?;
    require_text("company_name", &request.company_name)?;
    require_text("location", &request.location)?;
    require_text("contract_type", &request.contract_type)?;
    require_text("ad_content", &request.ad_content)?;

    for _ in 0..MAX_SLUG_ATTEMPTS {
        let slug = generate_slug();
        if let Some(job_post) = state.store.insert_job_post(&request, &slug).await? {
            info!("Published job post {} as /postuler/{slug}", job_post.id);
            return Ok((
                StatusCode::CREATED,
                Json(PublishedJobPost {
                    public_path: public_path(&job_post.slug),
                    job_post,
                }),
            ));
        }
        warn!("Slug collision on {slug}, retrying");
    }

    Err(AppError::Internal(anyhow::anyhow!(
        "no free slug after {MAX_SLUG_ATTEMPTS} attempts"
    )))
}

/// GET /api/v1/job-posts
pub async fn handle_list_job_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobPostRow>>, AppError> {
    Ok(Json(state.store.list_job_posts().await?))
}

/// GET /api/v1/public/job-posts/:slug
///
/// Counts a view. The returned row carries the count from before this view.
pub async fn handle_get_public_job_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<JobPostRow>, AppError> {
    let job_post = state
        .store
        .find_active_job_post(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job post {slug} not found")))?;

    if let Err(e) = state.store.increment_views(job_post.id).await {
        warn!("Failed to count view for job post {}: {e}", job_post.id);
    }

    Ok(Json(job_post))
}

/// An uploaded CV as read from the multipart form.
struct CvUpload {
    file_name: String,
    content_type: Option<String>,
    bytes: Bytes,
}

#[derive(Default)]
struct ApplicationForm {
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    message: Option<String>,
    cv: Option<CvUpload>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("CV must be at most {MAX_CV_BYTES} bytes"))
    } else {
        AppError::Validation(format!("Invalid multipart form: {}", e.body_text()))
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

async fn read_application_form(mut multipart: Multipart) -> Result<ApplicationForm, AppError> {
    let mut form = ApplicationForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cv" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.len() > MAX_CV_BYTES {
                    return Err(AppError::PayloadTooLarge(format!(
                        "CV must be at most {MAX_CV_BYTES} bytes"
                    )));
                }
                // Browsers send an empty part when no file was picked.
                if !bytes.is_empty() {
                    form.cv = Some(CvUpload {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            "first_name" => form.first_name = field.text().await.map_err(multipart_error)?,
            "last_name" => form.last_name = field.text().await.map_err(multipart_error)?,
            "email" => form.email = field.text().await.map_err(multipart_error)?,
            "phone" => form.phone = non_blank(field.text().await.map_err(multipart_error)?),
            "message" => form.message = non_blank(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    require_text("first_name", &form.first_name)?;
    require_text("last_name", &form.last_name)?;
    require_text("email", &form.email)?;
    if !form.email.contains('@') {
        return Err(AppError::Validation("email is not valid".to_string()));
    }

    Ok(form)
}

/// POST /api/v1/public/job-posts/:slug/applications
///
/// Multipart form. A failed CV upload is logged and the application is kept
/// without a CV.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let job_post = state
        .store
        .find_active_job_post(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job post {slug} not found")))?;

    let form = read_application_form(multipart).await?;
    let first_name = form.first_name.trim().to_string();
    let last_name = form.last_name.trim().to_string();

    let (cv_url, cv_filename) = match form.cv {
        Some(cv) => {
            let key = cv_object_key(
                job_post.id,
                Utc::now().timestamp_millis(),
                &first_name,
                &last_name,
                &cv.file_name,
            );
            match state
                .blobs
                .upload(&key, cv.bytes, cv.content_type.as_deref())
                .await
            {
                Ok(url) => (Some(url), Some(cv.file_name)),
                Err(e) => {
                    warn!("CV upload failed for job post {}: {e}", job_post.id);
                    (None, None)
                }
            }
        }
        None => (None, None),
    };

    let application = state
        .store
        .insert_application(&NewApplication {
            job_post_id: job_post.id,
            first_name,
            last_name,
            email: form.email.trim().to_string(),
            phone: form.phone,
            message: form.message,
            cv_url,
            cv_filename,
        })
        .await?;

    info!(
        "Application {} received for job post {}",
        application.id, job_post.id
    );
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications?job_post_id=&status=&search=
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let filter = DashboardFilter::try_from(query)?;
    let applications = state.store.list_applications().await?;
    let job_posts = state.store.list_job_posts().await?;
    Ok(Json(build_dashboard(applications, job_posts, &filter)))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_application_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<StatusCode, AppError> {
    let status = request
        .status
        .parse::<ApplicationStatus>()
        .map_err(AppError::Validation)?;

    if !state.store.update_application_status(id, status).await? {
        return Err(AppError::NotFound(format!("Application {id} not found")));
    }

    info!("Application {id} moved to {status}");
    Ok(StatusCode::NO_CONTENT)
}
