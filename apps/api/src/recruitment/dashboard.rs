//! Application dashboard: filtering, job-post embedding and pipeline counts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::models::job_post::JobPostRow;

/// Query string of `GET /api/v1/applications`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub job_post_id: Option<Uuid>,
    /// A status name, or `all`.
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Default)]
pub struct DashboardFilter {
    pub job_post_id: Option<Uuid>,
    pub status: Option<ApplicationStatus>,
    /// Lowercased, trimmed; `None` when blank.
    pub search: Option<String>,
}

impl TryFrom<DashboardQuery> for DashboardFilter {
    type Error = AppError;

    fn try_from(query: DashboardQuery) -> Result<Self, Self::Error> {
        let status = match query.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(s) => Some(s.parse::<ApplicationStatus>().map_err(AppError::Validation)?),
        };
        let search = query
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        Ok(DashboardFilter {
            job_post_id: query.job_post_id,
            status,
            search,
        })
    }
}

impl DashboardFilter {
    pub fn matches(&self, application: &ApplicationRow) -> bool {
        if self.job_post_id.is_some_and(|id| id != application.job_post_id) {
            return false;
        }
        if self
            .status
            .is_some_and(|status| status.as_str() != application.status)
        {
            return false;
        }
        match &self.search {
            None => true,
            Some(needle) => {
                let full_name =
                    format!("{} {}", application.first_name, application.last_name).to_lowercase();
                full_name.contains(needle.as_str())
                    || application.email.to_lowercase().contains(needle.as_str())
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub job_post: Option<JobPostRow>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct JobPostCounts {
    pub job_post_id: Uuid,
    pub job_title: String,
    pub total: usize,
    pub new: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DashboardCounts {
    pub total: usize,
    pub new: usize,
    /// One entry per job post, in the post order given (newest first).
    pub per_job_post: Vec<JobPostCounts>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub applications: Vec<ApplicationView>,
    pub counts: DashboardCounts,
}

/// Counts cover every application; the filter only narrows the list.
pub fn build_dashboard(
    applications: Vec<ApplicationRow>,
    job_posts: Vec<JobPostRow>,
    filter: &DashboardFilter,
) -> DashboardResponse {
    let mut per_post: HashMap<Uuid, (usize, usize)> = HashMap::new();
    for application in &applications {
        let entry = per_post.entry(application.job_post_id).or_default();
        entry.0 += 1;
        if application.is_new() {
            entry.1 += 1;
        }
    }

    let counts = DashboardCounts {
        total: applications.len(),
        new: applications.iter().filter(|a| a.is_new()).count(),
        per_job_post: job_posts
            .iter()
            .map(|post| {
                let (total, new) = per_post.get(&post.id).copied().unwrap_or_default();
                JobPostCounts {
                    job_post_id: post.id,
                    job_title: post.job_title.clone(),
                    total,
                    new,
                }
            })
            .collect(),
    };

    let posts_by_id: HashMap<Uuid, JobPostRow> =
        job_posts.into_iter().map(|post| (post.id, post)).collect();

    let applications = applications
        .into_iter()
        .filter(|application| filter.matches(application))
        .map(|application| ApplicationView {
            job_post: posts_by_id.get(&application.job_post_id).cloned(),
            application,
        })
        .collect();

    DashboardResponse {
        applications,
        counts,
    }
}
