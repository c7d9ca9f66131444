use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_AD_CHANNEL: &str = "LinkedIn";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub contract_type: String,
    pub sector: Option<String>,
    pub salary_range: Option<String>,
    pub ad_content: String,
    pub ad_channel: String,
    pub views_count: i32,
    pub is_active: bool,
    /// 8-char public identifier used in `/postuler/<slug>`.
    pub slug: String,
}

/// Body of `POST /api/v1/job-posts`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJobPost {
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub contract_type: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    pub ad_content: String,
    #[serde(default)]
    pub ad_channel: Option<String>,
}

impl NewJobPost {
    pub fn ad_channel(&self) -> &str {
        self.ad_channel
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_AD_CHANNEL)
    }
}
