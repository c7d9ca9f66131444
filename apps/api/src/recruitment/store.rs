//! Persistence for published job posts and candidate applications.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::application::{ApplicationRow, ApplicationStatus, NewApplication};
use crate::models::job_post::{JobPostRow, NewJobPost};

#[async_trait]
pub trait RecruitmentStore: Send + Sync {
    /// Inserts a post under `slug`. Returns `None` when the slug is already taken.
    async fn insert_job_post(
        &self,
        post: &NewJobPost,
        slug: &str,
    ) -> Result<Option<JobPostRow>, sqlx::Error>;

    /// All posts, newest first.
    async fn list_job_posts(&self) -> Result<Vec<JobPostRow>, sqlx::Error>;

    async fn find_active_job_post(&self, slug: &str) -> Result<Option<JobPostRow>, sqlx::Error>;

    async fn increment_views(&self, job_post_id: Uuid) -> Result<(), sqlx::Error>;

    async fn insert_application(
        &self,
        application: &NewApplication,
    ) -> Result<ApplicationRow, sqlx::Error>;

    /// All applications, newest first.
    async fn list_applications(&self) -> Result<Vec<ApplicationRow>, sqlx::Error>;

    /// Returns `false` when no application has this id.
    async fn update_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<bool, sqlx::Error>;
}

pub struct PgRecruitmentStore {
    pool: PgPool,
}

impl PgRecruitmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecruitmentStore for PgRecruitmentStore {
    async fn insert_job_post(
        &self,
        post: &NewJobPost,
        slug: &str,
    ) -> Result<Option<JobPostRow>, sqlx::Error> {
        sqlx::query_as::<_, JobPostRow>(
            r#"
            INSERT INTO job_posts
                (slug, job_title, company_name, location, contract_type,
                 sector, salary_range, ad_content, ad_channel)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (slug) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(post.job_title.trim())
        .bind(post.company_name.trim())
        .bind(post.location.trim())
        .bind(post.contract_type.trim())
        .bind(&post.sector)
        .bind(&post.salary_range)
        .bind(&post.ad_content)
        .bind(post.ad_channel())
        .fetch_optional(&self.pool)
        .await
    }

    async fn list_job_posts(&self) -> Result<Vec<JobPostRow>, sqlx::Error> {
        sqlx::query_as::<_, JobPostRow>("SELECT * FROM job_posts ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    async fn find_active_job_post(&self, slug: &str) -> Result<Option<JobPostRow>, sqlx::Error> {
        sqlx::query_as::<_, JobPostRow>(
            "SELECT * FROM job_posts WHERE slug = $1 AND is_active = TRUE",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
    }

    async fn increment_views(&self, job_post_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE job_posts SET views_count = views_count + 1 WHERE id = $1")
            .bind(job_post_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_application(
        &self,
        application: &NewApplication,
    ) -> Result<ApplicationRow, sqlx::Error> {
        sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications
                (job_post_id, first_name, last_name, email, phone, message,
                 cv_url, cv_filename, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(application.job_post_id)
        .bind(&application.first_name)
        .bind(&application.last_name)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(&application.message)
        .bind(&application.cv_url)
        .bind(&application.cv_filename)
        .bind(ApplicationStatus::New.as_str())
        .fetch_one(&self.pool)
        .await
    }

    async fn list_applications(&self) -> Result<Vec<ApplicationRow>, sqlx::Error> {
        sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    async fn update_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE applications SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(application_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
