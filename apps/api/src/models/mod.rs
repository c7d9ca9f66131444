pub mod application;
pub mod job_post;
