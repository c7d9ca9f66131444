// Publishing & application tracking: public job pages, candidate submissions
// with CV upload, and the recruiter dashboard.

pub mod blob;
pub mod dashboard;
pub mod handlers;
pub mod slug;
pub mod store;

pub use blob::{BlobStore, S3BlobStore};
pub use store::{PgRecruitmentStore, RecruitmentStore};
