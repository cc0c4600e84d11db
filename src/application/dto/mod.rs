pub mod articles;
pub mod auth;
pub mod hooks;
pub mod jobs;

pub use articles::ArticleDto;
pub use auth::{AuthenticatedUser, Role};
pub use hooks::{PathRevalidation, RevalidateResponseDto};
pub use jobs::{JobState, JobStatusDto, PublishOutcome, PublishReceiptDto};
