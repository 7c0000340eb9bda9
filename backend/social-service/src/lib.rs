//! Social-graph ledgers: follow/unfollow and like/comment state with
//! denormalized counters kept consistent through optimistic
//! transactions against the document store.

pub mod config;
pub mod error;
pub mod services;

pub use config::SocialConfig;
pub use error::{ServiceError, ServiceResult};
pub use services::engagement::{EngagementService, LikeChange};
pub use services::follow::{FollowChange, FollowService};
