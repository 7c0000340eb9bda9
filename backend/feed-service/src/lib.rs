//! Feed assembly: fetches candidate posts, scores them by geographic
//! proximity and sport-rating affinity, and serves an ordered feed with
//! a recency fallback whenever ranking has no signal or its inputs are
//! unavailable.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use cache::{spawn_invalidator, FeedCache};
pub use config::FeedConfig;
pub use error::FeedError;
pub use models::{RankedFeed, ScoredPost};
pub use services::assembler::FeedAssembler;
