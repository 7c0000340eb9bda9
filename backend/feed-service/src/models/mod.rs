use serde::{Deserialize, Serialize};
use social_schema::Post;
use uuid::Uuid;

/// A candidate post with its ranking breakdown. Scores are meaningful
/// only when the surrounding feed is ranked; lower totals rank first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPost {
    pub post: Post,
    pub location_score: f64,
    pub rating_score: f64,
    pub total_score: f64,
}

/// Ordered feed for one viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedFeed {
    pub viewer_id: Uuid,
    /// The full ordered feed.
    pub posts: Vec<ScoredPost>,
    /// Top slice served as the recommended row.
    pub recommended: Vec<ScoredPost>,
    /// False when scoring was skipped (no viewer signal) or degraded
    /// (ranking inputs unavailable) and the order is pure recency.
    pub ranked: bool,
}
