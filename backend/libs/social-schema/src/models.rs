use chrono::{DateTime, Utc};
use doc_store::DocKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Collection names shared by every service.
pub mod collections {
    pub const USERS: &str = "users";
    pub const POSTS: &str = "posts";
    pub const COMMENTS: &str = "comments";
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// User profile document.
///
/// `followers_count` and `following_count` are denormalized and must
/// equal the cardinality of their sets at every observable point; the
/// ledgers re-derive them from the sets on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub followers: BTreeSet<Uuid>,
    #[serde(default)]
    pub following: BTreeSet<Uuid>,
    #[serde(default)]
    pub liked_posts: BTreeSet<Uuid>,
    #[serde(default)]
    pub followers_count: i64,
    #[serde(default)]
    pub following_count: i64,
    /// Home location used by feed ranking; optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Self-assessed skill level per sport, used by feed ranking.
    #[serde(default)]
    pub sport_ratings: BTreeMap<String, f64>,
}

impl UserProfile {
    /// Empty profile written when a ledger touches a user that has no
    /// document yet.
    pub fn empty(id: Uuid) -> Self {
        Self {
            id,
            display_name: String::new(),
            avatar_url: None,
            followers: BTreeSet::new(),
            following: BTreeSet::new(),
            liked_posts: BTreeSet::new(),
            followers_count: 0,
            following_count: 0,
            location: None,
            sport_ratings: BTreeMap::new(),
        }
    }

    pub fn key(id: Uuid) -> DocKey {
        DocKey::new(collections::USERS, id)
    }

    /// Re-derive both counters from their sets.
    pub fn sync_counts(&mut self) {
        self.followers_count = self.followers.len() as i64;
        self.following_count = self.following.len() as i64;
    }
}

/// Post document. Text and author are immutable after creation; the
/// author's location and ratings are snapshotted at creation time so
/// ranking old posts does not need a profile join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub likes: BTreeSet<Uuid>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_location: Option<GeoPoint>,
    #[serde(default)]
    pub author_sport_ratings: BTreeMap<String, f64>,
}

impl Post {
    pub fn key(id: Uuid) -> DocKey {
        DocKey::new(collections::POSTS, id)
    }

    /// Re-derive the like counter from the like set.
    pub fn sync_like_count(&mut self) {
        self.like_count = self.likes.len() as i64;
    }
}

/// Comment document, owned by its post's lifecycle. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn key(id: Uuid) -> DocKey {
        DocKey::new(collections::COMMENTS, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_counts_tracks_set_cardinality() {
        let mut user = UserProfile::empty(Uuid::new_v4());
        user.followers.insert(Uuid::new_v4());
        user.followers.insert(Uuid::new_v4());
        user.following.insert(Uuid::new_v4());
        user.sync_counts();
        assert_eq!(user.followers_count, 2);
        assert_eq!(user.following_count, 1);
    }

    #[test]
    fn profile_round_trips_with_defaults() {
        // Documents written before ranking fields existed deserialize
        // with empty defaults.
        let raw = serde_json::json!({
            "id": Uuid::new_v4(),
            "display_name": "casey",
        });
        let user: UserProfile = serde_json::from_value(raw).unwrap();
        assert!(user.followers.is_empty());
        assert!(user.location.is_none());
        assert!(user.sport_ratings.is_empty());
    }
}
