use chrono::Utc;
use doc_store::{Direction, GraphStore, Query, StoreError, Transaction};
use resilience::{with_retry, RetryConfig};
use social_schema::{collections, Comment, Post, UserProfile};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::services::surface_conflict;

/// Engagement ledger: toggles likes and appends comments, keeping the
/// post's like set/counter and the liking user's liked-post set
/// consistent.
#[derive(Clone)]
pub struct EngagementService {
    store: Arc<dyn GraphStore>,
    retry: RetryConfig,
}

/// Outcome of one like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeChange {
    /// True when the toggle added the like, false when it removed it.
    pub liked: bool,
    pub like_count: i64,
}

impl EngagementService {
    pub fn new(store: Arc<dyn GraphStore>, retry: RetryConfig) -> Self {
        Self { store, retry }
    }

    /// Flip `actor_id`'s like on `post_id`.
    ///
    /// Post and user documents update in one transaction; the like
    /// counter is recomputed from the post-mutation set, never blindly
    /// incremented, so concurrent likes by distinct actors converge on
    /// the true cardinality.
    pub async fn toggle_like(&self, actor_id: Uuid, post_id: Uuid) -> ServiceResult<LikeChange> {
        let result = with_retry(&self.retry, ServiceError::is_transient_conflict, || {
            self.toggle_like_once(actor_id, post_id)
        })
        .await;
        surface_conflict(result, self.retry.max_retries + 1)
    }

    async fn toggle_like_once(&self, actor_id: Uuid, post_id: Uuid) -> ServiceResult<LikeChange> {
        let mut tx = Transaction::new(self.store.clone());

        let Some(mut post) = tx.get::<Post>(Post::key(post_id)).await? else {
            return Err(ServiceError::PostNotFound(post_id));
        };
        // Same lazy-creation policy as the relationship ledger: liking
        // never requires a prior profile write.
        let mut actor = tx
            .get::<UserProfile>(UserProfile::key(actor_id))
            .await?
            .unwrap_or_else(|| UserProfile::empty(actor_id));

        let liked = if post.likes.contains(&actor_id) {
            post.likes.remove(&actor_id);
            actor.liked_posts.remove(&post_id);
            false
        } else {
            post.likes.insert(actor_id);
            actor.liked_posts.insert(post_id);
            true
        };
        post.sync_like_count();

        let change = LikeChange {
            liked,
            like_count: post.like_count,
        };

        tx.set(Post::key(post_id), &post)?;
        tx.set(UserProfile::key(actor_id), &actor)?;
        tx.commit().await?;

        debug!(%actor_id, %post_id, liked, like_count = change.like_count, "like toggled");
        Ok(change)
    }

    /// Append a comment to a post and bump the post's comment counter
    /// by exactly one, from the freshly read count.
    pub async fn add_comment(
        &self,
        actor_id: Uuid,
        post_id: Uuid,
        text: &str,
    ) -> ServiceResult<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::InvalidInput(
                "comment text must not be empty".to_string(),
            ));
        }

        let result = with_retry(&self.retry, ServiceError::is_transient_conflict, || {
            self.add_comment_once(actor_id, post_id, text)
        })
        .await;
        surface_conflict(result, self.retry.max_retries + 1)
    }

    async fn add_comment_once(
        &self,
        actor_id: Uuid,
        post_id: Uuid,
        text: &str,
    ) -> ServiceResult<Comment> {
        let mut tx = Transaction::new(self.store.clone());

        let Some(mut post) = tx.get::<Post>(Post::key(post_id)).await? else {
            return Err(ServiceError::PostNotFound(post_id));
        };

        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            author_id: actor_id,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        // The absent read records a must-not-exist condition for the
        // fresh id; a collision commits as a conflict and retries with
        // a new id.
        if tx.get::<Comment>(Comment::key(comment.id)).await?.is_some() {
            return Err(ServiceError::Store(StoreError::Conflict));
        }

        post.comment_count += 1;

        tx.set(Comment::key(comment.id), &comment)?;
        tx.set(Post::key(post_id), &post)?;
        tx.commit().await?;

        debug!(%actor_id, %post_id, comment_id = %comment.id, "comment appended");
        Ok(comment)
    }

    /// Whether `actor_id` currently likes `post_id`.
    pub async fn has_liked(&self, actor_id: Uuid, post_id: Uuid) -> ServiceResult<bool> {
        match self.store.get(UserProfile::key(actor_id)).await? {
            Some(doc) => Ok(doc.decode::<UserProfile>()?.liked_posts.contains(&post_id)),
            None => Ok(false),
        }
    }

    /// Comments on a post, oldest first.
    pub async fn comments_for(&self, post_id: Uuid) -> ServiceResult<Vec<Comment>> {
        let docs = self
            .store
            .query(
                Query::collection(collections::COMMENTS)
                    .filter_eq("post_id", serde_json::json!(post_id))
                    .order_by("created_at", Direction::Ascending),
            )
            .await?;
        docs.iter()
            .map(|doc| doc.decode::<Comment>().map_err(ServiceError::from))
            .collect()
    }
}
