use doc_store::{GraphStore, Transaction};
use resilience::{with_retry, RetryConfig};
use social_schema::UserProfile;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::services::surface_conflict;

/// Relationship ledger: toggles follow edges and keeps both sides'
/// sets and counters consistent under concurrent toggles.
#[derive(Clone)]
pub struct FollowService {
    store: Arc<dyn GraphStore>,
    retry: RetryConfig,
}

/// Outcome of one follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowChange {
    /// True when the toggle created the edge, false when it removed it.
    pub following: bool,
    pub actor_following_count: i64,
    pub target_followers_count: i64,
}

impl FollowService {
    pub fn new(store: Arc<dyn GraphStore>, retry: RetryConfig) -> Self {
        Self { store, retry }
    }

    /// Flip the follow edge from `actor_id` to `target_id`.
    ///
    /// Both user documents update in one transaction: membership in
    /// `actor.following` and `target.followers` always flips together,
    /// and both counters are recomputed from the post-mutation sets.
    /// This is a toggle, not a set: calling it twice restores the
    /// original state.
    pub async fn toggle_follow(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> ServiceResult<FollowChange> {
        if actor_id == target_id {
            return Err(ServiceError::InvalidInput(
                "a user cannot follow themselves".to_string(),
            ));
        }

        let result = with_retry(&self.retry, ServiceError::is_transient_conflict, || {
            self.toggle_once(actor_id, target_id)
        })
        .await;
        surface_conflict(result, self.retry.max_retries + 1)
    }

    async fn toggle_once(&self, actor_id: Uuid, target_id: Uuid) -> ServiceResult<FollowChange> {
        let mut tx = Transaction::new(self.store.clone());

        let Some(mut target) = tx.get::<UserProfile>(UserProfile::key(target_id)).await? else {
            return Err(ServiceError::UserNotFound(target_id));
        };
        // Actors are created lazily so a first-ever action needs no
        // prior profile write.
        let mut actor = tx
            .get::<UserProfile>(UserProfile::key(actor_id))
            .await?
            .unwrap_or_else(|| UserProfile::empty(actor_id));

        let following = if actor.following.contains(&target_id) {
            actor.following.remove(&target_id);
            target.followers.remove(&actor_id);
            false
        } else {
            actor.following.insert(target_id);
            target.followers.insert(actor_id);
            true
        };
        actor.sync_counts();
        target.sync_counts();

        let change = FollowChange {
            following,
            actor_following_count: actor.following_count,
            target_followers_count: target.followers_count,
        };

        tx.set(UserProfile::key(actor_id), &actor)?;
        tx.set(UserProfile::key(target_id), &target)?;
        tx.commit().await?;

        debug!(%actor_id, %target_id, following, "follow edge toggled");
        Ok(change)
    }

    /// Whether `actor_id` currently follows `target_id`.
    pub async fn is_following(&self, actor_id: Uuid, target_id: Uuid) -> ServiceResult<bool> {
        match self.store.get(UserProfile::key(actor_id)).await? {
            Some(doc) => Ok(doc.decode::<UserProfile>()?.following.contains(&target_id)),
            None => Ok(false),
        }
    }

    /// Current (followers, following) counters for a user.
    pub async fn follower_counts(&self, user_id: Uuid) -> ServiceResult<(i64, i64)> {
        match self.store.get(UserProfile::key(user_id)).await? {
            Some(doc) => {
                let user: UserProfile = doc.decode()?;
                Ok((user.followers_count, user.following_count))
            }
            None => Err(ServiceError::UserNotFound(user_id)),
        }
    }
}
