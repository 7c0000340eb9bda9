use doc_store::{Direction, GraphStore, Query};
use social_schema::{collections, Post, UserProfile};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::FeedCache;
use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::models::{RankedFeed, ScoredPost};
use crate::services::scoring;

/// Assembles a ranked, deduplicated feed for one viewer.
///
/// Ranking is best-effort: a viewer without any signal, or any failure
/// while resolving ranking inputs, degrades the feed to recency order
/// rather than making it unavailable.
pub struct FeedAssembler {
    store: Arc<dyn GraphStore>,
    config: FeedConfig,
}

impl FeedAssembler {
    pub fn new(store: Arc<dyn GraphStore>, config: FeedConfig) -> Self {
        Self { store, config }
    }

    /// Compute the feed for `viewer_id`, excluding their own posts.
    pub async fn ranked_feed(&self, viewer_id: Uuid) -> Result<RankedFeed, FeedError> {
        let candidates = self.fetch_candidates(viewer_id).await?;

        let viewer = match self.fetch_profile(viewer_id).await {
            Ok(profile) => profile.unwrap_or_else(|| UserProfile::empty(viewer_id)),
            Err(err) => {
                warn!(%viewer_id, error = %err, "viewer profile unavailable, serving recency order");
                return Ok(self.recency_feed(viewer_id, candidates));
            }
        };

        if viewer.location.is_none() && viewer.sport_ratings.is_empty() {
            debug!(%viewer_id, "viewer has no ranking signal, serving recency order");
            return Ok(self.recency_feed(viewer_id, candidates));
        }

        match self.rank(&viewer, &candidates).await {
            Ok(scored) => Ok(self.assemble(viewer_id, scored, true)),
            Err(err) => {
                warn!(%viewer_id, error = %err, "ranking failed, serving recency order");
                Ok(self.recency_feed(viewer_id, candidates))
            }
        }
    }

    /// Serve from the cache when possible, computing and caching
    /// otherwise. Entries are dropped by the subscription-driven
    /// invalidator whenever the store reports a change.
    pub async fn cached_feed(
        &self,
        cache: &FeedCache,
        viewer_id: Uuid,
    ) -> Result<RankedFeed, FeedError> {
        if let Some(feed) = cache.get(viewer_id) {
            debug!(%viewer_id, "feed served from cache");
            return Ok(feed);
        }
        let feed = self.ranked_feed(viewer_id).await?;
        cache.insert(feed.clone());
        Ok(feed)
    }

    /// Recent posts by other users, newest first.
    async fn fetch_candidates(&self, viewer_id: Uuid) -> Result<Vec<Post>, FeedError> {
        let docs = self
            .store
            .query(
                Query::collection(collections::POSTS)
                    .order_by("created_at", Direction::Descending)
                    .limit(self.config.candidate_limit),
            )
            .await?;

        let mut posts = Vec::with_capacity(docs.len());
        for doc in docs {
            let post: Post = doc.decode()?;
            if post.author_id != viewer_id {
                posts.push(post);
            }
        }
        Ok(posts)
    }

    async fn fetch_profile(&self, id: Uuid) -> Result<Option<UserProfile>, FeedError> {
        match self.store.get(UserProfile::key(id)).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    async fn rank(
        &self,
        viewer: &UserProfile,
        candidates: &[Post],
    ) -> Result<Vec<ScoredPost>, FeedError> {
        let mut authors: HashMap<Uuid, Option<UserProfile>> = HashMap::new();
        let mut scored = Vec::with_capacity(candidates.len());

        for post in candidates {
            // The creation-time snapshot wins; the live profile only
            // fills gaps. Old posts may therefore rank with a location
            // their author has since left.
            let live = if post.author_location.is_none() || post.author_sport_ratings.is_empty() {
                self.author_profile(&mut authors, post.author_id).await?
            } else {
                None
            };
            let author_location = post
                .author_location
                .or_else(|| live.as_ref().and_then(|p| p.location));
            let author_ratings = if post.author_sport_ratings.is_empty() {
                live.as_ref()
                    .map(|p| p.sport_ratings.clone())
                    .unwrap_or_default()
            } else {
                post.author_sport_ratings.clone()
            };

            let distance = match (viewer.location, author_location) {
                (Some(a), Some(b)) => Some(scoring::haversine_km(a, b)),
                _ => None,
            };
            let location_score = scoring::location_score(distance);
            let rating_score = scoring::rating_score(scoring::rating_affinity(
                &viewer.sport_ratings,
                &author_ratings,
            ));

            scored.push(ScoredPost {
                post: post.clone(),
                location_score,
                rating_score,
                total_score: scoring::combined_score(location_score, rating_score),
            });
        }

        // Candidates arrive newest first and the sort is stable, so
        // ties keep recency order.
        scored.sort_by(|a, b| {
            a.total_score
                .partial_cmp(&b.total_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(scored)
    }

    async fn author_profile(
        &self,
        cache: &mut HashMap<Uuid, Option<UserProfile>>,
        author_id: Uuid,
    ) -> Result<Option<UserProfile>, FeedError> {
        if let Some(profile) = cache.get(&author_id) {
            return Ok(profile.clone());
        }
        let profile = self.fetch_profile(author_id).await?;
        cache.insert(author_id, profile.clone());
        Ok(profile)
    }

    fn recency_feed(&self, viewer_id: Uuid, posts: Vec<Post>) -> RankedFeed {
        let scored = posts
            .into_iter()
            .map(|post| ScoredPost {
                post,
                location_score: 0.0,
                rating_score: 0.0,
                total_score: 0.0,
            })
            .collect();
        self.assemble(viewer_id, scored, false)
    }

    fn assemble(&self, viewer_id: Uuid, posts: Vec<ScoredPost>, ranked: bool) -> RankedFeed {
        let recommended = posts
            .iter()
            .take(self.config.recommended_limit)
            .cloned()
            .collect();
        RankedFeed {
            viewer_id,
            posts,
            recommended,
            ranked,
        }
    }
}
