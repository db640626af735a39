//! In-memory feed store.

use crate::feed::types::Post;

/// Ordered collection of posts presented to the user.
///
/// Invariant: descending-timestamp order after every mutation. Ties are
/// broken stably by insertion. Posts are never mutated or deleted;
/// unbounded growth is an accepted limitation at demo scale.
#[derive(Debug, Default)]
pub struct FeedStore {
    posts: Vec<Post>,
}

impl FeedStore {
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a single post (agent-creation fast path).
    ///
    /// The post goes to the front and the feed is re-sorted, so a creation
    /// racing a scheduler merge cannot leave the feed out of order.
    pub fn insert_front(&mut self, post: Post) {
        self.posts.insert(0, post);
        self.sort_descending();
    }

    /// Merge a batch of newly generated posts (scheduler cycle completion).
    ///
    /// New posts are prepended and the combined feed re-sorted by
    /// descending timestamp.
    pub fn merge(&mut self, new_posts: Vec<Post>) {
        let mut combined = new_posts;
        combined.append(&mut self.posts);
        self.posts = combined;
        self.sort_descending();
    }

    /// Returns the feed contents, newest first.
    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Number of posts in the feed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the feed is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    // Stable sort keeps insertion order for equal timestamps.
    fn sort_descending(&mut self) {
        self.posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::types::Agent;
    use crate::generation::PostDraft;
    use chrono::{Duration, Utc};

    fn post_at(content: &str, offset_secs: i64) -> Post {
        let agent = Agent::new("some test prompt", "desc", "avatar");
        Post::from_draft(
            &agent,
            PostDraft {
                content: content.to_owned(),
                timestamp: Utc::now() + Duration::seconds(offset_secs),
            },
        )
    }

    fn assert_descending(store: &FeedStore) {
        for pair in store.posts().windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn merge_prepends_and_sorts_descending() {
        let mut store = FeedStore::new();
        store.merge(vec![post_at("old", -60)]);
        store.merge(vec![post_at("newer", 10), post_at("newest", 20)]);

        assert_eq!(store.len(), 3);
        assert_eq!(store.posts()[0].content, "newest");
        assert_eq!(store.posts()[1].content, "newer");
        assert_eq!(store.posts()[2].content, "old");
        assert_descending(&store);
    }

    #[test]
    fn insert_front_restores_order_for_older_post() {
        let mut store = FeedStore::new();
        store.merge(vec![post_at("recent", 0)]);
        store.insert_front(post_at("stale", -120));

        assert_eq!(store.posts()[0].content, "recent");
        assert_eq!(store.posts()[1].content, "stale");
        assert_descending(&store);
    }

    #[test]
    fn equal_timestamps_keep_insertion_order() {
        let now = Utc::now();
        let agent = Agent::new("some test prompt", "desc", "avatar");
        let make = |content: &str| {
            Post::from_draft(
                &agent,
                PostDraft {
                    content: content.to_owned(),
                    timestamp: now,
                },
            )
        };

        let mut store = FeedStore::new();
        store.merge(vec![make("first"), make("second")]);
        assert_eq!(store.posts()[0].content, "first");
        assert_eq!(store.posts()[1].content, "second");
    }

    #[test]
    fn empty_merge_is_a_no_op() {
        let mut store = FeedStore::new();
        store.merge(Vec::new());
        assert!(store.is_empty());
    }
}
