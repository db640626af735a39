//! Feed scheduler background loop.
//!
//! Drives recurring, non-overlapping post-generation cycles across all
//! registered agents. Each cycle fans out one generation request per agent,
//! awaits every settlement, and merges the successful results into the feed
//! store. A timer trigger and the manual trigger both funnel through
//! [`FeedScheduler::run_cycle`]; an atomic in-flight flag guarantees at most
//! one cycle runs at a time regardless of how many triggers fire.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::feed::registry::AgentRegistry;
use crate::feed::store::FeedStore;
use crate::feed::types::Post;
use crate::generation::GenerationClient;

/// Why a triggered cycle did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another cycle is already in flight; the trigger was swallowed.
    CycleInFlight,
    /// No agents are registered; nothing to generate.
    NoAgents,
}

/// One agent's failed generation attempt within a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleFailure {
    /// ID of the agent whose submission failed.
    pub agent_id: String,
    /// Failure description.
    pub error: String,
}

/// Result of one [`FeedScheduler::run_cycle`] invocation.
///
/// A completed cycle with zero posts (all submissions failed) is
/// distinguishable from a skipped one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The trigger was a no-op; no submissions were issued.
    Skipped(SkipReason),
    /// All submissions settled and the feed was updated.
    Completed {
        /// Number of posts merged into the feed.
        posts_added: usize,
        /// Per-agent failures, excluded from the result set.
        failures: Vec<CycleFailure>,
    },
}

/// Non-fatal notification surfaced to the hosting process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleNotice {
    /// An agent produced no post this cycle.
    GenerationFailed {
        /// ID of the affected agent.
        agent_id: String,
        /// Failure description.
        error: String,
    },
}

/// Background scheduler that generates posts for every registered agent.
pub struct FeedScheduler {
    /// Read-only view of the registered agents.
    registry: Arc<RwLock<AgentRegistry>>,
    /// Feed store updated on cycle completion.
    feed: Arc<RwLock<FeedStore>>,
    /// Injected generation backend, shared with the creation path.
    client: Arc<dyn GenerationClient>,
    /// Overlap guard: at most one cycle in flight.
    cycle_in_flight: AtomicBool,
    /// Optional channel for non-fatal failure notices.
    notice_tx: Option<mpsc::UnboundedSender<CycleNotice>>,
    /// Interval between automatic cycles.
    interval: Duration,
}

impl FeedScheduler {
    /// Create a scheduler over shared registry/feed state.
    pub fn new(
        registry: Arc<RwLock<AgentRegistry>>,
        feed: Arc<RwLock<FeedStore>>,
        client: Arc<dyn GenerationClient>,
        config: &FeedConfig,
    ) -> Self {
        Self {
            registry,
            feed,
            client,
            cycle_in_flight: AtomicBool::new(false),
            notice_tx: None,
            interval: Duration::from_millis(config.post_interval_ms),
        }
    }

    /// Surface per-agent failure notices on the given channel.
    #[must_use]
    pub fn with_notices(mut self, tx: mpsc::UnboundedSender<CycleNotice>) -> Self {
        self.notice_tx = Some(tx);
        self
    }

    /// Whether a cycle is currently in flight.
    #[must_use]
    pub fn cycle_in_flight(&self) -> bool {
        self.cycle_in_flight.load(Ordering::SeqCst)
    }

    /// Run one post-generation cycle.
    ///
    /// Entry point for both the timer and the manual trigger. Returns
    /// without side effects when a cycle is already in flight or no agents
    /// are registered. Otherwise fans out one generation request per agent,
    /// awaits all settlements, and merges the successes into the feed.
    /// Per-agent failures never abort the cycle; they are logged, surfaced
    /// as notices, and excluded from the result set. The in-flight flag is
    /// cleared on every exit path once all submissions have settled.
    pub async fn run_cycle(&self) -> CycleOutcome {
        if self
            .cycle_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("cycle already in flight, trigger suppressed");
            return CycleOutcome::Skipped(SkipReason::CycleInFlight);
        }

        let agents = self.registry.read().await.snapshot();
        if agents.is_empty() {
            self.cycle_in_flight.store(false, Ordering::SeqCst);
            debug!("no agents registered, cycle skipped");
            return CycleOutcome::Skipped(SkipReason::NoAgents);
        }

        info!("generating posts for {} agents", agents.len());

        // Fan out one request per agent; collect every settlement without
        // short-circuiting on failures.
        let results = join_all(agents.iter().map(|agent| {
            let client = Arc::clone(&self.client);
            async move { client.generate_post(&agent.description).await }
        }))
        .await;

        let mut new_posts = Vec::new();
        let mut failures = Vec::new();
        for (agent, result) in agents.iter().zip(results) {
            match result {
                Ok(draft) => new_posts.push(Post::from_draft(agent, draft)),
                Err(e) => {
                    warn!("post generation failed for agent {}: {e}", agent.id);
                    let failure = CycleFailure {
                        agent_id: agent.id.clone(),
                        error: e.to_string(),
                    };
                    if let Some(tx) = &self.notice_tx {
                        let _ = tx.send(CycleNotice::GenerationFailed {
                            agent_id: failure.agent_id.clone(),
                            error: failure.error.clone(),
                        });
                    }
                    failures.push(failure);
                }
            }
        }

        let posts_added = new_posts.len();
        if posts_added > 0 {
            self.feed.write().await.merge(new_posts);
            info!("published {posts_added} new posts");
        } else {
            debug!("no new posts were generated in this cycle");
        }

        self.cycle_in_flight.store(false, Ordering::SeqCst);
        CycleOutcome::Completed {
            posts_added,
            failures,
        }
    }

    /// Start the recurring generation loop.
    ///
    /// Ticks at the configured interval until `shutdown` is cancelled.
    /// Cancellation only stops future triggers; a cycle already fanned out
    /// runs to completion before the task exits.
    pub fn run(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "feed scheduler started (interval {}ms)",
                self.interval.as_millis()
            );
            let mut ticker = tokio::time::interval(self.interval);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        let outcome = self.run_cycle().await;
                        debug!("scheduled cycle finished: {outcome:?}");
                    }
                }
            }

            info!("feed scheduler stopped");
        })
    }
}
