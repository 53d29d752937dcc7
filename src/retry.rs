use std::time::Duration;

use rand::Rng as _;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::catalog::CatalogTree;
use crate::loader::{CatalogLoadTask, LoadOutcome};

/// Reload policy for failed catalog loads.
///
/// The load protocol itself never retries; re-running a task — with
/// `resume = true` where the node supports it — is the caller's decision,
/// and this is the caller's policy. Delays back off exponentially with
/// jitter so concurrent loads against the same source don't stampede it.
#[derive(Debug, Clone)]
pub struct ReloadPolicy {
    pub max_reloads: u32,
    pub base_delay_secs: u64,
    pub max_delay_secs: u64,
}

impl Default for ReloadPolicy {
    fn default() -> Self {
        Self {
            max_reloads: 2,
            base_delay_secs: 5,
            max_delay_secs: 60,
        }
    }
}

impl ReloadPolicy {
    /// Delay before a given reload (0-indexed):
    /// `min(base * 2^reload, max) + random_jitter(0..base)`.
    pub fn delay_for_reload(&self, reload: u32) -> Duration {
        let exp_delay = self
            .base_delay_secs
            .saturating_mul(1u64.checked_shl(reload).unwrap_or(u64::MAX));
        let capped = exp_delay.min(self.max_delay_secs);
        let jitter = if self.base_delay_secs > 0 {
            rand::thread_rng().gen_range(0..self.base_delay_secs)
        } else {
            0
        };
        Duration::from_secs(capped + jitter)
    }
}

/// Run a load task, re-running it on error outcomes up to the policy limit.
///
/// `make_task` builds one attempt; its argument is the resume flag. Reloads
/// resume where the previous attempt left off when `can_resume` is set,
/// otherwise they start fresh. Interrupted outcomes are never retried —
/// cancellation is an external decision, not a transient failure — and a
/// shutdown during the backoff wait returns the last outcome as-is.
pub async fn run_with_reload<T, F>(
    policy: &ReloadPolicy,
    shutdown: &CancellationToken,
    start_resumed: bool,
    can_resume: bool,
    make_task: F,
) -> LoadOutcome
where
    T: CatalogTree,
    F: Fn(bool) -> CatalogLoadTask<T>,
{
    let mut resume = start_resumed;
    let mut reloads = 0u32;

    loop {
        let outcome = make_task(resume).run(shutdown.clone()).await;
        match &outcome {
            LoadOutcome::Success | LoadOutcome::Interrupted { .. } => return outcome,
            LoadOutcome::Error(message) => {
                if reloads >= policy.max_reloads {
                    return outcome;
                }
                let delay = policy.delay_for_reload(reloads);
                reloads += 1;
                warn!(
                    "Load failed (reload {}/{}), retrying in {}s: {}",
                    reloads,
                    policy.max_reloads,
                    delay.as_secs(),
                    message
                );
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = shutdown.cancelled() => return outcome,
                }
                resume = can_resume;
            }
        }
    }
}
