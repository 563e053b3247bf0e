use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::error::CareError;
use crate::router::CareState;

/// One purge pass: expired sessions leave the database, replenished
/// verification budgets leave the limiter. Returns the sessions removed.
pub async fn sweep(state: &CareState) -> Result<u64, CareError> {
    state.verify_limiter.prune();
    let removed = state.storage.delete_expired_sessions(Utc::now()).await?;
    debug!(
        sessions_removed = removed,
        limiter_keys = state.verify_limiter.tracked(),
        "housekeeping sweep done"
    );
    Ok(removed)
}

/// Run [`sweep`] every `period` until the runtime shuts down.
pub fn spawn(state: CareState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period_secs = period.as_secs(), "housekeeping started");
        loop {
            ticker.tick().await;
            if let Err(e) = sweep(&state).await {
                warn!(error = %e, "housekeeping sweep failed");
            }
        }
    })
}
