//! Completion polling.
//!
//! Remote lifecycle transitions dominate operation latency while a read is
//! cheap, so the poller uses a fixed short interval rather than backoff,
//! and has no attempt bound. A caller wanting a deadline wraps the call at
//! a higher layer.

use std::time::Duration;

use async_trait::async_trait;

use crate::app::error::Result;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// A resource being polled to a terminal state. `on_tick` runs before the
/// terminal check on every poll, so it also fires on the terminal
/// snapshot.
#[async_trait]
pub trait PollTarget: Send {
    type Snapshot: Send + Sync;

    async fn fetch(&mut self) -> Result<Self::Snapshot>;

    fn is_terminal(&self, snapshot: &Self::Snapshot) -> bool;

    async fn on_tick(&mut self, _snapshot: &Self::Snapshot) -> Result<()> {
        Ok(())
    }
}

/// Poll until the target reports a terminal snapshot and return it.
/// Terminal is not success; the caller classifies the final status.
pub async fn wait_until_terminal<T: PollTarget>(target: &mut T) -> Result<T::Snapshot> {
    loop {
        let snapshot = target.fetch().await?;
        target.on_tick(&snapshot).await?;
        if target.is_terminal(&snapshot) {
            return Ok(snapshot);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
