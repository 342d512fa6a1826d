//! Courtesy pause between page requests.
//!
//! The fetcher waits on a [`Pacer`] after every page that is not the last.
//! The pause only spaces requests out; nothing depends on it for correctness,
//! so tests can swap in [`NoDelay`].

use std::time::Duration;
use tokio::time::sleep;

#[allow(async_fn_in_trait)]
pub trait Pacer {
    /// Wait before the next request.
    async fn pause(&self);
}

/// Sleeps for a fixed duration between requests.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        Self(Duration::from_millis(100))
    }
}

impl Pacer for FixedDelay {
    async fn pause(&self) {
        if !self.0.is_zero() {
            sleep(self.0).await;
        }
    }
}

/// Does not wait at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    async fn pause(&self) {}
}
