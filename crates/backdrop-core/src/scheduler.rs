//! Wait strategies between poll cycles
//!
//! The engine never sleeps on its own; it asks a [`Scheduler`] to wait. The
//! daemon uses [`FixedInterval`], tests use [`Immediate`] so a loop can be
//! driven without a real clock.

use async_trait::async_trait;
use std::time::Duration;

/// Repeat-with-interval abstraction used by the poll loop
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Wait until the next cycle may start
    async fn wait(&self);

    /// Human-readable description for log lines
    fn describe(&self) -> String;
}

/// Sleeps a fixed duration after every cycle
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval {
    period: Duration,
}

impl FixedInterval {
    /// Create a scheduler sleeping `period` between cycles
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// The configured period
    pub fn period(&self) -> Duration {
        self.period
    }
}

#[async_trait]
impl Scheduler for FixedInterval {
    async fn wait(&self) {
        tracing::debug!("Sleeping for {:?} before next check...", self.period);
        tokio::time::sleep(self.period).await;
    }

    fn describe(&self) -> String {
        format!("every {:?}", self.period)
    }
}

/// Returns after a single yield
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

#[async_trait]
impl Scheduler for Immediate {
    async fn wait(&self) {
        tokio::task::yield_now().await;
    }

    fn describe(&self) -> String {
        "immediately".to_string()
    }
}
