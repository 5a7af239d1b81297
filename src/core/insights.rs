//! Periodic insights polling
//!
//! Fetches insights immediately and then every `INSIGHTS_POLL_SECS`,
//! publishing the latest value on a watch channel. Failures are logged
//! and the previous value is kept.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::core::chat::ChatBackend;
use crate::core::timer::TimerGuard;
use crate::types::Insights;
use crate::INSIGHTS_POLL_SECS;

/// Background insights fetcher
#[derive(Debug)]
pub struct InsightsPoller {
    latest: watch::Receiver<Option<Insights>>,
    timer: TimerGuard,
}

impl InsightsPoller {
    /// Poll on the default interval
    pub fn spawn<B>(backend: B) -> Self
    where
        B: ChatBackend + 'static,
    {
        Self::spawn_every(backend, Duration::from_secs(INSIGHTS_POLL_SECS))
    }

    pub fn spawn_every<B>(backend: B, period: Duration) -> Self
    where
        B: ChatBackend + 'static,
    {
        let (tx, rx) = watch::channel(None);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                match backend.insights().await {
                    Ok(insights) => {
                        tracing::debug!(
                            total = insights.total_interactions,
                            most_common = %insights.most_common_emotion,
                            "insights updated"
                        );
                        tx.send_replace(Some(insights));
                    }
                    Err(e) => tracing::warn!(error = %e, "failed to load insights"),
                }
            }
        });
        Self {
            latest: rx,
            timer: TimerGuard::new("insights", handle),
        }
    }

    /// Most recent successful fetch
    pub fn latest(&self) -> Option<Insights> {
        self.latest.borrow().clone()
    }

    /// Receiver notified on every update
    pub fn subscribe(&self) -> watch::Receiver<Option<Insights>> {
        self.latest.clone()
    }

    pub fn stop(&mut self) {
        self.timer.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_active()
    }
}
