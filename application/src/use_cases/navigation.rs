//! Post-invocation navigation
//!
//! An invocation resolves in two phases: phase 1 produces the envelope
//! returned to the agent, phase 2 redirects or reloads the page. Phase 2
//! runs on a spawned task that is held back by a [`NavigationGate`] until
//! phase 1 has handed its result over, then waits the settle delay.
//! Callers never await phase 2.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use toolbridge_domain::page::FollowUp;
use tracing::{debug, warn};

use crate::ports::navigator::NavigatorPort;

/// Holds a scheduled navigation back until released.
///
/// Dropping the gate without releasing it cancels the navigation.
#[derive(Debug)]
pub struct NavigationGate {
    release: oneshot::Sender<()>,
}

impl NavigationGate {
    /// Let the navigation proceed.
    pub fn release(self) {
        // Receiver gone means the task was aborted; nothing left to do
        let _ = self.release.send(());
    }
}

/// Runs follow-up navigations after their invocations have returned.
pub struct NavigationScheduler {
    navigator: Arc<dyn NavigatorPort>,
    settle_delay: Duration,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl NavigationScheduler {
    pub fn new(navigator: Arc<dyn NavigatorPort>, settle_delay: Duration) -> Self {
        Self {
            navigator,
            settle_delay,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Schedule `follow_up`; it runs once the returned gate is released
    /// and the settle delay has passed.
    pub fn schedule(&self, follow_up: FollowUp) -> NavigationGate {
        let (tx, rx) = oneshot::channel();
        let navigator = self.navigator.clone();
        let delay = self.settle_delay;

        let handle = tokio::spawn(async move {
            if rx.await.is_err() {
                debug!("Navigation gate dropped, skipping {:?}", follow_up);
                return;
            }
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let outcome = match &follow_up {
                FollowUp::Navigate(target) => {
                    debug!("Navigating to {}", target);
                    navigator.navigate(target).await
                }
                FollowUp::Reload => {
                    debug!("Reloading page");
                    navigator.reload().await
                }
            };
            if let Err(e) = outcome {
                warn!("Follow-up navigation failed: {}", e);
            }
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.retain(|h| !h.is_finished());
        pending.push(handle);

        NavigationGate { release: tx }
    }

    /// Wait for every scheduled navigation to finish.
    pub async fn settle(&self) {
        let handles: Vec<_> = {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            pending.drain(..).collect()
        };
        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Navigation task failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockNavigator, NavEvent};

    #[tokio::test]
    async fn test_navigation_waits_for_release() {
        let navigator = Arc::new(MockNavigator::new());
        let scheduler = NavigationScheduler::new(navigator.clone(), Duration::ZERO);

        let gate = scheduler.schedule(FollowUp::Navigate("/done".to_string()));
        tokio::task::yield_now().await;
        assert!(navigator.events().is_empty());

        gate.release();
        scheduler.settle().await;
        assert_eq!(navigator.events(), vec![NavEvent::Navigate("/done".to_string())]);
    }

    #[tokio::test]
    async fn test_dropped_gate_cancels_navigation() {
        let navigator = Arc::new(MockNavigator::new());
        let scheduler = NavigationScheduler::new(navigator.clone(), Duration::ZERO);

        drop(scheduler.schedule(FollowUp::Reload));
        scheduler.settle().await;
        assert!(navigator.events().is_empty());
    }

    #[tokio::test]
    async fn test_settle_delay_applies_after_release() {
        let navigator = Arc::new(MockNavigator::new());
        let scheduler = NavigationScheduler::new(navigator.clone(), Duration::from_millis(300));

        scheduler.schedule(FollowUp::Reload).release();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(navigator.events().is_empty());

        scheduler.settle().await;
        assert_eq!(navigator.events(), vec![NavEvent::Reload]);
    }
}
