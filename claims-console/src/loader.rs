//! Stale-result suppression for screen loads.
//!
//! Every load takes a [`LoadTicket`] stamped with the screen's next
//! generation. A result is applied only while its ticket is still the latest
//! for that screen, so a slow response can never overwrite fresher state.
//! Nothing is cancelled on the server; late results are simply dropped.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::view_state::LoadState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    screen: String,
    generation: u64,
}

impl LoadTicket {
    pub fn screen(&self) -> &str {
        &self.screen
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Per-screen generation counters, shareable across tasks.
#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    generations: Arc<DashMap<String, u64>>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load, superseding any load already in flight for `screen`.
    pub fn begin(&self, screen: &str) -> LoadTicket {
        let mut entry = self.generations.entry(screen.to_string()).or_insert(0);
        *entry += 1;
        LoadTicket {
            screen: screen.to_string(),
            generation: *entry,
        }
    }

    /// Navigating away or re-triggering: results of every outstanding ticket are dropped.
    pub fn invalidate(&self, screen: &str) {
        if let Some(mut generation) = self.generations.get_mut(screen) {
            *generation += 1;
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.generations
            .get(&ticket.screen)
            .is_some_and(|g| *g == ticket.generation)
    }

    /// Write `result` into `slot` if the ticket is still current. Returns whether it was applied.
    pub fn commit<T>(&self, ticket: &LoadTicket, slot: &mut LoadState<T>, result: LoadState<T>) -> bool {
        if self.is_current(ticket) {
            *slot = result;
            true
        } else {
            debug!(
                screen = %ticket.screen,
                generation = ticket.generation,
                "Discarding stale load result"
            );
            false
        }
    }

    /// Run `load` under a fresh ticket; `None` when a newer load or an
    /// invalidation happened while it was in flight.
    pub async fn run<T, F>(&self, screen: &str, load: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.begin(screen);
        let output = load.await;
        if self.is_current(&ticket) {
            Some(output)
        } else {
            debug!(screen, generation = ticket.generation, "Dropped superseded load");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn older_ticket_cannot_overwrite_newer_result() {
        let tracker = LoadTracker::new();
        let mut state: LoadState<&str> = LoadState::Loading;

        let first = tracker.begin("claims");
        let second = tracker.begin("claims");
        let third = tracker.begin("claims");

        assert!(tracker.commit(&third, &mut state, LoadState::Loaded("third")));
        assert!(!tracker.commit(&first, &mut state, LoadState::Loaded("first")));
        assert!(!tracker.commit(&second, &mut state, LoadState::Failed("late".into())));
        assert_eq!(state, LoadState::Loaded("third"));
    }

    #[test]
    fn invalidate_drops_in_flight_results() {
        let tracker = LoadTracker::new();
        let mut state: LoadState<u32> = LoadState::Idle;

        let ticket = tracker.begin("dashboard");
        tracker.invalidate("dashboard");
        assert!(!tracker.commit(&ticket, &mut state, LoadState::Loaded(1)));
        assert_eq!(state, LoadState::Idle);
    }

    #[test]
    fn screens_are_independent() {
        let tracker = LoadTracker::new();
        let users = tracker.begin("users");
        let _roles = tracker.begin("roles");
        tracker.invalidate("roles");
        assert!(tracker.is_current(&users));
        assert_eq!(users.generation(), 1);
    }

    #[tokio::test]
    async fn slow_first_load_is_discarded() {
        let tracker = LoadTracker::new();

        let slow = {
            let tracker = tracker.clone();
            tokio::spawn(async move {
                tracker
                    .run("claims", async {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        "slow"
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let fast = tracker.run("claims", async { "fast" }).await;

        assert_eq!(fast, Some("fast"));
        assert_eq!(slow.await.unwrap(), None);
    }
}
