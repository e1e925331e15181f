//! Per-connection subscription manager.
//!
//! Tracks which parking ids a WebSocket client follows and provides
//! server-side event filtering.

use std::collections::HashSet;

/// Wildcard entry following every parking.
pub const WILDCARD: &str = "*";

/// Manages the set of parking subscriptions for a single WebSocket
/// connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed parking ids. Ignored while `subscribe_all` is set.
    parking_ids: HashSet<String>,
    /// Whether the client follows every parking.
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds parking ids to the subscription set. [`WILDCARD`] enables
    /// the wildcard. Returns the ids newly added.
    pub fn subscribe(&mut self, ids: &[String]) -> Vec<String> {
        let mut added = Vec::new();
        for id in ids.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            if id == WILDCARD {
                self.subscribe_all = true;
            } else if self.parking_ids.insert(id.to_string()) {
                added.push(id.to_string());
            }
        }
        added
    }

    /// Removes parking ids from the subscription set. [`WILDCARD`]
    /// disables the wildcard. Returns the ids actually removed.
    pub fn unsubscribe(&mut self, ids: &[String]) -> Vec<String> {
        let mut removed = Vec::new();
        for id in ids.iter().map(|s| s.trim()) {
            if id == WILDCARD {
                self.subscribe_all = false;
            } else if self.parking_ids.remove(id) {
                removed.push(id.to_string());
            }
        }
        removed
    }

    /// Returns `true` if the given parking id matches the filter.
    #[must_use]
    pub fn matches(&self, parking_id: &str) -> bool {
        self.subscribe_all || self.parking_ids.contains(parking_id)
    }

    /// Returns the number of explicitly subscribed parking ids.
    #[must_use]
    pub fn count(&self) -> usize {
        self.parking_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches("paris-1"));
    }

    #[test]
    fn subscribe_specific_parking() {
        let mut mgr = SubscriptionManager::new();
        let added = mgr.subscribe(&ids(&["paris-1", "paris-1", " "]));
        assert_eq!(added, ids(&["paris-1"]));
        assert!(mgr.matches("paris-1"));
        assert!(!mgr.matches("paris-2"));
        assert_eq!(mgr.count(), 1);
    }

    #[test]
    fn wildcard_matches_everything_until_dropped() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&ids(&["*"]));
        assert!(mgr.matches("anything"));
        assert!(mgr.is_subscribed_all());
        mgr.unsubscribe(&ids(&["*"]));
        assert!(!mgr.matches("anything"));
    }

    #[test]
    fn unsubscribe_removes_parking() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&ids(&["a", "b"]));
        let removed = mgr.unsubscribe(&ids(&["a", "zzz"]));
        assert_eq!(removed, ids(&["a"]));
        assert!(!mgr.matches("a"));
        assert!(mgr.matches("b"));
    }
}
