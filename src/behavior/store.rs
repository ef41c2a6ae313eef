//! Per-user action log
//!
//! Capped, insertion-ordered ring buffer; oldest entries are evicted on
//! overflow. Actions are immutable once recorded.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::types::UserAction;

/// Capped action buffer for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    actions: VecDeque<UserAction>,
    cap: usize,
}

impl ActionLog {
    /// Create a log holding at most `cap` actions
    pub fn new(cap: usize) -> Self {
        Self {
            actions: VecDeque::with_capacity(cap.min(64)),
            cap,
        }
    }

    /// Append an action, evicting the oldest entries past the cap
    pub fn push(&mut self, action: UserAction) {
        self.actions.push_back(action);
        while self.actions.len() > self.cap {
            self.actions.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserAction> {
        self.actions.iter()
    }

    /// Contiguous snapshot of the buffer, oldest first
    pub fn snapshot(&self) -> Vec<UserAction> {
        self.actions.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_push_and_order() {
        let mut log = ActionLog::new(10);
        let start = Utc::now();
        for i in 0..3 {
            log.push(UserAction::new(format!("a{}", i), start + Duration::seconds(i)));
        }
        assert_eq!(log.len(), 3);
        let kinds: Vec<_> = log.iter().map(|a| a.kind.clone()).collect();
        assert_eq!(kinds, vec!["a0", "a1", "a2"]);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut log = ActionLog::new(5);
        let start = Utc::now();
        for i in 0..8 {
            log.push(UserAction::new(format!("a{}", i), start + Duration::seconds(i)));
        }
        assert_eq!(log.len(), 5);
        let kinds: Vec<_> = log.iter().map(|a| a.kind.clone()).collect();
        assert_eq!(kinds, vec!["a3", "a4", "a5", "a6", "a7"]);
    }

    #[test]
    fn test_snapshot_is_contiguous_copy() {
        let mut log = ActionLog::new(3);
        let start = Utc::now();
        for i in 0..5 {
            log.push(UserAction::new(format!("a{}", i), start + Duration::seconds(i)));
        }
        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].kind, "a2");
    }
}
