//! Duplicate-action guards and pending-resolution tracking
//!
//! Process-local coordination for the lifecycle transitions. The record
//! store stays authoritative: every guard here is backed by a stored-status
//! predecessor check in the action itself, so a lost guard (restart) can
//! delay a duplicate answer but never move a complaint backward.

use dashmap::{DashMap, DashSet};

/// Atomic first-press guards.
pub struct GuardStore {
    /// Complaint ids whose "called" action already ran in this process
    called: DashSet<String>,
    /// Users whose media-skip press is being processed (short-lived)
    skip: DashSet<i64>,
}

impl GuardStore {
    pub fn new() -> Self {
        Self {
            called: DashSet::new(),
            skip: DashSet::new(),
        }
    }

    /// Claim the "called" action for a complaint. True on the first press.
    pub fn arm_called(&self, complaint_id: &str) -> bool {
        self.called.insert(complaint_id.to_string())
    }

    /// Release the claim (store write failed, the press may be retried).
    pub fn disarm_called(&self, complaint_id: &str) {
        self.called.remove(complaint_id);
    }

    pub fn arm_skip(&self, user_id: i64) -> bool {
        self.skip.insert(user_id)
    }

    pub fn disarm_skip(&self, user_id: i64) {
        self.skip.remove(&user_id);
    }
}

impl Default for GuardStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Users currently expected to type a resolution text, mapped to the
/// complaint they are resolving. One active resolution per user; a second
/// "add resolution" press retargets it.
pub struct PendingResolutions {
    active: DashMap<i64, String>,
}

impl PendingResolutions {
    pub fn new() -> Self {
        Self {
            active: DashMap::new(),
        }
    }

    pub fn begin(&self, user_id: i64, complaint_id: &str) {
        self.active.insert(user_id, complaint_id.to_string());
    }

    pub fn get(&self, user_id: i64) -> Option<String> {
        self.active.get(&user_id).map(|v| v.clone())
    }

    pub fn clear(&self, user_id: i64) {
        self.active.remove(&user_id);
    }
}

impl Default for PendingResolutions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn called_guard_admits_exactly_one_press() {
        let guards = GuardStore::new();
        assert!(guards.arm_called("A-1"));
        assert!(!guards.arm_called("A-1"));
        assert!(guards.arm_called("A-2"));

        guards.disarm_called("A-1");
        assert!(guards.arm_called("A-1"));
    }

    #[test]
    fn pending_resolution_retargets_on_second_press() {
        let pending = PendingResolutions::new();
        pending.begin(9, "A-1");
        pending.begin(9, "A-4");
        assert_eq!(pending.get(9).as_deref(), Some("A-4"));
        pending.clear(9);
        assert_eq!(pending.get(9), None);
    }
}
