//! Intake form sessions
//!
//! One draft per user, kept in memory while the guided form is being
//! filled. Steps advance strictly forward; "edit" restarts the form from
//! the beginning with a fresh draft.

use dashmap::DashMap;
use shared::{MediaKind, MediaRef};

/// Current position in the guided form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStep {
    Branch,
    ParentName,
    StudentName,
    Phone,
    Category,
    Description,
    Media,
    Preview,
}

/// A complaint being composed. Lives only in memory; lost on restart.
#[derive(Debug, Clone)]
pub struct Draft {
    pub step: FormStep,
    pub branch: String,
    pub parent_name: String,
    pub student_name: String,
    pub phone: String,
    /// Full category title as stored in the record
    pub category: String,
    pub description: String,
    pub media: Option<MediaRef>,
    /// Set after "add photo/video" was pressed, cleared once media arrives
    pub awaiting_media: Option<MediaKind>,
    /// Assigned when the preview is shown, reused on confirm
    pub id: Option<String>,
    /// Submission in flight; suppresses a second confirm press
    pub sending: bool,
}

impl Draft {
    fn new() -> Self {
        Self {
            step: FormStep::Branch,
            branch: String::new(),
            parent_name: String::new(),
            student_name: String::new(),
            phone: String::new(),
            category: String::new(),
            description: String::new(),
            media: None,
            awaiting_media: None,
            id: None,
            sending: false,
        }
    }
}

/// Per-user draft storage.
pub struct SessionStore {
    drafts: DashMap<i64, Draft>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            drafts: DashMap::new(),
        }
    }

    /// Start (or restart) the form for a user. Any previous draft is
    /// discarded.
    pub fn start(&self, user_id: i64) {
        self.drafts.insert(user_id, Draft::new());
    }

    pub fn get(&self, user_id: i64) -> Option<Draft> {
        self.drafts.get(&user_id).map(|d| d.clone())
    }

    /// Mutate the user's draft in place. No-op when there is none.
    pub fn update<F: FnOnce(&mut Draft)>(&self, user_id: i64, f: F) {
        if let Some(mut draft) = self.drafts.get_mut(&user_id) {
            f(&mut draft);
        }
    }

    pub fn remove(&self, user_id: i64) {
        self.drafts.remove(&user_id);
    }

    pub fn step_of(&self, user_id: i64) -> Option<FormStep> {
        self.drafts.get(&user_id).map(|d| d.step)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_replaces_a_stale_draft() {
        let store = SessionStore::new();
        store.start(1);
        store.update(1, |d| {
            d.step = FormStep::Phone;
            d.branch = "Ганга".into();
        });
        store.start(1);
        let draft = store.get(1).unwrap();
        assert_eq!(draft.step, FormStep::Branch);
        assert_eq!(draft.branch, "");
    }

    #[test]
    fn update_without_a_draft_is_a_noop() {
        let store = SessionStore::new();
        store.update(7, |d| d.sending = true);
        assert!(store.get(7).is_none());
    }

    #[test]
    fn drafts_are_isolated_per_user() {
        let store = SessionStore::new();
        store.start(1);
        store.start(2);
        store.update(1, |d| d.description = "first".into());
        assert_eq!(store.get(2).unwrap().description, "");
    }
}
