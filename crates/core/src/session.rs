//! Session context — the only mutable state in the panel.
//!
//! One `Session` exists per interactive run. It is passed by `&mut` into
//! every operation instead of living in a global. Switching to a different
//! identifier replaces the scoped view and clears the transcript; the two
//! are never merged.

use crate::credential::Credential;
use crate::dataset::ScopedView;
use crate::identity::UserRecord;
use crate::message::{ChatTurn, Transcript};

#[derive(Debug, Default)]
pub struct Session {
    active: Option<UserRecord>,
    view: ScopedView,
    transcript: Transcript,
    credential: Option<Credential>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `user` the active identity with its freshly filtered `view`.
    ///
    /// Returns `true` when the identifier changed and the transcript was
    /// cleared. Re-activating the same identifier keeps the transcript.
    pub fn activate(&mut self, user: Option<UserRecord>, view: ScopedView) -> bool {
        let previous = self.active.as_ref().map(|u| u.identifier.as_str());
        let next = user.as_ref().map(|u| u.identifier.as_str());
        let changed = previous != next;

        if changed {
            tracing::info!(
                from = previous.unwrap_or("<none>"),
                to = next.unwrap_or("<none>"),
                "Active identity changed, transcript reset"
            );
            self.transcript.clear();
        }

        self.active = user;
        self.view = view;
        changed
    }

    pub fn active(&self) -> Option<&UserRecord> {
        self.active.as_ref()
    }

    pub fn view(&self) -> &ScopedView {
        &self.view
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn record(&mut self, turn: ChatTurn) {
        self.transcript.push(turn);
    }

    /// Drop all turns without changing identity.
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn set_credential(&mut self, credential: Option<Credential>) {
        self.credential = credential;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Scope;

    fn user(id: &str) -> UserRecord {
        UserRecord::new(id, format!("User {id}"), "admin", Scope::Grade(8))
    }

    #[test]
    fn first_activation_counts_as_change() {
        let mut s = Session::new();
        assert!(s.activate(Some(user("u001")), ScopedView::empty()));
        assert_eq!(s.active().unwrap().identifier, "u001");
    }

    #[test]
    fn switching_identity_clears_transcript() {
        let mut s = Session::new();
        s.activate(Some(user("u001")), ScopedView::empty());
        s.record(ChatTurn::user("hello"));
        s.record(ChatTurn::assistant("hi"));

        assert!(s.activate(Some(user("u002")), ScopedView::empty()));
        assert!(s.transcript().is_empty());
    }

    #[test]
    fn same_identity_keeps_transcript() {
        let mut s = Session::new();
        s.activate(Some(user("u001")), ScopedView::empty());
        s.record(ChatTurn::user("hello"));

        assert!(!s.activate(Some(user("u001")), ScopedView::empty()));
        assert_eq!(s.transcript().len(), 1);
    }

    #[test]
    fn deactivation_clears_transcript() {
        let mut s = Session::new();
        s.activate(Some(user("u001")), ScopedView::empty());
        s.record(ChatTurn::user("hello"));
        assert!(s.activate(None, ScopedView::empty()));
        assert!(s.transcript().is_empty());
        assert!(s.active().is_none());
    }

    #[test]
    fn credential_round_trip() {
        let mut s = Session::new();
        assert!(s.credential().is_none());
        s.set_credential(Credential::new("sk-1"));
        assert_eq!(s.credential().unwrap().expose(), "sk-1");
    }
}
