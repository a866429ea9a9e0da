//! Input checks the UI runs before handing anything to the store.

use crate::diary_entry::{AuthorSnapshot, DiaryEntry, Mood};
use crate::diary_state::EntryStore;

/// What the user has typed into the new-entry form so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
    pub mood: Mood,
}

impl EntryDraft {
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }

    /// Turns the draft into a fresh entry, or `None` while title or content
    /// is blank.
    pub fn into_entry(self, author: AuthorSnapshot) -> Option<DiaryEntry> {
        if !self.is_submittable() {
            return None;
        }
        Some(DiaryEntry::new(self.title, self.content, self.mood, author))
    }
}

/// Adds `text` as a comment unless it is blank. Returns whether the store
/// was called.
pub fn submit_comment(store: &EntryStore, entry_id: &str, text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    store.add_comment(entry_id, text);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary_entry::User;
    use std::sync::Arc;

    #[test]
    fn blank_fields_block_submission() {
        let author = User::local().author();
        let draft = EntryDraft {
            title: "   ".into(),
            content: "body".into(),
            mood: Mood::Sad,
        };
        assert!(draft.into_entry(author.clone()).is_none());

        let draft = EntryDraft {
            title: "Title".into(),
            content: "\n\t".into(),
            mood: Mood::Sad,
        };
        assert!(draft.into_entry(author).is_none());
    }

    #[test]
    fn valid_draft_becomes_entry() {
        let draft = EntryDraft {
            title: "Walk".into(),
            content: "By the river".into(),
            mood: Mood::Grateful,
        };
        let entry = draft.into_entry(User::local().author()).unwrap();
        assert_eq!(entry.title, "Walk");
        assert_eq!(entry.mood, Mood::Grateful);
        assert_eq!(entry.likes, 0);
        assert!(entry.comments.is_empty());
    }

    #[test]
    fn drafts_get_distinct_ids() {
        let author = User::local().author();
        let draft = EntryDraft {
            title: "t".into(),
            content: "c".into(),
            mood: Mood::default(),
        };
        let a = draft.clone().into_entry(author.clone()).unwrap();
        let b = draft.into_entry(author).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn whitespace_comment_never_reaches_store() {
        let store = EntryStore::with_mock_entries(&User::local());
        let mut rx = store.subscribe();
        let before = store.snapshot();
        assert!(!submit_comment(&store, "1", "  "));
        assert!(!rx.has_changed().unwrap());
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn comment_is_stored_verbatim() {
        let store = EntryStore::with_mock_entries(&User::local());
        assert!(submit_comment(&store, "1", " Nice! "));
        let comments = store.get("1").unwrap().comments;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].content, " Nice! ");
    }
}
