use crate::diary_entry::{AuthorSnapshot, Comment, DiaryEntry, Mood, User};
use chrono::Local;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// An immutable view of the whole collection, newest entry first.
pub type Snapshot = Arc<Vec<DiaryEntry>>;

/// Aggregate numbers shown on the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileStats {
    pub entries: usize,
    pub total_likes: u64,
    pub total_comments: usize,
    pub followers: u32,
    pub following: u32,
}

/// In-memory entry collection for the current session.
///
/// Every mutation builds a fresh [`Snapshot`] and publishes it; a snapshot a
/// reader already holds is never touched. Operations addressed to an unknown
/// id publish nothing.
pub struct EntryStore {
    current_author: AuthorSnapshot,
    snapshots: watch::Sender<Snapshot>,
}

impl EntryStore {
    pub fn new(current_author: AuthorSnapshot, entries: Vec<DiaryEntry>) -> Self {
        let (snapshots, _) = watch::channel(Arc::new(entries));
        EntryStore {
            current_author,
            snapshots,
        }
    }

    /// A store holding the welcome entry every new session starts with.
    pub fn with_mock_entries(user: &User) -> Self {
        let first = DiaryEntry {
            id: "1".to_string(),
            title: "My First Memory".to_string(),
            content: "Today was a beautiful day. The weather was perfect and I felt at peace."
                .to_string(),
            date: Local::now(),
            mood: Mood::Happy,
            likes: 5,
            comments: Vec::new(),
            author: user.author(),
        };
        EntryStore::new(user.author(), vec![first])
    }

    pub fn current_author(&self) -> &AuthorSnapshot {
        &self.current_author
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Observers see each published snapshot as a whole.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub fn get(&self, id: &str) -> Option<DiaryEntry> {
        self.snapshots.borrow().iter().find(|e| e.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.snapshots.borrow().iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.snapshots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.borrow().is_empty()
    }

    pub fn add_entry(&self, entry: DiaryEntry) {
        if self.contains(&entry.id) {
            warn!(id = %entry.id, "ignoring entry with duplicate id");
            return;
        }
        let current = self.snapshot();
        let mut next = Vec::with_capacity(current.len() + 1);
        debug!(id = %entry.id, "adding entry");
        next.push(entry);
        next.extend(current.iter().cloned());
        self.publish(next);
    }

    pub fn delete_entry(&self, id: &str) {
        if !self.contains(id) {
            return;
        }
        let next: Vec<DiaryEntry> = self
            .snapshot()
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();
        debug!(id, "deleted entry");
        self.publish(next);
    }

    /// Replaces the entry at `id`. The replacement must keep that id.
    pub fn update_entry(&self, id: &str, updated_entry: DiaryEntry) {
        if updated_entry.id != id {
            warn!(id, new_id = %updated_entry.id, "ignoring update that changes the entry id");
            return;
        }
        self.modify(id, move |entry| *entry = updated_entry);
    }

    /// Counts one tap. Repeated calls keep adding; there is no unlike.
    pub fn like_entry(&self, id: &str) {
        self.modify(id, |entry| entry.likes = entry.likes.saturating_add(1));
    }

    /// Appends `text` as a comment by the current author. Callers are
    /// expected to have rejected blank text already.
    pub fn add_comment(&self, entry_id: &str, text: &str) {
        let comment = Comment::new(self.current_author.clone(), text.to_string());
        self.modify(entry_id, move |entry| entry.comments.push(comment));
    }

    pub fn search_entries(&self, query: &str) -> Vec<DiaryEntry> {
        let query = query.to_lowercase();
        self.snapshots
            .borrow()
            .iter()
            .filter(|e| {
                e.title.to_lowercase().contains(&query)
                    || e.content.to_lowercase().contains(&query)
                    || e.mood.emoji() == query
            })
            .cloned()
            .collect()
    }

    pub fn profile_stats(&self, user: &User) -> ProfileStats {
        let snapshot = self.snapshot();
        let mut stats = ProfileStats {
            followers: user.followers,
            following: user.following,
            ..ProfileStats::default()
        };
        for entry in user.entries(&snapshot) {
            stats.entries += 1;
            stats.total_likes += u64::from(entry.likes);
            stats.total_comments += entry.comment_count();
        }
        stats
    }

    fn modify<F>(&self, id: &str, apply: F)
    where
        F: FnOnce(&mut DiaryEntry),
    {
        let current = self.snapshot();
        let Some(index) = current.iter().position(|e| e.id == id) else {
            debug!(id, "no entry with this id, nothing to do");
            return;
        };
        let mut next: Vec<DiaryEntry> = current.iter().cloned().collect();
        apply(&mut next[index]);
        self.publish(next);
    }

    fn publish(&self, entries: Vec<DiaryEntry>) {
        self.snapshots.send_replace(Arc::new(entries));
    }
}
