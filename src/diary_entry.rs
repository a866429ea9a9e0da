use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed set of moods an entry can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mood {
    #[default]
    #[serde(rename = "😊")]
    Happy,
    #[serde(rename = "😢")]
    Sad,
    #[serde(rename = "😍")]
    Loving,
    #[serde(rename = "🤔")]
    Thoughtful,
    #[serde(rename = "😴")]
    Sleepy,
    #[serde(rename = "🤗")]
    Grateful,
    #[serde(rename = "😎")]
    Cool,
    #[serde(rename = "🥳")]
    Celebrating,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Loving,
        Mood::Thoughtful,
        Mood::Sleepy,
        Mood::Grateful,
        Mood::Cool,
        Mood::Celebrating,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Sad => "😢",
            Mood::Loving => "😍",
            Mood::Thoughtful => "🤔",
            Mood::Sleepy => "😴",
            Mood::Grateful => "🤗",
            Mood::Cool => "😎",
            Mood::Celebrating => "🥳",
        }
    }

    fn position(self) -> usize {
        Mood::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }

    /// Next mood in picker order, wrapping around.
    pub fn next(self) -> Mood {
        Mood::ALL[(self.position() + 1) % Mood::ALL.len()]
    }

    pub fn prev(self) -> Mood {
        Mood::ALL[(self.position() + Mood::ALL.len() - 1) % Mood::ALL.len()]
    }
}

/// Copy of an author's public identity, taken when an entry or comment is
/// written. Later profile edits do not reach back into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSnapshot {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: AuthorSnapshot,
    pub content: String,
    pub date: DateTime<Local>,
    pub likes: u32,
}

impl Comment {
    pub fn new(author: AuthorSnapshot, content: String) -> Self {
        Comment {
            id: Uuid::new_v4().to_string(),
            author,
            content,
            date: Local::now(),
            likes: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: DateTime<Local>,
    pub mood: Mood,
    pub likes: u32,
    pub comments: Vec<Comment>,
    pub author: AuthorSnapshot,
}

impl DiaryEntry {
    pub fn new(title: String, content: String, mood: Mood, author: AuthorSnapshot) -> Self {
        DiaryEntry {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            date: Local::now(),
            mood,
            likes: 0,
            comments: Vec::new(),
            author,
        }
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

/// The single local actor.
///
/// There is no stored list of entries here: [`User::entries`] derives the
/// user's posts from whatever snapshot it is handed, so it never goes stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub bio: String,
    pub followers: u32,
    pub following: u32,
}

impl User {
    pub fn author(&self) -> AuthorSnapshot {
        AuthorSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }

    pub fn entries<'a>(
        &'a self,
        entries: &'a [DiaryEntry],
    ) -> impl Iterator<Item = &'a DiaryEntry> {
        entries.iter().filter(move |e| e.author.id == self.id)
    }

    /// The local user the app starts with.
    pub fn local() -> Self {
        User {
            id: "user1".to_string(),
            name: "You".to_string(),
            avatar: "👤".to_string(),
            bio: "Living life one memory at a time".to_string(),
            followers: 42,
            following: 28,
        }
    }
}
