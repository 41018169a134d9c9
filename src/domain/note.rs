//! Note domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Note domain entity. Exactly one owner, fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Apply a partial edit.
    ///
    /// Fields given as `None` or blank keep their stored value. `updated_at`
    /// is always refreshed and never moves backwards.
    pub fn apply_changes(
        &mut self,
        title: Option<String>,
        content: Option<String>,
        now: DateTime<Utc>,
    ) {
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            self.title = title;
        }
        if let Some(content) = content.filter(|c| !c.trim().is_empty()) {
            self.content = content;
        }
        self.updated_at = now.max(self.updated_at);
    }
}

/// Note before the repository has assigned an identifier.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewNote {
    /// Build a note owned by `user_id` with both timestamps set to `now`.
    pub fn new(user_id: Uuid, title: String, content: String, now: DateTime<Utc>) -> Self {
        Self {
            title,
            content,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}
