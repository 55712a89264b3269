//! Bounded, deduplicating history of committed documents.
//!
//! [`HistoryStore`] keeps recently committed documents most recent first and
//! persists them through an injected [`KeyValueStore`]. Two keys are used:
//!
//! - [`HISTORY_KEY`]: the whole collection as a JSON array
//! - [`LAST_SESSION_KEY`]: the raw text of the latest commit, for resuming
//!
//! Every write replaces the full collection, so a failed write never needs
//! repair: the in-memory state stays authoritative and the next successful
//! write brings storage back in line. Mutations take `&mut self`; callers
//! sharing a store across threads wrap it in a `Mutex`.

mod ordered;
mod storage;

pub use ordered::OrderedHistory;
pub use storage::{FileStore, KeyValueStore, MemoryStore};

use crate::error::HistoryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Storage key of the serialized collection.
pub const HISTORY_KEY: &str = "markdown_history";
/// Storage key of the most recently committed content.
pub const LAST_SESSION_KEY: &str = "last_markdown_content";
/// Default bound on the number of retained items.
pub const DEFAULT_MAX_ITEMS: usize = 50;
/// Characters of content kept in an item title.
pub const TITLE_LENGTH: usize = 50;

/// One committed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: Uuid,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub title: String,
}

impl HistoryItem {
    /// Create an item with a fresh id and the current time.
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: Uuid::new_v4(),
            title: derive_title(&content),
            timestamp: Utc::now(),
            content,
        }
    }
}

/// First [`TITLE_LENGTH`] characters of `content`, with `...` when cut.
pub fn derive_title(content: &str) -> String {
    let mut chars = content.chars();
    let title: String = chars.by_ref().take(TITLE_LENGTH).collect();
    if chars.next().is_some() {
        format!("{title}...")
    } else {
        title
    }
}

/// What [`HistoryStore::commit`] did with its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Empty or whitespace-only content; nothing changed.
    Ignored,
    /// Content matched an existing item, which moved to the front.
    Promoted(Uuid),
    /// A new item was added at the front.
    Created(Uuid),
}

impl CommitOutcome {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            CommitOutcome::Ignored => None,
            CommitOutcome::Promoted(id) | CommitOutcome::Created(id) => Some(*id),
        }
    }
}

/// Recency-ordered document history over a key-value backend.
#[derive(Debug)]
pub struct HistoryStore<S: KeyValueStore> {
    storage: S,
    items: OrderedHistory,
    max_items: usize,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Load the collection from `storage`.
    ///
    /// A stored collection that fails to decode is treated as empty. Only a
    /// failing backend is reported as an error. A bound of zero is raised to
    /// one so the latest commit is always retained.
    pub fn open(storage: S, max_items: usize) -> Result<Self, HistoryError> {
        let max_items = max_items.max(1);
        let items = match storage.get(HISTORY_KEY)? {
            None => OrderedHistory::new(),
            Some(bytes) => match serde_json::from_slice::<Vec<HistoryItem>>(&bytes) {
                Ok(items) => OrderedHistory::from_items(items),
                Err(err) => {
                    warn!(error = %err, "stored history is malformed; starting empty");
                    OrderedHistory::new()
                }
            },
        };

        let mut store = Self {
            storage,
            items,
            max_items,
        };
        let dropped = store.items.truncate(max_items);
        debug!(
            items = store.items.len(),
            dropped = dropped.len(),
            max_items,
            "opened history"
        );
        Ok(store)
    }

    /// Record `content` as the most recent document.
    ///
    /// An exact duplicate of an existing item moves that item to the front and
    /// keeps its id and timestamp. The in-memory collection is updated even
    /// when persisting fails.
    pub fn commit(&mut self, content: &str) -> Result<CommitOutcome, HistoryError> {
        if content.trim().is_empty() {
            return Ok(CommitOutcome::Ignored);
        }

        let outcome = match self.items.position_of_content(content) {
            Some(position) => {
                let id = self.items.as_slice()[position].id;
                self.items.move_to_front(id);
                CommitOutcome::Promoted(id)
            }
            None => {
                let item = HistoryItem::new(content);
                let id = item.id;
                self.items.prepend(item);
                CommitOutcome::Created(id)
            }
        };
        self.items.truncate(self.max_items);

        debug!(?outcome, items = self.items.len(), "committed document");
        self.persist(Some(content))?;
        Ok(outcome)
    }

    /// Content of the item with `id`. Does not change the order.
    pub fn restore(&self, id: Uuid) -> Option<&str> {
        self.items.get(id).map(|item| item.content.as_str())
    }

    pub fn get(&self, id: Uuid) -> Option<&HistoryItem> {
        self.items.get(id)
    }

    /// Items, most recent first.
    pub fn items(&self) -> &[HistoryItem] {
        self.items.as_slice()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Remove the item with `id`. Returns whether it existed.
    pub fn delete(&mut self, id: Uuid) -> Result<bool, HistoryError> {
        if self.items.remove(id).is_none() {
            return Ok(false);
        }
        self.persist(None)?;
        Ok(true)
    }

    /// Remove every item. The last-session content is left alone.
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.items.clear();
        self.persist(None)
    }

    /// Content of the most recent commit, if any was ever persisted.
    pub fn load_last_session(&self) -> Result<Option<String>, HistoryError> {
        Ok(self
            .storage
            .get(LAST_SESSION_KEY)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self, last_session: Option<&str>) -> Result<(), HistoryError> {
        let result = self.write(last_session);
        if let Err(err) = &result {
            error!(error = %err, items = self.items.len(), "failed to persist history");
        }
        result
    }

    fn write(&mut self, last_session: Option<&str>) -> Result<(), HistoryError> {
        let encoded = serde_json::to_vec(self.items.as_slice())?;
        self.storage.set(HISTORY_KEY, &encoded)?;
        if let Some(content) = last_session {
            self.storage.set(LAST_SESSION_KEY, content.as_bytes())?;
        }
        Ok(())
    }
}
