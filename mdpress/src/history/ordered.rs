//! Recency-ordered item collection with an id index.

use super::HistoryItem;
use std::collections::HashMap;
use uuid::Uuid;

/// Items ordered most recent first, addressable by id.
///
/// All reordering goes through the methods here so the index never drifts
/// from the sequence. Ids are unique within the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedHistory {
    items: Vec<HistoryItem>,
    index: HashMap<Uuid, usize>,
}

impl OrderedHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a stored sequence. Later items repeating an earlier id are
    /// dropped.
    pub fn from_items(items: Vec<HistoryItem>) -> Self {
        let mut history = Self::new();
        for item in items {
            if !history.index.contains_key(&item.id) {
                history.items.push(item);
                history.reindex_from(history.items.len() - 1);
            }
        }
        history
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryItem> {
        self.items.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&HistoryItem> {
        self.index.get(&id).map(|&position| &self.items[position])
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Position of the item whose content equals `content` exactly.
    pub fn position_of_content(&self, content: &str) -> Option<usize> {
        self.items.iter().position(|item| item.content == content)
    }

    /// Insert at the front. An item with the same id is replaced.
    pub fn prepend(&mut self, item: HistoryItem) {
        self.remove(item.id);
        self.items.insert(0, item);
        self.reindex_from(0);
    }

    /// Move an existing item to the front. Returns false for unknown ids.
    pub fn move_to_front(&mut self, id: Uuid) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        self.items[..=position].rotate_right(1);
        self.reindex_from(0);
        true
    }

    /// Drop items beyond `max_items`, oldest first. Returns what was dropped.
    pub fn truncate(&mut self, max_items: usize) -> Vec<HistoryItem> {
        if self.items.len() <= max_items {
            return Vec::new();
        }
        let dropped = self.items.split_off(max_items);
        for item in &dropped {
            self.index.remove(&item.id);
        }
        dropped
    }

    pub fn remove(&mut self, id: Uuid) -> Option<HistoryItem> {
        let position = self.index.remove(&id)?;
        let item = self.items.remove(position);
        self.reindex_from(position);
        Some(item)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    fn reindex_from(&mut self, start: usize) {
        for (position, item) in self.items.iter().enumerate().skip(start) {
            self.index.insert(item.id, position);
        }
    }
}

impl<'a> IntoIterator for &'a OrderedHistory {
    type Item = &'a HistoryItem;
    type IntoIter = std::slice::Iter<'a, HistoryItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
