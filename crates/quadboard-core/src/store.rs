//! Item collection and the closed command set that updates it.
//!
//! An [`ItemCollection`] is an immutable, cheaply clonable snapshot. Every
//! [`ItemCommand`] yields a new snapshot and leaves the previous one intact, so
//! a render pass can keep iterating an old value while commands are issued.

use crate::item::{Extension, Item, ItemId, ItemPatch};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Duplicate item id: {0}")]
    DuplicateId(ItemId),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Item predicate used by bulk commands.
pub type Predicate<E> = Box<dyn Fn(&Item<E>) -> bool>;

/// A single mutation of the item collection.
pub enum ItemCommand<E: Extension = ()> {
    /// Append one item.
    Add(Item<E>),
    /// Append several items, all or nothing.
    BulkAdd(Vec<Item<E>>),
    /// Replace the whole collection.
    Init(Vec<Item<E>>),
    /// Merge a patch into the item with `id`.
    Update { id: ItemId, patch: ItemPatch<E> },
    /// Merge a patch into every item matching `predicate`.
    BulkUpdate {
        predicate: Predicate<E>,
        patch: ItemPatch<E>,
    },
    /// Remove the item with `id`, or else the first item matching `predicate`.
    Delete {
        id: Option<ItemId>,
        predicate: Option<Predicate<E>>,
    },
    /// Remove every item matching the predicate.
    BulkDelete(Predicate<E>),
}

impl<E: Extension> ItemCommand<E> {
    /// Patch the item with `id`.
    pub fn update(id: impl Into<ItemId>, patch: ItemPatch<E>) -> Self {
        Self::Update {
            id: id.into(),
            patch,
        }
    }

    /// Patch every item matching `predicate`.
    pub fn bulk_update(predicate: impl Fn(&Item<E>) -> bool + 'static, patch: ItemPatch<E>) -> Self {
        Self::BulkUpdate {
            predicate: Box::new(predicate),
            patch,
        }
    }

    /// Remove the item with `id`.
    pub fn delete(id: impl Into<ItemId>) -> Self {
        Self::Delete {
            id: Some(id.into()),
            predicate: None,
        }
    }

    /// Remove the first item matching `predicate`.
    pub fn delete_where(predicate: impl Fn(&Item<E>) -> bool + 'static) -> Self {
        Self::Delete {
            id: None,
            predicate: Some(Box::new(predicate)),
        }
    }

    /// Remove every item matching `predicate`.
    pub fn bulk_delete(predicate: impl Fn(&Item<E>) -> bool + 'static) -> Self {
        Self::BulkDelete(Box::new(predicate))
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::BulkAdd(_) => "bulk_add",
            Self::Init(_) => "init",
            Self::Update { .. } => "update",
            Self::BulkUpdate { .. } => "bulk_update",
            Self::Delete { .. } => "delete",
            Self::BulkDelete(_) => "bulk_delete",
        }
    }
}

impl<E: Extension> fmt::Debug for ItemCommand<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(item) => f.debug_tuple("Add").field(item).finish(),
            Self::BulkAdd(items) => f.debug_tuple("BulkAdd").field(items).finish(),
            Self::Init(items) => f.debug_tuple("Init").field(items).finish(),
            Self::Update { id, patch } => f
                .debug_struct("Update")
                .field("id", id)
                .field("patch", patch)
                .finish(),
            Self::BulkUpdate { patch, .. } => f
                .debug_struct("BulkUpdate")
                .field("predicate", &"<fn>")
                .field("patch", patch)
                .finish(),
            Self::Delete { id, predicate } => f
                .debug_struct("Delete")
                .field("id", id)
                .field("predicate", &predicate.as_ref().map(|_| "<fn>"))
                .finish(),
            Self::BulkDelete(_) => f.debug_tuple("BulkDelete").field(&"<fn>").finish(),
        }
    }
}

/// Ordered, immutable snapshot of the items on the canvas.
///
/// Insertion order is kept for rendering; lookups go by id or predicate.
pub struct ItemCollection<E = ()> {
    items: Arc<Vec<Item<E>>>,
}

impl<E> Clone for ItemCollection<E> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<E> Default for ItemCollection<E> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for ItemCollection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<E: PartialEq> PartialEq for ItemCollection<E> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<E: Extension> ItemCollection<E> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection, rejecting duplicate ids.
    pub fn from_items(items: Vec<Item<E>>) -> StoreResult<Self> {
        check_unique(&HashSet::new(), &items)?;
        Ok(Self::from_vec(items))
    }

    fn from_vec(items: Vec<Item<E>>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Item<E>> {
        self.items.iter()
    }

    /// Items as a slice, in insertion order.
    pub fn as_slice(&self) -> &[Item<E>] {
        &self.items
    }

    /// Look up an item by id.
    pub fn get(&self, id: &ItemId) -> Option<&Item<E>> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Check whether two collections are the same snapshot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// Apply a command and return the resulting collection, never failing.
    ///
    /// A rejected command is logged and yields the unchanged collection.
    pub fn reduce(&self, command: ItemCommand<E>) -> Self {
        let name = command.name();
        match self.apply(command) {
            Ok(next) => next,
            Err(e) => {
                log::warn!("Rejected {} command: {}", name, e);
                self.clone()
            }
        }
    }

    /// Apply a command, reporting rejected commands instead of ignoring them.
    ///
    /// Commands that target nothing (unknown id, no match, delete with
    /// neither id nor predicate) succeed and return the same snapshot.
    pub fn apply(&self, command: ItemCommand<E>) -> StoreResult<Self> {
        log::trace!("Applying {} command", command.name());
        match command {
            ItemCommand::Add(item) => {
                if self.contains(item.id()) {
                    return Err(StoreError::DuplicateId(item.id().clone()));
                }
                let mut items = Vec::with_capacity(self.len() + 1);
                items.extend(self.items.iter().cloned());
                items.push(item);
                Ok(Self::from_vec(items))
            }
            ItemCommand::BulkAdd(new_items) => {
                let existing: HashSet<&ItemId> = self.items.iter().map(Item::id).collect();
                check_unique(&existing, &new_items)?;
                let mut items = Vec::with_capacity(self.len() + new_items.len());
                items.extend(self.items.iter().cloned());
                items.extend(new_items);
                Ok(Self::from_vec(items))
            }
            ItemCommand::Init(items) => Self::from_items(items),
            ItemCommand::Update { id, patch } => {
                let Some(index) = self.items.iter().position(|item| item.id() == &id) else {
                    return Ok(self.clone());
                };
                let mut items = self.items.as_ref().clone();
                patch.apply_to(&mut items[index]);
                Ok(Self::from_vec(items))
            }
            ItemCommand::BulkUpdate { predicate, patch } => {
                // Evaluate against the snapshot before any patch lands.
                let hits: Vec<bool> = self.items.iter().map(|item| predicate(item)).collect();
                if !hits.contains(&true) {
                    return Ok(self.clone());
                }
                let items = self
                    .items
                    .iter()
                    .zip(hits)
                    .map(|(item, hit)| {
                        let mut item = item.clone();
                        if hit {
                            patch.apply_to(&mut item);
                        }
                        item
                    })
                    .collect();
                Ok(Self::from_vec(items))
            }
            ItemCommand::Delete { id, predicate } => {
                let index = match (id, predicate) {
                    (Some(id), _) => self.items.iter().position(|item| item.id() == &id),
                    (None, Some(predicate)) => self.items.iter().position(|item| predicate(item)),
                    (None, None) => None,
                };
                let Some(index) = index else {
                    return Ok(self.clone());
                };
                let mut items = self.items.as_ref().clone();
                items.remove(index);
                Ok(Self::from_vec(items))
            }
            ItemCommand::BulkDelete(predicate) => {
                if !self.items.iter().any(|item| predicate(item)) {
                    return Ok(self.clone());
                }
                let items = self
                    .items
                    .iter()
                    .filter(|&item| !predicate(item))
                    .cloned()
                    .collect();
                Ok(Self::from_vec(items))
            }
        }
    }
}

impl<'a, E> IntoIterator for &'a ItemCollection<E> {
    type Item = &'a Item<E>;
    type IntoIter = std::slice::Iter<'a, Item<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Fail on the first id already in `existing` or repeated within `items`.
fn check_unique<E>(existing: &HashSet<&ItemId>, items: &[Item<E>]) -> StoreResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if existing.contains(item.id()) || !seen.insert(item.id()) {
            return Err(StoreError::DuplicateId(item.id().clone()));
        }
    }
    Ok(())
}

/// Queue of commands issued by host callbacks during a render pass.
///
/// Queued commands are applied in issue order once the pass finishes.
pub struct Dispatcher<E: Extension = ()> {
    queue: Vec<ItemCommand<E>>,
}

impl<E: Extension> Default for Dispatcher<E> {
    fn default() -> Self {
        Self { queue: Vec::new() }
    }
}

impl<E: Extension> fmt::Debug for Dispatcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").field("queue", &self.queue).finish()
    }
}

impl<E: Extension> Dispatcher<E> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue any command.
    pub fn dispatch(&mut self, command: ItemCommand<E>) {
        self.queue.push(command);
    }

    /// Queue [`ItemCommand::Add`].
    pub fn add(&mut self, item: Item<E>) {
        self.dispatch(ItemCommand::Add(item));
    }

    /// Queue [`ItemCommand::BulkAdd`].
    pub fn bulk_add(&mut self, items: Vec<Item<E>>) {
        self.dispatch(ItemCommand::BulkAdd(items));
    }

    /// Queue [`ItemCommand::Init`].
    pub fn init(&mut self, items: Vec<Item<E>>) {
        self.dispatch(ItemCommand::Init(items));
    }

    /// Queue an update of the item with `id`.
    pub fn update(&mut self, id: impl Into<ItemId>, patch: ItemPatch<E>) {
        self.dispatch(ItemCommand::update(id, patch));
    }

    /// Queue an update of every item matching `predicate`.
    pub fn bulk_update(&mut self, predicate: impl Fn(&Item<E>) -> bool + 'static, patch: ItemPatch<E>) {
        self.dispatch(ItemCommand::bulk_update(predicate, patch));
    }

    /// Queue removal of the item with `id`.
    pub fn delete(&mut self, id: impl Into<ItemId>) {
        self.dispatch(ItemCommand::delete(id));
    }

    /// Queue removal of the first item matching `predicate`.
    pub fn delete_where(&mut self, predicate: impl Fn(&Item<E>) -> bool + 'static) {
        self.dispatch(ItemCommand::delete_where(predicate));
    }

    /// Queue removal of every item matching `predicate`.
    pub fn bulk_delete(&mut self, predicate: impl Fn(&Item<E>) -> bool + 'static) {
        self.dispatch(ItemCommand::bulk_delete(predicate));
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Apply all queued commands to `items` in issue order.
    pub fn flush(&mut self, items: &ItemCollection<E>) -> ItemCollection<E> {
        self.queue
            .drain(..)
            .fold(items.clone(), |acc, command| acc.reduce(command))
    }
}
