//! Items placed on the canvas and the partial updates applied to them.

use crate::quadrant::Quadrant;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque unique identifier for an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap a caller-supplied identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Caller-defined fields carried by every item, with their own partial update type.
///
/// `()` is the extension for items that only need the base fields.
pub trait Extension: Clone + fmt::Debug + PartialEq {
    /// Partial form of the extension merged by update commands.
    type Patch: Clone + fmt::Debug;

    /// Merge a partial update into these fields.
    fn merge(&mut self, patch: &Self::Patch);
}

impl Extension for () {
    type Patch = ();

    fn merge(&mut self, _patch: &Self::Patch) {}
}

/// A value placed on the canvas at a world-space position.
///
/// Serializes as one flat record: the caller's fields sit next to
/// `id`, `x`, `y` and `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item<E = ()> {
    id: ItemId,
    /// World-space x.
    pub x: f64,
    /// World-space y (grows downward, like the viewport).
    pub y: f64,
    pub label: String,
    /// Caller-defined fields.
    #[serde(flatten)]
    pub extra: E,
}

impl Item<()> {
    /// Create an item with no extra fields.
    pub fn new(id: impl Into<ItemId>, x: f64, y: f64, label: impl Into<String>) -> Self {
        Self::with_extra(id, x, y, label, ())
    }
}

impl<E> Item<E> {
    /// Create an item carrying caller-defined fields.
    pub fn with_extra(
        id: impl Into<ItemId>,
        x: f64,
        y: f64,
        label: impl Into<String>,
        extra: E,
    ) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            label: label.into(),
            extra,
        }
    }

    /// Identifier, fixed for the item's lifetime.
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// World-space position.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Quadrant the item sits in, or `None` when it lies on an axis.
    pub fn quadrant(&self) -> Option<Quadrant> {
        Quadrant::of(self.position())
    }
}

/// Partial update merged into an existing item. The id can never be patched.
#[derive(Debug, Clone)]
pub struct ItemPatch<E: Extension = ()> {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub label: Option<String>,
    pub extra: Option<E::Patch>,
}

impl<E: Extension> Default for ItemPatch<E> {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            label: None,
            extra: None,
        }
    }
}

impl<E: Extension> ItemPatch<E> {
    /// A patch that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the item to a world-space position.
    pub fn at(mut self, position: Point) -> Self {
        self.x = Some(position.x);
        self.y = Some(position.y);
        self
    }

    /// Replace the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Merge a partial update into the caller-defined fields.
    pub fn extra(mut self, patch: E::Patch) -> Self {
        self.extra = Some(patch);
        self
    }

    /// Check if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.label.is_none() && self.extra.is_none()
    }

    /// Merge the set fields into `item`.
    pub fn apply_to(&self, item: &mut Item<E>) {
        if let Some(x) = self.x {
            item.x = x;
        }
        if let Some(y) = self.y {
            item.y = y;
        }
        if let Some(label) = &self.label {
            item.label.clone_from(label);
        }
        if let Some(extra) = &self.extra {
            item.extra.merge(extra);
        }
    }
}
