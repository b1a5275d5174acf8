//! The baseline/pending state machine behind every array accessor.
//!
//! `committed` mirrors what the store is believed to hold. Mutations are
//! recorded against it as `pending_adds` (insertion order) and
//! `pending_removes` (a subset of `committed`). Diffing turns the pending
//! sets into an incremental patch, or the whole content into a replacement
//! when the accessor is solid.

use crate::{AccessorError, AccessorResult, Element, UpdateAtom};
use docmap_types::{ObjectId, Scalar};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;

/// Accessor for arrays of free-form scalars.
pub type ScalarArray = CompositeAccessor<Scalar>;

/// Accessor for arrays of document references.
pub type ObjectIdArray = CompositeAccessor<ObjectId>;

/// A set-like array that tracks how it diverged from its baseline.
#[derive(Debug)]
pub struct CompositeAccessor<E: Element> {
    /// Last known persisted content, unique, in stored order.
    committed: Vec<E>,
    /// Added since baseline, never in `committed`.
    pending_adds: Vec<E>,
    /// Removed since baseline, always in `committed`.
    pending_removes: HashSet<E>,
    solid: bool,
}

/// Internal state snapshot for diagnostics. Never used for persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessorDebug {
    pub committed: Vec<Value>,
    pub pending_adds: Vec<Value>,
    pub pending_removes: Vec<Value>,
    pub solid: bool,
}

impl<E: Element> Default for CompositeAccessor<E> {
    fn default() -> Self {
        Self::new(Vec::new(), false)
    }
}

impl<E: Element> CompositeAccessor<E> {
    /// Creates an accessor whose baseline is `elements`. Duplicates are
    /// dropped, keeping the first occurrence, and so are elements that fail
    /// [`Element::admit`].
    pub fn new(elements: impl IntoIterator<Item = E>, solid: bool) -> Self {
        let mut seen = HashSet::new();
        let committed = elements
            .into_iter()
            .filter(|e| e.admit().is_ok() && seen.insert(e.clone()))
            .collect();

        Self {
            committed,
            pending_adds: Vec::new(),
            pending_removes: HashSet::new(),
            solid,
        }
    }

    /// Creates an accessor from a raw stored value.
    ///
    /// `null` or a missing value yields an empty accessor. Null elements
    /// inside the array are skipped; any element failing admission rejects
    /// the whole value.
    pub fn from_value(raw: Option<&Value>, solid: bool) -> AccessorResult<Self> {
        Ok(Self::new(normalize_array::<E>(raw)?, solid))
    }

    /// Adds an element. No-op if it is already observable; a rejected
    /// element leaves the accessor unchanged.
    pub fn add(&mut self, element: impl Into<E>) -> AccessorResult<()> {
        let element = element.into();
        element.admit()?;
        if self.pending_removes.remove(&element) {
            return Ok(());
        }
        if !self.committed.contains(&element) && !self.pending_adds.contains(&element) {
            self.pending_adds.push(element);
        }
        Ok(())
    }

    /// Admits a raw value and adds it. `null` is a no-op.
    pub fn add_value(&mut self, value: &Value) -> AccessorResult<()> {
        match E::normalize(value)? {
            Some(element) => self.add(element),
            None => Ok(()),
        }
    }

    /// Removes an element. No-op if it is not observable.
    ///
    /// Pulling a committed element records a removal; pulling an element that
    /// only exists as a pending add cancels the add.
    pub fn pull(&mut self, element: &E) {
        if let Some(pos) = self.pending_adds.iter().position(|e| e == element) {
            self.pending_adds.remove(pos);
        } else if self.committed.contains(element) {
            self.pending_removes.insert(element.clone());
        }
    }

    /// Removes a raw value. Values that fail admission are never observable,
    /// so they are ignored.
    pub fn pull_value(&mut self, value: &Value) {
        if let Ok(Some(element)) = E::normalize(value) {
            self.pull(&element);
        }
    }

    /// Membership test against the observable content.
    #[must_use]
    pub fn has(&self, element: &E) -> bool {
        if self.pending_removes.contains(element) {
            return false;
        }
        self.committed.contains(element) || self.pending_adds.contains(element)
    }

    /// Membership test for a raw value.
    #[must_use]
    pub fn has_value(&self, value: &Value) -> bool {
        matches!(E::normalize(value), Ok(Some(ref e)) if self.has(e))
    }

    /// Number of observable elements.
    #[must_use]
    pub fn count(&self) -> usize {
        self.committed.len() - self.pending_removes.len() + self.pending_adds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Iterates the observable content: surviving committed elements in
    /// stored order, then pending adds in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.committed
            .iter()
            .filter(|e| !self.pending_removes.contains(*e))
            .chain(self.pending_adds.iter())
    }

    /// The observable content as stored values, in iteration order.
    #[must_use]
    pub fn to_values(&self) -> Vec<Value> {
        self.iter().map(Element::to_value).collect()
    }

    /// Replaces the whole content. The accessor becomes solid, since the
    /// pending sets no longer describe the change.
    ///
    /// Every element is admitted before anything changes.
    pub fn replace(&mut self, raw: &Value) -> AccessorResult<()> {
        let elements = normalize_array::<E>(Some(raw))?;
        *self = Self::new(elements, true);
        Ok(())
    }

    /// Forces (or stops forcing) full-replacement diffs.
    pub fn set_solid(&mut self, solid: bool) {
        self.solid = solid;
    }

    #[must_use]
    pub fn is_solid(&self) -> bool {
        self.solid
    }

    /// Returns true if saving would emit an update atom.
    #[must_use]
    pub fn has_updates(&self) -> bool {
        self.solid || !self.pending_adds.is_empty() || !self.pending_removes.is_empty()
    }

    /// Diffs the accessor against its baseline.
    ///
    /// Solid accessors always yield a replacement. Otherwise the pending sets
    /// become a patch, and no pending changes yield `None`.
    #[must_use]
    pub fn update_atom(&self) -> Option<UpdateAtom> {
        if self.solid {
            return Some(UpdateAtom::Replace {
                value: Value::Array(self.to_values()),
            });
        }

        let adds = self.pending_adds.iter().map(Element::to_value).collect();
        let removes = self
            .committed
            .iter()
            .filter(|e| self.pending_removes.contains(*e))
            .map(Element::to_value)
            .collect();
        UpdateAtom::patch(adds, removes)
    }

    /// Resets the baseline to the observable content after a successful
    /// save. Solidity is left as it is.
    pub fn mark_persisted(&mut self) {
        let committed: Vec<E> = self.iter().cloned().collect();
        self.committed = committed;
        self.pending_adds.clear();
        self.pending_removes.clear();
    }

    /// Snapshot of the internal state.
    #[must_use]
    pub fn debug_info(&self) -> AccessorDebug {
        AccessorDebug {
            committed: self.committed.iter().map(Element::to_value).collect(),
            pending_adds: self.pending_adds.iter().map(Element::to_value).collect(),
            pending_removes: self
                .committed
                .iter()
                .filter(|e| self.pending_removes.contains(*e))
                .map(Element::to_value)
                .collect(),
            solid: self.solid,
        }
    }
}

/// Cloning detaches the copy from the original's history: the copy's
/// baseline is the current content, nothing is pending, and it is always
/// solid.
impl<E: Element> Clone for CompositeAccessor<E> {
    fn clone(&self) -> Self {
        Self {
            committed: self.iter().cloned().collect(),
            pending_adds: Vec::new(),
            pending_removes: HashSet::new(),
            solid: true,
        }
    }
}

impl<'a, E: Element> IntoIterator for &'a CompositeAccessor<E> {
    type Item = &'a E;
    type IntoIter = Box<dyn Iterator<Item = &'a E> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl<E: Element> Serialize for CompositeAccessor<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(Element::to_value))
    }
}

fn normalize_array<E: Element>(raw: Option<&Value>) -> AccessorResult<Vec<E>> {
    match raw {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => {
            let mut elements = Vec::with_capacity(items.len());
            for item in items {
                if let Some(element) = E::normalize(item)? {
                    elements.push(element);
                }
            }
            Ok(elements)
        }
        Some(other) => Err(AccessorError::NotAnArray {
            kind: E::KIND,
            found: other.to_string(),
        }),
    }
}
