//! Checks and storage shared by every edge kind.

use std::sync::{Arc, Weak};

use hashbrown::HashSet;
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::{DocumentElement, ReferenceSyncOption, SingleReference};
use crate::document::Document;
use crate::model::{ElementKind, TypeDescriptor};
use crate::{Error, Result};

// ============================================================================
// ReferenceList
// ============================================================================

/// Ordered edge list compared by identity. Most lists hold a handful of
/// elements, so they stay inline.
pub(crate) struct ReferenceList<T> {
    items: SmallVec<[Arc<T>; 4]>,
}

impl<T> Default for ReferenceList<T> {
    fn default() -> Self {
        Self { items: SmallVec::new() }
    }
}

impl<T> ReferenceList<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|i| std::ptr::eq(i.as_ref(), item))
    }

    /// Append unless already present.
    pub fn insert(&mut self, item: &Arc<T>) -> bool {
        if self.contains(item) {
            return false;
        }
        self.items.push(item.clone());
        true
    }

    pub fn remove(&mut self, item: &T) -> bool {
        match self.items.iter().position(|i| std::ptr::eq(i.as_ref(), item)) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn to_vec(&self) -> Vec<Arc<T>> {
        self.items.to_vec()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

// ============================================================================
// Document checks
// ============================================================================

/// Both live in the same document, or both in none.
pub(crate) fn same_document(a: &Weak<Document>, b: &Weak<Document>) -> bool {
    match (a.upgrade(), b.upgrade()) {
        (Some(a), Some(b)) => Arc::ptr_eq(&a, &b),
        (None, None) => true,
        _ => false,
    }
}

/// Give `target` the document of `source` if it has none yet. Adding it pulls
/// in its own unowned references as well.
pub(crate) fn auto_parent<T: DocumentElement>(source: &Weak<Document>, target: &Arc<T>) -> Result<()> {
    let Some(document) = source.upgrade() else {
        return Ok(());
    };
    if target.parent().upgrade().is_none() {
        document.add(target.clone())?;
    }
    Ok(())
}

pub(crate) fn ensure_same_document<S, T>(source: &S, target: &T) -> Result<()>
where
    S: DocumentElement,
    T: DocumentElement,
{
    if same_document(&source.parent(), &target.parent()) {
        return Ok(());
    }
    let (from, to) = (source.id().to_string(), target.id().to_string());
    debug!("rejected reference {} -> {}: different documents", from, to);
    Err(Error::CrossDocumentReference { from, to })
}

/// Auto-parent `target`, then require both ends in one document.
pub(crate) fn attach<S, T>(source: &S, target: &Arc<T>) -> Result<()>
where
    S: DocumentElement,
    T: DocumentElement,
{
    auto_parent(&source.parent(), target)?;
    ensure_same_document(source, target.as_ref())
}

// ============================================================================
// Cycle detection
// ============================================================================

/// Whether `goal` can be reached from `start` along `edges`, `start` included.
pub(crate) fn reaches<T>(start: &Arc<T>, goal: &T, edges: impl Fn(&T) -> Vec<Arc<T>>) -> bool {
    let mut visited: HashSet<*const T> = HashSet::new();
    let mut stack = vec![start.clone()];
    while let Some(node) = stack.pop() {
        if std::ptr::eq(node.as_ref(), goal) {
            return true;
        }
        if visited.insert(Arc::as_ptr(&node)) {
            stack.extend(edges(&node));
        }
    }
    false
}

/// Reject `source -> target` if `target` already leads back to `source`.
pub(crate) fn ensure_acyclic<T: DocumentElement>(
    source: &T,
    target: &Arc<T>,
    edges: impl Fn(&T) -> Vec<Arc<T>>,
) -> Result<()> {
    if !reaches(target, source, edges) {
        return Ok(());
    }
    let (from, to) = (source.id().to_string(), target.id().to_string());
    debug!("rejected reference {} -> {}: cycle", from, to);
    Err(Error::ReferenceCycle { from, to })
}

// ============================================================================
// Ids
// ============================================================================

/// Fails if another element of `parent` already holds `id`.
pub(crate) fn ensure_id_available<E: DocumentElement>(
    element: &E,
    parent: &Weak<Document>,
    id: &E::Id,
) -> Result<()> {
    let Some(document) = parent.upgrade() else {
        return Ok(());
    };
    match document.lookup(id) {
        Some(holder) if !std::ptr::eq(holder.as_ref(), element) => {
            Err(Error::DuplicateId { id: id.to_string() })
        }
        _ => Ok(()),
    }
}

pub(crate) fn ensure_type(
    element: ElementKind,
    expected: TypeDescriptor,
    found: TypeDescriptor,
) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::TypeMismatch { element, expected, found })
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Clear a single-valued edge if it points at `target`.
pub(crate) fn detach_single<S, T>(source: &S, target: &T)
where
    S: SingleReference<T>,
{
    if source.reference().is_some_and(|current| std::ptr::eq(current.as_ref(), target)) {
        source.unset_reference();
    }
}

/// Only `supported` is implemented by the calling operation.
pub(crate) fn ensure_sync(given: ReferenceSyncOption, supported: ReferenceSyncOption) -> Result<()> {
    if given == supported {
        return Ok(());
    }
    Err(Error::UnsupportedOperation(format!(
        "{given:?} is not implemented here, use {supported:?}"
    )))
}

pub(crate) fn trace_edge<S, T>(action: &str, source: &S, target: &T)
where
    S: DocumentElement,
    T: DocumentElement,
{
    trace!("{} {} {} -> {}", action, T::KIND, source.id(), target.id());
}
