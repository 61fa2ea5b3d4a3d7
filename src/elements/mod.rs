//! # ADM Elements
//!
//! Every element is created through a factory returning `Arc<Self>` and is
//! mutated through `&self`: properties and edge lists sit behind a
//! `parking_lot::RwLock`, the owning [`Document`] behind a `Weak`.
//!
//! Access goes through small traits so the compiler picks the right slot:
//!
//! - [`ElementProperty<P>`] / [`UnsetProperty<P>`]: one impl per property an
//!   element declares, wrapped by the generic [`PropertyExt`] accessors
//!   (`get::<P>()`, `set(p)`, `has::<P>()`, `is_default::<P>()`, `unset::<P>()`).
//! - [`References<T>`] / [`SingleReference<T>`]: one impl per outgoing edge
//!   kind, wrapped by [`ReferenceExt`] (`get_references::<T>()`, ...).
//!
//! ## Lock discipline
//!
//! No element lock is held while calling into another element or into the
//! document. Every operation reads what it needs, drops the guard, runs its
//! checks (cycle, document, id) and only then takes the write lock to mutate.

pub(crate) mod reference;

mod programme;
mod content;
mod object;
mod pack_format;
mod channel_format;
mod block_format;
mod stream_format;
mod track_format;
mod track_uid;

use std::fmt;
use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::model::{ElementId, ElementKind};
use crate::store::{Property, PropertyEntry};
use crate::{Error, Result};

pub use programme::AudioProgramme;
pub use content::AudioContent;
pub use object::AudioObject;
pub use pack_format::AudioPackFormat;
pub use channel_format::AudioChannelFormat;
pub use block_format::AudioBlockFormat;
pub use stream_format::AudioStreamFormat;
pub use track_format::AudioTrackFormat;
pub use track_uid::AudioTrackUid;

// ============================================================================
// Property access
// ============================================================================

/// Access to one property `P` of an element.
///
/// Most impls forward to the element's property store. Some properties carry
/// extra rules (id uniqueness, the HOA-only pack properties, the content kind
/// of audio content), which live in `write_property`.
pub trait ElementProperty<P: Property> {
    fn read_property(&self) -> Result<P>;
    fn has_property(&self) -> bool;
    fn property_is_default(&self) -> bool;
    fn write_property(&self, value: P) -> Result<()>;
}

/// Implemented for the optional and defaulted properties of an element.
pub trait UnsetProperty<P: Property>: ElementProperty<P> {
    fn unset_property(&self);
}

/// Generic property accessors of every element.
pub trait PropertyExt {
    /// Value of `P`, its default, or [`Error::NotSet`].
    fn get<P: Property>(&self) -> Result<P>
    where
        Self: ElementProperty<P>,
    {
        self.read_property()
    }

    fn has<P: Property>(&self) -> bool
    where
        Self: ElementProperty<P>,
    {
        self.has_property()
    }

    fn is_default<P: Property>(&self) -> bool
    where
        Self: ElementProperty<P>,
    {
        self.property_is_default()
    }

    fn set<P: Property>(&self, value: P) -> Result<()>
    where
        Self: ElementProperty<P>,
    {
        self.write_property(value)
    }

    fn unset<P: Property>(&self)
    where
        Self: UnsetProperty<P>,
    {
        self.unset_property()
    }
}

// ============================================================================
// Reference access
// ============================================================================

/// An ordered, duplicate-free list of outgoing edges to elements of kind `T`.
pub trait References<T> {
    /// Add an edge to `other`.
    ///
    /// An `other` without a document joins this element's document first.
    /// Returns `Ok(false)` if the edge already exists.
    fn add_reference(&self, other: &Arc<T>) -> Result<bool>;

    /// Remove the edge to `other`; nothing happens if there is none.
    fn remove_reference(&self, other: &Arc<T>);

    fn reference_list(&self) -> Vec<Arc<T>>;

    fn clear_reference_list(&self);
}

/// A single-valued outgoing edge to an element of kind `T`.
pub trait SingleReference<T> {
    /// Point the edge at `other`, replacing the previous target.
    fn set_reference(&self, other: &Arc<T>) -> Result<()>;

    fn reference(&self) -> Option<Arc<T>>;

    fn unset_reference(&self);
}

/// Generic edge accessors of every element.
pub trait ReferenceExt {
    fn get_references<T>(&self) -> Vec<Arc<T>>
    where
        Self: References<T>,
    {
        self.reference_list()
    }

    fn clear_references<T>(&self)
    where
        Self: References<T>,
    {
        self.clear_reference_list()
    }

    fn get_reference<T>(&self) -> Option<Arc<T>>
    where
        Self: SingleReference<T>,
    {
        self.reference()
    }
}

/// Which side of the StreamFormat <-> TrackFormat edge pair an operation
/// starts from. The other side is updated to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceSyncOption {
    /// Called on a stream format, keep its track formats in sync.
    SyncWithTrackFormat,
    /// Called on a track format, keep its stream format in sync.
    SyncWithStreamFormat,
}

// ============================================================================
// DocumentElement
// ============================================================================

/// An element that can be owned by a [`Document`].
pub trait DocumentElement: sealed::Sealed + Send + Sync + Sized + 'static {
    type Id: ElementId<Element = Self>;

    const KIND: ElementKind;

    fn id(&self) -> Self::Id;

    /// The owning document, if any. Never keeps the document alive.
    fn parent(&self) -> Weak<Document>;

    /// Every property with a value, id first.
    fn properties(&self) -> Vec<PropertyEntry>;

    /// Same properties, no document, no edges.
    fn copy(&self) -> Arc<Self>;
}

/// Hooks only the document may call.
pub(crate) mod sealed {
    use std::sync::{Arc, Weak};

    use crate::document::store::ElementStore;
    use crate::document::{Adoption, Document};
    use crate::Result;

    pub trait Sealed {
        fn bucket(store: &ElementStore) -> &Vec<Arc<Self>>
        where
            Self: Sized;

        fn bucket_mut(store: &mut ElementStore) -> &mut Vec<Arc<Self>>
        where
            Self: Sized;

        fn set_parent(&self, parent: Weak<Document>);

        /// Replace the id value without uniqueness checks. A value the id
        /// cannot hold is ignored.
        fn assign_id_value(&self, value: u32);

        /// Hand every referenced element to `adoption`.
        fn adopt_references(&self, adoption: &mut Adoption<'_>) -> Result<()>;

        /// Remove every edge other elements of `document` hold to this one.
        fn release(self: &Arc<Self>, document: &Document)
        where
            Self: Sized;

        fn disconnect_references(&self);
    }
}

// ============================================================================
// ElementBuilder
// ============================================================================

/// Builder for an element with optional properties given in any order.
///
/// ```rust
/// use adm::prelude::*;
/// use adm::{AudioObject, Importance, Interact};
///
/// let object = AudioObject::builder("VO".into())
///     .with(Interact::new(true))
///     .with(Importance::try_new(8).unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(object.get::<Importance>().unwrap(), 8);
/// ```
pub struct ElementBuilder<E> {
    element: Arc<E>,
    error: Option<Error>,
}

impl<E> ElementBuilder<E> {
    pub(crate) fn new(element: Arc<E>) -> Self {
        Self { element, error: None }
    }

    /// Set `value` on the element. The first failure is reported by
    /// [`build`](Self::build).
    pub fn with<P: Property>(mut self, value: P) -> Self
    where
        E: ElementProperty<P>,
    {
        if self.error.is_none() {
            if let Err(e) = self.element.write_property(value) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn build(self) -> Result<Arc<E>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.element),
        }
    }
}

/// `ID (name=value, ...)`, the id being the first entry.
pub(crate) fn write_overview(f: &mut fmt::Formatter<'_>, entries: &[PropertyEntry]) -> fmt::Result {
    let Some((id, rest)) = entries.split_first() else {
        return Ok(());
    };
    write!(f, "{} (", id.value)?;
    for (i, entry) in rest.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}={}", entry.name, entry.value)?;
    }
    write!(f, ")")
}
