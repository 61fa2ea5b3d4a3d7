//! # Property Store
//!
//! Typed storage for an element's own attributes. A store is a plain struct
//! declared with [`property_store!`](crate::property_store), one slot per
//! property, in one of three categories:
//!
//! | Category | Slot | `has` | `get` when empty |
//! |----------|------|-------|------------------|
//! | Mandatory | `P` | always | n/a |
//! | Optional | `Option<P>` | when set | `Error::NotSet` |
//! | Defaulted | `Option<P>` | always | value from the store's [`DefaultFactory`] |
//!
//! Membership is expressed by the `StoresProperty<P>` bound, so asking a store
//! for a property it does not declare is a build error. `unset` additionally
//! needs `ClearsProperty<P>`, which mandatory properties never implement.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ============================================================================
// Property
// ============================================================================

/// A typed attribute that can be held by a property store.
pub trait Property: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Attribute name as it appears in ADM XML (e.g. `"audioObjectName"`).
    const NAME: &'static str;
}

/// Category a property belongs to within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Presence {
    Mandatory,
    Optional,
    Defaulted,
}

/// Produces the value a defaulted property reads as while its slot is empty.
pub trait DefaultFactory<P> {
    fn create() -> P;
}

/// Default factory of stores without defaulted properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDefaults;

// ============================================================================
// Slot traits (implemented by `property_store!`)
// ============================================================================

/// Slot access for one property of a store.
pub trait StoresProperty<P: Property> {
    const PRESENCE: Presence;

    /// The explicitly stored value, if any. Mandatory slots are always `Some`.
    fn slot(&self) -> Option<&P>;

    /// Store a value, replacing any previous one.
    fn fill(&mut self, value: P);

    /// Value read while the slot is empty. Only defaulted properties have one.
    fn fallback() -> Option<P> {
        None
    }
}

/// Optional and defaulted slots can be emptied again.
pub trait ClearsProperty<P: Property>: StoresProperty<P> {
    fn clear(&mut self);
}

// ============================================================================
// PropertyStore: the generic accessors
// ============================================================================

/// Generic accessors over a store's slots.
///
/// Every method is bounded on the slot trait for `P`, so the compiler rejects
/// properties outside the store's declared sets.
pub trait PropertyStore {
    /// Current value of `P`.
    ///
    /// Optional properties without a value yield [`Error::NotSet`]; check
    /// [`has`](Self::has) first. Defaulted properties without a value yield
    /// their default.
    fn get<P: Property>(&self) -> Result<P>
    where
        Self: StoresProperty<P>,
    {
        match <Self as StoresProperty<P>>::slot(self) {
            Some(value) => Ok(value.clone()),
            None => <Self as StoresProperty<P>>::fallback().ok_or(Error::NotSet { property: P::NAME }),
        }
    }

    /// Whether `P` has a value. Always true for mandatory and defaulted
    /// properties.
    fn has<P: Property>(&self) -> bool
    where
        Self: StoresProperty<P>,
    {
        match <Self as StoresProperty<P>>::PRESENCE {
            Presence::Mandatory | Presence::Defaulted => true,
            Presence::Optional => <Self as StoresProperty<P>>::slot(self).is_some(),
        }
    }

    /// Whether `P` currently reads as its default. Only ever true for
    /// defaulted properties whose slot is empty; an explicit value equal to
    /// the default does not count.
    fn is_default<P: Property>(&self) -> bool
    where
        Self: StoresProperty<P>,
    {
        <Self as StoresProperty<P>>::PRESENCE == Presence::Defaulted
            && <Self as StoresProperty<P>>::slot(self).is_none()
    }

    fn set<P: Property>(&mut self, value: P)
    where
        Self: StoresProperty<P>,
    {
        <Self as StoresProperty<P>>::fill(self, value);
    }

    /// Empty the slot of an optional or defaulted property.
    fn unset<P: Property>(&mut self)
    where
        Self: ClearsProperty<P>,
    {
        <Self as ClearsProperty<P>>::clear(self);
    }

    /// Builder-style [`set`](Self::set).
    fn with<P: Property>(mut self, value: P) -> Self
    where
        Self: StoresProperty<P> + Sized,
    {
        self.set(value);
        self
    }

    /// Whether `P` belongs to this store. Only callable when it does, so this
    /// is a build-time check that evaluates to `true`.
    fn is_valid_property<P: Property>() -> bool
    where
        Self: StoresProperty<P>,
    {
        true
    }

    /// Every property that currently has a value, in declaration order.
    fn entries(&self) -> Vec<PropertyEntry>;
}

// ============================================================================
// PropertyEntry: generic listing for printing and export
// ============================================================================

/// One present property, rendered to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyEntry {
    pub name: &'static str,
    pub value: String,
    pub presence: Presence,
    /// `true` when the value comes from the default factory.
    pub is_default: bool,
}

impl PropertyEntry {
    pub fn explicit<P: Property>(value: &P, presence: Presence) -> Self {
        Self {
            name: P::NAME,
            value: value.to_string(),
            presence,
            is_default: false,
        }
    }

    pub fn fallback<P: Property>(value: &P) -> Self {
        Self {
            name: P::NAME,
            value: value.to_string(),
            presence: Presence::Defaulted,
            is_default: true,
        }
    }
}
