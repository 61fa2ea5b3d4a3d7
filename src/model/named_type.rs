//! Strongly typed scalar wrappers.
//!
//! `NamedType<T, Tag, V>` gives a bare scalar a name (the `Tag`) and a
//! validation policy (`V`). Equality, ordering, hashing, printing and
//! increment are implemented once here for every named concept.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::store::Property;
use crate::{Error, Result};

/// Names a [`NamedType`]. Usually declared through [`named_type!`](crate::named_type).
pub trait PropertyTag: 'static {
    /// Attribute name as it appears in ADM XML.
    const NAME: &'static str;
}

/// Validation policy of a [`NamedType`].
pub trait Validator<T>: 'static {
    fn validate(value: &T) -> Result<()>;
}

/// Accepts every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Unchecked;

impl<T> Validator<T> for Unchecked {
    fn validate(_: &T) -> Result<()> {
        Ok(())
    }
}

/// Accepts values within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RangeValidator<const MIN: i64, const MAX: i64>;

impl<T, const MIN: i64, const MAX: i64> Validator<T> for RangeValidator<MIN, MAX>
where
    T: Copy + Into<f64> + fmt::Display,
{
    fn validate(value: &T) -> Result<()> {
        let v: f64 = (*value).into();
        if v < MIN as f64 || v > MAX as f64 {
            return Err(Error::OutOfRange { value: value.to_string(), min: MIN, max: MAX });
        }
        Ok(())
    }
}

// ============================================================================
// NamedType
// ============================================================================

/// A scalar value tagged with the concept it represents.
pub struct NamedType<T, Tag, V = Unchecked> {
    value: T,
    _marker: PhantomData<fn() -> (Tag, V)>,
}

impl<T, Tag, V: Validator<T>> NamedType<T, Tag, V> {
    /// Wrap `value` after running the validation policy.
    pub fn try_new(value: T) -> Result<Self> {
        V::validate(&value)?;
        Ok(Self { value, _marker: PhantomData })
    }
}

impl<T, Tag> NamedType<T, Tag, Unchecked> {
    pub fn new(value: T) -> Self {
        Self { value, _marker: PhantomData }
    }
}

impl<T, Tag, V> NamedType<T, Tag, V> {
    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, Tag, V> NamedType<T, Tag, V>
where
    T: Copy + std::ops::Add<Output = T> + std::ops::Sub<Output = T> + From<u8>,
    V: Validator<T>,
{
    /// Add one; the value is left unchanged if the result fails validation.
    pub fn increment(&mut self) -> Result<()> {
        self.replace(self.value + T::from(1))
    }

    /// Subtract one; the value is left unchanged if the result fails validation.
    pub fn decrement(&mut self) -> Result<()> {
        self.replace(self.value - T::from(1))
    }

    fn replace(&mut self, value: T) -> Result<()> {
        V::validate(&value)?;
        self.value = value;
        Ok(())
    }
}

impl<T, Tag, V> Property for NamedType<T, Tag, V>
where
    T: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static,
    Tag: PropertyTag,
    V: 'static,
{
    const NAME: &'static str = Tag::NAME;
}

// ============================================================================
// Value semantics
// ============================================================================

impl<T: Clone, Tag, V> Clone for NamedType<T, Tag, V> {
    fn clone(&self) -> Self {
        Self { value: self.value.clone(), _marker: PhantomData }
    }
}

impl<T: Copy, Tag, V> Copy for NamedType<T, Tag, V> {}

impl<T: PartialEq, Tag, V> PartialEq for NamedType<T, Tag, V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq, Tag, V> Eq for NamedType<T, Tag, V> {}

impl<T: PartialOrd, Tag, V> PartialOrd for NamedType<T, Tag, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<T: Ord, Tag, V> Ord for NamedType<T, Tag, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T: Hash, Tag, V> Hash for NamedType<T, Tag, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: fmt::Display, Tag, V> fmt::Display for NamedType<T, Tag, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: fmt::Debug, Tag: PropertyTag, V> fmt::Debug for NamedType<T, Tag, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", Tag::NAME, self.value)
    }
}

impl<T: Default, Tag> Default for NamedType<T, Tag, Unchecked> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T, Tag> From<T> for NamedType<T, Tag, Unchecked> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<Tag> From<&str> for NamedType<String, Tag, Unchecked> {
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl<T: Serialize, Tag, V> Serialize for NamedType<T, Tag, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T, Tag, V> Deserialize<'de> for NamedType<T, Tag, V>
where
    T: Deserialize<'de>,
    V: Validator<T>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = T::deserialize(deserializer)?;
        Self::try_new(value).map_err(serde::de::Error::custom)
    }
}

// Comparisons against the bare value, e.g. `name == "Dub"` or `importance == 4`.
macro_rules! compare_with_inner {
    ($($inner:ty),*) => {$(
        impl<Tag, V> PartialEq<$inner> for NamedType<$inner, Tag, V> {
            fn eq(&self, other: &$inner) -> bool {
                self.value == *other
            }
        }

        impl<Tag, V> PartialOrd<$inner> for NamedType<$inner, Tag, V> {
            fn partial_cmp(&self, other: &$inner) -> Option<Ordering> {
                self.value.partial_cmp(other)
            }
        }
    )*};
}

compare_with_inner!(bool, u8, u16, u32, i32, i64, f32, f64, String, super::Time);

impl<Tag, V> PartialEq<str> for NamedType<String, Tag, V> {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl<Tag, V> PartialEq<&str> for NamedType<String, Tag, V> {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}
