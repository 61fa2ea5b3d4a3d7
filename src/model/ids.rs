//! Element ids and their ADM text forms.
//!
//! | Id | Text form |
//! |----|-----------|
//! | programme / content / object | `APR_xxxx` / `ACO_xxxx` / `AO_xxxx` |
//! | pack / channel / stream format | `AP_yyyyxxxx` / `AC_yyyyxxxx` / `AS_yyyyxxxx` |
//! | track format | `AT_yyyyxxxx_zz` |
//! | track UID | `ATU_xxxxxxxx` |
//! | block format | `AB_yyyyxxxx_zzzzzzzz` |
//!
//! `yyyy` is the type label, `xxxx` the value and `zz` a counter, all hex.
//! A value of `0` is the undefined id, which any number of elements may share.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ElementKind, TypeDescriptor};
use crate::elements::{
    AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat, AudioProgramme,
    AudioStreamFormat, AudioTrackFormat, AudioTrackUid, DocumentElement,
};
use crate::store::Property;
use crate::{Error, Result};

/// An id that identifies one element of a document.
pub trait ElementId: Property + Copy + Eq + Hash + Default + FromStr<Err = Error> {
    /// Element kind carrying this id.
    type Element: DocumentElement<Id = Self>;

    const KIND: ElementKind;
    /// First value handed out by automatic id assignment.
    const FIRST_VALUE: u32;
    const MAX_VALUE: u32;

    fn value(&self) -> u32;

    /// The same id (type label, counter) with another value, or `None` if
    /// `value` does not fit the text form.
    fn with_value(&self, value: u32) -> Option<Self>;

    fn is_undefined(&self) -> bool {
        self.value() == 0
    }
}

// ============================================================================
// Parsing helpers
// ============================================================================

fn parse_error(input: &str, reason: &'static str) -> Error {
    Error::Parse { input: input.to_owned(), reason }
}

fn strip<'a>(input: &'a str, prefix: &'static str) -> Result<&'a str> {
    input
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .ok_or_else(|| parse_error(input, "unexpected id prefix"))
}

fn hex(input: &str, digits: &str, width: usize) -> Result<u32> {
    if digits.len() != width || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(parse_error(input, "malformed hex field"));
    }
    u32::from_str_radix(digits, 16).map_err(|_| parse_error(input, "malformed hex field"))
}

/// `yyyyxxxx` → (type, value).
fn typed(input: &str, digits: &str) -> Result<(TypeDescriptor, u16)> {
    let packed = hex(input, digits, 8)?;
    let descriptor = TypeDescriptor::from_label((packed >> 16) as u16)
        .ok_or_else(|| parse_error(input, "unknown type label"))?;
    Ok((descriptor, (packed & 0xFFFF) as u16))
}

fn counted<'a>(input: &'a str, body: &'a str) -> Result<(&'a str, &'a str)> {
    body.split_once('_').ok_or_else(|| parse_error(input, "missing counter"))
}

// ============================================================================
// Plain ids: APR_, ACO_, AO_
// ============================================================================

macro_rules! plain_id {
    ($(#[$meta:meta])* $name:ident => $element:ty, $kind:ident, $prefix:literal, $xml:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        pub struct $name {
            value: u16,
        }

        impl $name {
            pub const fn new(value: u16) -> Self {
                Self { value }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{:04X}"), self.value)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Ok(Self::new(hex(s, strip(s, $prefix)?, 4)? as u16))
            }
        }

        impl Property for $name {
            const NAME: &'static str = $xml;
        }

        impl ElementId for $name {
            type Element = $element;
            const KIND: ElementKind = ElementKind::$kind;
            const FIRST_VALUE: u32 = 0x1001;
            const MAX_VALUE: u32 = 0xFFFF;

            fn value(&self) -> u32 {
                u32::from(self.value)
            }

            fn with_value(&self, value: u32) -> Option<Self> {
                u16::try_from(value).ok().map(Self::new)
            }
        }
    };
}

plain_id!(
    /// `APR_xxxx`
    AudioProgrammeId => AudioProgramme, AudioProgramme, "APR", "audioProgrammeID"
);
plain_id!(
    /// `ACO_xxxx`
    AudioContentId => AudioContent, AudioContent, "ACO", "audioContentID"
);
plain_id!(
    /// `AO_xxxx`
    AudioObjectId => AudioObject, AudioObject, "AO", "audioObjectID"
);

// ============================================================================
// Typed ids: AP_, AC_, AS_
// ============================================================================

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident => $element:ty, $kind:ident, $prefix:literal, $xml:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        pub struct $name {
            type_descriptor: TypeDescriptor,
            value: u16,
        }

        impl $name {
            pub const fn new(type_descriptor: TypeDescriptor, value: u16) -> Self {
                Self { type_descriptor, value }
            }

            pub fn type_descriptor(&self) -> TypeDescriptor {
                self.type_descriptor
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{:04X}{:04X}"), self.type_descriptor.label(), self.value)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let (type_descriptor, value) = typed(s, strip(s, $prefix)?)?;
                Ok(Self::new(type_descriptor, value))
            }
        }

        impl Property for $name {
            const NAME: &'static str = $xml;
        }

        impl ElementId for $name {
            type Element = $element;
            const KIND: ElementKind = ElementKind::$kind;
            const FIRST_VALUE: u32 = 0x1001;
            const MAX_VALUE: u32 = 0xFFFF;

            fn value(&self) -> u32 {
                u32::from(self.value)
            }

            fn with_value(&self, value: u32) -> Option<Self> {
                let value = u16::try_from(value).ok()?;
                Some(Self::new(self.type_descriptor, value))
            }
        }
    };
}

typed_id!(
    /// `AP_yyyyxxxx`
    AudioPackFormatId => AudioPackFormat, AudioPackFormat, "AP", "audioPackFormatID"
);
typed_id!(
    /// `AC_yyyyxxxx`
    AudioChannelFormatId => AudioChannelFormat, AudioChannelFormat, "AC", "audioChannelFormatID"
);
typed_id!(
    /// `AS_yyyyxxxx`
    AudioStreamFormatId => AudioStreamFormat, AudioStreamFormat, "AS", "audioStreamFormatID"
);

// ============================================================================
// AT_yyyyxxxx_zz
// ============================================================================

/// `AT_yyyyxxxx_zz`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct AudioTrackFormatId {
    type_descriptor: TypeDescriptor,
    value: u16,
    counter: u8,
}

impl AudioTrackFormatId {
    pub const fn new(type_descriptor: TypeDescriptor, value: u16, counter: u8) -> Self {
        Self { type_descriptor, value, counter }
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.type_descriptor
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }
}

impl fmt::Display for AudioTrackFormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AT_{:04X}{:04X}_{:02X}",
            self.type_descriptor.label(),
            self.value,
            self.counter
        )
    }
}

impl FromStr for AudioTrackFormatId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (head, counter) = counted(s, strip(s, "AT")?)?;
        let (type_descriptor, value) = typed(s, head)?;
        Ok(Self::new(type_descriptor, value, hex(s, counter, 2)? as u8))
    }
}

impl Property for AudioTrackFormatId {
    const NAME: &'static str = "audioTrackFormatID";
}

impl ElementId for AudioTrackFormatId {
    type Element = AudioTrackFormat;
    const KIND: ElementKind = ElementKind::AudioTrackFormat;
    const FIRST_VALUE: u32 = 0x1001;
    const MAX_VALUE: u32 = 0xFFFF;

    fn value(&self) -> u32 {
        u32::from(self.value)
    }

    fn with_value(&self, value: u32) -> Option<Self> {
        let value = u16::try_from(value).ok()?;
        Some(Self::new(self.type_descriptor, value, self.counter))
    }
}

// ============================================================================
// ATU_xxxxxxxx
// ============================================================================

/// `ATU_xxxxxxxx`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct AudioTrackUidId {
    value: u32,
}

impl AudioTrackUidId {
    pub const fn new(value: u32) -> Self {
        Self { value }
    }
}

impl fmt::Display for AudioTrackUidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ATU_{:08X}", self.value)
    }
}

impl FromStr for AudioTrackUidId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::new(hex(s, strip(s, "ATU")?, 8)?))
    }
}

impl Property for AudioTrackUidId {
    const NAME: &'static str = "audioTrackUID";
}

impl ElementId for AudioTrackUidId {
    type Element = AudioTrackUid;
    const KIND: ElementKind = ElementKind::AudioTrackUid;
    const FIRST_VALUE: u32 = 0x0000_0001;
    const MAX_VALUE: u32 = 0xFFFF_FFFF;

    fn value(&self) -> u32 {
        self.value
    }

    fn with_value(&self, value: u32) -> Option<Self> {
        Some(Self::new(value))
    }
}

// ============================================================================
// AB_yyyyxxxx_zzzzzzzz
// ============================================================================

/// `AB_yyyyxxxx_zzzzzzzz`. Scoped to the owning channel: type and value are
/// the channel's, the counter numbers the blocks from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct AudioBlockFormatId {
    type_descriptor: TypeDescriptor,
    value: u16,
    counter: u32,
}

impl AudioBlockFormatId {
    pub const fn new(type_descriptor: TypeDescriptor, value: u16, counter: u32) -> Self {
        Self { type_descriptor, value, counter }
    }

    /// The `counter`th block of `channel`.
    pub fn for_channel(channel: AudioChannelFormatId, counter: u32) -> Self {
        Self::new(channel.type_descriptor, channel.value, counter)
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.type_descriptor
    }

    pub fn value(&self) -> u32 {
        u32::from(self.value)
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }
}

impl fmt::Display for AudioBlockFormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AB_{:04X}{:04X}_{:08X}",
            self.type_descriptor.label(),
            self.value,
            self.counter
        )
    }
}

impl FromStr for AudioBlockFormatId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (head, counter) = counted(s, strip(s, "AB")?)?;
        let (type_descriptor, value) = typed(s, head)?;
        Ok(Self::new(type_descriptor, value, hex(s, counter, 8)?))
    }
}

impl Property for AudioBlockFormatId {
    const NAME: &'static str = "audioBlockFormatID";
}
