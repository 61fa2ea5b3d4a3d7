//! # adm-rs: Audio Definition Model element graph
//!
//! The reusable core underneath an ADM (ITU-R BS.2076) metadata library:
//! typed property storage for every element and a document-wide graph of
//! shared elements with checked references.
//!
//! ## Design Principles
//!
//! 1. **Typed properties**: each element declares its mandatory, optional and
//!    defaulted properties once; `get`/`set`/`has`/`unset` on a property the
//!    element does not declare is a build error, not a runtime one.
//! 2. **Shared elements, weak parents**: elements live in `Arc`s owned by the
//!    [`Document`] and by the elements referencing them; an element only
//!    holds a `Weak` link back to its document.
//! 3. **Checks before mutation**: cycle, cross-document and id checks all run
//!    before any edge list or property slot is touched.
//! 4. **No I/O in the core**: XML reading and writing sit on top of this API.
//!
//! ## Quick Start
//!
//! ```rust
//! use adm::prelude::*;
//! use adm::{AudioContent, AudioObject, AudioProgramme, Document};
//!
//! # fn example() -> adm::Result<()> {
//! let document = Document::create();
//! let programme = AudioProgramme::create("Show".into());
//! let content = AudioContent::create("Dub".into());
//! let object = AudioObject::create("VO".into());
//!
//! document.add(programme.clone())?;
//! assert!(programme.add_reference(&content)?);
//! assert!(content.add_reference(&object)?);
//!
//! // Referenced elements were adopted by the programme's document.
//! assert_eq!(document.get_elements::<AudioObject>().len(), 1);
//! assert_eq!(content.get::<adm::AudioContentName>()?, "Dub");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#[macro_use]
mod macros;

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod store;
pub mod elements;
pub mod document;
pub mod export;

// ============================================================================
// Re-exports: Model (ids, descriptors, named values)
// ============================================================================

pub use model::{
    NamedType, PropertyTag, Validator, Unchecked, RangeValidator, Time,
    TypeDescriptor, FormatDescriptor, ElementKind,
    AudioProgrammeId, AudioContentId, AudioObjectId, AudioPackFormatId,
    AudioChannelFormatId, AudioStreamFormatId, AudioTrackFormatId,
    AudioTrackUidId, AudioBlockFormatId, ElementId,
    DialogueId, NonDialogueContentKind, DialogueContentKind, MixedContentKind, ContentKind,
    AudioProgrammeName, AudioProgrammeLanguage, AudioContentName, AudioContentLanguage,
    AudioObjectName, AudioPackFormatName, AudioChannelFormatName,
    AudioStreamFormatName, AudioTrackFormatName,
    Start, End, Duration, Rtime, Importance, MaxDuckingDepth, Interact, DisableDucking,
    AbsoluteDistance, Normalization, NfcRefDist, ScreenRef, SampleRate, BitDepth,
};

// ============================================================================
// Re-exports: Property store
// ============================================================================

pub use store::{Property, Presence, PropertyEntry, PropertyStore, StoresProperty, ClearsProperty, DefaultFactory};

// ============================================================================
// Re-exports: Elements
// ============================================================================

pub use elements::{
    AudioProgramme, AudioContent, AudioObject, AudioPackFormat, AudioChannelFormat,
    AudioBlockFormat, AudioStreamFormat, AudioTrackFormat, AudioTrackUid,
    DocumentElement, ElementBuilder, ElementProperty, UnsetProperty, PropertyExt,
    References, SingleReference, ReferenceExt, ReferenceSyncOption,
};

// ============================================================================
// Re-exports: Document
// ============================================================================

pub use document::{Document, DocumentConfig};

/// Traits needed to call the generic accessors on elements and stores.
pub mod prelude {
    pub use crate::elements::{
        DocumentElement, ElementProperty, PropertyExt, ReferenceExt, References,
        SingleReference, UnsetProperty,
    };
    pub use crate::model::ElementId;
    pub use crate::store::{ClearsProperty, PropertyStore, StoresProperty};
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("id {id} is already in use in this document")]
    DuplicateId { id: String },

    #[error("mismatch between typeDefinition of {element} ({expected}) and {found}")]
    TypeMismatch {
        element: ElementKind,
        expected: TypeDescriptor,
        found: TypeDescriptor,
    },

    #[error("adding a reference from {from} to {to} would create a reference cycle")]
    ReferenceCycle { from: String, to: String },

    #[error("{from} is owned by another document than {to}")]
    CrossDocumentReference { from: String, to: String },

    #[error("property {property} is not set")]
    NotSet { property: &'static str },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("value {value} is outside of [{min}, {max}]")]
    OutOfRange { value: String, min: i64, max: i64 },

    #[error("cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: &'static str },

    #[error("no free {kind} id left")]
    IdExhausted { kind: ElementKind },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
