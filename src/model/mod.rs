//! # ADM Value Model
//!
//! The values elements are made of: named scalars, timecodes, ids and the
//! type/format discriminators embedded in them.
//!
//! Pure data. Nothing in here knows about documents or references, except
//! that every id names the element kind it identifies.

mod named_type;
mod time;
mod descriptor;
mod ids;
mod dialogue;
mod values;

pub use named_type::{NamedType, PropertyTag, Validator, Unchecked, RangeValidator};
pub use time::Time;
pub use descriptor::{TypeDescriptor, FormatDescriptor, ElementKind};
pub use ids::{
    ElementId, AudioProgrammeId, AudioContentId, AudioObjectId, AudioPackFormatId,
    AudioChannelFormatId, AudioStreamFormatId, AudioTrackFormatId, AudioTrackUidId,
    AudioBlockFormatId,
};
pub use dialogue::{DialogueId, NonDialogueContentKind, DialogueContentKind, MixedContentKind, ContentKind};
pub use values::*;
