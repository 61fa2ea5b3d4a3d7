//! Dialogue classification of audio content.
//!
//! `dialogue` says whether content is dialogue, non-dialogue or mixed; the
//! matching content kind refines it. [`ContentKind`] is the union of the
//! three refinements, so the kind always implies the dialogue id.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::Property;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DialogueId {
    NonDialogue = 0,
    Dialogue = 1,
    Mixed = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum NonDialogueContentKind {
    #[default]
    Undefined = 0,
    Music = 1,
    Effect = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum DialogueContentKind {
    #[default]
    Undefined = 0,
    StorylineDialogue = 1,
    Voiceover = 2,
    SpokenSubtitle = 3,
    AudioDescription = 4,
    Commentary = 5,
    Emergency = 6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum MixedContentKind {
    #[default]
    Undefined = 0,
    CompleteMain = 1,
    Mixed = 2,
    HearingImpaired = 3,
}

/// Whichever of the three content kinds is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    NonDialogue(NonDialogueContentKind),
    Dialogue(DialogueContentKind),
    Mixed(MixedContentKind),
}

impl ContentKind {
    pub fn dialogue_id(&self) -> DialogueId {
        match self {
            ContentKind::NonDialogue(_) => DialogueId::NonDialogue,
            ContentKind::Dialogue(_) => DialogueId::Dialogue,
            ContentKind::Mixed(_) => DialogueId::Mixed,
        }
    }

    /// The undefined kind matching `dialogue`.
    pub fn undefined_for(dialogue: DialogueId) -> Self {
        match dialogue {
            DialogueId::NonDialogue => ContentKind::NonDialogue(NonDialogueContentKind::Undefined),
            DialogueId::Dialogue => ContentKind::Dialogue(DialogueContentKind::Undefined),
            DialogueId::Mixed => ContentKind::Mixed(MixedContentKind::Undefined),
        }
    }
}

impl From<NonDialogueContentKind> for ContentKind {
    fn from(kind: NonDialogueContentKind) -> Self {
        ContentKind::NonDialogue(kind)
    }
}

impl From<DialogueContentKind> for ContentKind {
    fn from(kind: DialogueContentKind) -> Self {
        ContentKind::Dialogue(kind)
    }
}

impl From<MixedContentKind> for ContentKind {
    fn from(kind: MixedContentKind) -> Self {
        ContentKind::Mixed(kind)
    }
}

// Printed as the numeric XML value.
macro_rules! label_display {
    ($($kind:ty => $xml:literal),* $(,)?) => {$(
        impl fmt::Display for $kind {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", *self as u8)
            }
        }

        impl Property for $kind {
            const NAME: &'static str = $xml;
        }
    )*};
}

label_display! {
    DialogueId => "dialogue",
    NonDialogueContentKind => "nonDialogueContentKind",
    DialogueContentKind => "dialogueContentKind",
    MixedContentKind => "mixedContentKind",
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::NonDialogue(kind) => kind.fmt(f),
            ContentKind::Dialogue(kind) => kind.fmt(f),
            ContentKind::Mixed(kind) => kind.fmt(f),
        }
    }
}

impl Property for ContentKind {
    const NAME: &'static str = "contentKind";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_implies_dialogue() {
        assert_eq!(ContentKind::from(MixedContentKind::HearingImpaired).dialogue_id(), DialogueId::Mixed);
        assert_eq!(
            ContentKind::undefined_for(DialogueId::Dialogue),
            ContentKind::Dialogue(DialogueContentKind::Undefined)
        );
    }

    #[test]
    fn test_numeric_display() {
        assert_eq!(DialogueId::Mixed.to_string(), "2");
        assert_eq!(DialogueContentKind::Commentary.to_string(), "5");
        assert_eq!(ContentKind::from(NonDialogueContentKind::Effect).to_string(), "2");
    }
}
