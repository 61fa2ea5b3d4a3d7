//! Type and format discriminators.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::Property;

/// The `typeDefinition` of packs, channels, streams and tracks. Its label is
/// embedded in the corresponding ids (`AP_0004xxxx` is an HOA pack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum TypeDescriptor {
    #[default]
    Undefined,
    DirectSpeakers,
    Matrix,
    Objects,
    Hoa,
    Binaural,
}

impl TypeDescriptor {
    /// Numeric `typeLabel`.
    pub fn label(self) -> u16 {
        match self {
            TypeDescriptor::Undefined => 0x0000,
            TypeDescriptor::DirectSpeakers => 0x0001,
            TypeDescriptor::Matrix => 0x0002,
            TypeDescriptor::Objects => 0x0003,
            TypeDescriptor::Hoa => 0x0004,
            TypeDescriptor::Binaural => 0x0005,
        }
    }

    pub fn from_label(label: u16) -> Option<Self> {
        Some(match label {
            0x0000 => TypeDescriptor::Undefined,
            0x0001 => TypeDescriptor::DirectSpeakers,
            0x0002 => TypeDescriptor::Matrix,
            0x0003 => TypeDescriptor::Objects,
            0x0004 => TypeDescriptor::Hoa,
            0x0005 => TypeDescriptor::Binaural,
            _ => return None,
        })
    }

    /// `typeLabel` as written in XML, e.g. `"0004"`.
    pub fn type_label(self) -> String {
        format!("{:04X}", self.label())
    }

    /// `typeDefinition` as written in XML, e.g. `"HOA"`.
    pub fn definition(self) -> &'static str {
        match self {
            TypeDescriptor::Undefined => "",
            TypeDescriptor::DirectSpeakers => "DirectSpeakers",
            TypeDescriptor::Matrix => "Matrix",
            TypeDescriptor::Objects => "Objects",
            TypeDescriptor::Hoa => "HOA",
            TypeDescriptor::Binaural => "Binaural",
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Undefined => write!(f, "undefined"),
            other => write!(f, "{}", other.definition()),
        }
    }
}

impl Property for TypeDescriptor {
    const NAME: &'static str = "typeDefinition";
}

/// The `formatDefinition` of streams and tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum FormatDescriptor {
    #[default]
    Undefined,
    Pcm,
}

impl FormatDescriptor {
    pub fn label(self) -> u16 {
        match self {
            FormatDescriptor::Undefined => 0x0000,
            FormatDescriptor::Pcm => 0x0001,
        }
    }

    pub fn from_label(label: u16) -> Option<Self> {
        match label {
            0x0000 => Some(FormatDescriptor::Undefined),
            0x0001 => Some(FormatDescriptor::Pcm),
            _ => None,
        }
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatDescriptor::Undefined => write!(f, "undefined"),
            FormatDescriptor::Pcm => write!(f, "PCM"),
        }
    }
}

impl Property for FormatDescriptor {
    const NAME: &'static str = "formatDefinition";
}

/// Which ADM element an id, error or log event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    AudioProgramme,
    AudioContent,
    AudioObject,
    AudioPackFormat,
    AudioChannelFormat,
    AudioBlockFormat,
    AudioStreamFormat,
    AudioTrackFormat,
    AudioTrackUid,
}

impl ElementKind {
    /// Element name as it appears in ADM XML.
    pub fn xml_name(self) -> &'static str {
        match self {
            ElementKind::AudioProgramme => "audioProgramme",
            ElementKind::AudioContent => "audioContent",
            ElementKind::AudioObject => "audioObject",
            ElementKind::AudioPackFormat => "audioPackFormat",
            ElementKind::AudioChannelFormat => "audioChannelFormat",
            ElementKind::AudioBlockFormat => "audioBlockFormat",
            ElementKind::AudioStreamFormat => "audioStreamFormat",
            ElementKind::AudioTrackFormat => "audioTrackFormat",
            ElementKind::AudioTrackUid => "audioTrackUID",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.xml_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_labels() {
        for ty in [
            TypeDescriptor::Undefined,
            TypeDescriptor::DirectSpeakers,
            TypeDescriptor::Matrix,
            TypeDescriptor::Objects,
            TypeDescriptor::Hoa,
            TypeDescriptor::Binaural,
        ] {
            assert_eq!(TypeDescriptor::from_label(ty.label()), Some(ty));
        }
        assert_eq!(TypeDescriptor::Hoa.type_label(), "0004");
        assert_eq!(TypeDescriptor::from_label(0x0042), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeDescriptor::Hoa.to_string(), "HOA");
        assert_eq!(FormatDescriptor::Pcm.to_string(), "PCM");
        assert_eq!(ElementKind::AudioTrackUid.to_string(), "audioTrackUID");
    }
}
