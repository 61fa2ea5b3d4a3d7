//! `audioProgramme`, the root of the content hierarchy.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::reference::{self, ReferenceList};
use super::sealed::Sealed;
use super::{AudioContent, DocumentElement, ElementBuilder, ReferenceExt, References};
use crate::document::store::ElementStore;
use crate::document::{Adoption, Document};
use crate::model::{
    AudioProgrammeId, AudioProgrammeLanguage, AudioProgrammeName, ElementId, ElementKind, End,
    MaxDuckingDepth, Start, Time,
};
use crate::store::{DefaultFactory, PropertyEntry, PropertyStore};
use crate::Result;

struct ProgrammeDefaults;

impl DefaultFactory<Start> for ProgrammeDefaults {
    fn create() -> Start {
        Start::new(Time::ZERO)
    }
}

property_store! {
    struct ProgrammeProperties {
        mandatory { id: AudioProgrammeId, name: AudioProgrammeName }
        optional { language: AudioProgrammeLanguage, end: End, max_ducking_depth: MaxDuckingDepth }
        defaulted(ProgrammeDefaults) { start: Start }
    }
}

struct State {
    properties: ProgrammeProperties,
    parent: Weak<Document>,
    contents: ReferenceList<AudioContent>,
}

/// A complete programme, e.g. one episode. Refers to the contents it is
/// made of.
pub struct AudioProgramme {
    state: RwLock<State>,
}

impl AudioProgramme {
    pub fn create(name: AudioProgrammeName) -> Arc<Self> {
        Arc::new(Self::from_properties(ProgrammeProperties::new(
            AudioProgrammeId::default(),
            name,
        )))
    }

    pub fn builder(name: AudioProgrammeName) -> ElementBuilder<Self> {
        ElementBuilder::new(Self::create(name))
    }

    fn from_properties(properties: ProgrammeProperties) -> Self {
        Self {
            state: RwLock::new(State {
                properties,
                parent: Weak::new(),
                contents: ReferenceList::default(),
            }),
        }
    }
}

element_id_property!(AudioProgramme, AudioProgrammeId);
element_properties!(AudioProgramme {
    AudioProgrammeName, AudioProgrammeLanguage, End, MaxDuckingDepth, Start
} unset {
    AudioProgrammeLanguage, End, MaxDuckingDepth, Start
});
element_common!(AudioProgramme);

impl References<AudioContent> for AudioProgramme {
    fn add_reference(&self, content: &Arc<AudioContent>) -> Result<bool> {
        reference::attach(self, content)?;
        let added = self.state.write().contents.insert(content);
        if added {
            reference::trace_edge("added", self, content.as_ref());
        }
        Ok(added)
    }

    fn remove_reference(&self, content: &Arc<AudioContent>) {
        let removed = self.state.write().contents.remove(content);
        if removed {
            reference::trace_edge("removed", self, content.as_ref());
        }
    }

    fn reference_list(&self) -> Vec<Arc<AudioContent>> {
        self.state.read().contents.to_vec()
    }

    fn clear_reference_list(&self) {
        self.state.write().contents.clear();
    }
}

impl DocumentElement for AudioProgramme {
    type Id = AudioProgrammeId;
    const KIND: ElementKind = ElementKind::AudioProgramme;

    fn id(&self) -> AudioProgrammeId {
        self.state.read().properties.id
    }

    fn parent(&self) -> Weak<Document> {
        self.state.read().parent.clone()
    }

    fn properties(&self) -> Vec<PropertyEntry> {
        self.state.read().properties.entries()
    }

    fn copy(&self) -> Arc<Self> {
        let properties = self.state.read().properties.clone();
        Arc::new(Self::from_properties(properties))
    }
}

impl Sealed for AudioProgramme {
    fn bucket(store: &ElementStore) -> &Vec<Arc<Self>> {
        &store.programmes
    }

    fn bucket_mut(store: &mut ElementStore) -> &mut Vec<Arc<Self>> {
        &mut store.programmes
    }

    fn set_parent(&self, parent: Weak<Document>) {
        self.state.write().parent = parent;
    }

    fn assign_id_value(&self, value: u32) {
        let mut state = self.state.write();
        if let Some(id) = state.properties.id.with_value(value) {
            state.properties.id = id;
        }
    }

    fn adopt_references(&self, adoption: &mut Adoption<'_>) -> Result<()> {
        for content in self.get_references::<AudioContent>() {
            adoption.visit(self, content)?;
        }
        Ok(())
    }

    // Nothing refers to a programme.
    fn release(self: &Arc<Self>, _document: &Document) {}

    fn disconnect_references(&self) {
        self.clear_references::<AudioContent>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::PropertyExt;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_programme_defaults() {
        let programme = AudioProgramme::create("Show".into());
        assert!(programme.has::<Start>());
        assert!(programme.is_default::<Start>());
        assert_eq!(programme.get::<Start>().unwrap(), Time::ZERO);
        assert!(!programme.has::<End>());
        assert!(programme.id().is_undefined());
    }

    #[test]
    fn test_programme_display() {
        let programme = AudioProgramme::builder("Show".into())
            .with(AudioProgrammeLanguage::from("en"))
            .build()
            .unwrap();
        assert_eq!(
            programme.to_string(),
            "APR_0000 (audioProgrammeName=Show, audioProgrammeLanguage=en, start=00:00:00.00000)"
        );
    }

    #[test]
    fn test_content_references() {
        let programme = AudioProgramme::create("Show".into());
        let content = AudioContent::create("Dub".into());
        assert!(programme.add_reference(&content).unwrap());
        assert!(!programme.add_reference(&content).unwrap());
        assert_eq!(programme.get_references::<AudioContent>().len(), 1);

        programme.remove_reference(&content);
        programme.remove_reference(&content);
        assert!(programme.get_references::<AudioContent>().is_empty());
    }
}
