//! `audioContent` and its dialogue classification.
//!
//! The dialogue id and the three content kinds are stored separately but
//! behave as one value: setting any of them rewrites all four, unsetting any
//! of them clears all four.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::reference::{self, ReferenceList};
use super::sealed::Sealed;
use super::{
    AudioObject, AudioProgramme, DocumentElement, ElementBuilder, ElementProperty, ReferenceExt,
    References, UnsetProperty,
};
use crate::document::store::ElementStore;
use crate::document::{Adoption, Document};
use crate::model::{
    AudioContentId, AudioContentLanguage, AudioContentName, ContentKind, DialogueContentKind,
    DialogueId, ElementId, ElementKind, MixedContentKind, NonDialogueContentKind,
};
use crate::store::{NoDefaults, Property, PropertyEntry, PropertyStore};
use crate::{Error, Result};

property_store! {
    struct ContentProperties {
        mandatory { id: AudioContentId, name: AudioContentName }
        optional {
            language: AudioContentLanguage,
            dialogue: DialogueId,
            non_dialogue_kind: NonDialogueContentKind,
            dialogue_kind: DialogueContentKind,
            mixed_kind: MixedContentKind,
        }
        defaulted(NoDefaults) {}
    }
}

impl ContentProperties {
    fn clear_dialogue(&mut self) {
        self.dialogue = None;
        self.non_dialogue_kind = None;
        self.dialogue_kind = None;
        self.mixed_kind = None;
    }

    fn set_content_kind(&mut self, kind: ContentKind) {
        self.clear_dialogue();
        self.dialogue = Some(kind.dialogue_id());
        match kind {
            ContentKind::NonDialogue(kind) => self.non_dialogue_kind = Some(kind),
            ContentKind::Dialogue(kind) => self.dialogue_kind = Some(kind),
            ContentKind::Mixed(kind) => self.mixed_kind = Some(kind),
        }
    }

    fn content_kind(&self) -> Option<ContentKind> {
        self.non_dialogue_kind
            .map(ContentKind::from)
            .or_else(|| self.dialogue_kind.map(ContentKind::from))
            .or_else(|| self.mixed_kind.map(ContentKind::from))
    }
}

struct State {
    properties: ContentProperties,
    parent: Weak<Document>,
    objects: ReferenceList<AudioObject>,
}

/// One coherent piece of a programme, e.g. the dialogue or the music bed.
pub struct AudioContent {
    state: RwLock<State>,
}

impl AudioContent {
    pub fn create(name: AudioContentName) -> Arc<Self> {
        Arc::new(Self::from_properties(ContentProperties::new(
            AudioContentId::default(),
            name,
        )))
    }

    pub fn builder(name: AudioContentName) -> ElementBuilder<Self> {
        ElementBuilder::new(Self::create(name))
    }

    fn from_properties(properties: ContentProperties) -> Self {
        Self {
            state: RwLock::new(State {
                properties,
                parent: Weak::new(),
                objects: ReferenceList::default(),
            }),
        }
    }
}

element_id_property!(AudioContent, AudioContentId);
element_properties!(AudioContent {
    AudioContentName, AudioContentLanguage
} unset {
    AudioContentLanguage
});
element_common!(AudioContent);

// ============================================================================
// Dialogue classification
// ============================================================================

impl ElementProperty<DialogueId> for AudioContent {
    element_properties!(@reads DialogueId);

    /// Keeps the current kind if the dialogue id does not change, otherwise
    /// resets the kind to the undefined kind of the new dialogue id.
    fn write_property(&self, dialogue: DialogueId) -> Result<()> {
        let mut state = self.state.write();
        if state.properties.dialogue != Some(dialogue) {
            state.properties.set_content_kind(ContentKind::undefined_for(dialogue));
        }
        Ok(())
    }
}

macro_rules! content_kind_property {
    ($($kind:ty),*) => {$(
        impl ElementProperty<$kind> for AudioContent {
            element_properties!(@reads $kind);

            fn write_property(&self, kind: $kind) -> Result<()> {
                self.state.write().properties.set_content_kind(kind.into());
                Ok(())
            }
        }
    )*};
}

content_kind_property!(NonDialogueContentKind, DialogueContentKind, MixedContentKind);

impl ElementProperty<ContentKind> for AudioContent {
    fn read_property(&self) -> Result<ContentKind> {
        self.state
            .read()
            .properties
            .content_kind()
            .ok_or(Error::NotSet { property: ContentKind::NAME })
    }

    fn has_property(&self) -> bool {
        self.state.read().properties.content_kind().is_some()
    }

    fn property_is_default(&self) -> bool {
        false
    }

    fn write_property(&self, kind: ContentKind) -> Result<()> {
        self.state.write().properties.set_content_kind(kind);
        Ok(())
    }
}

macro_rules! clears_dialogue {
    ($($property:ty),*) => {$(
        impl UnsetProperty<$property> for AudioContent {
            fn unset_property(&self) {
                self.state.write().properties.clear_dialogue();
            }
        }
    )*};
}

clears_dialogue!(DialogueId, NonDialogueContentKind, DialogueContentKind, MixedContentKind, ContentKind);

// ============================================================================
// References
// ============================================================================

impl References<AudioObject> for AudioContent {
    fn add_reference(&self, object: &Arc<AudioObject>) -> Result<bool> {
        reference::attach(self, object)?;
        let added = self.state.write().objects.insert(object);
        if added {
            reference::trace_edge("added", self, object.as_ref());
        }
        Ok(added)
    }

    fn remove_reference(&self, object: &Arc<AudioObject>) {
        let removed = self.state.write().objects.remove(object);
        if removed {
            reference::trace_edge("removed", self, object.as_ref());
        }
    }

    fn reference_list(&self) -> Vec<Arc<AudioObject>> {
        self.state.read().objects.to_vec()
    }

    fn clear_reference_list(&self) {
        self.state.write().objects.clear();
    }
}

impl DocumentElement for AudioContent {
    type Id = AudioContentId;
    const KIND: ElementKind = ElementKind::AudioContent;

    fn id(&self) -> AudioContentId {
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

impl Sealed for AudioContent {
    fn bucket(store: &ElementStore) -> &Vec<Arc<Self>> {
        &store.contents
    }

    fn bucket_mut(store: &mut ElementStore) -> &mut Vec<Arc<Self>> {
        &mut store.contents
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
        for object in self.get_references::<AudioObject>() {
            adoption.visit(self, object)?;
        }
        Ok(())
    }

    fn release(self: &Arc<Self>, document: &Document) {
        for programme in document.get_elements::<AudioProgramme>() {
            programme.remove_reference(self);
        }
    }

    fn disconnect_references(&self) {
        self.clear_references::<AudioObject>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::PropertyExt;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dialogue_sets_undefined_kind() {
        let content = AudioContent::create("Dub".into());
        assert!(!content.has::<ContentKind>());

        content.set(DialogueId::Dialogue).unwrap();
        assert_eq!(content.get::<DialogueContentKind>().unwrap(), DialogueContentKind::Undefined);
        assert_eq!(
            content.get::<ContentKind>().unwrap(),
            ContentKind::Dialogue(DialogueContentKind::Undefined)
        );
        assert!(!content.has::<MixedContentKind>());
    }

    #[test]
    fn test_same_dialogue_keeps_kind() {
        let content = AudioContent::create("Dub".into());
        content.set(DialogueContentKind::Voiceover).unwrap();
        content.set(DialogueId::Dialogue).unwrap();
        assert_eq!(content.get::<DialogueContentKind>().unwrap(), DialogueContentKind::Voiceover);
    }

    #[test]
    fn test_kind_sets_dialogue() {
        let content = AudioContent::create("Dub".into());
        content.set(DialogueContentKind::Commentary).unwrap();
        content.set(MixedContentKind::HearingImpaired).unwrap();

        assert_eq!(content.get::<DialogueId>().unwrap(), DialogueId::Mixed);
        assert!(!content.has::<DialogueContentKind>());
        assert_eq!(
            content.get::<ContentKind>().unwrap(),
            ContentKind::Mixed(MixedContentKind::HearingImpaired)
        );
    }

    #[test]
    fn test_unset_clears_all() {
        let content = AudioContent::create("Dub".into());
        content.set(ContentKind::NonDialogue(NonDialogueContentKind::Music)).unwrap();
        assert_eq!(content.get::<DialogueId>().unwrap(), DialogueId::NonDialogue);

        content.unset::<NonDialogueContentKind>();
        assert!(!content.has::<DialogueId>());
        assert!(!content.has::<ContentKind>());
        assert!(matches!(content.get::<ContentKind>(), Err(Error::NotSet { property: "contentKind" })));
    }

    #[test]
    fn test_content_display() {
        let content = AudioContent::create("Dub".into());
        content.set(DialogueContentKind::Voiceover).unwrap();
        assert_eq!(
            content.to_string(),
            "ACO_0000 (audioContentName=Dub, dialogue=1, dialogueContentKind=2)"
        );
    }
}
