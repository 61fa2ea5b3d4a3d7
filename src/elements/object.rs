//! `audioObject`.
//!
//! Objects form two acyclic graphs over each other: the normal object
//! references and the complementary objects. An object is in at most one of
//! the two lists of another object; adding it to one removes it from the
//! other.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::reference::{self, ReferenceList};
use super::sealed::Sealed;
use super::{
    AudioContent, AudioPackFormat, AudioTrackUid, DocumentElement, ElementBuilder, ReferenceExt,
    References,
};
use crate::document::store::ElementStore;
use crate::document::{Adoption, Document};
use crate::model::{
    AudioObjectId, AudioObjectName, DialogueId, DisableDucking, Duration, ElementId, ElementKind,
    Importance, Interact, Start, Time,
};
use crate::store::{DefaultFactory, PropertyEntry, PropertyStore};
use crate::Result;

struct ObjectDefaults;

impl DefaultFactory<Start> for ObjectDefaults {
    fn create() -> Start {
        Start::new(Time::ZERO)
    }
}

property_store! {
    struct ObjectProperties {
        mandatory { id: AudioObjectId, name: AudioObjectName }
        optional {
            duration: Duration,
            dialogue: DialogueId,
            importance: Importance,
            interact: Interact,
            disable_ducking: DisableDucking,
        }
        defaulted(ObjectDefaults) { start: Start }
    }
}

struct State {
    properties: ObjectProperties,
    parent: Weak<Document>,
    objects: ReferenceList<AudioObject>,
    complementary: ReferenceList<AudioObject>,
    pack_formats: ReferenceList<AudioPackFormat>,
    track_uids: ReferenceList<AudioTrackUid>,
}

/// An audio object: a set of tracks with their pack format, possibly
/// grouping further objects.
pub struct AudioObject {
    state: RwLock<State>,
}

impl AudioObject {
    pub fn create(name: AudioObjectName) -> Arc<Self> {
        Arc::new(Self::from_properties(ObjectProperties::new(
            AudioObjectId::default(),
            name,
        )))
    }

    pub fn builder(name: AudioObjectName) -> ElementBuilder<Self> {
        ElementBuilder::new(Self::create(name))
    }

    fn from_properties(properties: ObjectProperties) -> Self {
        Self {
            state: RwLock::new(State {
                properties,
                parent: Weak::new(),
                objects: ReferenceList::default(),
                complementary: ReferenceList::default(),
                pack_formats: ReferenceList::default(),
                track_uids: ReferenceList::default(),
            }),
        }
    }

    // ========================================================================
    // Complementary objects
    // ========================================================================

    /// Mark `object` as complementary to this one, removing it from the normal
    /// object references. Fails with `ReferenceCycle` if `object` already
    /// leads back here through complementary edges.
    pub fn add_complementary(&self, object: &Arc<AudioObject>) -> Result<bool> {
        reference::ensure_acyclic(self, object, |o| o.complementary_objects())?;
        reference::attach(self, object)?;
        let added = {
            let mut state = self.state.write();
            let added = state.complementary.insert(object);
            if added {
                state.objects.remove(object);
            }
            added
        };
        if added {
            reference::trace_edge("added complementary", self, object.as_ref());
        }
        Ok(added)
    }

    pub fn remove_complementary(&self, object: &Arc<AudioObject>) {
        let removed = self.state.write().complementary.remove(object);
        if removed {
            reference::trace_edge("removed complementary", self, object.as_ref());
        }
    }

    pub fn complementary_objects(&self) -> Vec<Arc<AudioObject>> {
        self.state.read().complementary.to_vec()
    }

    pub fn clear_complementary_objects(&self) {
        self.state.write().complementary.clear();
    }
}

element_id_property!(AudioObject, AudioObjectId);
element_properties!(AudioObject {
    AudioObjectName, Duration, DialogueId, Importance, Interact, DisableDucking, Start
} unset {
    Duration, DialogueId, Importance, Interact, DisableDucking, Start
});
element_common!(AudioObject);

// ============================================================================
// References
// ============================================================================

impl References<AudioObject> for AudioObject {
    /// Fails with `ReferenceCycle` if `object` already leads back here,
    /// including `object` being this very object.
    fn add_reference(&self, object: &Arc<AudioObject>) -> Result<bool> {
        reference::ensure_acyclic(self, object, |o| o.get_references::<AudioObject>())?;
        reference::attach(self, object)?;
        let added = {
            let mut state = self.state.write();
            let added = state.objects.insert(object);
            if added {
                state.complementary.remove(object);
            }
            added
        };
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

impl References<AudioPackFormat> for AudioObject {
    fn add_reference(&self, pack_format: &Arc<AudioPackFormat>) -> Result<bool> {
        reference::attach(self, pack_format)?;
        let added = self.state.write().pack_formats.insert(pack_format);
        if added {
            reference::trace_edge("added", self, pack_format.as_ref());
        }
        Ok(added)
    }

    fn remove_reference(&self, pack_format: &Arc<AudioPackFormat>) {
        let removed = self.state.write().pack_formats.remove(pack_format);
        if removed {
            reference::trace_edge("removed", self, pack_format.as_ref());
        }
    }

    fn reference_list(&self) -> Vec<Arc<AudioPackFormat>> {
        self.state.read().pack_formats.to_vec()
    }

    fn clear_reference_list(&self) {
        self.state.write().pack_formats.clear();
    }
}

impl References<AudioTrackUid> for AudioObject {
    fn add_reference(&self, track_uid: &Arc<AudioTrackUid>) -> Result<bool> {
        reference::attach(self, track_uid)?;
        let added = self.state.write().track_uids.insert(track_uid);
        if added {
            reference::trace_edge("added", self, track_uid.as_ref());
        }
        Ok(added)
    }

    fn remove_reference(&self, track_uid: &Arc<AudioTrackUid>) {
        let removed = self.state.write().track_uids.remove(track_uid);
        if removed {
            reference::trace_edge("removed", self, track_uid.as_ref());
        }
    }

    fn reference_list(&self) -> Vec<Arc<AudioTrackUid>> {
        self.state.read().track_uids.to_vec()
    }

    fn clear_reference_list(&self) {
        self.state.write().track_uids.clear();
    }
}

impl DocumentElement for AudioObject {
    type Id = AudioObjectId;
    const KIND: ElementKind = ElementKind::AudioObject;

    fn id(&self) -> AudioObjectId {
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

impl Sealed for AudioObject {
    fn bucket(store: &ElementStore) -> &Vec<Arc<Self>> {
        &store.objects
    }

    fn bucket_mut(store: &mut ElementStore) -> &mut Vec<Arc<Self>> {
        &mut store.objects
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
        let objects = self.get_references::<AudioObject>();
        for object in objects.into_iter().chain(self.complementary_objects()) {
            adoption.visit(self, object)?;
        }
        for pack_format in self.get_references::<AudioPackFormat>() {
            adoption.visit(self, pack_format)?;
        }
        for track_uid in self.get_references::<AudioTrackUid>() {
            adoption.visit(self, track_uid)?;
        }
        Ok(())
    }

    fn release(self: &Arc<Self>, document: &Document) {
        for content in document.get_elements::<AudioContent>() {
            content.remove_reference(self);
        }
        for object in document.get_elements::<AudioObject>() {
            object.remove_reference(self);
            object.remove_complementary(self);
        }
    }

    fn disconnect_references(&self) {
        let mut state = self.state.write();
        state.objects.clear();
        state.complementary.clear();
        state.pack_formats.clear();
        state.track_uids.clear();
    }
}
