//! `audioTrackUID`, one actual track of the file.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::reference;
use super::sealed::Sealed;
use super::{
    AudioObject, AudioPackFormat, AudioTrackFormat, DocumentElement, ElementBuilder, References,
    SingleReference,
};
use crate::document::store::ElementStore;
use crate::document::{Adoption, Document};
use crate::model::{AudioTrackUidId, BitDepth, ElementId, ElementKind, SampleRate};
use crate::store::{NoDefaults, PropertyEntry, PropertyStore};
use crate::Result;

property_store! {
    struct TrackUidProperties {
        mandatory { id: AudioTrackUidId }
        optional { sample_rate: SampleRate, bit_depth: BitDepth }
        defaulted(NoDefaults) {}
    }
}

struct State {
    properties: TrackUidProperties,
    parent: Weak<Document>,
    track_format: Option<Arc<AudioTrackFormat>>,
    pack_format: Option<Arc<AudioPackFormat>>,
}

/// One track of the audio file, linked to the track and pack format it carries.
pub struct AudioTrackUid {
    state: RwLock<State>,
}

impl AudioTrackUid {
    pub fn create() -> Arc<Self> {
        Arc::new(Self::from_properties(TrackUidProperties::new(AudioTrackUidId::default())))
    }

    pub fn builder() -> ElementBuilder<Self> {
        ElementBuilder::new(Self::create())
    }

    fn from_properties(properties: TrackUidProperties) -> Self {
        Self {
            state: RwLock::new(State {
                properties,
                parent: Weak::new(),
                track_format: None,
                pack_format: None,
            }),
        }
    }
}

element_id_property!(AudioTrackUid, AudioTrackUidId);
element_properties!(AudioTrackUid { SampleRate, BitDepth } unset { SampleRate, BitDepth });
element_common!(AudioTrackUid);

impl SingleReference<AudioTrackFormat> for AudioTrackUid {
    fn set_reference(&self, track_format: &Arc<AudioTrackFormat>) -> Result<()> {
        reference::attach(self, track_format)?;
        self.state.write().track_format = Some(track_format.clone());
        reference::trace_edge("set", self, track_format.as_ref());
        Ok(())
    }

    fn reference(&self) -> Option<Arc<AudioTrackFormat>> {
        self.state.read().track_format.clone()
    }

    fn unset_reference(&self) {
        self.state.write().track_format = None;
    }
}

impl SingleReference<AudioPackFormat> for AudioTrackUid {
    fn set_reference(&self, pack_format: &Arc<AudioPackFormat>) -> Result<()> {
        reference::attach(self, pack_format)?;
        self.state.write().pack_format = Some(pack_format.clone());
        reference::trace_edge("set", self, pack_format.as_ref());
        Ok(())
    }

    fn reference(&self) -> Option<Arc<AudioPackFormat>> {
        self.state.read().pack_format.clone()
    }

    fn unset_reference(&self) {
        self.state.write().pack_format = None;
    }
}

impl DocumentElement for AudioTrackUid {
    type Id = AudioTrackUidId;
    const KIND: ElementKind = ElementKind::AudioTrackUid;

    fn id(&self) -> AudioTrackUidId {
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

impl Sealed for AudioTrackUid {
    fn bucket(store: &ElementStore) -> &Vec<Arc<Self>> {
        &store.track_uids
    }

    fn bucket_mut(store: &mut ElementStore) -> &mut Vec<Arc<Self>> {
        &mut store.track_uids
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
        let (track_format, pack_format) = {
            let state = self.state.read();
            (state.track_format.clone(), state.pack_format.clone())
        };
        if let Some(track_format) = track_format {
            adoption.visit(self, track_format)?;
        }
        if let Some(pack_format) = pack_format {
            adoption.visit(self, pack_format)?;
        }
        Ok(())
    }

    fn release(self: &Arc<Self>, document: &Document) {
        for object in document.get_elements::<AudioObject>() {
            object.remove_reference(self);
        }
    }

    fn disconnect_references(&self) {
        let mut state = self.state.write();
        state.track_format = None;
        state.pack_format = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{PropertyExt, ReferenceExt};
    use crate::model::{FormatDescriptor, TypeDescriptor};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_track_uid_properties() {
        let uid = AudioTrackUid::builder()
            .with(SampleRate::new(48000))
            .with(AudioTrackUidId::new(1))
            .build()
            .unwrap();
        assert_eq!(uid.get::<SampleRate>().unwrap(), 48000u32);
        assert!(!uid.has::<BitDepth>());
        assert_eq!(uid.to_string(), "ATU_00000001 (sampleRate=48000)");

        uid.unset::<SampleRate>();
        assert!(!uid.has::<SampleRate>());
    }

    #[test]
    fn test_track_uid_slots() {
        let uid = AudioTrackUid::create();
        let track = AudioTrackFormat::create("PCM".into(), FormatDescriptor::Pcm);
        let pack = AudioPackFormat::create("Mono".into(), TypeDescriptor::DirectSpeakers);
        uid.set_reference(&track).unwrap();
        uid.set_reference(&pack).unwrap();
        assert!(uid.get_reference::<AudioTrackFormat>().is_some());
        assert!(Arc::ptr_eq(&uid.get_reference::<AudioPackFormat>().unwrap(), &pack));

        let copy = uid.copy();
        assert!(copy.get_reference::<AudioTrackFormat>().is_none());
    }
}
