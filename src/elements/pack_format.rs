//! `audioPackFormat`.
//!
//! A pack's type descriptor is chosen at creation and never changes; its id
//! must carry the same type label. HOA packs carry three extra defaulted
//! properties that other packs do not have at all.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::reference::{self, ReferenceList};
use super::sealed::Sealed;
use super::{
    AudioChannelFormat, AudioObject, AudioStreamFormat, AudioTrackUid, DocumentElement,
    ElementBuilder, ElementProperty, ReferenceExt, References, UnsetProperty,
};
use crate::document::store::ElementStore;
use crate::document::{Adoption, Document};
use crate::model::{
    AbsoluteDistance, AudioPackFormatId, AudioPackFormatName, ElementId, ElementKind, Importance,
    NfcRefDist, Normalization, ScreenRef, TypeDescriptor,
};
use crate::store::{DefaultFactory, NoDefaults, Property, PropertyEntry, PropertyStore};
use crate::{Error, Result};

property_store! {
    struct PackProperties {
        mandatory {
            id: AudioPackFormatId,
            name: AudioPackFormatName,
            type_descriptor: TypeDescriptor,
        }
        optional { importance: Importance, absolute_distance: AbsoluteDistance }
        defaulted(NoDefaults) {}
    }
}

struct HoaDefaults;

impl DefaultFactory<Normalization> for HoaDefaults {
    fn create() -> Normalization {
        Normalization::from("SN3D")
    }
}

impl DefaultFactory<NfcRefDist> for HoaDefaults {
    fn create() -> NfcRefDist {
        NfcRefDist::new(0.0)
    }
}

impl DefaultFactory<ScreenRef> for HoaDefaults {
    fn create() -> ScreenRef {
        ScreenRef::new(false)
    }
}

property_store! {
    struct HoaProperties {
        mandatory {}
        optional {}
        defaulted(HoaDefaults) {
            screen_ref: ScreenRef,
            normalization: Normalization,
            nfc_ref_dist: NfcRefDist,
        }
    }
}

struct State {
    properties: PackProperties,
    /// Present iff the pack is of type HOA.
    hoa: Option<HoaProperties>,
    parent: Weak<Document>,
    channel_formats: ReferenceList<AudioChannelFormat>,
    pack_formats: ReferenceList<AudioPackFormat>,
}

/// A group of channels (or of other packs) forming one format, e.g. a 5.1
/// layout or a first order HOA set.
pub struct AudioPackFormat {
    state: RwLock<State>,
}

impl AudioPackFormat {
    pub fn create(name: AudioPackFormatName, type_descriptor: TypeDescriptor) -> Arc<Self> {
        Arc::new(Self::from_properties(PackProperties::new(
            AudioPackFormatId::new(type_descriptor, 0),
            name,
            type_descriptor,
        )))
    }

    pub fn builder(name: AudioPackFormatName, type_descriptor: TypeDescriptor) -> ElementBuilder<Self> {
        ElementBuilder::new(Self::create(name, type_descriptor))
    }

    fn from_properties(properties: PackProperties) -> Self {
        let hoa = (properties.type_descriptor == TypeDescriptor::Hoa).then(HoaProperties::new);
        Self::from_parts(properties, hoa)
    }

    fn from_parts(properties: PackProperties, hoa: Option<HoaProperties>) -> Self {
        Self {
            state: RwLock::new(State {
                properties,
                hoa,
                parent: Weak::new(),
                channel_formats: ReferenceList::default(),
                pack_formats: ReferenceList::default(),
            }),
        }
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.state.read().properties.type_descriptor
    }
}

element_properties!(AudioPackFormat {
    AudioPackFormatName, Importance, AbsoluteDistance
} unset {
    Importance, AbsoluteDistance
});
element_common!(AudioPackFormat);

// ============================================================================
// Id and type
// ============================================================================

impl ElementProperty<AudioPackFormatId> for AudioPackFormat {
    element_properties!(@reads AudioPackFormatId);

    /// The undefined id is always accepted. Any other id must be free in the
    /// document and carry this pack's type label.
    fn write_property(&self, id: AudioPackFormatId) -> Result<()> {
        let (parent, type_descriptor) = {
            let state = self.state.read();
            (state.parent.clone(), state.properties.type_descriptor)
        };
        // An undefined id keeps the element's own type label.
        let id = if id.is_undefined() {
            AudioPackFormatId::new(type_descriptor, 0)
        } else {
            reference::ensure_id_available(self, &parent, &id)?;
            reference::ensure_type(Self::KIND, type_descriptor, id.type_descriptor())?;
            id
        };
        self.state.write().properties.id = id;
        Ok(())
    }
}

impl ElementProperty<TypeDescriptor> for AudioPackFormat {
    element_properties!(@reads TypeDescriptor);

    fn write_property(&self, type_descriptor: TypeDescriptor) -> Result<()> {
        if type_descriptor == self.type_descriptor() {
            return Ok(());
        }
        Err(Error::UnsupportedOperation(format!(
            "the typeDefinition of {} is fixed at creation",
            self.id()
        )))
    }
}

// ============================================================================
// HOA properties
// ============================================================================

macro_rules! hoa_property {
    ($($property:ty),*) => {$(
        impl ElementProperty<$property> for AudioPackFormat {
            fn read_property(&self) -> Result<$property> {
                match &self.state.read().hoa {
                    Some(hoa) => hoa.get::<$property>(),
                    None => Err(Error::NotSet { property: <$property>::NAME }),
                }
            }

            fn has_property(&self) -> bool {
                self.state.read().hoa.as_ref().is_some_and(|hoa| hoa.has::<$property>())
            }

            fn property_is_default(&self) -> bool {
                self.state.read().hoa.as_ref().is_some_and(|hoa| hoa.is_default::<$property>())
            }

            /// Only HOA packs have this property.
            fn write_property(&self, value: $property) -> Result<()> {
                let mut state = self.state.write();
                let found = state.properties.type_descriptor;
                match state.hoa.as_mut() {
                    Some(hoa) => {
                        hoa.set(value);
                        Ok(())
                    }
                    None => Err(Error::TypeMismatch {
                        element: Self::KIND,
                        expected: TypeDescriptor::Hoa,
                        found,
                    }),
                }
            }
        }

        impl UnsetProperty<$property> for AudioPackFormat {
            fn unset_property(&self) {
                if let Some(hoa) = self.state.write().hoa.as_mut() {
                    hoa.unset::<$property>();
                }
            }
        }
    )*};
}

hoa_property!(Normalization, NfcRefDist, ScreenRef);

// ============================================================================
// References
// ============================================================================

impl References<AudioChannelFormat> for AudioPackFormat {
    fn add_reference(&self, channel_format: &Arc<AudioChannelFormat>) -> Result<bool> {
        reference::attach(self, channel_format)?;
        let added = self.state.write().channel_formats.insert(channel_format);
        if added {
            reference::trace_edge("added", self, channel_format.as_ref());
        }
        Ok(added)
    }

    fn remove_reference(&self, channel_format: &Arc<AudioChannelFormat>) {
        let removed = self.state.write().channel_formats.remove(channel_format);
        if removed {
            reference::trace_edge("removed", self, channel_format.as_ref());
        }
    }

    fn reference_list(&self) -> Vec<Arc<AudioChannelFormat>> {
        self.state.read().channel_formats.to_vec()
    }

    fn clear_reference_list(&self) {
        self.state.write().channel_formats.clear();
    }
}

impl References<AudioPackFormat> for AudioPackFormat {
    /// Fails with `ReferenceCycle` if `pack_format` already leads back here.
    fn add_reference(&self, pack_format: &Arc<AudioPackFormat>) -> Result<bool> {
        reference::ensure_acyclic(self, pack_format, |p| p.get_references::<AudioPackFormat>())?;
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

impl DocumentElement for AudioPackFormat {
    type Id = AudioPackFormatId;
    const KIND: ElementKind = ElementKind::AudioPackFormat;

    fn id(&self) -> AudioPackFormatId {
        self.state.read().properties.id
    }

    fn parent(&self) -> Weak<Document> {
        self.state.read().parent.clone()
    }

    fn properties(&self) -> Vec<PropertyEntry> {
        let state = self.state.read();
        let mut entries = state.properties.entries();
        if let Some(hoa) = &state.hoa {
            entries.extend(hoa.entries());
        }
        entries
    }

    fn copy(&self) -> Arc<Self> {
        let state = self.state.read();
        Arc::new(Self::from_parts(state.properties.clone(), state.hoa.clone()))
    }
}

impl Sealed for AudioPackFormat {
    fn bucket(store: &ElementStore) -> &Vec<Arc<Self>> {
        &store.pack_formats
    }

    fn bucket_mut(store: &mut ElementStore) -> &mut Vec<Arc<Self>> {
        &mut store.pack_formats
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
        for channel_format in self.get_references::<AudioChannelFormat>() {
            adoption.visit(self, channel_format)?;
        }
        for pack_format in self.get_references::<AudioPackFormat>() {
            adoption.visit(self, pack_format)?;
        }
        Ok(())
    }

    fn release(self: &Arc<Self>, document: &Document) {
        for object in document.get_elements::<AudioObject>() {
            object.remove_reference(self);
        }
        for pack_format in document.get_elements::<AudioPackFormat>() {
            pack_format.remove_reference(self);
        }
        for stream_format in document.get_elements::<AudioStreamFormat>() {
            reference::detach_single(stream_format.as_ref(), self.as_ref());
        }
        for track_uid in document.get_elements::<AudioTrackUid>() {
            reference::detach_single(track_uid.as_ref(), self.as_ref());
        }
    }

    fn disconnect_references(&self) {
        let mut state = self.state.write();
        state.channel_formats.clear();
        state.pack_formats.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::PropertyExt;
    use pretty_assertions::assert_eq;

    fn hoa(name: &str) -> Arc<AudioPackFormat> {
        AudioPackFormat::create(name.into(), TypeDescriptor::Hoa)
    }

    #[test]
    fn test_hoa_defaults() {
        let pack = hoa("HOA");
        assert!(pack.has::<Normalization>());
        assert!(pack.is_default::<Normalization>());
        assert_eq!(pack.get::<Normalization>().unwrap(), "SN3D");
        assert_eq!(pack.get::<NfcRefDist>().unwrap(), 0.0f32);
        assert_eq!(pack.get::<ScreenRef>().unwrap(), false);

        pack.set(Normalization::from("N3D")).unwrap();
        assert!(!pack.is_default::<Normalization>());
        pack.unset::<Normalization>();
        assert!(pack.is_default::<Normalization>());
    }

    #[test]
    fn test_hoa_properties_absent_elsewhere() {
        let pack = AudioPackFormat::create("Stereo".into(), TypeDescriptor::DirectSpeakers);
        assert!(!pack.has::<Normalization>());
        assert!(!pack.is_default::<Normalization>());
        assert!(matches!(pack.get::<ScreenRef>(), Err(Error::NotSet { .. })));
        assert!(matches!(
            pack.set(ScreenRef::new(true)),
            Err(Error::TypeMismatch { expected: TypeDescriptor::Hoa, found: TypeDescriptor::DirectSpeakers, .. })
        ));
    }

    #[test]
    fn test_id_type_must_match() {
        let pack = hoa("HOA");
        assert!(matches!(
            pack.set(AudioPackFormatId::new(TypeDescriptor::Objects, 0x1001)),
            Err(Error::TypeMismatch { .. })
        ));
        pack.set(AudioPackFormatId::new(TypeDescriptor::Hoa, 0x1001)).unwrap();
        assert_eq!(pack.id().to_string(), "AP_00041001");

        // undefined ids are always accepted and keep the pack's type
        pack.set(AudioPackFormatId::new(TypeDescriptor::Objects, 0)).unwrap();
        assert!(pack.id().is_undefined());
        assert_eq!(pack.id().type_descriptor(), TypeDescriptor::Hoa);
    }

    #[test]
    fn test_type_is_fixed() {
        let pack = hoa("HOA");
        pack.set(TypeDescriptor::Hoa).unwrap();
        assert!(matches!(pack.set(TypeDescriptor::Matrix), Err(Error::UnsupportedOperation(_))));
        assert_eq!(pack.type_descriptor(), TypeDescriptor::Hoa);
    }

    #[test]
    fn test_pack_cycle_rejected() {
        let (a, b) = (hoa("a"), hoa("b"));
        assert!(a.add_reference(&b).unwrap());
        assert!(matches!(b.add_reference(&a), Err(Error::ReferenceCycle { .. })));
        assert_eq!(a.get_references::<AudioPackFormat>().len(), 1);
        assert!(b.get_references::<AudioPackFormat>().is_empty());
    }

    #[test]
    fn test_hoa_display() {
        let pack = hoa("HOA");
        assert_eq!(
            pack.to_string(),
            "AP_00040000 (audioPackFormatName=HOA, typeDefinition=HOA, screenRef=false, normalization=SN3D, nfcRefDist=0)"
        );
    }

    #[test]
    fn test_copy_keeps_hoa_values() {
        let pack = hoa("HOA");
        pack.set(NfcRefDist::new(2.0)).unwrap();
        let copy = pack.copy();
        assert_eq!(copy.get::<NfcRefDist>().unwrap(), 2.0f32);
        assert!(copy.is_default::<Normalization>());
    }
}
