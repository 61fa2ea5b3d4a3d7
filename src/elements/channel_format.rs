//! `audioChannelFormat` and the block formats it owns.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::reference;
use super::sealed::Sealed;
use super::{
    AudioBlockFormat, AudioPackFormat, AudioStreamFormat, DocumentElement, ElementBuilder,
    ElementProperty, References,
};
use crate::document::store::ElementStore;
use crate::document::{Adoption, Document};
use crate::model::{
    AudioBlockFormatId, AudioChannelFormatId, AudioChannelFormatName, ElementId, ElementKind,
    TypeDescriptor,
};
use crate::store::{NoDefaults, PropertyEntry, PropertyStore};
use crate::{Error, Result};

property_store! {
    struct ChannelProperties {
        mandatory {
            id: AudioChannelFormatId,
            name: AudioChannelFormatName,
            type_descriptor: TypeDescriptor,
        }
        optional {}
        defaulted(NoDefaults) {}
    }
}

struct State {
    properties: ChannelProperties,
    parent: Weak<Document>,
    block_formats: Vec<AudioBlockFormat>,
}

impl State {
    fn block_id(&self, counter: u32) -> AudioBlockFormatId {
        AudioBlockFormatId::for_channel(self.properties.id, counter)
    }

    /// Give every block the current channel id, keeping its counter.
    fn rederive_block_ids(&mut self) {
        let ids: Vec<_> = self
            .block_formats
            .iter()
            .map(|block| self.block_id(block.id().counter()))
            .collect();
        for (block, id) in self.block_formats.iter_mut().zip(ids) {
            block.set(id);
        }
    }
}

/// A single channel of a pack, described over time by its block formats.
pub struct AudioChannelFormat {
    state: RwLock<State>,
}

impl AudioChannelFormat {
    pub fn create(name: AudioChannelFormatName, type_descriptor: TypeDescriptor) -> Arc<Self> {
        Arc::new(Self::from_parts(
            ChannelProperties::new(AudioChannelFormatId::new(type_descriptor, 0), name, type_descriptor),
            Vec::new(),
        ))
    }

    pub fn builder(name: AudioChannelFormatName, type_descriptor: TypeDescriptor) -> ElementBuilder<Self> {
        ElementBuilder::new(Self::create(name, type_descriptor))
    }

    fn from_parts(properties: ChannelProperties, block_formats: Vec<AudioBlockFormat>) -> Self {
        Self {
            state: RwLock::new(State {
                properties,
                parent: Weak::new(),
                block_formats,
            }),
        }
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.state.read().properties.type_descriptor
    }

    // ========================================================================
    // Block formats
    // ========================================================================

    /// Append a block. Its id becomes the channel's type and value with the
    /// next counter (one past the last block, starting at 1).
    pub fn add_block_format(&self, mut block_format: AudioBlockFormat) -> AudioBlockFormatId {
        let mut state = self.state.write();
        let counter = state.block_formats.last().map_or(1, |last| last.id().counter() + 1);
        let id = state.block_id(counter);
        block_format.set(id);
        state.block_formats.push(block_format);
        id
    }

    pub fn block_formats(&self) -> Vec<AudioBlockFormat> {
        self.state.read().block_formats.clone()
    }

    pub fn clear_block_formats(&self) {
        self.state.write().block_formats.clear();
    }
}

element_properties!(AudioChannelFormat { AudioChannelFormatName } unset {});
element_common!(AudioChannelFormat);

impl ElementProperty<AudioChannelFormatId> for AudioChannelFormat {
    element_properties!(@reads AudioChannelFormatId);

    /// Same rules as pack ids. A new id is passed on to every block format.
    fn write_property(&self, id: AudioChannelFormatId) -> Result<()> {
        let (parent, type_descriptor) = {
            let state = self.state.read();
            (state.parent.clone(), state.properties.type_descriptor)
        };
        // An undefined id keeps the element's own type label.
        let id = if id.is_undefined() {
            AudioChannelFormatId::new(type_descriptor, 0)
        } else {
            reference::ensure_id_available(self, &parent, &id)?;
            reference::ensure_type(Self::KIND, type_descriptor, id.type_descriptor())?;
            id
        };
        let mut state = self.state.write();
        state.properties.id = id;
        state.rederive_block_ids();
        Ok(())
    }
}

impl ElementProperty<TypeDescriptor> for AudioChannelFormat {
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

impl DocumentElement for AudioChannelFormat {
    type Id = AudioChannelFormatId;
    const KIND: ElementKind = ElementKind::AudioChannelFormat;

    fn id(&self) -> AudioChannelFormatId {
        self.state.read().properties.id
    }

    fn parent(&self) -> Weak<Document> {
        self.state.read().parent.clone()
    }

    fn properties(&self) -> Vec<PropertyEntry> {
        self.state.read().properties.entries()
    }

    /// Block formats are part of the channel and are copied with it.
    fn copy(&self) -> Arc<Self> {
        let state = self.state.read();
        Arc::new(Self::from_parts(state.properties.clone(), state.block_formats.clone()))
    }
}

impl Sealed for AudioChannelFormat {
    fn bucket(store: &ElementStore) -> &Vec<Arc<Self>> {
        &store.channel_formats
    }

    fn bucket_mut(store: &mut ElementStore) -> &mut Vec<Arc<Self>> {
        &mut store.channel_formats
    }

    fn set_parent(&self, parent: Weak<Document>) {
        self.state.write().parent = parent;
    }

    fn assign_id_value(&self, value: u32) {
        let mut state = self.state.write();
        if let Some(id) = state.properties.id.with_value(value) {
            state.properties.id = id;
        }
        state.rederive_block_ids();
    }

    // Channels refer to nothing.
    fn adopt_references(&self, _adoption: &mut Adoption<'_>) -> Result<()> {
        Ok(())
    }

    fn release(self: &Arc<Self>, document: &Document) {
        for pack_format in document.get_elements::<AudioPackFormat>() {
            pack_format.remove_reference(self);
        }
        for stream_format in document.get_elements::<AudioStreamFormat>() {
            reference::detach_single(stream_format.as_ref(), self.as_ref());
        }
    }

    fn disconnect_references(&self) {}
}
