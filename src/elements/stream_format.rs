//! `audioStreamFormat`.
//!
//! A stream points at one channel format or one pack format, and keeps a
//! weak list of the track formats that point at it. The list and the
//! tracks' stream format edge are kept in sync from either side.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::reference;
use super::sealed::Sealed;
use super::{
    AudioChannelFormat, AudioPackFormat, AudioTrackFormat, DocumentElement, ElementBuilder,
    ReferenceSyncOption, References, SingleReference,
};
use crate::document::store::ElementStore;
use crate::document::{Adoption, Document};
use crate::model::{
    AudioStreamFormatId, AudioStreamFormatName, ElementId, ElementKind, FormatDescriptor,
    TypeDescriptor,
};
use crate::store::{NoDefaults, PropertyEntry, PropertyStore};
use crate::Result;

property_store! {
    struct StreamProperties {
        mandatory {
            id: AudioStreamFormatId,
            name: AudioStreamFormatName,
            format: FormatDescriptor,
        }
        optional {}
        defaulted(NoDefaults) {}
    }
}

struct State {
    properties: StreamProperties,
    parent: Weak<Document>,
    channel_format: Option<Arc<AudioChannelFormat>>,
    pack_format: Option<Arc<AudioPackFormat>>,
    track_formats: Vec<Weak<AudioTrackFormat>>,
}

/// How the tracks of a stream are encoded (e.g. PCM).
pub struct AudioStreamFormat {
    this: Weak<AudioStreamFormat>,
    state: RwLock<State>,
}

impl AudioStreamFormat {
    pub fn create(name: AudioStreamFormatName, format: FormatDescriptor) -> Arc<Self> {
        let properties = StreamProperties::new(
            AudioStreamFormatId::new(TypeDescriptor::Undefined, 0),
            name,
            format,
        );
        Self::from_properties(properties)
    }

    pub fn builder(name: AudioStreamFormatName, format: FormatDescriptor) -> ElementBuilder<Self> {
        ElementBuilder::new(Self::create(name, format))
    }

    fn from_properties(properties: StreamProperties) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            state: RwLock::new(State {
                properties,
                parent: Weak::new(),
                channel_format: None,
                pack_format: None,
                track_formats: Vec::new(),
            }),
        })
    }

    // ========================================================================
    // Track formats
    // ========================================================================

    /// Add `track_format` to this stream and point its stream format edge
    /// here. Only [`ReferenceSyncOption::SyncWithTrackFormat`] is supported.
    pub fn add_track_format(
        &self,
        track_format: &Arc<AudioTrackFormat>,
        sync: ReferenceSyncOption,
    ) -> Result<bool> {
        reference::ensure_sync(sync, ReferenceSyncOption::SyncWithTrackFormat)?;
        reference::attach(self, track_format)?;
        let added = {
            let mut state = self.state.write();
            let present = state
                .track_formats
                .iter()
                .any(|t| std::ptr::eq(t.as_ptr(), Arc::as_ptr(track_format)));
            if !present {
                state.track_formats.push(Arc::downgrade(track_format));
            }
            !present
        };
        if added {
            reference::trace_edge("added", self, track_format.as_ref());
            if let Some(this) = self.this.upgrade() {
                track_format.set_stream_format(&this, ReferenceSyncOption::SyncWithStreamFormat)?;
            }
        }
        Ok(added)
    }

    /// Remove `track_format` from this stream and clear its stream format
    /// edge. Only [`ReferenceSyncOption::SyncWithTrackFormat`] is supported.
    pub fn remove_track_format(
        &self,
        track_format: &Arc<AudioTrackFormat>,
        sync: ReferenceSyncOption,
    ) -> Result<()> {
        reference::ensure_sync(sync, ReferenceSyncOption::SyncWithTrackFormat)?;
        self.drop_track_format(track_format);
        Ok(())
    }

    pub fn track_formats(&self) -> Vec<Arc<AudioTrackFormat>> {
        self.state.read().track_formats.iter().filter_map(Weak::upgrade).collect()
    }

    /// Empty the list; every listed track loses its stream format edge.
    pub fn clear_track_formats(&self) {
        let track_formats = std::mem::take(&mut self.state.write().track_formats);
        for track_format in track_formats.iter().filter_map(Weak::upgrade) {
            reference::detach_single(track_format.as_ref(), self);
        }
    }

    pub(crate) fn drop_track_format(&self, track_format: &AudioTrackFormat) {
        let removed = {
            let mut state = self.state.write();
            let before = state.track_formats.len();
            state.track_formats.retain(|t| !std::ptr::eq(t.as_ptr(), track_format));
            state.track_formats.len() != before
        };
        if removed {
            reference::trace_edge("removed", self, track_format);
            reference::detach_single(track_format, self);
        }
    }
}

element_id_property!(AudioStreamFormat, AudioStreamFormatId);
element_properties!(AudioStreamFormat { AudioStreamFormatName, FormatDescriptor } unset {});
element_common!(AudioStreamFormat);

// ============================================================================
// References
// ============================================================================

impl SingleReference<AudioChannelFormat> for AudioStreamFormat {
    fn set_reference(&self, channel_format: &Arc<AudioChannelFormat>) -> Result<()> {
        reference::attach(self, channel_format)?;
        self.state.write().channel_format = Some(channel_format.clone());
        reference::trace_edge("set", self, channel_format.as_ref());
        Ok(())
    }

    fn reference(&self) -> Option<Arc<AudioChannelFormat>> {
        self.state.read().channel_format.clone()
    }

    fn unset_reference(&self) {
        self.state.write().channel_format = None;
    }
}

impl SingleReference<AudioPackFormat> for AudioStreamFormat {
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

impl References<AudioTrackFormat> for AudioStreamFormat {
    fn add_reference(&self, track_format: &Arc<AudioTrackFormat>) -> Result<bool> {
        self.add_track_format(track_format, ReferenceSyncOption::SyncWithTrackFormat)
    }

    fn remove_reference(&self, track_format: &Arc<AudioTrackFormat>) {
        self.drop_track_format(track_format);
    }

    fn reference_list(&self) -> Vec<Arc<AudioTrackFormat>> {
        self.track_formats()
    }

    fn clear_reference_list(&self) {
        self.clear_track_formats();
    }
}

impl DocumentElement for AudioStreamFormat {
    type Id = AudioStreamFormatId;
    const KIND: ElementKind = ElementKind::AudioStreamFormat;

    fn id(&self) -> AudioStreamFormatId {
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
        Self::from_properties(properties)
    }
}

impl Sealed for AudioStreamFormat {
    fn bucket(store: &ElementStore) -> &Vec<Arc<Self>> {
        &store.stream_formats
    }

    fn bucket_mut(store: &mut ElementStore) -> &mut Vec<Arc<Self>> {
        &mut store.stream_formats
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
        let (channel_format, pack_format) = {
            let state = self.state.read();
            (state.channel_format.clone(), state.pack_format.clone())
        };
        if let Some(channel_format) = channel_format {
            adoption.visit(self, channel_format)?;
        }
        if let Some(pack_format) = pack_format {
            adoption.visit(self, pack_format)?;
        }
        for track_format in self.track_formats() {
            adoption.visit(self, track_format)?;
        }
        Ok(())
    }

    fn release(self: &Arc<Self>, document: &Document) {
        for track_format in document.get_elements::<AudioTrackFormat>() {
            reference::detach_single(track_format.as_ref(), self.as_ref());
        }
    }

    fn disconnect_references(&self) {
        {
            let mut state = self.state.write();
            state.channel_format = None;
            state.pack_format = None;
        }
        self.clear_track_formats();
    }
}
