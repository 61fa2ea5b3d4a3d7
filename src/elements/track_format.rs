//! `audioTrackFormat`.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::reference;
use super::sealed::Sealed;
use super::{
    AudioStreamFormat, AudioTrackUid, DocumentElement, ElementBuilder, ReferenceSyncOption,
    SingleReference,
};
use crate::document::store::ElementStore;
use crate::document::{Adoption, Document};
use crate::model::{
    AudioTrackFormatId, AudioTrackFormatName, ElementId, ElementKind, FormatDescriptor,
    TypeDescriptor,
};
use crate::store::{NoDefaults, PropertyEntry, PropertyStore};
use crate::Result;

property_store! {
    struct TrackProperties {
        mandatory {
            id: AudioTrackFormatId,
            name: AudioTrackFormatName,
            format: FormatDescriptor,
        }
        optional {}
        defaulted(NoDefaults) {}
    }
}

struct State {
    properties: TrackProperties,
    parent: Weak<Document>,
    stream_format: Option<Arc<AudioStreamFormat>>,
}

/// The format of one track, tied to the stream format it belongs to.
pub struct AudioTrackFormat {
    this: Weak<AudioTrackFormat>,
    state: RwLock<State>,
}

impl AudioTrackFormat {
    pub fn create(name: AudioTrackFormatName, format: FormatDescriptor) -> Arc<Self> {
        let properties = TrackProperties::new(
            AudioTrackFormatId::new(TypeDescriptor::Undefined, 0, 0),
            name,
            format,
        );
        Self::from_properties(properties)
    }

    pub fn builder(name: AudioTrackFormatName, format: FormatDescriptor) -> ElementBuilder<Self> {
        ElementBuilder::new(Self::create(name, format))
    }

    fn from_properties(properties: TrackProperties) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            state: RwLock::new(State {
                properties,
                parent: Weak::new(),
                stream_format: None,
            }),
        })
    }

    /// Point this track at `stream_format` and add it to that stream's track
    /// list, leaving the previous stream first. Only
    /// [`ReferenceSyncOption::SyncWithStreamFormat`] is supported.
    pub fn set_stream_format(
        &self,
        stream_format: &Arc<AudioStreamFormat>,
        sync: ReferenceSyncOption,
    ) -> Result<()> {
        reference::ensure_sync(sync, ReferenceSyncOption::SyncWithStreamFormat)?;
        if self.stream_format().is_some_and(|current| Arc::ptr_eq(&current, stream_format)) {
            return Ok(());
        }
        reference::attach(self, stream_format)?;

        self.release_stream_format();
        self.state.write().stream_format = Some(stream_format.clone());
        reference::trace_edge("set", self, stream_format.as_ref());
        if let Some(this) = self.this.upgrade() {
            stream_format.add_track_format(&this, ReferenceSyncOption::SyncWithTrackFormat)?;
        }
        Ok(())
    }

    /// Clear the stream format edge and leave that stream's track list.
    pub fn unset_stream_format(&self, sync: ReferenceSyncOption) -> Result<()> {
        reference::ensure_sync(sync, ReferenceSyncOption::SyncWithStreamFormat)?;
        self.release_stream_format();
        Ok(())
    }

    pub fn stream_format(&self) -> Option<Arc<AudioStreamFormat>> {
        self.state.read().stream_format.clone()
    }

    // The slot is emptied before the stream is told, so its call back finds
    // nothing left to remove.
    fn release_stream_format(&self) {
        let previous = self.state.write().stream_format.take();
        if let Some(previous) = previous {
            previous.drop_track_format(self);
        }
    }
}

element_id_property!(AudioTrackFormat, AudioTrackFormatId);
element_properties!(AudioTrackFormat { AudioTrackFormatName, FormatDescriptor } unset {});
element_common!(AudioTrackFormat);

impl SingleReference<AudioStreamFormat> for AudioTrackFormat {
    fn set_reference(&self, stream_format: &Arc<AudioStreamFormat>) -> Result<()> {
        self.set_stream_format(stream_format, ReferenceSyncOption::SyncWithStreamFormat)
    }

    fn reference(&self) -> Option<Arc<AudioStreamFormat>> {
        self.stream_format()
    }

    fn unset_reference(&self) {
        self.release_stream_format();
    }
}

impl DocumentElement for AudioTrackFormat {
    type Id = AudioTrackFormatId;
    const KIND: ElementKind = ElementKind::AudioTrackFormat;

    fn id(&self) -> AudioTrackFormatId {
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

impl Sealed for AudioTrackFormat {
    fn bucket(store: &ElementStore) -> &Vec<Arc<Self>> {
        &store.track_formats
    }

    fn bucket_mut(store: &mut ElementStore) -> &mut Vec<Arc<Self>> {
        &mut store.track_formats
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
        if let Some(stream_format) = self.stream_format() {
            adoption.visit(self, stream_format)?;
        }
        Ok(())
    }

    fn release(self: &Arc<Self>, document: &Document) {
        for stream_format in document.get_elements::<AudioStreamFormat>() {
            stream_format.drop_track_format(self);
        }
        for track_uid in document.get_elements::<AudioTrackUid>() {
            reference::detach_single(track_uid.as_ref(), self.as_ref());
        }
    }

    fn disconnect_references(&self) {
        self.release_stream_format();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ReferenceExt;
    use crate::Error;

    fn stream(name: &str) -> Arc<AudioStreamFormat> {
        AudioStreamFormat::create(name.into(), FormatDescriptor::Pcm)
    }

    #[test]
    fn test_setting_stream_adds_track() {
        let stream = stream("PCM");
        let track = AudioTrackFormat::create("PCM".into(), FormatDescriptor::Pcm);
        track.set_reference(&stream).unwrap();
        track.set_reference(&stream).unwrap();

        let listed = stream.get_references::<AudioTrackFormat>();
        assert_eq!(listed.len(), 1);
        assert!(Arc::ptr_eq(&listed[0], &track));
    }

    #[test]
    fn test_moving_track_between_streams() {
        let (first, second) = (stream("first"), stream("second"));
        let track = AudioTrackFormat::create("PCM".into(), FormatDescriptor::Pcm);
        track.set_stream_format(&first, ReferenceSyncOption::SyncWithStreamFormat).unwrap();
        track.set_stream_format(&second, ReferenceSyncOption::SyncWithStreamFormat).unwrap();

        assert!(first.track_formats().is_empty());
        assert_eq!(second.track_formats().len(), 1);
        assert!(Arc::ptr_eq(&track.stream_format().unwrap(), &second));
    }

    #[test]
    fn test_unset_leaves_stream() {
        let stream = stream("PCM");
        let track = AudioTrackFormat::create("PCM".into(), FormatDescriptor::Pcm);
        track.set_reference(&stream).unwrap();
        track.unset_stream_format(ReferenceSyncOption::SyncWithStreamFormat).unwrap();
        assert!(stream.track_formats().is_empty());
        assert!(track.stream_format().is_none());
    }

    #[test]
    fn test_unsupported_sync_option() {
        let stream = stream("PCM");
        let track = AudioTrackFormat::create("PCM".into(), FormatDescriptor::Pcm);
        assert!(matches!(
            track.set_stream_format(&stream, ReferenceSyncOption::SyncWithTrackFormat),
            Err(Error::UnsupportedOperation(_))
        ));
        assert!(matches!(
            track.unset_stream_format(ReferenceSyncOption::SyncWithTrackFormat),
            Err(Error::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_copy_has_no_stream() {
        let stream = stream("PCM");
        let track = AudioTrackFormat::create("PCM".into(), FormatDescriptor::Pcm);
        track.set_reference(&stream).unwrap();
        let copy = track.copy();
        assert!(copy.stream_format().is_none());
        assert_eq!(stream.track_formats().len(), 1);
    }
}
