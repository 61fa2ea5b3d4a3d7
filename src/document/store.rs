//! The element table of a document, one bucket per element kind.

use std::sync::Arc;

use crate::elements::{
    AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat, AudioProgramme,
    AudioStreamFormat, AudioTrackFormat, AudioTrackUid,
};

/// Elements in insertion order. Each element type picks its bucket through
/// its sealed `bucket` hook.
#[derive(Default)]
pub(crate) struct ElementStore {
    pub(crate) programmes: Vec<Arc<AudioProgramme>>,
    pub(crate) contents: Vec<Arc<AudioContent>>,
    pub(crate) objects: Vec<Arc<AudioObject>>,
    pub(crate) pack_formats: Vec<Arc<AudioPackFormat>>,
    pub(crate) channel_formats: Vec<Arc<AudioChannelFormat>>,
    pub(crate) stream_formats: Vec<Arc<AudioStreamFormat>>,
    pub(crate) track_formats: Vec<Arc<AudioTrackFormat>>,
    pub(crate) track_uids: Vec<Arc<AudioTrackUid>>,
}

impl ElementStore {
    pub(crate) fn len(&self) -> usize {
        self.programmes.len()
            + self.contents.len()
            + self.objects.len()
            + self.pack_formats.len()
            + self.channel_formats.len()
            + self.stream_formats.len()
            + self.track_formats.len()
            + self.track_uids.len()
    }
}
