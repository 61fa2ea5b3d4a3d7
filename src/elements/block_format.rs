//! `audioBlockFormat`, a time slice of a channel.
//!
//! Block formats are values owned by their channel, not document elements:
//! they have no references and their ids are derived from the channel's.

use std::fmt;

use crate::model::{AudioBlockFormatId, Duration, Rtime, Time};
use crate::store::{DefaultFactory, PropertyStore};

struct BlockDefaults;

impl DefaultFactory<Rtime> for BlockDefaults {
    fn create() -> Rtime {
        Rtime::new(Time::ZERO)
    }
}

property_store! {
    /// One block of a channel. Use the [`PropertyStore`] accessors to read
    /// and write its properties.
    pub struct AudioBlockFormat {
        mandatory { id: AudioBlockFormatId }
        optional { duration: Duration }
        defaulted(BlockDefaults) { rtime: Rtime }
    }
}

impl AudioBlockFormat {
    pub fn id(&self) -> AudioBlockFormatId {
        self.id
    }
}

impl Default for AudioBlockFormat {
    fn default() -> Self {
        Self::new(AudioBlockFormatId::default())
    }
}

impl fmt::Display for AudioBlockFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::write_overview(f, &self.entries())
    }
}
