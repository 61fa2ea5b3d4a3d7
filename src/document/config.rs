//! Document configuration.

use serde::{Deserialize, Serialize};

/// Behaviour switches of a [`Document`](super::Document).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Give an element added with the undefined id the lowest free id of its
    /// kind. When off, undefined ids are stored as they are.
    pub auto_assign_ids: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self { auto_assign_ids: true }
    }
}
