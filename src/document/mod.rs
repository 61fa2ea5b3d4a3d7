//! # Document
//!
//! The aggregate root of one ADM metadata instance. A document owns every
//! element added to it, hands out the parent link elements use to find their
//! siblings, and is the only place that sets or clears that link.
//!
//! Elements join a document explicitly through [`Document::add`] or
//! implicitly when an element of the document starts referring to them.
//! Either way, everything the new element refers to joins as well.

mod adoption;
mod config;
pub(crate) mod store;

use std::sync::{Arc, Weak};

use hashbrown::HashSet;
use parking_lot::RwLock;
use tracing::debug;

use crate::elements::sealed::Sealed;
use crate::elements::DocumentElement;
use crate::model::ElementId;
use crate::{Error, Result};

pub(crate) use adoption::Adoption;
pub use config::DocumentConfig;
use store::ElementStore;

pub struct Document {
    this: Weak<Document>,
    config: DocumentConfig,
    elements: RwLock<ElementStore>,
}

impl Document {
    pub fn create() -> Arc<Self> {
        Self::with_config(DocumentConfig::default())
    }

    pub fn with_config(config: DocumentConfig) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            config,
            elements: RwLock::new(ElementStore::default()),
        })
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    // ========================================================================
    // Membership
    // ========================================================================

    /// Add `element` and everything it refers to.
    ///
    /// Returns `Ok(false)` if the element is already part of this document.
    /// Fails with [`Error::CrossDocumentReference`] if it, or an element it
    /// reaches, belongs to another document, and with [`Error::DuplicateId`]
    /// if two elements would end up holding the same id. An undefined id is
    /// replaced by the lowest free one when
    /// [`DocumentConfig::auto_assign_ids`] is on.
    ///
    /// The whole unowned subgraph is checked before anything joins, so a
    /// failed call leaves the document and every element unchanged.
    pub fn add<E: DocumentElement>(&self, element: Arc<E>) -> Result<bool> {
        if self.contains(element.as_ref()) {
            return Ok(false);
        }
        if element.parent().upgrade().is_some() {
            let from = element.id().to_string();
            debug!("rejected {}: already owned by another document", from);
            return Err(Error::CrossDocumentReference {
                from,
                to: "the one it is added to".into(),
            });
        }

        let mut adoption = Adoption::new(self);
        adoption.admit(element)?;
        adoption.commit()?;
        Ok(true)
    }

    /// Take `element` out of the document.
    ///
    /// Every edge pointing at it from the rest of the document is removed,
    /// its own outgoing edges are cleared and its parent link is reset.
    /// Returns `false` if it was not part of this document.
    pub fn remove<E: DocumentElement>(&self, element: &Arc<E>) -> bool {
        let removed = {
            let mut elements = self.elements.write();
            let bucket = E::bucket_mut(&mut elements);
            let before = bucket.len();
            bucket.retain(|e| !Arc::ptr_eq(e, element));
            bucket.len() != before
        };
        if !removed {
            return false;
        }

        element.release(self);
        element.disconnect_references();
        element.set_parent(Weak::new());
        debug!("removed {} from document", element.id());
        true
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The element holding `id`. The undefined id never resolves.
    pub fn lookup<I: ElementId>(&self, id: &I) -> Option<Arc<I::Element>> {
        if id.is_undefined() {
            return None;
        }
        self.get_elements::<I::Element>().into_iter().find(|e| e.id() == *id)
    }

    /// Every element of kind `E`, in the order they were added.
    pub fn get_elements<E: DocumentElement>(&self) -> Vec<Arc<E>> {
        E::bucket(&self.elements.read()).clone()
    }

    pub fn contains<E: DocumentElement>(&self, element: &E) -> bool {
        E::bucket(&self.elements.read())
            .iter()
            .any(|e| std::ptr::eq(e.as_ref(), element))
    }

    /// Number of elements of all kinds.
    pub fn len(&self) -> usize {
        self.elements.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lowest id of `template`'s kind (and type, for typed ids) no element
    /// of this document holds.
    fn free_id<I: ElementId>(&self, template: I) -> Result<I> {
        let taken: HashSet<I> = self.get_elements::<I::Element>().iter().map(|e| e.id()).collect();
        (I::FIRST_VALUE..=I::MAX_VALUE)
            .filter_map(|value| template.with_value(value))
            .find(|id| !taken.contains(id))
            .ok_or(Error::IdExhausted { kind: I::KIND })
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("config", &self.config)
            .field("elements", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{
        AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat, AudioProgramme,
        AudioTrackUid, PropertyExt, ReferenceExt, References,
    };
    use crate::model::{
        AudioObjectId, AudioPackFormatId, AudioProgrammeId, AudioTrackUidId, ElementKind,
        TypeDescriptor,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_sets_parent_and_assigns_id() {
        let document = Document::create();
        let programme = AudioProgramme::create("Show".into());
        assert!(document.add(programme.clone()).unwrap());
        assert!(!document.add(programme.clone()).unwrap());

        assert!(Arc::ptr_eq(&programme.parent().upgrade().unwrap(), &document));
        assert_eq!(programme.id(), AudioProgrammeId::new(0x1001));
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_auto_ids_fill_gaps() {
        let document = Document::create();
        let first = AudioObject::create("a".into());
        let taken = AudioObject::builder("b".into())
            .with(AudioObjectId::new(0x1002))
            .build()
            .unwrap();
        document.add(taken).unwrap();
        document.add(first.clone()).unwrap();
        let second = AudioObject::create("c".into());
        document.add(second.clone()).unwrap();

        assert_eq!(first.id(), AudioObjectId::new(0x1001));
        assert_eq!(second.id(), AudioObjectId::new(0x1003));
    }

    #[test]
    fn test_typed_ids_are_counted_per_type() {
        let document = Document::create();
        let hoa = AudioPackFormat::create("HOA".into(), TypeDescriptor::Hoa);
        let objects = AudioPackFormat::create("Objects".into(), TypeDescriptor::Objects);
        document.add(hoa.clone()).unwrap();
        document.add(objects.clone()).unwrap();
        assert_eq!(hoa.id(), AudioPackFormatId::new(TypeDescriptor::Hoa, 0x1001));
        assert_eq!(objects.id(), AudioPackFormatId::new(TypeDescriptor::Objects, 0x1001));
    }

    #[test]
    fn test_without_auto_ids() {
        let document = Document::with_config(DocumentConfig { auto_assign_ids: false });
        let (a, b) = (AudioTrackUid::create(), AudioTrackUid::create());
        document.add(a.clone()).unwrap();
        document.add(b.clone()).unwrap();
        assert!(a.id().is_undefined() && b.id().is_undefined());
        assert!(document.lookup(&AudioTrackUidId::default()).is_none());
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let document = Document::create();
        let id = AudioObjectId::new(0x1001);
        let a = AudioObject::builder("a".into()).with(id).build().unwrap();
        let b = AudioObject::builder("b".into()).with(id).build().unwrap();
        document.add(a).unwrap();
        assert!(matches!(document.add(b.clone()), Err(Error::DuplicateId { .. })));
        assert!(b.parent().upgrade().is_none());
    }

    #[test]
    fn test_exhausted_ids_roll_back_the_whole_add() {
        let document = Document::create();
        {
            let mut elements = document.elements.write();
            for value in AudioObjectId::FIRST_VALUE..=AudioObjectId::MAX_VALUE {
                let filler = AudioObject::create("filler".into());
                filler.assign_id_value(value);
                elements.objects.push(filler);
            }
        }
        let filled = document.len();
        let content = AudioContent::create("Dub".into());
        let object = AudioObject::create("VO".into());
        content.add_reference(&object).unwrap();

        assert!(matches!(
            document.add(content.clone()),
            Err(Error::IdExhausted { kind: ElementKind::AudioObject })
        ));
        assert_eq!(document.len(), filled);
        assert!(!document.contains(content.as_ref()));
        assert!(content.id().is_undefined());
        assert!(content.parent().upgrade().is_none());
        assert!(object.parent().upgrade().is_none());
        assert_eq!(content.get_references::<AudioObject>().len(), 1);
    }

    #[test]
    fn test_add_rejects_subgraph_reaching_another_document() {
        let (first, second) = (Document::create(), Document::create());
        let content = AudioContent::create("Dub".into());
        let local = AudioObject::create("local".into());
        let foreign = AudioObject::create("foreign".into());
        content.add_reference(&local).unwrap();
        local.add_reference(&foreign).unwrap();
        second.add(foreign).unwrap();

        assert!(matches!(
            first.add(content.clone()),
            Err(Error::CrossDocumentReference { .. })
        ));
        assert!(first.is_empty());
        assert!(local.parent().upgrade().is_none());
        assert!(local.id().is_undefined());
    }

    #[test]
    fn test_foreign_element_message() {
        let (first, second) = (Document::create(), Document::create());
        let object = AudioObject::create("a".into());
        first.add(object.clone()).unwrap();
        let error = second.add(object).unwrap_err();
        assert_eq!(
            error.to_string(),
            "AO_1001 is owned by another document than the one it is added to"
        );
    }

    #[test]
    fn test_add_rejects_foreign_element() {
        let (first, second) = (Document::create(), Document::create());
        let object = AudioObject::create("a".into());
        first.add(object.clone()).unwrap();
        assert!(matches!(
            second.add(object),
            Err(Error::CrossDocumentReference { .. })
        ));
        assert!(second.is_empty());
    }

    #[test]
    fn test_add_adopts_subgraph() {
        let content = AudioContent::create("Dub".into());
        let object = AudioObject::create("VO".into());
        let pack = AudioPackFormat::create("Mono".into(), TypeDescriptor::DirectSpeakers);
        let channel = AudioChannelFormat::create("C".into(), TypeDescriptor::DirectSpeakers);
        content.add_reference(&object).unwrap();
        object.add_reference(&pack).unwrap();
        pack.add_reference(&channel).unwrap();

        let document = Document::create();
        document.add(content).unwrap();
        assert_eq!(document.len(), 4);
        assert!(document.contains(channel.as_ref()));
        assert!(Arc::ptr_eq(&channel.parent().upgrade().unwrap(), &document));
    }

    #[test]
    fn test_lookup() {
        let document = Document::create();
        let object = AudioObject::create("VO".into());
        document.add(object.clone()).unwrap();
        let found = document.lookup(&object.id()).unwrap();
        assert!(Arc::ptr_eq(&found, &object));
        assert!(document.lookup(&AudioObjectId::new(0x2000)).is_none());
    }

    #[test]
    fn test_remove_detaches_both_directions() {
        let document = Document::create();
        let content = AudioContent::create("Dub".into());
        let object = AudioObject::create("VO".into());
        let child = AudioObject::create("Child".into());
        document.add(content.clone()).unwrap();
        content.add_reference(&object).unwrap();
        object.add_reference(&child).unwrap();

        assert!(document.remove(&object));
        assert!(!document.remove(&object));
        assert!(content.get_references::<AudioObject>().is_empty());
        assert!(object.get_references::<AudioObject>().is_empty());
        assert!(object.parent().upgrade().is_none());
        assert!(document.contains(child.as_ref()));

        object.set(AudioObjectId::new(0x1001)).unwrap();
        assert_eq!(document.len(), 2);
    }

    #[test]
    fn test_dropped_document_releases_elements() {
        let object = AudioObject::create("VO".into());
        {
            let document = Document::create();
            document.add(object.clone()).unwrap();
        }
        assert!(object.parent().upgrade().is_none());
        let other = Document::create();
        assert!(other.add(object.clone()).unwrap());
        assert!(object.get::<crate::model::AudioObjectName>().is_ok());
    }
}
