//! Two-phase joining of an element and the unowned elements it reaches.
//!
//! [`Adoption::admit`] walks the subgraph and checks it against the
//! document without touching anything. [`Adoption::commit`] then moves the
//! collected elements in, undoing its own work if an id cannot be assigned.

use std::sync::{Arc, Weak};

use hashbrown::HashSet;
use tracing::debug;

use super::Document;
use crate::elements::DocumentElement;
use crate::model::ElementId;
use crate::{Error, Result};

/// One element waiting to join.
trait Joining {
    fn join(&self, document: &Document) -> Result<()>;

    fn leave(&self, document: &Document);
}

struct Candidate<E> {
    element: Arc<E>,
    assign_id: bool,
}

impl<E: DocumentElement> Joining for Candidate<E> {
    fn join(&self, document: &Document) -> Result<()> {
        let element = &self.element;
        if self.assign_id {
            let assigned = document.free_id(element.id())?;
            element.assign_id_value(assigned.value());
            debug!("assigned {} to new {}", assigned, E::KIND);
        }
        element.set_parent(document.this.clone());
        E::bucket_mut(&mut document.elements.write()).push(element.clone());
        debug!("added {} to document", element.id());
        Ok(())
    }

    fn leave(&self, document: &Document) {
        let element = &self.element;
        E::bucket_mut(&mut document.elements.write()).retain(|e| !Arc::ptr_eq(e, element));
        element.set_parent(Weak::new());
        if self.assign_id {
            element.assign_id_value(0);
        }
    }
}

pub(crate) struct Adoption<'a> {
    document: &'a Document,
    seen: HashSet<*const ()>,
    ids: HashSet<String>,
    pending: Vec<Box<dyn Joining>>,
}

impl<'a> Adoption<'a> {
    pub(super) fn new(document: &'a Document) -> Self {
        Self {
            document,
            seen: HashSet::new(),
            ids: HashSet::new(),
            pending: Vec::new(),
        }
    }

    /// Check `element` and queue it, then do the same for everything it
    /// refers to.
    pub(super) fn admit<E: DocumentElement>(&mut self, element: Arc<E>) -> Result<()> {
        if !self.seen.insert(Arc::as_ptr(&element).cast::<()>()) {
            return Ok(());
        }

        let id = element.id();
        if !id.is_undefined() {
            let text = id.to_string();
            if self.document.lookup(&id).is_some() || !self.ids.insert(text.clone()) {
                debug!("rejected {}: id already in use", text);
                return Err(Error::DuplicateId { id: text });
            }
        }

        let assign_id = id.is_undefined() && self.document.config.auto_assign_ids;
        self.pending.push(Box::new(Candidate { element: element.clone(), assign_id }));
        element.adopt_references(self)
    }

    /// Follow the edge `source -> target`. Targets already in the document
    /// are left alone, targets owned by another document fail the adoption.
    pub(crate) fn visit<S, T>(&mut self, source: &S, target: Arc<T>) -> Result<()>
    where
        S: DocumentElement,
        T: DocumentElement,
    {
        if self.document.contains(target.as_ref()) {
            return Ok(());
        }
        if target.parent().upgrade().is_some() {
            let (from, to) = (source.id().to_string(), target.id().to_string());
            debug!("rejected reference {} -> {}: different documents", from, to);
            return Err(Error::CrossDocumentReference { from, to });
        }
        self.admit(target)
    }

    /// Move every queued element into the document, in the order admitted.
    pub(super) fn commit(self) -> Result<()> {
        for (joined, candidate) in self.pending.iter().enumerate() {
            if let Err(error) = candidate.join(self.document) {
                for candidate in self.pending[..joined].iter().rev() {
                    candidate.leave(self.document);
                }
                return Err(error);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{AudioContent, AudioObject, References};
    use crate::model::AudioObjectId;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_admit_rejects_duplicate_inside_subgraph() {
        let document = Document::create();
        let id = AudioObjectId::new(0x1005);
        let content = AudioContent::create("Dub".into());
        let a = AudioObject::builder("a".into()).with(id).build().unwrap();
        let b = AudioObject::builder("b".into()).with(id).build().unwrap();
        content.add_reference(&a).unwrap();
        content.add_reference(&b).unwrap();

        let mut adoption = Adoption::new(&document);
        assert!(matches!(adoption.admit(content.clone()), Err(Error::DuplicateId { .. })));
        assert!(document.is_empty());
        assert!(a.parent().upgrade().is_none());
    }

    #[test]
    fn test_commit_follows_admission_order() {
        let document = Document::create();
        let content = AudioContent::create("Dub".into());
        let object = AudioObject::create("VO".into());
        content.add_reference(&object).unwrap();

        let mut adoption = Adoption::new(&document);
        adoption.admit(content.clone()).unwrap();
        assert!(document.is_empty());
        adoption.commit().unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(object.id(), AudioObjectId::new(0x1001));
    }
}
