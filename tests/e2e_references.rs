//! End-to-end tests for references between elements.
//!
//! Each test builds a small graph and checks idempotent adds, cycle
//! rejection, the document checks run on every new edge, copies and the
//! stream/track format pairing.

use std::sync::Arc;

use adm::prelude::*;
use adm::{
    AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat, AudioProgramme,
    AudioStreamFormat, AudioTrackFormat, AudioTrackUid, Document, Error, FormatDescriptor,
    Normalization, ReferenceSyncOption, TypeDescriptor,
};
use pretty_assertions::assert_eq;

fn objects(names: &[&str]) -> Vec<Arc<AudioObject>> {
    names.iter().map(|n| AudioObject::create((*n).into())).collect()
}

fn ids<E: DocumentElement>(elements: &[Arc<E>]) -> Vec<String> {
    elements.iter().map(|e| e.id().to_string()).collect()
}

// ============================================================================
// 1. Programme -> Content -> Object
// ============================================================================

#[test]
fn test_programme_content_object() {
    let programme = AudioProgramme::create("Show".into());
    let content = AudioContent::create("Dub".into());
    let object = AudioObject::create("VO".into());

    assert!(programme.add_reference(&content).unwrap());
    assert_eq!(programme.get_references::<AudioContent>().len(), 1);
    assert!(content.add_reference(&object).unwrap());

    let contents = programme.get_references::<AudioContent>();
    assert!(Arc::ptr_eq(&contents[0], &content));
    assert_eq!(contents[0].get::<adm::AudioContentName>().unwrap(), "Dub");
}

#[test]
fn test_adding_twice_is_idempotent() {
    let content = AudioContent::create("Dub".into());
    let object = AudioObject::create("VO".into());
    assert!(content.add_reference(&object).unwrap());
    assert!(!content.add_reference(&object).unwrap());
    assert_eq!(content.get_references::<AudioObject>().len(), 1);
}

#[test]
fn test_remove_missing_reference_is_noop() {
    let content = AudioContent::create("Dub".into());
    let (kept, other) = (AudioObject::create("a".into()), AudioObject::create("b".into()));
    content.add_reference(&kept).unwrap();
    content.remove_reference(&other);
    assert_eq!(content.get_references::<AudioObject>().len(), 1);
    content.remove_reference(&kept);
    assert!(content.get_references::<AudioObject>().is_empty());
}

// ============================================================================
// 2. Cycles
// ============================================================================

#[test]
fn test_self_reference_is_a_cycle() {
    let object = AudioObject::create("a".into());
    assert!(matches!(
        object.add_reference(&object),
        Err(Error::ReferenceCycle { .. })
    ));
    assert!(object.get_references::<AudioObject>().is_empty());
}

#[test]
fn test_two_object_cycle_leaves_lists_unchanged() {
    let o = objects(&["a", "b"]);
    o[0].add_reference(&o[1]).unwrap();
    assert!(matches!(
        o[1].add_reference(&o[0]),
        Err(Error::ReferenceCycle { .. })
    ));
    assert_eq!(o[0].get_references::<AudioObject>().len(), 1);
    assert!(o[1].get_references::<AudioObject>().is_empty());
}

#[test]
fn test_three_object_cycle() {
    let o = objects(&["a", "b", "c"]);
    o[0].add_reference(&o[1]).unwrap();
    o[1].add_reference(&o[2]).unwrap();
    let result = o[2].add_reference(&o[0]);
    assert!(matches!(result, Err(Error::ReferenceCycle { .. })));
    assert!(o[2].get_references::<AudioObject>().is_empty());

    // A diamond is not a cycle.
    let d = AudioObject::create("d".into());
    o[0].add_reference(&d).unwrap();
    assert!(o[2].add_reference(&d).unwrap());
}

#[test]
fn test_hoa_pack_cycle() {
    let first = AudioPackFormat::create("HOA 1".into(), TypeDescriptor::Hoa);
    let second = AudioPackFormat::create("HOA 2".into(), TypeDescriptor::Hoa);
    assert_eq!(first.get::<Normalization>().unwrap(), "SN3D");
    assert_eq!(second.get::<Normalization>().unwrap(), "SN3D");

    assert!(first.add_reference(&second).unwrap());
    assert!(matches!(
        second.add_reference(&first),
        Err(Error::ReferenceCycle { .. })
    ));
    assert_eq!(first.get_references::<AudioPackFormat>().len(), 1);
    assert!(second.get_references::<AudioPackFormat>().is_empty());
}

#[test]
fn test_cycle_error_names_both_ends() {
    let document = Document::create();
    let o = objects(&["a", "b"]);
    document.add(o[0].clone()).unwrap();
    o[0].add_reference(&o[1]).unwrap();
    match o[1].add_reference(&o[0]) {
        Err(Error::ReferenceCycle { from, to }) => {
            assert_eq!(from, "AO_1002");
            assert_eq!(to, "AO_1001");
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
}

// ============================================================================
// 3. Complementary objects
// ============================================================================

#[test]
fn test_complementary_and_normal_are_exclusive() {
    let o = objects(&["main", "alt"]);
    assert!(o[0].add_complementary(&o[1]).unwrap());
    assert_eq!(o[0].complementary_objects().len(), 1);

    o[0].add_reference(&o[1]).unwrap();
    assert!(o[0].complementary_objects().is_empty());
    assert_eq!(o[0].get_references::<AudioObject>().len(), 1);
}

#[test]
fn test_complementary_cycle() {
    let o = objects(&["a", "b"]);
    o[0].add_complementary(&o[1]).unwrap();
    assert!(matches!(
        o[1].add_complementary(&o[0]),
        Err(Error::ReferenceCycle { .. })
    ));
    assert!(o[1].complementary_objects().is_empty());
}

// ============================================================================
// 4. Documents
// ============================================================================

#[test]
fn test_reference_adopts_unowned_subgraph() {
    let document = Document::create();
    let content = AudioContent::create("Dub".into());
    document.add(content.clone()).unwrap();

    let object = AudioObject::create("VO".into());
    let pack = AudioPackFormat::create("Mono".into(), TypeDescriptor::DirectSpeakers);
    let channel = AudioChannelFormat::create("C".into(), TypeDescriptor::DirectSpeakers);
    pack.add_reference(&channel).unwrap();
    object.add_reference(&pack).unwrap();

    content.add_reference(&object).unwrap();
    assert_eq!(document.len(), 4);
    for parent in [object.parent(), pack.parent(), channel.parent()] {
        assert!(Arc::ptr_eq(&parent.upgrade().unwrap(), &document));
    }
    assert_eq!(ids(&document.get_elements::<AudioChannelFormat>()), vec!["AC_00011001"]);
}

#[test]
fn test_cross_document_reference() {
    let (first, second) = (Document::create(), Document::create());
    let a = AudioObject::create("a".into());
    let b = AudioObject::create("b".into());
    first.add(a.clone()).unwrap();
    second.add(b.clone()).unwrap();

    assert!(matches!(
        b.add_reference(&a),
        Err(Error::CrossDocumentReference { .. })
    ));
    assert!(b.get_references::<AudioObject>().is_empty());
}

#[test]
fn test_unowned_source_cannot_reach_into_document() {
    let document = Document::create();
    let owned = AudioObject::create("owned".into());
    document.add(owned.clone()).unwrap();

    let loose = AudioContent::create("loose".into());
    assert!(matches!(
        loose.add_reference(&owned),
        Err(Error::CrossDocumentReference { .. })
    ));
}

#[test]
fn test_rejected_auto_parent_leaves_everything_unchanged() {
    let (first, second) = (Document::create(), Document::create());
    let owner = AudioObject::create("owner".into());
    first.add(owner.clone()).unwrap();

    let loose = AudioObject::create("loose".into());
    let foreign = AudioObject::create("foreign".into());
    loose.add_reference(&foreign).unwrap();
    second.add(foreign.clone()).unwrap();

    match owner.add_reference(&loose) {
        Err(Error::CrossDocumentReference { to, .. }) => assert_eq!(to, "AO_1001"),
        other => panic!("expected a cross-document error, got {other:?}"),
    }
    assert!(owner.get_references::<AudioObject>().is_empty());
    assert!(!first.contains(loose.as_ref()));
    assert!(loose.parent().upgrade().is_none());
    assert!(loose.id().is_undefined());
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
}

// ============================================================================
// 5. Copies
// ============================================================================

#[test]
fn test_copy_starts_detached() {
    let document = Document::create();
    let original = AudioObject::create("VO".into());
    let target = AudioObject::create("child".into());
    document.add(original.clone()).unwrap();
    original.add_reference(&target).unwrap();

    let copy = original.copy();
    assert!(copy.get_references::<AudioObject>().is_empty());
    assert_eq!(original.get_references::<AudioObject>().len(), 1);
    assert!(copy.parent().upgrade().is_none());
    assert_eq!(copy.id(), original.id());
}

// ============================================================================
// 6. Stream and track formats
// ============================================================================

#[test]
fn test_stream_track_pairing() {
    let document = Document::create();
    let stream = AudioStreamFormat::create("PCM_L".into(), FormatDescriptor::Pcm);
    let track = AudioTrackFormat::create("PCM_L".into(), FormatDescriptor::Pcm);
    document.add(stream.clone()).unwrap();

    stream
        .add_track_format(&track, ReferenceSyncOption::SyncWithTrackFormat)
        .unwrap();
    assert!(Arc::ptr_eq(&track.stream_format().unwrap(), &stream));
    assert!(document.contains(track.as_ref()));

    track
        .unset_stream_format(ReferenceSyncOption::SyncWithStreamFormat)
        .unwrap();
    assert!(stream.track_formats().is_empty());

    track
        .set_stream_format(&stream, ReferenceSyncOption::SyncWithStreamFormat)
        .unwrap();
    assert_eq!(stream.track_formats().len(), 1);
}

#[test]
fn test_track_uid_chain() {
    let document = Document::create();
    let uid = AudioTrackUid::create();
    let track = AudioTrackFormat::create("PCM_L".into(), FormatDescriptor::Pcm);
    let stream = AudioStreamFormat::create("PCM_L".into(), FormatDescriptor::Pcm);
    let channel = AudioChannelFormat::create("L".into(), TypeDescriptor::DirectSpeakers);
    stream.set_reference(&channel).unwrap();
    track.set_reference(&stream).unwrap();
    uid.set_reference(&track).unwrap();

    document.add(uid.clone()).unwrap();
    assert_eq!(document.len(), 4);
    assert_eq!(uid.id().to_string(), "ATU_00000001");
    assert!(document.contains(channel.as_ref()));
}
