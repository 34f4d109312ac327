//! Level 1: Pipeline Structure Tests
//!
//! Tests the document arena: add/duplicate/remove, output-identifier
//! synthesis, and one-event-per-edit notification.

mod common;

use common::{chain, EventRecorder};
use filter_node_editor::{GraphEvent, InputRef, PrimitiveKind, StandardSource};

#[test]
fn test_pipeline_grows_in_display_order() {
    let graph = chain(&[
        PrimitiveKind::Flood,
        PrimitiveKind::GaussianBlur,
        PrimitiveKind::Merge,
    ]);
    assert_eq!(graph.len(), 3);
    let kinds: Vec<_> = graph.primitives().map(|(_, p)| p.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            PrimitiveKind::Flood,
            PrimitiveKind::GaussianBlur,
            PrimitiveKind::Merge
        ]
    );
}

#[test]
fn test_input_counts_by_kind() {
    let graph = chain(&[
        PrimitiveKind::GaussianBlur,
        PrimitiveKind::Blend,
        PrimitiveKind::Composite,
        PrimitiveKind::DisplacementMap,
        PrimitiveKind::Merge,
    ]);
    let counts: Vec<_> = graph.primitives().map(|(_, p)| p.input_count()).collect();
    // Merge shows one slot even when empty: the trailing "add" slot.
    assert_eq!(counts, vec![1, 2, 2, 2, 1]);
}

#[test]
fn test_every_edit_is_one_event_with_a_label() {
    let recorder = EventRecorder::new();
    let mut graph = chain(&[]);
    recorder.attach(&mut graph);

    let a = graph.add(PrimitiveKind::Flood);
    let b = graph.add(PrimitiveKind::Offset);
    let image = graph.ensure_result(a).unwrap();
    graph.set_input(b, 0, InputRef::Image(image)).unwrap();
    graph.reorder(b, 0).unwrap();
    graph.remove(a).unwrap();

    assert_eq!(
        recorder.labels(),
        vec![
            "Add filter primitive",
            "Add filter primitive",
            "Set filter primitive result",
            "Set filter primitive input",
            "Reorder filter primitive",
            "Remove filter primitive",
        ]
    );
}

#[test]
fn test_noop_write_emits_nothing() {
    let recorder = EventRecorder::new();
    let mut graph = chain(&[PrimitiveKind::Offset]);
    let a = graph.at(0).unwrap();
    graph
        .set_input(a, 0, InputRef::Standard(StandardSource::SourceAlpha))
        .unwrap();
    recorder.attach(&mut graph);

    let changed = graph
        .set_input(a, 0, InputRef::Standard(StandardSource::SourceAlpha))
        .unwrap();
    assert!(!changed);
    assert_eq!(recorder.len(), 0);
}

#[test]
fn test_attribute_events_carry_the_edited_id() {
    let recorder = EventRecorder::new();
    let mut graph = chain(&[PrimitiveKind::Merge]);
    let m = graph.at(0).unwrap();
    recorder.attach(&mut graph);

    graph.append_merge_input(m, InputRef::Unset).unwrap();
    graph.remove_merge_input(m, 0).unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            GraphEvent::Attribute {
                id: m,
                edit: "Add merge node"
            },
            GraphEvent::Attribute {
                id: m,
                edit: "Remove merge node"
            },
        ]
    );
}

#[test]
fn test_duplicate_shares_output_identifier() {
    let mut graph = chain(&[PrimitiveKind::Turbulence]);
    let a = graph.at(0).unwrap();
    let image = graph.ensure_result(a).unwrap();

    let b = graph.duplicate(a).unwrap();
    assert_eq!(graph.get(b).unwrap().result(), Some(image));
    // Resolution prefers the later copy.
    assert_eq!(graph.find_output_before(image, 2), graph.index_of(b));
}

#[test]
fn test_synthesized_identifiers_never_collide() {
    let mut graph = chain(&[
        PrimitiveKind::Flood,
        PrimitiveKind::Offset,
        PrimitiveKind::GaussianBlur,
    ]);
    graph.set_result(graph.at(1).unwrap(), Some(7)).unwrap();

    let first = graph.ensure_result(graph.at(0).unwrap()).unwrap();
    let third = graph.ensure_result(graph.at(2).unwrap()).unwrap();
    assert_ne!(first, 7);
    assert_ne!(third, 7);
    assert_ne!(first, third);
}
