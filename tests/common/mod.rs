//! Common test utilities for integration tests.

#![allow(dead_code)]

use filter_node_editor::hit_test::{outline_x, slot_anchor_y, source_region_x};
use filter_node_editor::{
    ConnectionGraphView, FilterGraph, GraphEvent, PrimitiveKind, StandardSource,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Records every [`GraphEvent`] a graph emits, for asserting edit
/// granularity and undo labels.
#[derive(Default, Clone)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<GraphEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to a graph. Call before the edits under test.
    pub fn attach(&self, graph: &mut FilterGraph) {
        let sink = self.events.clone();
        graph.observe(move |event| sink.borrow_mut().push(event.clone()));
    }

    pub fn events(&self) -> Vec<GraphEvent> {
        self.events.borrow().clone()
    }

    /// Undo labels of all recorded edits, in order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.events
            .borrow()
            .iter()
            .map(|event| match event {
                GraphEvent::Structure { edit } => *edit,
                GraphEvent::Attribute { edit, .. } => *edit,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

/// A graph with one primitive per kind, in order.
pub fn chain(kinds: &[PrimitiveKind]) -> FilterGraph {
    let mut graph = FilterGraph::new();
    for &kind in kinds {
        graph.add(kind);
    }
    graph
}

/// A 400px-wide view over a fresh pipeline.
pub fn view_with(kinds: &[PrimitiveKind]) -> ConnectionGraphView {
    let mut view = ConnectionGraphView::new(400.0);
    for &kind in kinds {
        view.add(kind);
    }
    view
}

/// A pointer position inside the triangle of `(row, slot)`.
pub fn slot_point(view: &ConnectionGraphView, row: usize, slot: usize) -> (f32, f32) {
    let rect = *view.row_rect(row).expect("row exists");
    let input_count = view.rows()[row].input_count;
    let x = outline_x(view.layout(), &rect, row, view.rows().len());
    (
        x - 1.0,
        slot_anchor_y(&rect, slot, input_count),
    )
}

/// A pointer position inside `source`'s label column on `row`.
pub fn source_point(view: &ConnectionGraphView, row: usize, source: StandardSource) -> (f32, f32) {
    let rect = *view.row_rect(row).expect("row exists");
    let x = source_region_x(view.layout(), &rect)
        + view.layout().column_width * (source.column() as f32 + 0.5);
    (x, rect.y + 1.0)
}

/// A pointer position over `row`, left of the source columns.
pub fn row_point(view: &ConnectionGraphView, row: usize) -> (f32, f32) {
    let rect = *view.row_rect(row).expect("row exists");
    (rect.x + 2.0, rect.y + 2.0)
}
