//! The interactive connection-graph view.
//!
//! [`ConnectionGraphView`] owns a [`FilterGraph`] and a derived row
//! projection, and turns pointer gestures into graph edits. Hosts feed it
//! pointer events in view coordinates and paint the draw list it returns;
//! everything else (edge resolution, drop rules, sanitization) happens here
//! or below.
//!
//! # Example
//!
//! ```
//! use filter_node_editor::{ConnectionGraphView, PrimitiveKind};
//!
//! let mut view = ConnectionGraphView::new(400.0);
//! view.add(PrimitiveKind::Flood);
//! view.add(PrimitiveKind::GaussianBlur);
//!
//! let commands = view.render();
//! assert!(!commands.is_empty());
//! ```

use crate::drag::DragGesture;
use crate::graph::{FilterGraph, GraphError};
use crate::hit_test::{
    outline_x, row_rects, slot_anchor_y, slot_hit, source_at, Layout, RowRect,
};
use crate::primitive::{InputRef, PrimitiveId, PrimitiveKind};
use crate::render::{render, DrawCommand};
use crate::resolve::{resolve, ResolvedSource};
use log::{debug, warn};

/// One displayed row of the editor, derived from the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub id: PrimitiveId,
    pub kind: PrimitiveKind,
    /// Display label, the SVG element name.
    pub label: &'static str,
    pub input_count: usize,
}

/// Connection-graph editor over an SVG filter primitive pipeline.
pub struct ConnectionGraphView {
    graph: FilterGraph,
    layout: Layout,
    width: f32,
    rows: Vec<Row>,
    rects: Vec<RowRect>,
    selection: Option<PrimitiveId>,
    drag: Option<DragGesture>,
}

impl ConnectionGraphView {
    /// Create an empty view, `width` pixels wide, with stock geometry.
    pub fn new(width: f32) -> Self {
        Self::with_layout(width, Layout::default())
    }

    pub fn with_layout(width: f32, layout: Layout) -> Self {
        Self {
            graph: FilterGraph::new(),
            layout,
            width,
            rows: Vec::new(),
            rects: Vec::new(),
            selection: None,
            drag: None,
        }
    }

    pub fn graph(&self) -> &FilterGraph {
        &self.graph
    }

    /// Mutable access for edits the view has no verb for. Callers must
    /// [`rebuild`](Self::rebuild) afterwards.
    pub fn graph_mut(&mut self) -> &mut FilterGraph {
        &mut self.graph
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
        self.rebuild();
    }

    // === Derived state ===

    /// Recompute rows and rectangles from the graph.
    ///
    /// Selection is kept by identity when its primitive survives, otherwise
    /// it falls to the first row. An active drag whose slot no longer exists
    /// is cancelled.
    pub fn rebuild(&mut self) {
        self.rows = self
            .graph
            .primitives()
            .map(|(id, prim)| Row {
                id,
                kind: prim.kind(),
                label: prim.kind().element_name(),
                input_count: prim.input_count(),
            })
            .collect();
        let counts: Vec<usize> = self.rows.iter().map(|r| r.input_count).collect();
        self.rects = row_rects(&self.layout, &counts, self.width);

        self.selection = match self.selection {
            Some(id) if self.graph.get(id).is_some() => Some(id),
            _ => self.rows.first().map(|r| r.id),
        };
        if let Some(drag) = self.drag {
            let alive = self
                .rows
                .get(drag.row)
                .is_some_and(|r| drag.slot < r.input_count);
            if !alive {
                self.drag = None;
            }
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_rect(&self, row: usize) -> Option<&RowRect> {
        self.rects.get(row)
    }

    pub fn selection(&self) -> Option<PrimitiveId> {
        self.selection
    }

    /// Select a primitive by id. Returns false for ids not in the graph.
    pub fn select(&mut self, id: PrimitiveId) -> bool {
        if self.graph.get(id).is_some() {
            self.selection = Some(id);
            true
        } else {
            false
        }
    }

    // === Structure edits ===

    /// Append and select a new primitive.
    pub fn add(&mut self, kind: PrimitiveKind) -> PrimitiveId {
        let id = self.graph.add(kind);
        self.selection = Some(id);
        self.rebuild();
        id
    }

    /// Duplicate a primitive and select the copy.
    pub fn duplicate(&mut self, id: PrimitiveId) -> Result<PrimitiveId, GraphError> {
        let copy = self.graph.duplicate(id)?;
        self.selection = Some(copy);
        self.rebuild();
        Ok(copy)
    }

    pub fn remove(&mut self, id: PrimitiveId) -> Result<(), GraphError> {
        self.graph.remove(id)?;
        self.rebuild();
        Ok(())
    }

    /// Move a primitive to a new display position; forward references are
    /// cleared by the graph's sanitize pass.
    pub fn reorder(&mut self, id: PrimitiveId, new_pos: usize) -> Result<(), GraphError> {
        self.graph.reorder(id, new_pos)?;
        self.rebuild();
        Ok(())
    }

    // === Queries ===

    /// The slot under a point, if any.
    pub fn hit_test(&self, px: f32, py: f32) -> Option<(usize, usize)> {
        let row_count = self.rows.len();
        for (row, rect) in self.rects.iter().enumerate() {
            let input_count = self.rows[row].input_count;
            for slot in 0..input_count {
                if slot_hit(
                    &self.layout,
                    rect,
                    row,
                    row_count,
                    slot,
                    input_count,
                    px,
                    py,
                ) {
                    return Some((row, slot));
                }
            }
        }
        None
    }

    /// Resolved source of a slot's edge.
    pub fn resolve_slot(&self, row: usize, slot: usize) -> ResolvedSource {
        resolve(&self.graph, row, slot)
    }

    /// Index of the row containing the vertical position `py`.
    fn row_at(&self, py: f32) -> Option<usize> {
        self.rects
            .iter()
            .position(|r| py >= r.y && py < r.y + r.height)
    }

    // === Drag gesture ===

    pub fn drag(&self) -> Option<&DragGesture> {
        self.drag.as_ref()
    }

    /// Start a rewire drag if the press lands on a slot. The slot's row is
    /// selected. Returns whether a gesture started.
    pub fn begin_drag(&mut self, px: f32, py: f32) -> bool {
        let Some((row, slot)) = self.hit_test(px, py) else {
            return false;
        };
        let rect = self.rects[row];
        let input_count = self.rows[row].input_count;
        let half = self.layout.slot_size * 0.35;
        let origin = (
            outline_x(&self.layout, &rect, row, self.rows.len()) - half,
            slot_anchor_y(&rect, slot, input_count),
        );
        debug!("begin drag: row {} slot {}", row, slot);
        self.selection = Some(self.rows[row].id);
        self.drag = Some(DragGesture::new(row, slot, origin));
        true
    }

    /// Track a pointer move. Returns whether a gesture is active.
    pub fn update_drag(&mut self, px: f32, py: f32) -> bool {
        match self.drag.as_mut() {
            Some(drag) => {
                drag.move_to((px, py));
                true
            }
            None => false,
        }
    }

    /// Finish the gesture at a release point and commit the result.
    ///
    /// A release over a row's source-label region stores that standard
    /// source; over an earlier row it stores a reference to that row's
    /// output, synthesizing one if needed; over the dragged row itself or a
    /// later row it stores "no value" (an existing merge input is deleted
    /// instead). A release outside every row changes nothing. Returns
    /// whether the graph changed.
    pub fn end_drag(&mut self, px: f32, py: f32) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        let Some(target_row) = self.row_at(py) else {
            return false;
        };
        let target_rect = self.rects[target_row];
        let value = if let Some(source) = source_at(&self.layout, &target_rect, px) {
            InputRef::Standard(source)
        } else if target_row < drag.row {
            let Some(target_id) = self.graph.at(target_row) else {
                return false;
            };
            match self.graph.ensure_result(target_id) {
                Ok(image) => InputRef::Image(image),
                Err(err) => {
                    warn!("drop target vanished: {}", err);
                    return false;
                }
            }
        } else {
            InputRef::Unset
        };

        debug!(
            "end drag: row {} slot {} -> {:?} on row {}",
            drag.row, drag.slot, value, target_row
        );
        let changed = match self.commit_drop(&drag, value) {
            Ok(changed) => changed,
            Err(err) => {
                warn!("drop rejected: {}", err);
                false
            }
        };
        if changed {
            self.rebuild();
        }
        changed
    }

    /// Cancel the active gesture without touching the graph.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    fn commit_drop(&mut self, drag: &DragGesture, value: InputRef) -> Result<bool, GraphError> {
        let row = &self.rows[drag.row];
        let id = row.id;
        if !row.kind.is_merge() {
            return self.graph.set_input(id, drag.slot, value);
        }

        let merge_count = self
            .graph
            .get(id)
            .map(|p| p.merge_input_count())
            .unwrap_or(0);
        if drag.slot < merge_count {
            if value == InputRef::Unset {
                // Clearing an existing merge input deletes it.
                self.graph.remove_merge_input(id, drag.slot)?;
                Ok(true)
            } else {
                self.graph.set_input(id, drag.slot, value)
            }
        } else if value != InputRef::Unset {
            // Trailing "add" slot grows the merge on a valid drop.
            self.graph.append_merge_input(id, value)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // === Rendering ===

    /// The draw list for the current state, including drag feedback.
    pub fn render(&self) -> Vec<DrawCommand> {
        render(&self.graph, &self.layout, self.width, self.drag.as_ref())
    }
}
