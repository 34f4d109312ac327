//! Toolkit-independent rendering.
//!
//! [`render`] walks the graph once and emits an ordered list of
//! [`DrawCommand`]s in view coordinates. The host paints them with whatever
//! toolkit it has; the editor never touches a drawing API. Commands appear
//! back to front: column rules, row outlines, committed edges, slot
//! triangles, and finally the in-progress drag edge.

use crate::drag::DragGesture;
use crate::graph::FilterGraph;
use crate::hit_test::{
    outline_x, row_rects, slot_anchor_y, slot_triangle, source_column_x, source_region_x, Layout,
};
use crate::primitive::StandardSource;
use crate::resolve::{resolve, ResolvedSource};

/// Stroke emphasis for an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shade {
    /// Explicitly stored connection.
    Solid,
    /// Implicit default, drawn de-emphasized.
    Dimmed,
}

/// One primitive paint operation, in view coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Vertical rule at the left edge of a standard-source column.
    ColumnRule { x: f32, top: f32, bottom: f32 },
    /// A row's connection outline.
    RowOutline {
        row: usize,
        x: f32,
        top: f32,
        bottom: f32,
    },
    /// A committed edge, as a polyline from the slot toward its source.
    Edge {
        row: usize,
        slot: usize,
        points: Vec<(f32, f32)>,
        shade: Shade,
    },
    /// Square terminator where an edge meets a standard-source column.
    SourceMarker {
        source: StandardSource,
        x: f32,
        y: f32,
        size: f32,
    },
    /// An input slot's triangle; filled while it is being dragged.
    SlotTriangle {
        row: usize,
        slot: usize,
        points: [(f32, f32); 3],
        filled: bool,
    },
    /// The pending edge following the pointer during a drag.
    DragEdge { points: Vec<(f32, f32)> },
}

const SOURCE_MARKER_SIZE: f32 = 5.0;

/// Produce the full draw list for the current graph state.
///
/// `drag`, when present, suppresses the committed edge of the slot being
/// rewired and appends the pointer-following edge last.
pub fn render(
    graph: &FilterGraph,
    layout: &Layout,
    width: f32,
    drag: Option<&DragGesture>,
) -> Vec<DrawCommand> {
    let input_counts: Vec<usize> = graph
        .primitives()
        .map(|(_, prim)| prim.input_count())
        .collect();
    let rects = row_rects(layout, &input_counts, width);
    let row_count = rects.len();
    let total_height: f32 = rects.last().map(|r| r.y + r.height).unwrap_or(0.0);

    let mut commands = Vec::new();

    if let Some(first) = rects.first() {
        let region_x = source_region_x(layout, first);
        for i in 0..StandardSource::ALL.len() {
            commands.push(DrawCommand::ColumnRule {
                x: region_x + layout.column_width * i as f32,
                top: 0.0,
                bottom: total_height,
            });
        }
    }

    for (row, rect) in rects.iter().enumerate() {
        let ox = outline_x(layout, rect, row, row_count);
        commands.push(DrawCommand::RowOutline {
            row,
            x: ox,
            top: rect.y,
            bottom: rect.y + rect.height,
        });
    }

    // Edges below triangles, so the triangles cover the line ends.
    for (row, rect) in rects.iter().enumerate() {
        let input_count = input_counts[row];
        for slot in 0..input_count {
            if drag.is_some_and(|d| d.row == row && d.slot == slot) {
                continue;
            }
            let half = layout.slot_size * 0.35;
            let apex = (
                outline_x(layout, rect, row, row_count) - half,
                slot_anchor_y(rect, slot, input_count),
            );
            match resolve(graph, row, slot) {
                ResolvedSource::Standard { source, explicit } => {
                    let end_x = source_column_x(layout, rect, source);
                    commands.push(DrawCommand::Edge {
                        row,
                        slot,
                        points: vec![apex, (end_x, apex.1)],
                        shade: if explicit { Shade::Solid } else { Shade::Dimmed },
                    });
                    commands.push(DrawCommand::SourceMarker {
                        source,
                        x: end_x,
                        y: apex.1,
                        size: SOURCE_MARKER_SIZE,
                    });
                }
                ResolvedSource::Node { index, explicit } => {
                    let target = &rects[index];
                    let tx = outline_x(layout, target, index, row_count);
                    let target_bottom = target.y + target.height;
                    // Bevelled L up to the source row's outline.
                    let bevel = layout.slot_size / 4.0;
                    commands.push(DrawCommand::Edge {
                        row,
                        slot,
                        points: vec![
                            apex,
                            (tx + bevel, apex.1),
                            (tx, apex.1 - bevel),
                            (tx, target_bottom),
                        ],
                        shade: if explicit { Shade::Solid } else { Shade::Dimmed },
                    });
                }
                ResolvedSource::None => {}
            }
        }
    }

    for (row, rect) in rects.iter().enumerate() {
        let input_count = input_counts[row];
        for slot in 0..input_count {
            commands.push(DrawCommand::SlotTriangle {
                row,
                slot,
                points: slot_triangle(layout, rect, row, row_count, slot, input_count),
                filled: drag.is_some_and(|d| d.row == row && d.slot == slot),
            });
        }
    }

    if let Some(drag) = drag {
        commands.push(DrawCommand::DragEdge {
            points: vec![drag.origin, (drag.position.0, drag.origin.1), drag.position],
        });
    }

    commands
}
