//! A toolkit-independent connection-graph editor for SVG filter primitive
//! pipelines.
//!
//! An SVG filter is an ordered list of primitives (`feGaussianBlur`,
//! `feBlend`, `feMerge`, ...) where each primitive's inputs come from a
//! standard source, an earlier primitive's output, or an implicit default.
//! This crate models that pipeline as an editable connection graph: rows of
//! typed input slots, drag-to-rewire gestures, reordering with automatic
//! cleanup of forward references, and a draw-command renderer a host can
//! paint with any toolkit.
//!
//! [`ConnectionGraphView`] is the entry point for interactive use;
//! [`FilterGraph`] underneath holds the document and emits one
//! [`GraphEvent`] per undoable edit.
//!
//! # Example
//!
//! ```
//! use filter_node_editor::{ConnectionGraphView, PrimitiveKind, ResolvedSource};
//!
//! let mut view = ConnectionGraphView::new(400.0);
//! view.add(PrimitiveKind::Flood);
//! view.add(PrimitiveKind::GaussianBlur);
//!
//! // With nothing stored, the blur's input defaults to the row above.
//! assert_eq!(
//!     view.resolve_slot(1, 0),
//!     ResolvedSource::Node { index: 0, explicit: false }
//! );
//! ```

pub mod drag;
pub mod graph;
pub mod primitive;
pub mod render;
pub mod resolve;
pub mod view;

pub use drag::{Autoscroll, DragGesture};
pub use graph::{FilterGraph, GraphError, GraphEvent};
pub use hit_test::{Layout, RowRect};
pub use primitive::{InputRef, Primitive, PrimitiveId, PrimitiveKind, StandardSource};
pub use render::{DrawCommand, Shade};
pub use resolve::{resolve, ResolvedSource};
pub use view::{ConnectionGraphView, Row};
