//! Edge resolution for input slots.
//!
//! A slot's displayed edge is derived, never stored: an explicit reference
//! wins, otherwise fixed slots fall back to the implicit default (source
//! graphic for the first row, previous row's output for later rows) and
//! merge inputs fall back to nothing.

use crate::graph::FilterGraph;
use crate::primitive::{InputRef, StandardSource};

/// The origin a slot's edge resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedSource {
    /// One of the fixed standard-source columns.
    Standard {
        source: StandardSource,
        /// False when this is the first-row implicit default.
        explicit: bool,
    },
    /// The output of the row at `index` (always strictly earlier).
    Node {
        index: usize,
        /// False when this is the previous-row implicit default.
        explicit: bool,
    },
    /// No edge: unset or dangling merge inputs, and the trailing "add" slot.
    None,
}

impl ResolvedSource {
    pub fn is_explicit(self) -> bool {
        matches!(
            self,
            ResolvedSource::Standard { explicit: true, .. }
                | ResolvedSource::Node { explicit: true, .. }
        )
    }
}

/// Resolve the edge for `slot` of the row at `row`.
///
/// Explicit image references bind to the last strictly-earlier row with a
/// matching output identifier; a dangling reference on a fixed slot renders
/// as the implicit default until the next sanitize pass clears it.
///
/// Returns [`ResolvedSource::None`] for rows or slots that do not exist.
pub fn resolve(graph: &FilterGraph, row: usize, slot: usize) -> ResolvedSource {
    let Some(id) = graph.at(row) else {
        return ResolvedSource::None;
    };
    let Some(prim) = graph.get(id) else {
        return ResolvedSource::None;
    };
    let Some(input) = prim.input(slot) else {
        return ResolvedSource::None;
    };
    let is_merge = prim.kind().is_merge();

    match input {
        InputRef::Standard(source) => {
            // The trailing merge slot never stores a value, so a Standard
            // here is always a real merge input or fixed slot.
            ResolvedSource::Standard {
                source,
                explicit: true,
            }
        }
        InputRef::Image(image) => match graph.find_output_before(image, row) {
            Some(index) => ResolvedSource::Node {
                index,
                explicit: true,
            },
            None if is_merge => ResolvedSource::None,
            None => implicit_default(row),
        },
        InputRef::Unset if is_merge => ResolvedSource::None,
        InputRef::Unset => implicit_default(row),
    }
}

/// The implicit default for a fixed slot with no usable reference.
fn implicit_default(row: usize) -> ResolvedSource {
    if row == 0 {
        ResolvedSource::Standard {
            source: StandardSource::SourceGraphic,
            explicit: false,
        }
    } else {
        ResolvedSource::Node {
            index: row - 1,
            explicit: false,
        }
    }
}
