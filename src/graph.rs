//! The filter document arena.
//!
//! [`FilterGraph`] owns the ordered set of primitives and is the only place
//! mutations happen. Every public mutation is one undoable edit: it detects
//! no-op writes, applies the change, then notifies registered observers
//! exactly once with a [`GraphEvent`] carrying the edit's undo label. Hosts
//! forward these events to their undo log and rebuild any derived views.
//!
//! # Example
//!
//! ```
//! use filter_node_editor::{FilterGraph, PrimitiveKind, InputRef};
//!
//! let mut graph = FilterGraph::new();
//! let blur = graph.add(PrimitiveKind::GaussianBlur);
//! let offset = graph.add(PrimitiveKind::Offset);
//!
//! let image = graph.ensure_result(blur).unwrap();
//! graph.set_input(offset, 0, InputRef::Image(image)).unwrap();
//! ```

use crate::primitive::{InputRef, Primitive, PrimitiveId, PrimitiveInputs, PrimitiveKind};
use log::{debug, trace};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from misuse of the arena API.
///
/// The interactive layer pre-validates against the graph before mutating, so
/// these surface only when a host drives the arena directly with stale ids.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("{0} does not exist in this graph")]
    UnknownPrimitive(PrimitiveId),
    #[error("{0} is not a merge primitive")]
    NotAMerge(PrimitiveId),
    #[error("slot {slot} out of range for {id} ({count} slots)")]
    SlotOutOfRange {
        id: PrimitiveId,
        slot: usize,
        count: usize,
    },
}

/// Change notification emitted after each committed edit.
///
/// One event per undoable edit; `edit` is the human-readable undo label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphEvent {
    /// Primitives were added, removed, or reordered.
    Structure { edit: &'static str },
    /// An attribute of one primitive changed.
    Attribute {
        id: PrimitiveId,
        edit: &'static str,
    },
}

type Observer = Box<dyn FnMut(&GraphEvent)>;

/// Ordered arena of filter primitives with stable identity.
pub struct FilterGraph {
    nodes: HashMap<PrimitiveId, Primitive>,
    order: Vec<PrimitiveId>,
    next_id: u32,
    /// Next image number handed out when a `result` must be synthesized.
    next_image: u32,
    observers: Vec<Observer>,
}

impl Default for FilterGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterGraph {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
            next_image: 1,
            observers: Vec::new(),
        }
    }

    /// Register an observer for committed edits.
    ///
    /// Observers are called once per edit, after the mutation has been
    /// applied. No-op writes do not notify.
    pub fn observe(&mut self, observer: impl FnMut(&GraphEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, event: GraphEvent) {
        trace!("graph edit committed: {:?}", event);
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    // === Queries ===

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Display order of all primitives.
    pub fn order(&self) -> &[PrimitiveId] {
        &self.order
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.nodes.get(&id)
    }

    /// Position of `id` in the display order.
    pub fn index_of(&self, id: PrimitiveId) -> Option<usize> {
        self.order.iter().position(|&p| p == id)
    }

    pub fn at(&self, index: usize) -> Option<PrimitiveId> {
        self.order.get(index).copied()
    }

    /// Primitives in display order.
    pub fn primitives(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> {
        self.order.iter().map(move |&id| (id, &self.nodes[&id]))
    }

    /// Position of the node whose output is `image`, scanning positions
    /// strictly before `before`. When several nodes carry the same output
    /// identifier the last match in scan order wins.
    pub fn find_output_before(&self, image: u32, before: usize) -> Option<usize> {
        let mut target = None;
        for (i, &id) in self.order.iter().take(before).enumerate() {
            if self.nodes[&id].result() == Some(image) {
                target = Some(i);
            }
        }
        target
    }

    // === Structure edits ===

    /// Append a new primitive of `kind` and return its id.
    pub fn add(&mut self, kind: PrimitiveKind) -> PrimitiveId {
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Primitive::new(kind));
        self.order.push(id);
        debug!("add {} ({})", id, kind.element_name());
        self.notify(GraphEvent::Structure {
            edit: "Add filter primitive",
        });
        id
    }

    /// Append a copy of `id`, including its input references and output
    /// identifier, and return the copy's id.
    ///
    /// The copy keeps the original's `result`, so two nodes may briefly share
    /// an output identifier; resolution then binds to the last match in scan
    /// order.
    pub fn duplicate(&mut self, id: PrimitiveId) -> Result<PrimitiveId, GraphError> {
        let prim = self
            .nodes
            .get(&id)
            .ok_or(GraphError::UnknownPrimitive(id))?
            .clone();
        let copy = PrimitiveId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(copy, prim);
        self.order.push(copy);
        debug!("duplicate {} -> {}", id, copy);
        self.notify(GraphEvent::Structure {
            edit: "Duplicate filter primitive",
        });
        Ok(copy)
    }

    /// Remove a primitive. References other nodes hold to its output are left
    /// in place; they render as implicit defaults and are cleared by the
    /// sanitize pass on the next reorder.
    pub fn remove(&mut self, id: PrimitiveId) -> Result<(), GraphError> {
        let index = self.index_of(id).ok_or(GraphError::UnknownPrimitive(id))?;
        self.order.remove(index);
        self.nodes.remove(&id);
        debug!("remove {}", id);
        self.notify(GraphEvent::Structure {
            edit: "Remove filter primitive",
        });
        Ok(())
    }

    /// Move a primitive to `new_pos` (clamped), then sanitize: any reference
    /// from or to the moved node that now violates the no-forward-reference
    /// invariant is cleared, as are references left dangling by earlier
    /// out-of-band edits. One undoable edit covers the whole operation.
    pub fn reorder(&mut self, id: PrimitiveId, new_pos: usize) -> Result<(), GraphError> {
        let index = self.index_of(id).ok_or(GraphError::UnknownPrimitive(id))?;
        let new_pos = new_pos.min(self.order.len() - 1);
        if new_pos != index {
            self.order.remove(index);
            self.order.insert(new_pos, id);
        }
        self.sanitize(id);
        debug!("reorder {}: {} -> {}", id, index, new_pos);
        self.notify(GraphEvent::Structure {
            edit: "Reorder filter primitive",
        });
        Ok(())
    }

    // === Attribute edits ===

    /// Store `value` in a slot of `id`.
    ///
    /// For merge primitives the slot must address an existing merge input;
    /// use [`append_merge_input`](Self::append_merge_input) for the trailing
    /// "add" slot. Returns `true` when the stored value actually changed.
    pub fn set_input(
        &mut self,
        id: PrimitiveId,
        slot: usize,
        value: InputRef,
    ) -> Result<bool, GraphError> {
        let prim = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::UnknownPrimitive(id))?;
        let count = prim.input_count();
        let fixed_count = prim.kind().fixed_input_count();
        let (changed, edit) = match prim.inputs_mut() {
            PrimitiveInputs::Fixed { input, input2 } => {
                let slot_ref = match slot {
                    0 if fixed_count >= 1 => input,
                    1 if fixed_count >= 2 => input2,
                    _ => return Err(GraphError::SlotOutOfRange { id, slot, count }),
                };
                let changed = *slot_ref != value;
                *slot_ref = value;
                (changed, "Set filter primitive input")
            }
            PrimitiveInputs::Merge(inputs) => {
                if slot >= inputs.len() {
                    return Err(GraphError::SlotOutOfRange { id, slot, count });
                }
                let changed = inputs[slot] != value;
                inputs[slot] = value;
                (changed, "Set merge node input")
            }
        };
        if changed {
            self.notify(GraphEvent::Attribute { id, edit });
        }
        Ok(changed)
    }

    /// Append a merge input to a merge primitive and return its slot index.
    pub fn append_merge_input(
        &mut self,
        id: PrimitiveId,
        value: InputRef,
    ) -> Result<usize, GraphError> {
        let prim = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::UnknownPrimitive(id))?;
        let slot = match prim.inputs_mut() {
            PrimitiveInputs::Merge(inputs) => {
                inputs.push(value);
                inputs.len() - 1
            }
            PrimitiveInputs::Fixed { .. } => return Err(GraphError::NotAMerge(id)),
        };
        self.notify(GraphEvent::Attribute {
            id,
            edit: "Add merge node",
        });
        Ok(slot)
    }

    /// Delete an existing merge input; later inputs shift down.
    pub fn remove_merge_input(&mut self, id: PrimitiveId, slot: usize) -> Result<(), GraphError> {
        let prim = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::UnknownPrimitive(id))?;
        let count = prim.input_count();
        match prim.inputs_mut() {
            PrimitiveInputs::Merge(inputs) => {
                if slot >= inputs.len() {
                    return Err(GraphError::SlotOutOfRange { id, slot, count });
                }
                inputs.remove(slot);
            }
            PrimitiveInputs::Fixed { .. } => return Err(GraphError::NotAMerge(id)),
        }
        self.notify(GraphEvent::Attribute {
            id,
            edit: "Remove merge node",
        });
        Ok(())
    }

    /// Set or clear the output identifier of `id`.
    pub fn set_result(&mut self, id: PrimitiveId, image: Option<u32>) -> Result<bool, GraphError> {
        let prim = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::UnknownPrimitive(id))?;
        let changed = prim.result() != image;
        prim.set_result(image);
        if let Some(image) = image {
            // Keep the counter ahead of any hand-assigned number.
            self.next_image = self.next_image.max(image + 1);
        }
        if changed {
            self.notify(GraphEvent::Attribute {
                id,
                edit: "Set filter primitive result",
            });
        }
        Ok(changed)
    }

    /// Return the output identifier of `id`, synthesizing and assigning one
    /// from the filter's image counter if it has none.
    pub fn ensure_result(&mut self, id: PrimitiveId) -> Result<u32, GraphError> {
        let prim = self.nodes.get(&id).ok_or(GraphError::UnknownPrimitive(id))?;
        if let Some(image) = prim.result() {
            return Ok(image);
        }
        let image = self.next_image;
        self.next_image += 1;
        self.set_result(id, Some(image))?;
        Ok(image)
    }

    // === Sanitize ===

    /// Clear every input reference that violates the no-forward-reference
    /// invariant relative to `moved`, plus any reference that no longer
    /// resolves to an earlier output at all.
    fn sanitize(&mut self, moved: PrimitiveId) {
        let Some(moved_pos) = self.index_of(moved) else {
            return;
        };
        let moved_result = self.nodes[&moved].result();

        // References from earlier rows to the moved node are now forward.
        if let Some(result) = moved_result {
            for i in 0..moved_pos {
                let id = self.order[i];
                self.clear_refs_to(id, result);
            }
        }
        // References the moved node holds to rows at or after its position.
        let later_results: Vec<u32> = self.order[moved_pos..]
            .iter()
            .filter(|&&id| id != moved)
            .filter_map(|&id| self.nodes[&id].result())
            .collect();
        for result in later_results {
            self.clear_refs_to(moved, result);
        }

        // Opportunistic pass: drop references that resolve to nothing.
        let order = self.order.clone();
        for (row, &id) in order.iter().enumerate() {
            let dangling: Vec<u32> = self
                .image_refs(id)
                .into_iter()
                .filter(|&img| self.find_output_before(img, row).is_none())
                .collect();
            for img in dangling {
                self.clear_refs_to(id, img);
            }
        }
    }

    /// All explicit image references held by `id`.
    fn image_refs(&self, id: PrimitiveId) -> Vec<u32> {
        let Some(prim) = self.nodes.get(&id) else {
            return Vec::new();
        };
        let refs: Vec<InputRef> = match prim.inputs() {
            PrimitiveInputs::Fixed { input, input2 } => vec![*input, *input2],
            PrimitiveInputs::Merge(inputs) => inputs.clone(),
        };
        refs.into_iter()
            .filter_map(|r| match r {
                InputRef::Image(img) => Some(img),
                _ => None,
            })
            .collect()
    }

    /// Clear every input of `id` that references the output `image`.
    /// Merge inputs are cleared, not deleted, so slot counts stay stable.
    fn clear_refs_to(&mut self, id: PrimitiveId, image: u32) {
        let Some(prim) = self.nodes.get_mut(&id) else {
            return;
        };
        let target = InputRef::Image(image);
        match prim.inputs_mut() {
            PrimitiveInputs::Fixed { input, input2 } => {
                if *input == target {
                    debug!("sanitize: clear in of {}", id);
                    *input = InputRef::Unset;
                }
                if *input2 == target {
                    debug!("sanitize: clear in2 of {}", id);
                    *input2 = InputRef::Unset;
                }
            }
            PrimitiveInputs::Merge(inputs) => {
                for (slot, input) in inputs.iter_mut().enumerate() {
                    if *input == target {
                        debug!("sanitize: clear merge input {} of {}", slot, id);
                        *input = InputRef::Unset;
                    }
                }
            }
        }
    }
}
