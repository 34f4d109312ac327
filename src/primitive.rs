//! Core data types for the filter primitive pipeline.
//!
//! A filter is an ordered list of primitives. Each primitive consumes one or
//! two named images (or, for merge primitives, an arbitrary list of them) and
//! produces a single output image that later primitives can reference.

use std::fmt;

/// Stable identity of a primitive inside a [`FilterGraph`](crate::FilterGraph).
///
/// Components hold ids, never references to primitive data; the id stays
/// valid across reorders and attribute edits, and is retired on removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub u32);

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "primitive#{}", self.0)
    }
}

/// The fixed enumeration of filter primitive kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Blend,
    ColorMatrix,
    ComponentTransfer,
    Composite,
    ConvolveMatrix,
    DiffuseLighting,
    DisplacementMap,
    Flood,
    GaussianBlur,
    Image,
    Merge,
    Morphology,
    Offset,
    SpecularLighting,
    Tile,
    Turbulence,
}

impl PrimitiveKind {
    /// All kinds, in menu order.
    pub const ALL: [PrimitiveKind; 16] = [
        PrimitiveKind::Blend,
        PrimitiveKind::ColorMatrix,
        PrimitiveKind::ComponentTransfer,
        PrimitiveKind::Composite,
        PrimitiveKind::ConvolveMatrix,
        PrimitiveKind::DiffuseLighting,
        PrimitiveKind::DisplacementMap,
        PrimitiveKind::Flood,
        PrimitiveKind::GaussianBlur,
        PrimitiveKind::Image,
        PrimitiveKind::Merge,
        PrimitiveKind::Morphology,
        PrimitiveKind::Offset,
        PrimitiveKind::SpecularLighting,
        PrimitiveKind::Tile,
        PrimitiveKind::Turbulence,
    ];

    /// SVG element name for this kind.
    pub fn element_name(self) -> &'static str {
        match self {
            PrimitiveKind::Blend => "feBlend",
            PrimitiveKind::ColorMatrix => "feColorMatrix",
            PrimitiveKind::ComponentTransfer => "feComponentTransfer",
            PrimitiveKind::Composite => "feComposite",
            PrimitiveKind::ConvolveMatrix => "feConvolveMatrix",
            PrimitiveKind::DiffuseLighting => "feDiffuseLighting",
            PrimitiveKind::DisplacementMap => "feDisplacementMap",
            PrimitiveKind::Flood => "feFlood",
            PrimitiveKind::GaussianBlur => "feGaussianBlur",
            PrimitiveKind::Image => "feImage",
            PrimitiveKind::Merge => "feMerge",
            PrimitiveKind::Morphology => "feMorphology",
            PrimitiveKind::Offset => "feOffset",
            PrimitiveKind::SpecularLighting => "feSpecularLighting",
            PrimitiveKind::Tile => "feTile",
            PrimitiveKind::Turbulence => "feTurbulence",
        }
    }

    /// Number of fixed input slots for this kind.
    ///
    /// Merge primitives have no fixed slots; their input count is the number
    /// of merge inputs plus a trailing "add" slot, see
    /// [`Primitive::input_count`].
    pub fn fixed_input_count(self) -> usize {
        match self {
            PrimitiveKind::Blend | PrimitiveKind::Composite | PrimitiveKind::DisplacementMap => 2,
            PrimitiveKind::Merge => 0,
            _ => 1,
        }
    }

    /// Whether this kind owns an ordered list of merge inputs instead of
    /// fixed `in`/`in2` slots.
    pub fn is_merge(self) -> bool {
        matches!(self, PrimitiveKind::Merge)
    }
}

/// One of the fixed, non-node input origins a slot can draw from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StandardSource {
    SourceGraphic,
    SourceAlpha,
    BackgroundImage,
    BackgroundAlpha,
    FillPaint,
    StrokePaint,
}

impl StandardSource {
    /// All sources, in the column order used by the source-label region.
    pub const ALL: [StandardSource; 6] = [
        StandardSource::SourceGraphic,
        StandardSource::SourceAlpha,
        StandardSource::BackgroundImage,
        StandardSource::BackgroundAlpha,
        StandardSource::FillPaint,
        StandardSource::StrokePaint,
    ];

    /// SVG keyword for this source.
    pub fn keyword(self) -> &'static str {
        match self {
            StandardSource::SourceGraphic => "SourceGraphic",
            StandardSource::SourceAlpha => "SourceAlpha",
            StandardSource::BackgroundImage => "BackgroundImage",
            StandardSource::BackgroundAlpha => "BackgroundAlpha",
            StandardSource::FillPaint => "FillPaint",
            StandardSource::StrokePaint => "StrokePaint",
        }
    }

    /// Column index of this source in the label region.
    pub fn column(self) -> usize {
        Self::ALL.iter().position(|&s| s == self).unwrap_or(0)
    }

    /// Source for a given column index, clamped to the valid range.
    pub fn from_column(column: isize) -> StandardSource {
        let last = Self::ALL.len() as isize - 1;
        Self::ALL[column.clamp(0, last) as usize]
    }
}

/// An input slot's reference: a resolved or unresolved edge.
///
/// `Unset` resolves to an implicit default for fixed slots (see
/// [`resolve`](crate::resolve::resolve)) and to nothing for merge inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputRef {
    /// No explicit reference given.
    #[default]
    Unset,
    /// One of the fixed standard sources.
    Standard(StandardSource),
    /// The numeric image identifier of another primitive's output.
    Image(u32),
}

impl InputRef {
    pub fn is_unset(self) -> bool {
        matches!(self, InputRef::Unset)
    }
}

/// Input storage for one primitive: fixed `in`/`in2` slots, or an ordered
/// list of merge inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrimitiveInputs {
    Fixed { input: InputRef, input2: InputRef },
    Merge(Vec<InputRef>),
}

/// One node of the filter pipeline.
///
/// Owned by the [`FilterGraph`](crate::FilterGraph) arena; the view holds
/// only [`PrimitiveId`]s plus cached display fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Primitive {
    kind: PrimitiveKind,
    /// Output image number (`result` attribute), if assigned.
    result: Option<u32>,
    inputs: PrimitiveInputs,
}

impl Primitive {
    /// Create a primitive of the given kind with all inputs unset.
    pub fn new(kind: PrimitiveKind) -> Self {
        let inputs = if kind.is_merge() {
            PrimitiveInputs::Merge(Vec::new())
        } else {
            PrimitiveInputs::Fixed {
                input: InputRef::Unset,
                input2: InputRef::Unset,
            }
        };
        Self {
            kind,
            result: None,
            inputs,
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn result(&self) -> Option<u32> {
        self.result
    }

    pub(crate) fn set_result(&mut self, image: Option<u32>) {
        self.result = image;
    }

    /// Number of interactive input slots.
    ///
    /// Merge primitives expose one slot per merge input plus a trailing
    /// "add new input" slot; other kinds expose their fixed arity.
    pub fn input_count(&self) -> usize {
        match &self.inputs {
            PrimitiveInputs::Fixed { .. } => self.kind.fixed_input_count(),
            PrimitiveInputs::Merge(inputs) => inputs.len() + 1,
        }
    }

    /// The reference stored in `slot`, or `None` if the slot does not exist.
    ///
    /// A merge primitive's trailing "add" slot reports `Some(Unset)`: it is a
    /// real drop target even though nothing is stored there yet.
    pub fn input(&self, slot: usize) -> Option<InputRef> {
        match &self.inputs {
            PrimitiveInputs::Fixed { input, input2 } => match slot {
                0 if self.kind.fixed_input_count() >= 1 => Some(*input),
                1 if self.kind.fixed_input_count() >= 2 => Some(*input2),
                _ => None,
            },
            PrimitiveInputs::Merge(inputs) => {
                if slot < inputs.len() {
                    Some(inputs[slot])
                } else if slot == inputs.len() {
                    Some(InputRef::Unset)
                } else {
                    None
                }
            }
        }
    }

    pub(crate) fn inputs(&self) -> &PrimitiveInputs {
        &self.inputs
    }

    pub(crate) fn inputs_mut(&mut self) -> &mut PrimitiveInputs {
        &mut self.inputs
    }

    /// Number of stored merge inputs (zero for non-merge kinds).
    pub fn merge_input_count(&self) -> usize {
        match &self.inputs {
            PrimitiveInputs::Merge(inputs) => inputs.len(),
            PrimitiveInputs::Fixed { .. } => 0,
        }
    }
}
