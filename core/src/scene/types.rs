//! scene/types.rs
//! Scene items, point quantization and builder validation errors.
//!
//! Design notes:
//! - Points are stored already quantized, so what the builder keeps is
//!   exactly what a reader decodes.
//! - `Tool` is a closed registry of pen ids; `color` stays a raw `u32`
//!   with `PenColor` as the known palette.

use std::f64::consts::TAU;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::scales;
use crate::ids::{CrdtId, IdError, LwwValue};

/// Drawing tools (pen ids as stored on the device).
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize)]
pub enum Tool {
    Paintbrush1       = 0,
    Pencil1           = 1,
    Ballpoint1        = 2,
    Marker1           = 3,
    Fineliner1        = 4,
    Highlighter1      = 5,
    Eraser            = 6,
    MechanicalPencil1 = 7,
    EraserArea        = 8,
    Selector          = 10,
    Paintbrush2       = 12,
    MechanicalPencil2 = 13,
    Pencil2           = 14,
    Ballpoint2        = 15,
    Marker2           = 16,
    Fineliner2        = 17,
    Highlighter2      = 18,
    Calligraphy       = 21,
    Shader            = 23,
}

impl Tool {
    pub fn is_highlighter(self) -> bool {
        matches!(self, Tool::Highlighter1 | Tool::Highlighter2)
    }

    pub fn is_eraser(self) -> bool {
        matches!(self, Tool::Eraser | Tool::EraserArea)
    }

    pub fn name(self) -> &'static str {
        match self {
            Tool::Paintbrush1 | Tool::Paintbrush2             => "paintbrush",
            Tool::Pencil1 | Tool::Pencil2                     => "pencil",
            Tool::Ballpoint1 | Tool::Ballpoint2               => "ballpoint",
            Tool::Marker1 | Tool::Marker2                     => "marker",
            Tool::Fineliner1 | Tool::Fineliner2               => "fineliner",
            Tool::Highlighter1 | Tool::Highlighter2           => "highlighter",
            Tool::Eraser                                      => "eraser",
            Tool::EraserArea                                  => "eraser-area",
            Tool::MechanicalPencil1 | Tool::MechanicalPencil2 => "mechanical-pencil",
            Tool::Selector                                    => "selector",
            Tool::Calligraphy                                 => "calligraphy",
            Tool::Shader                                      => "shader",
        }
    }
}

/// Known palette entries for `Stroke::color` / `Highlight::color`.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize)]
pub enum PenColor {
    Black       = 0,
    Gray        = 1,
    White       = 2,
    Yellow      = 3,
    Green       = 4,
    Pink        = 5,
    Blue        = 6,
    Red         = 7,
    GrayOverlap = 8,
    Highlight   = 9,
    Green2      = 10,
    Cyan        = 11,
    Magenta     = 12,
    Yellow2     = 13,
}

/// One sample of a stroke in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    /// 0.0 ..= 1.0
    pub pressure: f32,
    pub speed: f32,
    /// radians
    pub direction: f32,
    /// per-point width, used for tapering
    pub width: f32,
}

/// Fixed-point form of a `Point`, exactly as it sits on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRecord {
    pub x: f32,
    pub y: f32,
    pub pressure: u8,
    pub speed: u16,
    pub direction: u8,
    pub width: u16,
}

impl Point {
    /// Point with full pressure, no speed/direction and the given width.
    pub fn new(x: f32, y: f32, width: f32) -> Self {
        Self { x, y, pressure: 1.0, speed: 0.0, direction: 0.0, width }
    }

    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = pressure;
        self
    }

    pub fn with_motion(mut self, speed: f32, direction: f32) -> Self {
        self.speed = speed;
        self.direction = direction;
        self
    }

    /// Quantize into the wire record.
    ///
    /// `index` only labels the error.
    pub fn to_record(&self, index: usize) -> Result<PointRecord, ValidationError> {
        let bad = |field: &'static str, reason: String| ValidationError::Point { index, field, reason };

        if !self.x.is_finite() {
            return Err(bad("x", format!("{} is not finite", self.x)));
        }
        if !self.y.is_finite() {
            return Err(bad("y", format!("{} is not finite", self.y)));
        }

        let pressure = self.pressure as f64;
        if !(0.0..=1.0).contains(&pressure) {
            return Err(bad("pressure", format!("{} outside [0, 1]", self.pressure)));
        }

        let speed = self.speed as f64;
        if !speed.is_finite() || speed < 0.0 {
            return Err(bad("speed", format!("{} must be finite and >= 0", self.speed)));
        }
        let speed_q = (speed * scales::SPEED).round();
        if speed_q > u16::MAX as f64 {
            return Err(bad("speed", format!("{} exceeds {}", self.speed, u16::MAX as f64 / scales::SPEED)));
        }

        let direction = self.direction as f64;
        if !direction.is_finite() {
            return Err(bad("direction", format!("{} is not finite", self.direction)));
        }
        let steps = (direction.rem_euclid(TAU) * scales::DIRECTION_STEPS / TAU).round() as u32;
        let direction_q = (steps % scales::DIRECTION_STEPS as u32) as u8;

        let width = self.width as f64;
        if !width.is_finite() || width <= 0.0 {
            return Err(bad("width", format!("{} must be finite and > 0", self.width)));
        }
        let width_q = (width * scales::WIDTH).round();
        if width_q < 1.0 {
            return Err(bad("width", format!("{} is below the encodable resolution", self.width)));
        }
        if width_q > u16::MAX as f64 {
            return Err(bad("width", format!("{} exceeds {}", self.width, u16::MAX as f64 / scales::WIDTH)));
        }

        Ok(PointRecord {
            x: self.x,
            y: self.y,
            pressure: (pressure * scales::PRESSURE).round() as u8,
            speed: speed_q as u16,
            direction: direction_q,
            width: width_q as u16,
        })
    }

    pub fn from_record(r: &PointRecord) -> Self {
        Self {
            x: r.x,
            y: r.y,
            pressure: (r.pressure as f64 / scales::PRESSURE) as f32,
            speed: (r.speed as f64 / scales::SPEED) as f32,
            direction: (r.direction as f64 * TAU / scales::DIRECTION_STEPS) as f32,
            width: (r.width as f64 / scales::WIDTH) as f32,
        }
    }

    /// Snap to the values a decoder would reproduce.
    pub fn quantized(&self, index: usize) -> Result<Point, ValidationError> {
        Ok(Point::from_record(&self.to_record(index)?))
    }
}

/// Layer or sub-group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: CrdtId,
    pub parent_id: CrdtId,
    pub label: LwwValue<String>,
    pub visible: LwwValue<bool>,
}

impl Group {
    pub fn label(&self) -> &str {
        &self.label.value
    }

    pub fn is_visible(&self) -> bool {
        self.visible.value
    }
}

/// A pen line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: CrdtId,
    pub parent_id: CrdtId,
    pub tool: Tool,
    pub color: u32,
    /// nominal width (thickness scale)
    pub width: f64,
    pub points: Vec<Point>,
}

impl Stroke {
    /// `PenColor` if the color is a known palette entry.
    pub fn pen_color(&self) -> Option<PenColor> {
        PenColor::try_from(self.color).ok()
    }

    /// First and last point coincide.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => self.points.len() > 1 && a == b,
            _ => false,
        }
    }
}

/// Axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Text highlight over the underlying page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub id: CrdtId,
    pub parent_id: CrdtId,
    pub color: u32,
    pub text: String,
    /// character offset into the page text, when known
    pub start: Option<u64>,
    pub length: u64,
    pub rectangles: Vec<Rect>,
}

/// Page counters carried in the page info block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub loads_count: u64,
    pub merges_count: u64,
    pub text_chars_count: u64,
    pub text_lines_count: u64,
}

/// Leaf items owned by a group, kept in creation order.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneItem {
    Stroke(Stroke),
    Highlight(Highlight),
}

impl SceneItem {
    pub fn id(&self) -> CrdtId {
        match self {
            SceneItem::Stroke(s) => s.id,
            SceneItem::Highlight(h) => h.id,
        }
    }

    pub fn parent_id(&self) -> CrdtId {
        match self {
            SceneItem::Stroke(s) => s.parent_id,
            SceneItem::Highlight(h) => h.parent_id,
        }
    }
}

/// Borrowed view over any node of the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneNode<'a> {
    Group(&'a Group),
    Stroke(&'a Stroke),
    Highlight(&'a Highlight),
}

impl<'a> SceneNode<'a> {
    pub fn id(&self) -> CrdtId {
        match self {
            SceneNode::Group(g) => g.id,
            SceneNode::Stroke(s) => s.id,
            SceneNode::Highlight(h) => h.id,
        }
    }

    pub fn parent_id(&self) -> CrdtId {
        match self {
            SceneNode::Group(g) => g.parent_id,
            SceneNode::Stroke(s) => s.parent_id,
            SceneNode::Highlight(h) => h.parent_id,
        }
    }

    /// CRDT sequence key within the parent. The id doubles as the key.
    pub fn sequence_key(&self) -> CrdtId {
        self.id()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SceneNode::Group(_) => "group",
            SceneNode::Stroke(_) => "stroke",
            SceneNode::Highlight(_) => "highlight",
        }
    }
}

impl<'a> From<&'a SceneItem> for SceneNode<'a> {
    fn from(item: &'a SceneItem) -> Self {
        match item {
            SceneItem::Stroke(s) => SceneNode::Stroke(s),
            SceneItem::Highlight(h) => SceneNode::Highlight(h),
        }
    }
}

/// Bad value handed to the builder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: {parent} is not a group of this document")]
    UnknownParent { field: &'static str, parent: CrdtId },

    #[error("{field}: the root cannot own {what} directly")]
    RootParent { field: &'static str, what: &'static str },

    #[error("{field}: must not be empty")]
    Empty { field: &'static str },

    #[error("{field}: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    #[error("point[{index}].{field}: {reason}")]
    Point { index: usize, field: &'static str, reason: String },

    #[error("id: {id} is already used in this document")]
    DuplicateId { id: CrdtId },

    #[error("id: {0}")]
    Ids(#[from] IdError),
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::UnknownParent { field, .. }
            | ValidationError::RootParent { field, .. }
            | ValidationError::Empty { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Point { field, .. } => field,
            ValidationError::DuplicateId { .. } | ValidationError::Ids(_) => "id",
        }
    }
}
