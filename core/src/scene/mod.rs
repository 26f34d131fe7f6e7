//! Scene model.
//!
//! Responsibilities:
//! - Groups (layers), strokes, points and highlights
//! - Append-only builder that validates every field and allocates ids
//!
//! Non-responsibilities:
//! - Block ordering (see `linearize`)
//! - Bytes (see `codec`)

pub mod types;
pub mod document;

pub use types::{
    Group, Highlight, PageInfo, PenColor, Point, PointRecord, Rect, SceneItem, SceneNode, Stroke, Tool,
    ValidationError,
};
pub use document::Document;
