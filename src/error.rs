//! Error types for polygon editing.

use thiserror::Error;

use crate::annotation::AnnotationId;

/// Errors that can occur while editing a polygon ROI.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// A nearest-vertex query was made on a polygon with no vertices
    #[error("Malformed polygon: nearest-vertex query needs at least 1 vertex, found {vertices}")]
    MalformedPolygon {
        /// Number of vertices the polygon had
        vertices: usize,
    },

    /// A session was requested while another annotation's session is active
    #[error(
        "Invalid mode transition: session for annotation {active} is active, \
         cannot begin one for {requested}"
    )]
    InvalidModeTransition {
        /// Annotation owning the in-flight session
        active: AnnotationId,
        /// Annotation the caller tried to begin editing
        requested: AnnotationId,
    },

    /// A vertex query was made on an ROI that isn't a polygon
    #[error("Not a polygon: {kind} ROIs have no editable vertices")]
    NotPolygon {
        /// Kind of the ROI, e.g. "rectangle"
        kind: &'static str,
    },

    /// A pointer mapped to a non-finite image position
    #[error("Pointer maps to non-finite image position ({x}, {y})")]
    NonFinitePointer { x: f64, y: f64 },

    /// A viewer transform with a zoom that can't be inverted
    #[error("Invalid zoom {zoom}: must be finite and positive")]
    InvalidZoom { zoom: f64 },

    /// A viewer transform with a non-finite pan offset
    #[error("Invalid pan ({pan_x}, {pan_y}): must be finite")]
    InvalidPan { pan_x: f64, pan_y: f64 },

    /// No annotation is selected
    #[error("No annotation selected")]
    NoSelection,

    /// Vertex index outside the polygon
    #[error("Vertex index {index} out of range for polygon with {len} vertices")]
    VertexOutOfRange {
        /// The offending index
        index: usize,
        /// Number of vertices in the polygon
        len: usize,
    },
}
