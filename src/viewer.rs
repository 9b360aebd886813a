//! Viewer-side collaborators of the polygon edit session.
//!
//! The session never talks to a windowing toolkit directly. Everything it
//! needs from the viewer (coordinate mapping, busy/translation state, the
//! default move behavior, change notification) goes through the traits here.

use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, Point};
use crate::error::EditError;

/// Keyboard modifier state at the time of a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A pointer event in viewer-local (component) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self { x, y, modifiers }
    }
}

/// Maps viewer-local coordinates into image coordinates.
pub trait CoordinateTransform {
    fn component_point_to_image_point(&self, x: f64, y: f64) -> Point;
}

/// Read-only viewer state that influences cursor hints.
pub trait ViewerStatus {
    /// The viewer shows a busy/waiting cursor.
    fn is_busy(&self) -> bool;
    /// A drag/translate of the selected object is in progress.
    fn is_translating(&self) -> bool;
}

/// The ordinary move/select tool that edit gestures fall back to.
pub trait MoveBehavior {
    fn pointer_pressed(&mut self, event: &PointerEvent);
    fn pointer_released(&mut self, event: &PointerEvent);
    fn pointer_moved(&mut self, event: &PointerEvent);
}

/// Sink for "objects changed" notifications on the hierarchy.
pub trait ChangeNotifier {
    fn objects_changed(&mut self, annotation: &Annotation);
}

impl<F: FnMut(&Annotation)> ChangeNotifier for F {
    fn objects_changed(&mut self, annotation: &Annotation) {
        self(annotation)
    }
}

/// The collaborators an edit session consults while handling one event.
pub struct EditContext<'a> {
    pub transform: &'a dyn CoordinateTransform,
    pub status: &'a dyn ViewerStatus,
    pub fallback: &'a mut dyn MoveBehavior,
}

impl<'a> EditContext<'a> {
    pub fn new(
        transform: &'a dyn CoordinateTransform,
        status: &'a dyn ViewerStatus,
        fallback: &'a mut dyn MoveBehavior,
    ) -> Self {
        Self {
            transform,
            status,
            fallback,
        }
    }

    /// Image-space position of `event`.
    pub fn image_point(&self, event: &PointerEvent) -> Point {
        self.transform.component_point_to_image_point(event.x, event.y)
    }
}

// ============================================================================
// Headless Implementations
// ============================================================================

/// Pan/zoom transform state of a viewer.
///
/// Component coordinates relate to image coordinates by
/// `component = image * zoom + pan`. Deserialization rejects a zoom that
/// is not finite and positive, and non-finite pans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransformParams")]
pub struct Transform {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

#[derive(Deserialize)]
struct TransformParams {
    zoom: f64,
    #[serde(default)]
    pan_x: f64,
    #[serde(default)]
    pan_y: f64,
}

impl TryFrom<TransformParams> for Transform {
    type Error = EditError;

    fn try_from(params: TransformParams) -> Result<Self, Self::Error> {
        Transform::try_new(params.zoom, params.pan_x, params.pan_y)
    }
}

impl Transform {
    /// Create a new transform with the given zoom and pan.
    pub fn new(zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Like [`Transform::new`], but only for an invertible, finite transform.
    pub fn try_new(zoom: f64, pan_x: f64, pan_y: f64) -> Result<Self, EditError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(EditError::InvalidZoom { zoom });
        }
        if !pan_x.is_finite() || !pan_y.is_finite() {
            return Err(EditError::InvalidPan { pan_x, pan_y });
        }
        Ok(Self::new(zoom, pan_x, pan_y))
    }

    /// Create an identity transform (zoom=1, no pan).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Map an image point back into component coordinates.
    pub fn image_point_to_component_point(&self, point: &Point) -> (f64, f64) {
        (
            point.x * self.zoom + self.pan_x,
            point.y * self.zoom + self.pan_y,
        )
    }

    /// Apply a pan delta to the transform.
    pub fn pan_by(&self, dx: f64, dy: f64) -> Transform {
        Transform {
            zoom: self.zoom,
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl CoordinateTransform for Transform {
    fn component_point_to_image_point(&self, x: f64, y: f64) -> Point {
        Point::new((x - self.pan_x) / self.zoom, (y - self.pan_y) / self.zoom)
    }
}

/// Fixed viewer status, for headless drivers and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticStatus {
    pub busy: bool,
    pub translating: bool,
}

impl ViewerStatus for StaticStatus {
    fn is_busy(&self) -> bool {
        self.busy
    }

    fn is_translating(&self) -> bool {
        self.translating
    }
}

/// Move behavior that only counts and traces forwarded events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassiveMove {
    pub pressed: usize,
    pub released: usize,
    pub moved: usize,
}

impl MoveBehavior for PassiveMove {
    fn pointer_pressed(&mut self, event: &PointerEvent) {
        self.pressed += 1;
        log::trace!("Move tool: pressed at ({:.1}, {:.1})", event.x, event.y);
    }

    fn pointer_released(&mut self, event: &PointerEvent) {
        self.released += 1;
        log::trace!("Move tool: released at ({:.1}, {:.1})", event.x, event.y);
    }

    fn pointer_moved(&mut self, _event: &PointerEvent) {
        self.moved += 1;
    }
}
