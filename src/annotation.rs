//! Annotation data model.
//!
//! This module provides the core types for region-of-interest annotations:
//! - Geometry types (points, image planes, polygons)
//! - The tagged ROI variant
//! - Annotations and an in-memory store with selection

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::EditError;

/// Unique identifier for an annotation.
pub type AnnotationId = u64;

/// Minimum number of vertices required for a displayable polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

// ============================================================================
// Core Geometry Types
// ============================================================================

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// The image plane an ROI belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePlane {
    /// Channel index (-1 means all channels)
    pub c: i32,
    /// Z-slice index
    pub z: u32,
    /// Timepoint index
    pub t: u32,
}

impl ImagePlane {
    pub fn new(c: i32, z: u32, t: u32) -> Self {
        Self { c, z, t }
    }
}

impl Default for ImagePlane {
    fn default() -> Self {
        Self::new(-1, 0, 0)
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point is inside the box.
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// A closed polygon ROI.
///
/// Instances are immutable: the editing helpers return a new polygon and leave
/// `self` untouched, so a snapshot held by an edit session never aliases the
/// polygon installed on an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonRoi {
    points: Vec<Point>,
    #[serde(default)]
    plane: ImagePlane,
}

impl PolygonRoi {
    pub fn new(points: Vec<Point>, plane: ImagePlane) -> Self {
        Self { points, plane }
    }

    /// Build a polygon on the default plane from `(x, y)` pairs.
    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self::new(
            coords.iter().copied().map(Point::from).collect(),
            ImagePlane::default(),
        )
    }

    /// The vertices in boundary order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn plane(&self) -> ImagePlane {
        self.plane
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the polygon has enough vertices to enclose an area.
    pub fn is_valid(&self) -> bool {
        self.points.len() >= MIN_POLYGON_VERTICES
    }

    /// Find the vertex closest to `target`.
    ///
    /// Returns the vertex index and its distance. Ties resolve to the vertex
    /// that comes first in boundary order.
    pub fn nearest_vertex(&self, target: &Point) -> Result<(usize, f64), EditError> {
        let mut best: Option<(usize, f64)> = None;
        for (index, point) in self.points.iter().enumerate() {
            let distance = point.distance_to(target);
            let closer = match best {
                Some((_, best_distance)) => distance < best_distance,
                None => true,
            };
            if closer {
                best = Some((index, distance));
            }
        }
        best.ok_or(EditError::MalformedPolygon {
            vertices: self.points.len(),
        })
    }

    /// Return a copy of this polygon without the vertex at `index`.
    pub fn with_vertex_removed(&self, index: usize) -> Result<Self, EditError> {
        if index >= self.points.len() {
            return Err(EditError::VertexOutOfRange {
                index,
                len: self.points.len(),
            });
        }
        let mut points = self.points.clone();
        points.remove(index);
        Ok(Self::new(points, self.plane))
    }

    /// Return a copy of this polygon with `point` inserted at `index`.
    ///
    /// `index` may equal the vertex count, which appends.
    pub fn with_vertex_inserted(&self, index: usize, point: Point) -> Result<Self, EditError> {
        if index > self.points.len() {
            return Err(EditError::VertexOutOfRange {
                index,
                len: self.points.len(),
            });
        }
        let mut points = self.points.clone();
        points.insert(index, point);
        Ok(Self::new(points, self.plane))
    }

    /// Get the bounding box of the polygon.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        if self.points.is_empty() {
            return None;
        }

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Check if a point is inside the polygon (ray casting algorithm).
    pub fn contains(&self, point: &Point) -> bool {
        if !self.is_valid() {
            return false;
        }

        let mut inside = false;
        let n = self.points.len();

        let mut j = n - 1;
        for i in 0..n {
            let vi = &self.points[i];
            let vj = &self.points[j];

            if ((vi.y > point.y) != (vj.y > point.y))
                && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }
}

// ============================================================================
// ROI Variants
// ============================================================================

/// The shape of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Roi {
    /// A closed polygon. The only variant the edit session modifies.
    Polygon(PolygonRoi),
    /// An axis-aligned rectangle.
    Rectangle {
        bounds: BoundingBox,
        #[serde(default)]
        plane: ImagePlane,
    },
    /// An ellipse inscribed in `bounds`.
    Ellipse {
        bounds: BoundingBox,
        #[serde(default)]
        plane: ImagePlane,
    },
    /// A single point marker.
    Point {
        point: Point,
        #[serde(default)]
        plane: ImagePlane,
    },
}

impl Roi {
    /// Short name of the ROI kind, used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Roi::Polygon(_) => "polygon",
            Roi::Rectangle { .. } => "rectangle",
            Roi::Ellipse { .. } => "ellipse",
            Roi::Point { .. } => "point",
        }
    }

    pub fn plane(&self) -> ImagePlane {
        match self {
            Roi::Polygon(poly) => poly.plane(),
            Roi::Rectangle { plane, .. }
            | Roi::Ellipse { plane, .. }
            | Roi::Point { plane, .. } => *plane,
        }
    }

    pub fn as_polygon(&self) -> Option<&PolygonRoi> {
        match self {
            Roi::Polygon(poly) => Some(poly),
            _ => None,
        }
    }
}

impl From<PolygonRoi> for Roi {
    fn from(poly: PolygonRoi) -> Self {
        Roi::Polygon(poly)
    }
}

// ============================================================================
// Annotation
// ============================================================================

/// A single annotation on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub roi: Roi,
    /// Locked annotations ignore edit gestures.
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Annotation {
    pub fn new(id: AnnotationId, roi: Roi) -> Self {
        Self {
            id,
            roi,
            locked: false,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }
}

// ============================================================================
// Hierarchy Contract
// ============================================================================

/// What the polygon edit tool needs from the object hierarchy: the current
/// selection, its editability, and a way to install a new ROI.
pub trait AnnotationHierarchy {
    /// The currently selected annotation, if any.
    fn selected(&self) -> Option<&Annotation>;

    fn get(&self, id: AnnotationId) -> Option<&Annotation>;

    /// Whether edit gestures are currently allowed on `annotation`.
    fn is_editable(&self, annotation: &Annotation) -> bool;

    /// Replace the ROI of `id`, returning the previous one.
    fn set_roi(&mut self, id: AnnotationId, roi: Roi) -> Option<Roi>;
}

// ============================================================================
// Annotation Store
// ============================================================================

/// Storage for annotations on a single image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationStore {
    annotations: BTreeMap<AnnotationId, Annotation>,
    next_id: AnnotationId,
    /// When set, no annotation accepts edits regardless of its lock state.
    #[serde(default)]
    read_only: bool,
    #[serde(skip)]
    selected_id: Option<AnnotationId>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Add an annotation and return its ID.
    pub fn add(&mut self, roi: impl Into<Roi>) -> AnnotationId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.annotations.insert(id, Annotation::new(id, roi.into()));
        id
    }

    /// Insert an annotation keeping its ID.
    pub fn insert(&mut self, annotation: Annotation) {
        self.next_id = self.next_id.max(annotation.id + 1);
        self.annotations.insert(annotation.id, annotation);
    }

    /// Remove an annotation by ID.
    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        self.annotations.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.values()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Select an annotation. Unknown IDs clear the selection.
    pub fn select(&mut self, id: Option<AnnotationId>) {
        self.selected_id = id.filter(|id| self.annotations.contains_key(id));
    }

    pub fn selected_id(&self) -> Option<AnnotationId> {
        self.selected_id
    }

    /// Lock or unlock an annotation. Returns false if the ID is unknown.
    pub fn set_locked(&mut self, id: AnnotationId, locked: bool) -> bool {
        match self.annotations.get_mut(&id) {
            Some(ann) => {
                ann.locked = locked;
                true
            }
            None => false,
        }
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Export annotations to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Import annotations from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl AnnotationHierarchy for AnnotationStore {
    fn selected(&self) -> Option<&Annotation> {
        self.selected_id.and_then(|id| self.annotations.get(&id))
    }

    fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(&id)
    }

    fn is_editable(&self, _annotation: &Annotation) -> bool {
        !self.read_only
    }

    fn set_roi(&mut self, id: AnnotationId, roi: Roi) -> Option<Roi> {
        let ann = self.annotations.get_mut(&id)?;
        Some(std::mem::replace(&mut ann.roi, roi))
    }
}

// ============================================================================
// Tests
// ============================================================================
