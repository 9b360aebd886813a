//! Interactive polygon vertex editing.
//!
//! A [`PolygonEditSession`] turns pointer events plus modifier state into
//! vertex removals and insertions on a polygon ROI. It works on an immutable
//! snapshot of the polygon and hands every edit back as a new polygon; the
//! caller decides whether to install it.
//!
//! Gestures:
//! - eraser modifier + release near a vertex: remove that vertex
//! - insert modifier + release anywhere: insert a vertex after the nearest one
//!
//! Anything else is forwarded to the default move behavior.

use crate::annotation::{AnnotationId, Point, PolygonRoi, Roi};
use crate::config::EditConfig;
use crate::error::EditError;
use crate::viewer::{EditContext, Modifiers, PointerEvent};

/// Which edit gesture the current modifiers arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Idle,
    EraserArmed,
    InsertArmed,
}

/// Outcome of a pointer press or release.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionResult {
    /// Nothing changed.
    NoChange,
    /// The selected ROI isn't a polygon; the event went to the move tool.
    NotApplicable,
    /// A vertex was removed; carries the new polygon.
    VertexRemoved(PolygonRoi),
    /// A vertex was inserted; carries the new polygon.
    VertexInserted(PolygonRoi),
}

impl InteractionResult {
    /// The new polygon, if this result is a mutation.
    pub fn polygon(&self) -> Option<&PolygonRoi> {
        match self {
            InteractionResult::VertexRemoved(poly) | InteractionResult::VertexInserted(poly) => {
                Some(poly)
            }
            InteractionResult::NoChange | InteractionResult::NotApplicable => None,
        }
    }

    pub fn is_mutation(&self) -> bool {
        self.polygon().is_some()
    }

    /// Short name, used in logs and replay output.
    pub fn name(&self) -> &'static str {
        match self {
            InteractionResult::NoChange => "no_change",
            InteractionResult::NotApplicable => "not_applicable",
            InteractionResult::VertexRemoved(_) => "vertex_removed",
            InteractionResult::VertexInserted(_) => "vertex_inserted",
        }
    }
}

/// Cursor the viewer should show for the current pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    /// Viewer is busy; keep the waiting cursor.
    Wait,
    /// A translation is in progress.
    Move,
    DefaultPointer,
    /// Releasing now would remove a vertex.
    Remove,
    /// Releasing now would insert a vertex.
    Crosshair,
}

impl CursorHint {
    pub fn name(&self) -> &'static str {
        match self {
            CursorHint::Wait => "wait",
            CursorHint::Move => "move",
            CursorHint::DefaultPointer => "default",
            CursorHint::Remove => "remove",
            CursorHint::Crosshair => "crosshair",
        }
    }
}

/// Hint implied by viewer state alone, before looking at the selection.
pub(crate) fn viewer_cursor_hint(ctx: &EditContext<'_>) -> Option<CursorHint> {
    if ctx.status.is_busy() {
        Some(CursorHint::Wait)
    } else if ctx.status.is_translating() {
        Some(CursorHint::Move)
    } else {
        None
    }
}

/// Map `event` into image space, refusing positions no vertex can be compared to.
fn finite_image_point(event: &PointerEvent, ctx: &EditContext<'_>) -> Result<Point, EditError> {
    let point = ctx.image_point(event);
    if point.is_finite() {
        Ok(point)
    } else {
        Err(EditError::NonFinitePointer {
            x: point.x,
            y: point.y,
        })
    }
}

/// Editing state for one selected annotation.
#[derive(Debug, Clone)]
pub struct PolygonEditSession {
    annotation_id: AnnotationId,
    roi: Roi,
    locked: bool,
    editable: bool,
    mode: EditMode,
    last_pointer: Option<Point>,
    config: EditConfig,
}

impl PolygonEditSession {
    /// Start a session on a snapshot of `roi`.
    ///
    /// A locked or non-editable annotation yields a pass-through session that
    /// forwards every event to the move tool and never edits.
    pub fn begin(
        annotation_id: AnnotationId,
        roi: Roi,
        locked: bool,
        editable: bool,
        config: &EditConfig,
    ) -> Self {
        log::debug!(
            "Polygon edit: begin session for annotation {} ({}, locked={}, editable={})",
            annotation_id,
            roi.kind_name(),
            locked,
            editable
        );
        Self {
            annotation_id,
            roi,
            locked,
            editable,
            mode: EditMode::Idle,
            last_pointer: None,
            config: config.clone(),
        }
    }

    pub fn annotation_id(&self) -> AnnotationId {
        self.annotation_id
    }

    /// The session's current snapshot of the ROI.
    pub fn roi(&self) -> &Roi {
        &self.roi
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_pass_through(&self) -> bool {
        self.locked || !self.editable
    }

    /// Derive the edit mode from modifier state. Eraser wins if both are held.
    pub fn mode_for(&self, modifiers: &Modifiers) -> EditMode {
        if self.config.eraser_modifier.is_held(modifiers) {
            EditMode::EraserArmed
        } else if self.config.insert_modifier.is_held(modifiers) {
            EditMode::InsertArmed
        } else {
            EditMode::Idle
        }
    }

    /// Nearest vertex of the snapshot to `point`, as `(index, distance)`.
    pub fn nearest_vertex(&self, point: &Point) -> Result<(usize, f64), EditError> {
        match &self.roi {
            Roi::Polygon(poly) => poly.nearest_vertex(point),
            other => Err(EditError::NotPolygon {
                kind: other.kind_name(),
            }),
        }
    }

    /// Nearest vertex to the last pointer position seen by this session.
    pub fn nearest_to_last_pointer(&self) -> Option<(usize, f64)> {
        let pointer = self.last_pointer?;
        self.nearest_vertex(&pointer).ok()
    }

    /// Handle a pointer press.
    ///
    /// An armed edit gesture on a polygon swallows the press so the move tool
    /// never starts a drag; it never edits on its own.
    pub fn on_pointer_down(
        &mut self,
        event: &PointerEvent,
        ctx: &mut EditContext<'_>,
    ) -> InteractionResult {
        self.mode = self.mode_for(&event.modifiers);

        if self.is_pass_through() {
            ctx.fallback.pointer_pressed(event);
            return InteractionResult::NoChange;
        }
        if self.roi.as_polygon().is_none() {
            ctx.fallback.pointer_pressed(event);
            return InteractionResult::NotApplicable;
        }
        if self.mode == EditMode::Idle {
            ctx.fallback.pointer_pressed(event);
        }
        InteractionResult::NoChange
    }

    /// Handle a pointer release, applying at most one vertex edit.
    pub fn on_pointer_up(
        &mut self,
        event: &PointerEvent,
        ctx: &mut EditContext<'_>,
    ) -> InteractionResult {
        self.mode = self.mode_for(&event.modifiers);

        if self.is_pass_through() {
            ctx.fallback.pointer_released(event);
            return InteractionResult::NoChange;
        }
        let Roi::Polygon(poly) = &self.roi else {
            ctx.fallback.pointer_released(event);
            return InteractionResult::NotApplicable;
        };
        if self.mode == EditMode::Idle {
            ctx.fallback.pointer_released(event);
            return InteractionResult::NoChange;
        }

        let edited = finite_image_point(event, ctx).and_then(|pointer| {
            self.last_pointer = Some(pointer);
            match self.mode {
                EditMode::EraserArmed => Self::erase(poly, &pointer, self.config.erase_radius),
                EditMode::InsertArmed => Self::insert(poly, pointer).map(Some),
                EditMode::Idle => Ok(None),
            }
        });

        match edited {
            Ok(Some(result)) => {
                if let Some(new_poly) = result.polygon() {
                    self.roi = Roi::Polygon(new_poly.clone());
                }
                result
            }
            Ok(None) => {
                ctx.fallback.pointer_released(event);
                InteractionResult::NoChange
            }
            Err(e) => {
                log::warn!(
                    "Polygon edit: aborting release on annotation {}: {}",
                    self.annotation_id,
                    e
                );
                InteractionResult::NoChange
            }
        }
    }

    /// Predict what a release at this position would do.
    ///
    /// Never edits. The move tool always sees the event first.
    pub fn on_pointer_move(
        &mut self,
        event: &PointerEvent,
        ctx: &mut EditContext<'_>,
    ) -> CursorHint {
        ctx.fallback.pointer_moved(event);
        self.mode = self.mode_for(&event.modifiers);

        if let Some(hint) = viewer_cursor_hint(ctx) {
            return hint;
        }
        if self.is_pass_through() {
            return CursorHint::DefaultPointer;
        }
        let Roi::Polygon(poly) = &self.roi else {
            return CursorHint::DefaultPointer;
        };

        if self.mode == EditMode::Idle {
            return CursorHint::DefaultPointer;
        }

        let pointer = match finite_image_point(event, ctx) {
            Ok(pointer) => pointer,
            Err(e) => {
                log::warn!(
                    "Polygon edit: ignoring move on annotation {}: {}",
                    self.annotation_id,
                    e
                );
                return CursorHint::DefaultPointer;
            }
        };
        self.last_pointer = Some(pointer);

        match self.mode {
            EditMode::EraserArmed => match poly.nearest_vertex(&pointer) {
                Ok((_, distance)) if distance < self.config.erase_radius => CursorHint::Remove,
                _ => CursorHint::DefaultPointer,
            },
            EditMode::InsertArmed => CursorHint::Crosshair,
            EditMode::Idle => CursorHint::DefaultPointer,
        }
    }

    /// Remove the vertex nearest to `pointer` if it's strictly within `radius`.
    fn erase(
        poly: &PolygonRoi,
        pointer: &Point,
        radius: f64,
    ) -> Result<Option<InteractionResult>, EditError> {
        let (index, distance) = poly.nearest_vertex(pointer)?;
        let within = distance < radius;
        if !within {
            log::trace!(
                "Polygon edit: nearest vertex {} is {:.2} away, outside erase radius",
                index,
                distance
            );
            return Ok(None);
        }
        let new_poly = poly.with_vertex_removed(index)?;
        log::debug!(
            "Polygon edit: removed vertex {} ({} vertices left)",
            index,
            new_poly.len()
        );
        Ok(Some(InteractionResult::VertexRemoved(new_poly)))
    }

    /// Insert `pointer` right after the vertex nearest to it.
    fn insert(poly: &PolygonRoi, pointer: Point) -> Result<InteractionResult, EditError> {
        let (index, _) = poly.nearest_vertex(&pointer)?;
        let new_poly = poly.with_vertex_inserted(index + 1, pointer)?;
        log::debug!(
            "Polygon edit: inserted vertex at index {} ({:.1}, {:.1})",
            index + 1,
            pointer.x,
            pointer.y
        );
        Ok(InteractionResult::VertexInserted(new_poly))
    }
}
