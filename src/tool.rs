//! The polygon edit tool: the caller side of [`PolygonEditSession`].
//!
//! The tool keeps at most one session alive, bound to the selected
//! annotation. It installs every polygon the session produces into the
//! hierarchy, records it for undo and fires a single change notification.

use crate::annotation::{Annotation, AnnotationHierarchy, AnnotationId, PolygonRoi, Roi};
use crate::config::EditConfig;
use crate::edit_session::{viewer_cursor_hint, CursorHint, InteractionResult, PolygonEditSession};
use crate::error::EditError;
use crate::undo::{self, Command, UndoConfig, UndoStack};
use crate::viewer::{ChangeNotifier, EditContext, PointerEvent};

/// Vertex editing tool for the selected polygon annotation.
#[derive(Debug, Clone)]
pub struct PolygonEditTool {
    config: EditConfig,
    session: Option<PolygonEditSession>,
    history: UndoStack,
}

impl PolygonEditTool {
    pub fn new(config: EditConfig) -> Self {
        let history = UndoStack::with_config(UndoConfig {
            max_history: config.max_undo_history,
        });
        Self {
            config,
            session: None,
            history,
        }
    }

    pub fn config(&self) -> &EditConfig {
        &self.config
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&PolygonEditSession> {
        self.session.as_ref()
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Begin editing the selected annotation.
    ///
    /// Fails with [`EditError::InvalidModeTransition`] while a session for a
    /// different annotation is active; call [`end_interaction`] first.
    /// Beginning again on the same annotation refreshes its snapshot.
    ///
    /// [`end_interaction`]: Self::end_interaction
    pub fn begin_interaction(
        &mut self,
        hierarchy: &dyn AnnotationHierarchy,
    ) -> Result<&PolygonEditSession, EditError> {
        let annotation = hierarchy.selected().ok_or(EditError::NoSelection)?;
        if let Some(active) = &self.session {
            if active.annotation_id() != annotation.id {
                return Err(EditError::InvalidModeTransition {
                    active: active.annotation_id(),
                    requested: annotation.id,
                });
            }
        }
        let session = self.session_for(annotation, hierarchy);
        Ok(self.session.insert(session))
    }

    /// Discard the active session, e.g. on tool deactivation.
    pub fn end_interaction(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!(
                "Polygon edit: end session for annotation {}",
                session.annotation_id()
            );
        }
    }

    pub fn pointer_pressed(
        &mut self,
        event: &PointerEvent,
        hierarchy: &dyn AnnotationHierarchy,
        ctx: &mut EditContext<'_>,
    ) -> InteractionResult {
        match self.sync_session(hierarchy) {
            Some(session) => session.on_pointer_down(event, ctx),
            None => {
                ctx.fallback.pointer_pressed(event);
                InteractionResult::NoChange
            }
        }
    }

    /// Handle a release. A mutation is installed on the hierarchy, recorded
    /// for undo and announced to `notifier` exactly once.
    pub fn pointer_released(
        &mut self,
        event: &PointerEvent,
        hierarchy: &mut dyn AnnotationHierarchy,
        ctx: &mut EditContext<'_>,
        notifier: &mut dyn ChangeNotifier,
    ) -> InteractionResult {
        let Some(session) = self.sync_session(&*hierarchy) else {
            ctx.fallback.pointer_released(event);
            return InteractionResult::NoChange;
        };

        let result = session.on_pointer_up(event, ctx);
        let annotation_id = session.annotation_id();
        if let Some(poly) = result.polygon() {
            if !self.commit(annotation_id, poly.clone(), hierarchy, notifier) {
                return InteractionResult::NoChange;
            }
        }
        result
    }

    pub fn pointer_moved(
        &mut self,
        event: &PointerEvent,
        hierarchy: &dyn AnnotationHierarchy,
        ctx: &mut EditContext<'_>,
    ) -> CursorHint {
        match self.sync_session(hierarchy) {
            Some(session) => session.on_pointer_move(event, ctx),
            None => {
                ctx.fallback.pointer_moved(event);
                viewer_cursor_hint(ctx).unwrap_or(CursorHint::DefaultPointer)
            }
        }
    }

    /// Revert the last committed edit. Returns false if there was none.
    pub fn undo(
        &mut self,
        hierarchy: &mut dyn AnnotationHierarchy,
        notifier: &mut dyn ChangeNotifier,
    ) -> bool {
        undo::undo_command(&mut self.history, hierarchy, notifier)
    }

    /// Reapply the last undone edit. Returns false if there was none.
    pub fn redo(
        &mut self,
        hierarchy: &mut dyn AnnotationHierarchy,
        notifier: &mut dyn ChangeNotifier,
    ) -> bool {
        undo::redo_command(&mut self.history, hierarchy, notifier)
    }

    fn session_for(
        &self,
        annotation: &Annotation,
        hierarchy: &dyn AnnotationHierarchy,
    ) -> PolygonEditSession {
        PolygonEditSession::begin(
            annotation.id,
            annotation.roi.clone(),
            annotation.locked,
            hierarchy.is_editable(annotation),
            &self.config,
        )
    }

    /// Bind the session to the current selection.
    ///
    /// A new selection replaces the session; an ROI or lock change made
    /// outside the session (undo, another tool) refreshes its snapshot.
    fn sync_session(
        &mut self,
        hierarchy: &dyn AnnotationHierarchy,
    ) -> Option<&mut PolygonEditSession> {
        let Some(annotation) = hierarchy.selected() else {
            self.end_interaction();
            return None;
        };

        let editable = hierarchy.is_editable(annotation);
        let stale = match &self.session {
            Some(session) => {
                session.annotation_id() != annotation.id
                    || session.roi() != &annotation.roi
                    || session.is_locked() != annotation.locked
                    || session.is_editable() != editable
            }
            None => true,
        };
        if stale {
            if self
                .session
                .as_ref()
                .is_some_and(|s| s.annotation_id() != annotation.id)
            {
                self.end_interaction();
            }
            let session = self.session_for(annotation, hierarchy);
            self.session = Some(session);
        }
        self.session.as_mut()
    }

    fn commit(
        &mut self,
        annotation_id: AnnotationId,
        poly: PolygonRoi,
        hierarchy: &mut dyn AnnotationHierarchy,
        notifier: &mut dyn ChangeNotifier,
    ) -> bool {
        let new_roi = Roi::Polygon(poly);
        let Some(old_roi) = hierarchy.set_roi(annotation_id, new_roi.clone()) else {
            log::warn!(
                "Polygon edit: annotation {} disappeared before the edit was installed",
                annotation_id
            );
            self.end_interaction();
            return false;
        };

        self.history.push(Command::ModifyRoi {
            annotation_id,
            old_roi,
            new_roi,
        });
        if let Some(annotation) = hierarchy.get(annotation_id) {
            notifier.objects_changed(annotation);
        }
        true
    }
}

impl Default for PolygonEditTool {
    fn default() -> Self {
        Self::new(EditConfig::default())
    }
}
