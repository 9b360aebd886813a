//! Undo/Redo history for ROI edits.
//!
//! Each committed vertex edit is recorded as a [`Command`] that stores the
//! ROI before and after, so it can be reverted or reapplied on the hierarchy.

use crate::annotation::{AnnotationHierarchy, AnnotationId, Roi};
use crate::viewer::ChangeNotifier;

// ============================================================================
// Command Types
// ============================================================================

/// A reversible change to an annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace an annotation's ROI
    ModifyRoi {
        /// The annotation ID
        annotation_id: AnnotationId,
        /// The ROI before modification
        old_roi: Roi,
        /// The ROI after modification
        new_roi: Roi,
    },
}

impl Command {
    /// Get a human-readable description of this command
    pub fn description(&self) -> String {
        match self {
            Command::ModifyRoi {
                old_roi, new_roi, ..
            } => match (old_roi.as_polygon(), new_roi.as_polygon()) {
                (Some(old), Some(new)) if new.len() > old.len() => "Insert vertex".to_string(),
                (Some(old), Some(new)) if new.len() < old.len() => "Remove vertex".to_string(),
                _ => "Edit ROI".to_string(),
            },
        }
    }
}

// ============================================================================
// Undo Stack
// ============================================================================

/// Configuration for the undo stack
#[derive(Debug, Clone)]
pub struct UndoConfig {
    /// Maximum number of commands to keep in history
    pub max_history: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            max_history: crate::config::DEFAULT_MAX_UNDO_HISTORY,
        }
    }
}

/// The undo/redo history stack.
///
/// When a new command is pushed the redo stack is cleared. Undo moves the
/// newest command onto the redo stack and redo moves it back.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    config: UndoConfig,
}

impl UndoStack {
    /// Create a new empty undo stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: UndoConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Push a command to the undo stack.
    /// This clears the redo stack (can't redo after a new action).
    pub fn push(&mut self, command: Command) {
        log::debug!("Undo: pushed '{}'", command.description());
        self.undo_stack.push(command);
        self.redo_stack.clear();

        if self.undo_stack.len() > self.config.max_history {
            let excess = self.undo_stack.len() - self.config.max_history;
            self.undo_stack.drain(..excess);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pop a command for undoing. The command is moved to the redo stack.
    pub fn pop_undo(&mut self) -> Option<Command> {
        let cmd = self.undo_stack.pop()?;
        log::debug!("Undo: '{}'", cmd.description());
        self.redo_stack.push(cmd.clone());
        Some(cmd)
    }

    /// Pop a command for redoing. The command is moved back to the undo stack.
    pub fn pop_redo(&mut self) -> Option<Command> {
        let cmd = self.redo_stack.pop()?;
        log::debug!("Redo: '{}'", cmd.description());
        self.undo_stack.push(cmd.clone());
        Some(cmd)
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|c| c.description())
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|c| c.description())
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

// ============================================================================
// Undo/Redo Execution
// ============================================================================

/// Undo the newest command on `hierarchy`.
/// Returns false if there was nothing to undo.
pub fn undo_command(
    stack: &mut UndoStack,
    hierarchy: &mut dyn AnnotationHierarchy,
    notifier: &mut dyn ChangeNotifier,
) -> bool {
    let Some(cmd) = stack.pop_undo() else {
        return false;
    };
    apply(&cmd, Direction::Undo, hierarchy, notifier);
    true
}

/// Redo the most recently undone command on `hierarchy`.
/// Returns false if there was nothing to redo.
pub fn redo_command(
    stack: &mut UndoStack,
    hierarchy: &mut dyn AnnotationHierarchy,
    notifier: &mut dyn ChangeNotifier,
) -> bool {
    let Some(cmd) = stack.pop_redo() else {
        return false;
    };
    apply(&cmd, Direction::Redo, hierarchy, notifier);
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Undo,
    Redo,
}

fn apply(
    cmd: &Command,
    direction: Direction,
    hierarchy: &mut dyn AnnotationHierarchy,
    notifier: &mut dyn ChangeNotifier,
) {
    match cmd {
        Command::ModifyRoi {
            annotation_id,
            old_roi,
            new_roi,
        } => {
            let roi = match direction {
                Direction::Undo => old_roi,
                Direction::Redo => new_roi,
            };
            if hierarchy.set_roi(*annotation_id, roi.clone()).is_none() {
                log::warn!(
                    "{:?}: annotation {} no longer exists",
                    direction,
                    annotation_id
                );
                return;
            }
            if let Some(annotation) = hierarchy.get(*annotation_id) {
                notifier.objects_changed(annotation);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
