//! polyedit - interactive polygon ROI vertex editing
//!
//! A toolkit-independent edit session for polygon annotations: remove the
//! vertex under the pointer with the eraser modifier, insert one after the
//! nearest vertex with the insert modifier, and get cursor hints that predict
//! what the next release will do.

pub mod annotation;
pub mod config;
pub mod edit_session;
pub mod error;
pub mod replay;
pub mod tool;
pub mod undo;
pub mod viewer;

pub use annotation::{Annotation, AnnotationHierarchy, AnnotationStore, Point, PolygonRoi, Roi};
pub use config::EditConfig;
pub use edit_session::{CursorHint, EditMode, InteractionResult, PolygonEditSession};
pub use error::EditError;
pub use tool::PolygonEditTool;

#[cfg(test)]
mod tests;
