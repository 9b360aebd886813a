//! Headless replay of pointer interaction scripts.
//!
//! A script describes one polygon annotation, the viewer state and an ordered
//! list of pointer/undo steps. Replaying it drives [`PolygonEditTool`] exactly
//! as a viewer would, which makes edit behavior reproducible without a UI.

use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, AnnotationHierarchy, AnnotationId, AnnotationStore, PolygonRoi};
use crate::config::EditConfig;
use crate::tool::PolygonEditTool;
use crate::viewer::{EditContext, PassiveMove, PointerEvent, StaticStatus, Transform};

/// A scripted editing session.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    /// The polygon being edited
    pub polygon: PolygonRoi,
    #[serde(default)]
    pub locked: bool,
    /// Whether the hierarchy refuses all edits
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub status: StaticStatus,
    pub steps: Vec<Step>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One scripted action.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Pressed(PointerEvent),
    Released(PointerEvent),
    Moved(PointerEvent),
    Undo,
    Redo,
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Pressed(_) => "pressed",
            Step::Released(_) => "released",
            Step::Moved(_) => "moved",
            Step::Undo => "undo",
            Step::Redo => "redo",
        }
    }
}

/// What a single step produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub action: &'static str,
    /// Interaction result name for press/release steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<&'static str>,
    /// Cursor hint name for move steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<&'static str>,
    /// Whether undo/redo had anything to apply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<bool>,
    /// The edit that undo/redo reverted or reapplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Vertex count after the step
    pub vertices: usize,
}

/// Result of replaying a whole script.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub outcomes: Vec<StepOutcome>,
    pub notifications: usize,
    pub annotation: Annotation,
}

/// Replay `script` through a fresh tool configured by `config`.
pub fn run(script: &ReplayScript, config: &EditConfig) -> ReplayReport {
    let mut store = AnnotationStore::new();
    let id = store.add(script.polygon.clone());
    store.set_locked(id, script.locked);
    store.set_read_only(script.read_only);
    store.select(Some(id));

    let mut tool = PolygonEditTool::new(config.clone());
    let mut fallback = PassiveMove::default();
    let mut notifications = 0;
    let mut outcomes = Vec::with_capacity(script.steps.len());

    for (index, step) in script.steps.iter().enumerate() {
        let mut notifier = |ann: &Annotation| {
            notifications += 1;
            log::info!("Annotation {} changed", ann.id);
        };
        let mut ctx = EditContext::new(&script.transform, &script.status, &mut fallback);

        let mut outcome = StepOutcome {
            step: index,
            action: step.name(),
            result: None,
            cursor: None,
            applied: None,
            description: None,
            vertices: 0,
        };
        match step {
            Step::Pressed(event) => {
                outcome.result = Some(tool.pointer_pressed(event, &store, &mut ctx).name());
            }
            Step::Released(event) => {
                let result = tool.pointer_released(event, &mut store, &mut ctx, &mut notifier);
                outcome.result = Some(result.name());
            }
            Step::Moved(event) => {
                outcome.cursor = Some(tool.pointer_moved(event, &store, &mut ctx).name());
            }
            Step::Undo => {
                outcome.description = tool.history().undo_description();
                outcome.applied = Some(tool.undo(&mut store, &mut notifier));
            }
            Step::Redo => {
                outcome.description = tool.history().redo_description();
                outcome.applied = Some(tool.redo(&mut store, &mut notifier));
            }
        }
        outcome.vertices = vertex_count(&store, id);
        outcomes.push(outcome);
    }

    tool.end_interaction();
    log::debug!(
        "Replay finished: {} steps, {} forwarded to move tool",
        outcomes.len(),
        fallback.pressed + fallback.released
    );

    ReplayReport {
        outcomes,
        notifications,
        annotation: store
            .get(id)
            .cloned()
            .unwrap_or_else(|| Annotation::new(id, script.polygon.clone().into())),
    }
}

fn vertex_count(store: &AnnotationStore, id: AnnotationId) -> usize {
    store
        .get(id)
        .and_then(|ann| ann.roi.as_polygon())
        .map_or(0, PolygonRoi::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Point;

    const SCRIPT: &str = r#"{
        "polygon": {
            "points": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 10, "y": 10}, {"x": 0, "y": 10}],
            "plane": {"c": 0, "z": 2, "t": 1}
        },
        "steps": [
            {"action": "moved", "x": 10, "y": 1, "modifiers": {"shift": true}},
            {"action": "pressed", "x": 10, "y": 1, "modifiers": {"shift": true}},
            {"action": "released", "x": 10, "y": 1, "modifiers": {"shift": true}},
            {"action": "released", "x": 5, "y": -2, "modifiers": {"alt": true}},
            {"action": "undo"},
            {"action": "redo"},
            {"action": "released", "x": 80, "y": 80}
        ]
    }"#;

    #[test]
    fn test_replay_script() {
        let script = ReplayScript::from_json(SCRIPT).expect("script should parse");
        let report = run(&script, &EditConfig::default());

        let results: Vec<_> = report
            .outcomes
            .iter()
            .map(|o| (o.action, o.result.or(o.cursor), o.applied, o.vertices))
            .collect();
        assert_eq!(
            results,
            vec![
                ("moved", Some("remove"), None, 4),
                ("pressed", Some("no_change"), None, 4),
                ("released", Some("vertex_removed"), None, 3),
                ("released", Some("vertex_inserted"), None, 4),
                ("undo", None, Some(true), 3),
                ("redo", None, Some(true), 4),
                ("released", Some("no_change"), None, 4),
            ]
        );
        assert_eq!(report.notifications, 4);
        assert_eq!(report.outcomes[4].description.as_deref(), Some("Insert vertex"));
        assert_eq!(report.outcomes[5].description.as_deref(), Some("Insert vertex"));
        assert_eq!(report.outcomes[6].description, None);

        let poly = report.annotation.roi.as_polygon().unwrap();
        assert_eq!(poly.plane().z, 2);
        assert_eq!(poly.points()[1], Point::new(5.0, -2.0));
    }

    #[test]
    fn test_script_with_zero_zoom_is_rejected() {
        let json = r#"{
            "polygon": {"points": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 5, "y": 5}]},
            "transform": {"zoom": 0.0, "pan_x": 0.0, "pan_y": 0.0},
            "steps": [{"action": "released", "x": 0, "y": 0, "modifiers": {"shift": true}}]
        }"#;
        let err = ReplayScript::from_json(json).unwrap_err();
        assert!(err.to_string().contains("Invalid zoom 0"), "{}", err);
    }

    #[test]
    fn test_replay_undo_with_empty_history() {
        let script = ReplayScript::from_json(
            r#"{
                "polygon": {"points": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 5, "y": 5}]},
                "steps": [{"action": "undo"}, {"action": "redo"}]
            }"#,
        )
        .unwrap();
        let report = run(&script, &EditConfig::default());
        assert!(
            report
                .outcomes
                .iter()
                .all(|o| o.applied == Some(false) && o.description.is_none())
        );
        assert_eq!(report.notifications, 0);
    }

    #[test]
    fn test_replay_locked() {
        let mut script = ReplayScript::from_json(SCRIPT).unwrap();
        script.locked = true;
        let report = run(&script, &EditConfig::default());
        assert_eq!(report.notifications, 0);
        assert!(report.outcomes.iter().all(|o| o.vertices == 4));
    }
}
