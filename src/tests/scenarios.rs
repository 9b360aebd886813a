//! Interaction scenarios on the unit square polygon.

use super::{eraser_at, insert_at, open_session, plain_at, square};
use crate::annotation::{Point, PolygonRoi, Roi};
use crate::edit_session::{CursorHint, InteractionResult};
use crate::viewer::{EditContext, PassiveMove, StaticStatus, Transform};

fn coords(poly: &PolygonRoi) -> Vec<(f64, f64)> {
    poly.points().iter().map(|p| (p.x, p.y)).collect()
}

#[test]
fn eraser_near_vertex_removes_it() {
    let mut session = open_session(square(), false);
    let (t, st, mut mv) = (Transform::identity(), StaticStatus::default(), PassiveMove::default());
    let mut ctx = EditContext::new(&t, &st, &mut mv);

    let result = session.on_pointer_up(&eraser_at(10.0, 1.0), &mut ctx);
    let InteractionResult::VertexRemoved(poly) = result else {
        panic!("Expected VertexRemoved, got {:?}", result);
    };
    assert_eq!(coords(&poly), vec![(0.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
}

#[test]
fn insert_on_tie_goes_after_first_vertex() {
    let mut session = open_session(square(), false);
    let (t, st, mut mv) = (Transform::identity(), StaticStatus::default(), PassiveMove::default());
    let mut ctx = EditContext::new(&t, &st, &mut mv);

    let result = session.on_pointer_up(&insert_at(5.0, 0.0), &mut ctx);
    let InteractionResult::VertexInserted(poly) = result else {
        panic!("Expected VertexInserted, got {:?}", result);
    };
    assert_eq!(
        coords(&poly),
        vec![(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]
    );
}

#[test]
fn locked_annotation_never_changes() {
    let mut session = open_session(square(), true);
    let (t, st, mut mv) = (Transform::identity(), StaticStatus::default(), PassiveMove::default());
    let mut ctx = EditContext::new(&t, &st, &mut mv);

    for event in [eraser_at(10.0, 1.0), insert_at(5.0, 0.0), plain_at(3.0, 3.0)] {
        assert_eq!(session.on_pointer_down(&event, &mut ctx), InteractionResult::NoChange);
        assert_eq!(session.on_pointer_up(&event, &mut ctx), InteractionResult::NoChange);
        assert_eq!(session.on_pointer_move(&event, &mut ctx), CursorHint::DefaultPointer);
    }
    assert_eq!(session.roi(), &Roi::Polygon(square()));
    assert_eq!((mv.pressed, mv.released, mv.moved), (3, 3, 3));
}

#[test]
fn eraser_far_from_vertices_does_nothing() {
    let mut session = open_session(square(), false);
    let (t, st, mut mv) = (Transform::identity(), StaticStatus::default(), PassiveMove::default());
    let mut ctx = EditContext::new(&t, &st, &mut mv);

    let far = eraser_at(5.0, 5.0);
    assert_eq!(session.on_pointer_move(&far, &mut ctx), CursorHint::DefaultPointer);
    assert_eq!(session.on_pointer_up(&far, &mut ctx), InteractionResult::NoChange);
    assert_eq!(session.roi(), &Roi::Polygon(square()));
    // Missed erase falls back to the move tool.
    assert_eq!(mv.released, 1);
}

#[test]
fn eraser_wins_when_both_modifiers_held() {
    let mut session = open_session(square(), false);
    let (t, st, mut mv) = (Transform::identity(), StaticStatus::default(), PassiveMove::default());
    let mut ctx = EditContext::new(&t, &st, &mut mv);

    let mut both = eraser_at(0.0, 1.0);
    both.modifiers.alt = true;
    assert_eq!(session.on_pointer_move(&both, &mut ctx), CursorHint::Remove);
    assert!(matches!(
        session.on_pointer_up(&both, &mut ctx),
        InteractionResult::VertexRemoved(_)
    ));

    // Far from every vertex the eraser still wins, so nothing is inserted.
    let mut both_far = eraser_at(50.0, 50.0);
    both_far.modifiers.alt = true;
    assert_eq!(session.on_pointer_move(&both_far, &mut ctx), CursorHint::DefaultPointer);
    assert_eq!(session.on_pointer_up(&both_far, &mut ctx), InteractionResult::NoChange);
}

#[test]
fn insertion_can_go_after_last_vertex() {
    let mut session = open_session(square(), false);
    let (t, st, mut mv) = (Transform::identity(), StaticStatus::default(), PassiveMove::default());
    let mut ctx = EditContext::new(&t, &st, &mut mv);

    let result = session.on_pointer_up(&insert_at(-1.0, 9.0), &mut ctx);
    let poly = result.polygon().expect("insert should succeed");
    assert_eq!(poly.points().last(), Some(&Point::new(-1.0, 9.0)));
}
