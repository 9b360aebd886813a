//! Properties that hold for every polygon and pointer position.

use super::{eraser_at, insert_at, open_session, plain_at, square};
use crate::annotation::{ImagePlane, Point, PolygonRoi, Roi};
use crate::edit_session::{CursorHint, InteractionResult};
use crate::viewer::{EditContext, PassiveMove, StaticStatus, Transform};

/// A handful of irregular polygons, including degenerate ones.
fn polygons() -> Vec<PolygonRoi> {
    vec![
        square(),
        PolygonRoi::from_coords(&[(3.5, -2.0)]),
        PolygonRoi::from_coords(&[(0.0, 0.0), (0.0, 0.0), (4.0, 4.0)]),
        PolygonRoi::new(
            (0..12)
                .map(|i| {
                    let angle = i as f64 * std::f64::consts::TAU / 12.0;
                    Point::new(50.0 + 20.0 * angle.cos(), 50.0 + 20.0 * angle.sin())
                })
                .collect(),
            ImagePlane::new(1, 4, 2),
        ),
    ]
}

/// A grid of pointer positions covering the test polygons.
fn pointers() -> Vec<Point> {
    let mut points = Vec::new();
    for x in (-10..=80).step_by(7) {
        for y in (-10..=80).step_by(9) {
            points.push(Point::new(x as f64 + 0.25, y as f64 - 0.5));
        }
    }
    points
}

#[test]
fn nearest_vertex_is_minimal() {
    for poly in polygons() {
        for q in pointers() {
            let (index, distance) = poly.nearest_vertex(&q).unwrap();
            assert_eq!(distance, poly.points()[index].distance_to(&q));
            for (i, p) in poly.points().iter().enumerate() {
                assert!(distance <= p.distance_to(&q));
                if i < index {
                    assert!(p.distance_to(&q) > distance, "earlier vertex {} ties", i);
                }
            }
        }
    }
}

#[test]
fn pointer_move_is_idempotent() {
    let t = Transform::identity();
    let st = StaticStatus::default();
    for poly in polygons() {
        let mut session = open_session(poly.clone(), false);
        let mut mv = PassiveMove::default();
        let mut ctx = EditContext::new(&t, &st, &mut mv);
        for q in pointers().into_iter().take(20) {
            for event in [eraser_at(q.x, q.y), insert_at(q.x, q.y), plain_at(q.x, q.y)] {
                let first = session.on_pointer_move(&event, &mut ctx);
                let second = session.on_pointer_move(&event, &mut ctx);
                assert_eq!(first, second);
            }
        }
        assert_eq!(session.roi(), &Roi::Polygon(poly));
    }
}

#[test]
fn edits_change_vertex_count_by_one() {
    let t = Transform::identity();
    let st = StaticStatus::default();
    for poly in polygons() {
        for q in pointers() {
            for event in [eraser_at(q.x, q.y), insert_at(q.x, q.y), plain_at(q.x, q.y)] {
                let mut session = open_session(poly.clone(), false);
                let mut mv = PassiveMove::default();
                let mut ctx = EditContext::new(&t, &st, &mut mv);

                assert_eq!(session.on_pointer_down(&event, &mut ctx), InteractionResult::NoChange);
                match session.on_pointer_up(&event, &mut ctx) {
                    InteractionResult::VertexInserted(new) => assert_eq!(new.len(), poly.len() + 1),
                    InteractionResult::VertexRemoved(new) => assert_eq!(new.len(), poly.len() - 1),
                    InteractionResult::NoChange => {
                        assert_eq!(session.roi(), &Roi::Polygon(poly.clone()))
                    }
                    InteractionResult::NotApplicable => panic!("polygon should be editable"),
                }
            }
        }
    }
}

#[test]
fn removal_needs_distance_strictly_below_radius() {
    let t = Transform::identity();
    let st = StaticStatus::default();
    let mut mv = PassiveMove::default();
    let mut ctx = EditContext::new(&t, &st, &mut mv);

    // (0, -5) is exactly 5 away from (0, 0).
    let mut session = open_session(square(), false);
    assert_eq!(
        session.on_pointer_move(&eraser_at(0.0, -5.0), &mut ctx),
        CursorHint::DefaultPointer
    );
    assert_eq!(session.on_pointer_up(&eraser_at(0.0, -5.0), &mut ctx), InteractionResult::NoChange);

    assert_eq!(session.on_pointer_move(&eraser_at(0.0, -4.999), &mut ctx), CursorHint::Remove);
    assert!(matches!(
        session.on_pointer_up(&eraser_at(0.0, -4.999), &mut ctx),
        InteractionResult::VertexRemoved(_)
    ));
}

#[test]
fn insert_then_erase_restores_polygon() {
    let t = Transform::identity();
    let st = StaticStatus::default();
    for poly in polygons() {
        for q in pointers() {
            let mut session = open_session(poly.clone(), false);
            let mut mv = PassiveMove::default();
            let mut ctx = EditContext::new(&t, &st, &mut mv);

            let inserted = session.on_pointer_up(&insert_at(q.x, q.y), &mut ctx);
            assert!(inserted.is_mutation());
            let removed = session.on_pointer_up(&eraser_at(q.x, q.y), &mut ctx);
            let InteractionResult::VertexRemoved(restored) = removed else {
                panic!("Expected the inserted vertex to be erased, got {:?}", removed);
            };
            assert_eq!(restored, poly);
        }
    }
}

#[test]
fn edits_keep_the_image_plane() {
    let poly = PolygonRoi::new(square().points().to_vec(), ImagePlane::new(2, 7, 3));
    let mut session = open_session(poly, false);
    let (t, st, mut mv) = (Transform::identity(), StaticStatus::default(), PassiveMove::default());
    let mut ctx = EditContext::new(&t, &st, &mut mv);

    let inserted = session.on_pointer_up(&insert_at(5.0, 5.0), &mut ctx);
    assert_eq!(inserted.polygon().unwrap().plane(), ImagePlane::new(2, 7, 3));
    let removed = session.on_pointer_up(&eraser_at(0.0, 0.0), &mut ctx);
    assert_eq!(removed.polygon().unwrap().plane(), ImagePlane::new(2, 7, 3));
}
