//! Behavioral tests for the polygon edit session.
//!
//! These exercise the session end to end through its public operations: the
//! interaction scenarios and the properties every edit must keep.

mod properties;
mod scenarios;

use crate::annotation::PolygonRoi;
use crate::config::EditConfig;
use crate::edit_session::PolygonEditSession;
use crate::viewer::{Modifiers, PointerEvent};

pub(crate) fn square() -> PolygonRoi {
    PolygonRoi::from_coords(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
}

pub(crate) fn open_session(poly: PolygonRoi, locked: bool) -> PolygonEditSession {
    PolygonEditSession::begin(1, poly.into(), locked, true, &EditConfig::default())
}

pub(crate) fn eraser_at(x: f64, y: f64) -> PointerEvent {
    PointerEvent::new(
        x,
        y,
        Modifiers {
            shift: true,
            ..Default::default()
        },
    )
}

pub(crate) fn insert_at(x: f64, y: f64) -> PointerEvent {
    PointerEvent::new(
        x,
        y,
        Modifiers {
            alt: true,
            ..Default::default()
        },
    )
}

pub(crate) fn plain_at(x: f64, y: f64) -> PointerEvent {
    PointerEvent::new(x, y, Modifiers::default())
}
