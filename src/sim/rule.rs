//! The per-cell state machine step.
//!
//! Every cell derives its own next value from a read-only snapshot of the
//! previous step, so movement is pull-formulated: an air-like cell looks up
//! and pulls falling sand in, while the sand cell's own evaluation arrives at
//! the complementary vacancy. The two perspectives never communicate within a
//! step; the double buffer keeps them consistent. Do not rewrite this as push
//! semantics: a parallel grid where each unit writes only its own slot cannot
//! arbitrate cross-cell writes, and pushing changes the simulation's
//! behavior, not just its structure.

use std::time::Duration;

use crate::sim::cell::{Cell, CellKind};
use crate::sim::neighborhood::Neighborhood;

/// One transition of the cell at the center of `n`: the gravity/flow rule
/// followed by the decay overlay. Pure; field and seeding overlays are
/// composed around this by the step driver.
pub fn transition(n: &Neighborhood, delta_time: Duration, decay_enabled: bool) -> Cell {
    let cell_self = n.center();
    let next = base_rule(n, cell_self);
    decay_overlay(next, cell_self, delta_time, decay_enabled)
}

/// The gravity/flow rule.
/// Air-like cells pull sand from above, preferring the straight drop, then
/// the priority-side diagonal when its side is blocked, then the opposite
/// diagonal. Sand cells vacate when the cell below is air-like, or when a
/// lower diagonal and the side leading to it are both open. Walls never move.
fn base_rule(n: &Neighborhood, cell_self: Cell) -> Cell {
    if cell_self.kind.is_air_like() {
        if n.up().kind == CellKind::Sand {
            n.up()
        } else if n.first_diagonal_up().kind == CellKind::Sand
            && !n.first_side_up().kind.is_air_like()
        {
            // Sand only slides diagonally when it cannot fall straight, so the
            // side between must be blocked for the diagonal pull to be real
            n.first_diagonal_up()
        } else if n.second_diagonal_up().kind == CellKind::Sand
            && !n.second_side_up().kind.is_air_like()
        {
            n.second_diagonal_up()
        } else {
            cell_self
        }
    } else if cell_self.kind == CellKind::Sand {
        if n.down().kind.is_air_like() {
            Cell::air()
        } else if n.first_diagonal_down().kind.is_air_like()
            && n.first_side_down().kind.is_air_like()
        {
            Cell::air()
        } else if n.second_diagonal_down().kind.is_air_like()
            && n.second_side_down().kind.is_air_like()
        {
            Cell::air()
        } else {
            cell_self
        }
    } else {
        cell_self
    }
}

/// The decay overlay, applied to whatever the base rule produced.
/// A sink absorbs any sand that just fell into it, judged on the pre-update
/// self value. Otherwise sand spends `delta_time` of its lifetime (nothing
/// when decay is disabled) and reverts to air once the budget runs out.
fn decay_overlay(next: Cell, cell_self: Cell, delta_time: Duration, decay_enabled: bool) -> Cell {
    if next.kind != CellKind::Sand {
        return next;
    }
    if cell_self.kind == CellKind::Sink {
        return cell_self;
    }
    let decrement = if decay_enabled {
        delta_time
    } else {
        Duration::ZERO
    };
    let ttl = next.ttl.decremented(decrement);
    if ttl.is_expired() {
        Cell::air()
    } else {
        Cell { ttl, ..next }
    }
}
