//! Collision detection and scoring
//!
//! Everything here is a plain axis-aligned box test: the actor's bounding
//! box against each obstacle rectangle.

use super::actor::Actor;
use super::obstacle::ObstaclePair;
use crate::Rect;

/// True if the actor box overlaps the top or bottom rectangle of any pair
pub fn check_collision<'a>(
    actor_bbox: &Rect,
    pairs: impl IntoIterator<Item = &'a ObstaclePair>,
) -> bool {
    pairs
        .into_iter()
        .any(|pair| actor_bbox.overlaps(&pair.top) || actor_bbox.overlaps(&pair.bottom))
}

/// Mark every pair the actor has fully passed and return how many were new.
///
/// A pair counts once its trailing (right) edge is left of the actor's left
/// edge. The `scored` flag makes this idempotent across frames.
pub fn check_score<'a>(
    actor: &Actor,
    pairs: impl IntoIterator<Item = &'a mut ObstaclePair>,
) -> u32 {
    let mut newly_scored = 0;
    for pair in pairs {
        if !pair.scored && pair.top.pos.x + pair.top.size.x < actor.pos.x {
            pair.scored = true;
            newly_scored += 1;
        }
    }
    newly_scored
}
