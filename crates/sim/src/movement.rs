use crate::content::Room;
use crate::geometry::{Rect, Vec2};
use crate::input::{InputSnapshot, MoveAction};
use crate::world::{Facing, Player};

/// Unit movement intent from the held actions. Diagonals are normalized
/// so diagonal travel is no faster than cardinal travel.
pub fn movement_intent(input: &InputSnapshot) -> Vec2 {
    let mut dx = 0.0;
    let mut dy = 0.0;
    if input.is_down(MoveAction::Left) {
        dx -= 1.0;
    }
    if input.is_down(MoveAction::Right) {
        dx += 1.0;
    }
    if input.is_down(MoveAction::Up) {
        dy -= 1.0;
    }
    if input.is_down(MoveAction::Down) {
        dy += 1.0;
    }
    if dx != 0.0 && dy != 0.0 {
        let inv_sqrt2 = 1.0 / std::f32::consts::SQRT_2;
        dx *= inv_sqrt2;
        dy *= inv_sqrt2;
    }
    Vec2 { x: dx, y: dy }
}

fn can_occupy(candidate: &Rect, room: &Room, view: &Rect) -> bool {
    if !candidate.within(view) {
        return false;
    }
    !room.solids.iter().any(|solid| candidate.overlaps(solid))
}

/// Advances the player for one tick: facing, walk phase, then
/// axis-separated collision (x before y) so blocked diagonals slide
/// along walls instead of stopping dead.
pub fn update(player: &mut Player, input: &InputSnapshot, room: &Room, view: &Rect, dt_seconds: f32) {
    let intent = movement_intent(input);
    let moving = intent.x != 0.0 || intent.y != 0.0;

    // Horizontal facing first; the vertical component wins a same-tick tie.
    if intent.x < 0.0 {
        player.facing = Facing::Left;
    }
    if intent.x > 0.0 {
        player.facing = Facing::Right;
    }
    if intent.y < 0.0 {
        player.facing = Facing::Up;
    }
    if intent.y > 0.0 {
        player.facing = Facing::Down;
    }

    if moving {
        player.walk_phase += player.walk_phase_per_second * dt_seconds;
    }

    let step = player.speed_px_per_second * dt_seconds;
    let x_candidate = player.bounds().translated(intent.x * step, 0.0);
    if can_occupy(&x_candidate, room, view) {
        player.position.x = x_candidate.x;
    }
    let y_candidate = player.bounds().translated(0.0, intent.y * step);
    if can_occupy(&y_candidate, room, view) {
        player.position.y = y_candidate.y;
    }
}
