use tracing::info;

use crate::content::RoomGraph;
use crate::world::WorldState;

/// Exposure meter update. The meter rises only while the keeper is home
/// and the player stands in a high-risk room; everywhere else it decays
/// at the (faster) fall rate. Hitting the limit triggers the punitive
/// reset bundle.
pub fn update(state: &mut WorldState, graph: &RoomGraph, dt_seconds: f32) {
    let danger = graph.danger();
    if state.has_flag(&graph.objectives().won_flag) {
        state.danger = 0.0;
        return;
    }

    let exposed =
        !state.clock.is_keeper_away(graph.schedule()) && graph.is_high_risk(&state.room_id);
    if exposed {
        state.danger += dt_seconds * danger.rise_per_second;
        if state.danger >= danger.limit {
            apply_caught(state, graph);
            return;
        }
    } else {
        state.danger -= dt_seconds * danger.fall_per_second;
    }
    state.danger = state.danger.clamp(0.0, danger.limit);
}

/// Being caught costs progress but never ends the run: revoke the
/// configured flags, skip to the next morning, and relocate the player
/// to the safe room's spawn.
fn apply_caught(state: &mut WorldState, graph: &RoomGraph) {
    let danger = graph.danger();
    state.danger = 0.0;
    for flag in &danger.revoke_flags {
        state.flags.remove(flag);
    }
    state.clock.reset_to_next_morning(danger.wake_minute);
    state.room_id = danger.safe_room.clone();
    if let Some(safe_room) = graph.room(&danger.safe_room) {
        state.player.position = safe_room.spawn;
    }
    state.blocked_exit = None;
    info!(room = %state.room_id, day = state.clock.day(), "player_caught");
    state.push_message(danger.caught_line.clone());
}
