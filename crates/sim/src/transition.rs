use tracing::info;

use crate::content::RoomGraph;
use crate::world::WorldState;

/// Scans the current room's exits for the first one the player overlaps
/// and applies it. A flag-locked exit refuses with its line exactly once
/// per continuous overlap; stepping out of the zone re-arms the line.
pub fn run(state: &mut WorldState, graph: &RoomGraph) {
    let Some(room) = graph.room(&state.room_id) else {
        return;
    };

    let player_bounds = state.player.bounds();
    for exit in &room.exits {
        if !player_bounds.overlaps(&exit.zone) {
            continue;
        }

        if let Some(flag) = &exit.requires_flag {
            if !state.has_flag(flag) {
                let key = (state.room_id.clone(), exit.target.clone());
                if state.blocked_exit.as_ref() != Some(&key) {
                    state.push_message(exit.line.clone());
                    state.blocked_exit = Some(key);
                }
                return;
            }
        }

        state.blocked_exit = None;
        info!(from = %state.room_id, to = %exit.target, "room_entered");
        state.room_id = exit.target.clone();
        state.player.position = exit.spawn;
        state.push_message(exit.line.clone());
        return;
    }

    state.blocked_exit = None;
}
