use tracing::info;

use crate::content::{Effect, Interactable, Requirement, Room, RoomGraph};
use crate::world::WorldState;

/// How far beyond the player's bounds the interaction probe reaches.
pub const REACH_MARGIN_PX: f32 = 14.0;

pub const MISS_LINE: &str = "Nothing useful nearby.";

/// First interactable whose zone the expanded reach probe overlaps, in
/// the room's authored order.
pub fn nearby_interactable<'a>(state: &WorldState, room: &'a Room) -> Option<&'a Interactable> {
    let probe = state.player().bounds().expanded(REACH_MARGIN_PX);
    room.interactables
        .iter()
        .find(|interactable| probe.overlaps(&interactable.zone))
}

/// Resolves a discrete interact request against the current room. Every
/// outcome lands in the message log; nothing here is an error.
pub fn run(state: &mut WorldState, graph: &RoomGraph) {
    let Some(room) = graph.room(&state.room_id) else {
        return;
    };
    let Some(interactable) = nearby_interactable(state, room) else {
        state.push_message(MISS_LINE);
        return;
    };
    apply_effect(state, graph, interactable);
}

fn first_failing_line<'a>(
    state: &WorldState,
    graph: &RoomGraph,
    requires: &'a [Requirement],
) -> Option<&'a str> {
    for requirement in requires {
        match requirement {
            Requirement::HasItem { item, line } => {
                if !state.has_item(item) {
                    return Some(line);
                }
            }
            Requirement::KeeperAway { line } => {
                if !state.clock.is_keeper_away(graph.schedule()) {
                    return Some(line);
                }
            }
        }
    }
    None
}

fn apply_effect(state: &mut WorldState, graph: &RoomGraph, interactable: &Interactable) {
    match &interactable.effect {
        Effect::Narrate { lines } => {
            for line in lines {
                state.push_message(line.clone());
            }
        }
        Effect::TakeItem {
            item,
            requires,
            sets_flags,
            lines,
        } => {
            if let Some(line) = first_failing_line(state, graph, requires) {
                state.push_message(line.to_string());
                return;
            }
            let label = graph.item_label(item);
            if state.has_item(item) {
                state.push_message(format!("You already have {label}."));
                return;
            }
            state.inventory.insert(item.clone());
            info!(item = %item, source = %interactable.id, "item_taken");
            state.push_message(format!("Picked up: {label}."));
            for flag in sets_flags {
                state.flags.insert(flag.clone());
            }
            for line in lines {
                state.push_message(line.clone());
            }
        }
        Effect::SetFlag {
            flag,
            requires,
            line,
            already_line,
        } => {
            if state.has_flag(flag) {
                state.push_message(already_line.clone());
                return;
            }
            if let Some(failing) = first_failing_line(state, graph, requires) {
                state.push_message(failing.to_string());
                return;
            }
            state.flags.insert(flag.clone());
            info!(flag = %flag, source = %interactable.id, "flag_set");
            state.push_message(line.clone());
        }
    }
}
