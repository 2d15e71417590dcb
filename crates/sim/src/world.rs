use std::collections::{BTreeSet, VecDeque};

use crate::clock::{format_clock, GameClock};
use crate::content::{ObjectiveGate, RoomGraph};
use crate::geometry::{Rect, Vec2};

/// Newest-first bounded message log length.
pub const MESSAGE_LOG_CAP: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed_px_per_second: f32,
    pub walk_phase_per_second: f32,
    pub facing: Facing,
    pub walk_phase: f32,
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.position.x,
            y: self.position.y,
            w: self.width,
            h: self.height,
        }
    }

    /// Two-frame walk cycle index for hosts that animate the sprite.
    pub fn walk_frame(&self) -> u32 {
        (self.walk_phase.floor() as u32) % 2
    }
}

/// The single mutable aggregate the simulation owns. Systems mutate it
/// in a fixed order each tick; everything a host renders is read back
/// through the projection methods.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub(crate) room_id: String,
    pub(crate) player: Player,
    pub(crate) inventory: BTreeSet<String>,
    pub(crate) flags: BTreeSet<String>,
    pub(crate) clock: GameClock,
    pub(crate) danger: f32,
    /// (source room, target room) of the locked exit the player is
    /// currently standing in, used to suppress repeated refusal lines.
    pub(crate) blocked_exit: Option<(String, String)>,
    messages: VecDeque<String>,
}

impl WorldState {
    pub fn new(graph: &RoomGraph) -> Self {
        let start = graph.start();
        let archetype = graph.player();
        let mut state = Self {
            room_id: start.room.clone(),
            player: Player {
                position: start.position,
                width: archetype.width,
                height: archetype.height,
                speed_px_per_second: archetype.speed_px_per_second,
                walk_phase_per_second: archetype.walk_phase_per_second,
                facing: Facing::Down,
                walk_phase: 0.0,
            },
            inventory: BTreeSet::new(),
            flags: BTreeSet::new(),
            clock: GameClock::new(start.day, start.minute_of_day),
            danger: 0.0,
            blocked_exit: None,
            messages: VecDeque::new(),
        };
        for line in graph.intro_lines() {
            state.push_message(line.clone());
        }
        state
    }

    pub fn push_message(&mut self, text: impl Into<String>) {
        self.messages.push_front(text.into());
        self.messages.truncate(MESSAGE_LOG_CAP);
    }

    /// Messages, newest first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.contains(item)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn danger_percent(&self) -> f32 {
        self.danger
    }

    pub fn room_name<'a>(&self, graph: &'a RoomGraph) -> &'a str {
        graph
            .room(&self.room_id)
            .map(|room| room.name.as_str())
            .unwrap_or("")
    }

    pub fn clock_line(&self) -> String {
        format!(
            "Time: Day {}, {}",
            self.clock.day(),
            format_clock(self.clock.minute_of_day())
        )
    }

    pub fn keeper_line(&self, graph: &RoomGraph) -> String {
        let schedule = graph.schedule();
        if self.clock.is_keeper_away(schedule) {
            schedule.away_status.clone()
        } else {
            schedule.home_status.clone()
        }
    }

    pub fn danger_line(&self) -> String {
        if self.danger <= 0.0 {
            "Suspicion: Safe".to_string()
        } else {
            format!("Suspicion: {}%", self.danger.round() as u32)
        }
    }

    /// First objective step whose gate is still open, or the fallback
    /// once every step is satisfied. The won flag short-circuits.
    pub fn objective_line(&self, graph: &RoomGraph) -> String {
        let objectives = graph.objectives();
        if self.flags.contains(&objectives.won_flag) {
            return objectives.won_line.clone();
        }
        for step in &objectives.steps {
            let still_open = match &step.gate {
                ObjectiveGate::MissingItem { item } => !self.inventory.contains(item),
                ObjectiveGate::MissingAnyItem { items } => {
                    items.iter().any(|item| !self.inventory.contains(item))
                }
                ObjectiveGate::MissingFlag { flag } => !self.flags.contains(flag),
            };
            if still_open {
                return step.line.clone();
            }
        }
        objectives.fallback_line.clone()
    }

    pub fn inventory_labels(&self, graph: &RoomGraph) -> Vec<String> {
        self.inventory
            .iter()
            .map(|item| graph.item_label(item))
            .collect()
    }
}
