use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{Rect, Vec2};

/// Root content definition. Everything tunable lives here: room graph,
/// item labels, keeper schedule, danger rates, and the player archetype.
/// A def is inert data until [`WorldDef::validate`] turns it into a
/// [`RoomGraph`] the simulation can trust.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldDef {
    pub view: ViewDef,
    pub player: PlayerDef,
    pub start: StartDef,
    pub clock: ClockDef,
    pub schedule: ScheduleDef,
    pub danger: DangerDef,
    pub items: Vec<ItemDef>,
    pub objectives: ObjectivesDef,
    #[serde(default)]
    pub intro_lines: Vec<String>,
    pub rooms: Vec<RoomDef>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewDef {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerDef {
    pub width: f32,
    pub height: f32,
    pub speed_px_per_second: f32,
    pub walk_phase_per_second: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StartDef {
    pub room: String,
    pub position: Vec2,
    pub day: u32,
    pub minute_of_day: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClockDef {
    pub minutes_per_second: f32,
}

/// Keeper absence window, half-open: away while
/// `departure_minute <= minute < return_minute`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleDef {
    pub departure_minute: u32,
    pub return_minute: u32,
    pub departure_line: String,
    pub return_line: String,
    pub away_status: String,
    pub home_status: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DangerDef {
    pub limit: f32,
    pub rise_per_second: f32,
    pub fall_per_second: f32,
    pub high_risk_rooms: Vec<String>,
    pub caught_line: String,
    pub safe_room: String,
    pub wake_minute: u32,
    #[serde(default)]
    pub revoke_flags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemDef {
    pub id: String,
    pub label: String,
}

/// Ordered objective chain: the first step whose gate is still open
/// supplies the objective line. The `won_flag` short-circuits the chain.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectivesDef {
    pub won_flag: String,
    pub won_line: String,
    pub steps: Vec<ObjectiveStepDef>,
    pub fallback_line: String,
}

// No deny_unknown_fields here: serde cannot combine it with flatten,
// and the flattened gate tag would itself be rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectiveStepDef {
    #[serde(flatten)]
    pub gate: ObjectiveGate,
    pub line: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum ObjectiveGate {
    MissingItem { item: String },
    MissingAnyItem { items: Vec<String> },
    MissingFlag { flag: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomDef {
    pub id: String,
    pub name: String,
    /// Opaque renderer hook; the simulation never interprets it.
    #[serde(default)]
    pub scene: String,
    pub inspect_line: String,
    pub spawn: Vec2,
    #[serde(default)]
    pub solids: Vec<Rect>,
    #[serde(default)]
    pub exits: Vec<Exit>,
    #[serde(default)]
    pub interactables: Vec<Interactable>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Exit {
    pub zone: Rect,
    pub target: String,
    pub spawn: Vec2,
    #[serde(default)]
    pub requires_flag: Option<String>,
    pub line: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Interactable {
    pub id: String,
    pub label: String,
    pub zone: Rect,
    pub effect: Effect,
}

/// Tagged interaction command. Effects are plain data so rooms stay
/// declarative; the resolver in `interact` is the only dispatcher.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    Narrate {
        lines: Vec<String>,
    },
    TakeItem {
        item: String,
        #[serde(default)]
        requires: Vec<Requirement>,
        #[serde(default)]
        sets_flags: Vec<String>,
        #[serde(default)]
        lines: Vec<String>,
    },
    SetFlag {
        flag: String,
        #[serde(default)]
        requires: Vec<Requirement>,
        line: String,
        already_line: String,
    },
}

/// Precondition on an effect. Each variant carries the line shown when
/// the check fails; the first failing requirement wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Requirement {
    HasItem { item: String, line: String },
    KeeperAway { line: String },
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read world file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse world file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate room id {id}")]
    DuplicateRoom { id: String },
    #[error("duplicate item id {id}")]
    DuplicateItem { id: String },
    #[error("room {room} exit targets unknown room {target}")]
    UnknownExitTarget { room: String, target: String },
    #[error("start room {id} is not in the room graph")]
    UnknownStartRoom { id: String },
    #[error("safe room {id} is not in the room graph")]
    UnknownSafeRoom { id: String },
    #[error("high-risk room {id} is not in the room graph")]
    UnknownHighRiskRoom { id: String },
    #[error("room {room} interactable {interactable} references unknown item {item}")]
    UnknownItem {
        room: String,
        interactable: String,
        item: String,
    },
    #[error("objective step references unknown item {item}")]
    UnknownObjectiveItem { item: String },
    #[error("schedule window {departure_minute}..{return_minute} must be ordered within a day")]
    InvalidScheduleWindow {
        departure_minute: u32,
        return_minute: u32,
    },
    #[error("minute of day {minute} exceeds a day ({context})")]
    InvalidMinuteOfDay { minute: u32, context: &'static str },
    #[error("start day {day} must be at least 1")]
    InvalidStartDay { day: u32 },
}

/// Validated, indexed content. Room and item lookups through the graph
/// are guaranteed to resolve for every id that appears in its defs.
#[derive(Debug, Clone)]
pub struct RoomGraph {
    view: Rect,
    rooms: BTreeMap<String, RoomDef>,
    player: PlayerDef,
    start: StartDef,
    clock: ClockDef,
    schedule: ScheduleDef,
    danger: DangerDef,
    item_labels: BTreeMap<String, String>,
    objectives: ObjectivesDef,
    intro_lines: Vec<String>,
}

pub type Room = RoomDef;

impl WorldDef {
    pub fn validate(self) -> Result<RoomGraph, ContentError> {
        let mut rooms = BTreeMap::new();
        for room in &self.rooms {
            if rooms.insert(room.id.clone(), room.clone()).is_some() {
                return Err(ContentError::DuplicateRoom {
                    id: room.id.clone(),
                });
            }
        }

        let mut item_labels = BTreeMap::new();
        for item in &self.items {
            if item_labels
                .insert(item.id.clone(), item.label.clone())
                .is_some()
            {
                return Err(ContentError::DuplicateItem {
                    id: item.id.clone(),
                });
            }
        }
        let known_items: BTreeSet<&str> = item_labels.keys().map(String::as_str).collect();

        for room in self.rooms.iter() {
            for exit in &room.exits {
                if !rooms.contains_key(&exit.target) {
                    return Err(ContentError::UnknownExitTarget {
                        room: room.id.clone(),
                        target: exit.target.clone(),
                    });
                }
            }
            for interactable in &room.interactables {
                for item in effect_item_refs(&interactable.effect) {
                    if !known_items.contains(item) {
                        return Err(ContentError::UnknownItem {
                            room: room.id.clone(),
                            interactable: interactable.id.clone(),
                            item: item.to_string(),
                        });
                    }
                }
            }
        }

        if !rooms.contains_key(&self.start.room) {
            return Err(ContentError::UnknownStartRoom {
                id: self.start.room.clone(),
            });
        }
        if !rooms.contains_key(&self.danger.safe_room) {
            return Err(ContentError::UnknownSafeRoom {
                id: self.danger.safe_room.clone(),
            });
        }
        for id in &self.danger.high_risk_rooms {
            if !rooms.contains_key(id) {
                return Err(ContentError::UnknownHighRiskRoom { id: id.clone() });
            }
        }

        for step in &self.objectives.steps {
            for item in gate_item_refs(&step.gate) {
                if !known_items.contains(item) {
                    return Err(ContentError::UnknownObjectiveItem {
                        item: item.to_string(),
                    });
                }
            }
        }

        if self.schedule.departure_minute >= self.schedule.return_minute
            || self.schedule.return_minute > crate::clock::MINUTES_PER_DAY
        {
            return Err(ContentError::InvalidScheduleWindow {
                departure_minute: self.schedule.departure_minute,
                return_minute: self.schedule.return_minute,
            });
        }
        if self.start.minute_of_day >= crate::clock::MINUTES_PER_DAY {
            return Err(ContentError::InvalidMinuteOfDay {
                minute: self.start.minute_of_day,
                context: "start",
            });
        }
        // Day 0 collides with the schedule markers' unfired sentinel.
        if self.start.day == 0 {
            return Err(ContentError::InvalidStartDay {
                day: self.start.day,
            });
        }
        if self.danger.wake_minute >= crate::clock::MINUTES_PER_DAY {
            return Err(ContentError::InvalidMinuteOfDay {
                minute: self.danger.wake_minute,
                context: "danger wake",
            });
        }

        Ok(RoomGraph {
            view: Rect::new(0.0, 0.0, self.view.width, self.view.height),
            rooms,
            player: self.player,
            start: self.start,
            clock: self.clock,
            schedule: self.schedule,
            danger: self.danger,
            item_labels,
            objectives: self.objectives,
            intro_lines: self.intro_lines,
        })
    }
}

fn effect_item_refs(effect: &Effect) -> Vec<&str> {
    let mut refs = Vec::new();
    match effect {
        Effect::Narrate { .. } => {}
        Effect::TakeItem { item, requires, .. } => {
            refs.push(item.as_str());
            refs.extend(requirement_item_refs(requires));
        }
        Effect::SetFlag { requires, .. } => {
            refs.extend(requirement_item_refs(requires));
        }
    }
    refs
}

fn requirement_item_refs(requires: &[Requirement]) -> Vec<&str> {
    requires
        .iter()
        .filter_map(|requirement| match requirement {
            Requirement::HasItem { item, .. } => Some(item.as_str()),
            Requirement::KeeperAway { .. } => None,
        })
        .collect()
}

fn gate_item_refs(gate: &ObjectiveGate) -> Vec<&str> {
    match gate {
        ObjectiveGate::MissingItem { item } => vec![item.as_str()],
        ObjectiveGate::MissingAnyItem { items } => items.iter().map(String::as_str).collect(),
        ObjectiveGate::MissingFlag { .. } => Vec::new(),
    }
}

impl RoomGraph {
    pub fn view(&self) -> Rect {
        self.view
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn player(&self) -> &PlayerDef {
        &self.player
    }

    pub fn start(&self) -> &StartDef {
        &self.start
    }

    pub fn clock(&self) -> &ClockDef {
        &self.clock
    }

    pub fn schedule(&self) -> &ScheduleDef {
        &self.schedule
    }

    pub fn danger(&self) -> &DangerDef {
        &self.danger
    }

    pub fn is_high_risk(&self, room_id: &str) -> bool {
        self.danger
            .high_risk_rooms
            .iter()
            .any(|id| id == room_id)
    }

    /// Display label for an item, falling back to the id itself.
    pub fn item_label(&self, item_id: &str) -> String {
        self.item_labels
            .get(item_id)
            .cloned()
            .unwrap_or_else(|| item_id.to_string())
    }

    pub fn objectives(&self) -> &ObjectivesDef {
        &self.objectives
    }

    pub fn intro_lines(&self) -> &[String] {
        &self.intro_lines
    }
}

pub fn load_world_def(path: &Path) -> Result<WorldDef, ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ContentError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}
