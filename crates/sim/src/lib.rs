pub mod clock;
pub mod content;
pub mod danger;
pub mod geometry;
pub mod input;
pub mod interact;
pub mod movement;
pub mod sim;
pub mod transition;
pub mod world;

pub use clock::{GameClock, ScheduleEvent, MINUTES_PER_DAY};
pub use content::{
    load_world_def, ContentError, Effect, Exit, Interactable, ObjectiveGate, Requirement, Room,
    RoomGraph, WorldDef,
};
pub use geometry::{Rect, Vec2};
pub use input::{InputSnapshot, MoveAction};
pub use sim::{Simulation, MAX_TICK_DELTA_MS};
pub use world::{Facing, Player, WorldState, MESSAGE_LOG_CAP};
