use crate::clock::ScheduleEvent;
use crate::content::{ContentError, RoomGraph, WorldDef};
use crate::input::InputSnapshot;
use crate::world::WorldState;
use crate::{danger, interact, movement, transition};

/// Upper bound on a single tick's wall-clock delta. A stalled host
/// resumes from a short hiccup instead of teleporting the world.
pub const MAX_TICK_DELTA_MS: f32 = 120.0;

/// Deterministic single-player world simulation. One instance owns the
/// validated content and the mutable world aggregate; hosts drive it
/// with `tick` plus the discrete `interact`/`inspect` requests and read
/// everything back through [`WorldState`] projections.
pub struct Simulation {
    graph: RoomGraph,
    state: WorldState,
}

impl Simulation {
    pub fn new(def: WorldDef) -> Result<Self, ContentError> {
        let graph = def.validate()?;
        Ok(Self::from_graph(graph))
    }

    pub fn from_graph(graph: RoomGraph) -> Self {
        let state = WorldState::new(&graph);
        Self { graph, state }
    }

    pub fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// One fixed-order simulation step: clock and schedule, then
    /// movement, then room transitions, then the danger meter.
    pub fn tick(&mut self, delta_ms: f32, input: &InputSnapshot) {
        let delta_ms = delta_ms.clamp(0.0, MAX_TICK_DELTA_MS);
        let dt_seconds = delta_ms / 1000.0;

        let events = self
            .state
            .clock
            .advance(dt_seconds, self.graph.clock(), self.graph.schedule());
        for event in events {
            let line = match event {
                ScheduleEvent::KeeperDeparted => self.graph.schedule().departure_line.clone(),
                ScheduleEvent::KeeperReturned => self.graph.schedule().return_line.clone(),
            };
            self.state.push_message(line);
        }

        let room_id = self.state.room_id.clone();
        if let Some(room) = self.graph.room(&room_id) {
            let view = self.graph.view();
            movement::update(&mut self.state.player, input, room, &view, dt_seconds);
        }

        transition::run(&mut self.state, &self.graph);
        danger::update(&mut self.state, &self.graph, dt_seconds);
    }

    /// Discrete interact request (one key edge, not a held state).
    pub fn interact(&mut self) {
        interact::run(&mut self.state, &self.graph);
    }

    /// Logs the carried items as a single line, resolved to labels.
    pub fn announce_inventory(&mut self) {
        let labels = self.state.inventory_labels(&self.graph);
        let line = if labels.is_empty() {
            "Inventory: nothing.".to_string()
        } else {
            format!("Inventory: {}.", labels.join(", "))
        };
        self.state.push_message(line);
    }

    /// Discrete look-around request: logs the room's flavor line.
    pub fn inspect(&mut self) {
        let room_id = self.state.room_id.clone();
        if let Some(room) = self.graph.room(&room_id) {
            let line = room.inspect_line.clone();
            self.state.push_message(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::GameClock;
    use crate::content::fixtures::{sample_def, sample_graph};
    use crate::geometry::Vec2;
    use crate::input::MoveAction;

    const TICK_MS: f32 = 100.0;

    fn held(action: MoveAction) -> InputSnapshot {
        InputSnapshot::empty().with_action_down(action, true)
    }

    #[test]
    fn new_simulation_validates_content() {
        let sim = Simulation::new(sample_def()).expect("valid def");
        assert_eq!(sim.state().room_id(), "meadow");
    }

    #[test]
    fn invalid_content_is_rejected_at_construction() {
        let mut def = sample_def();
        def.start.room = "void".to_string();
        assert!(Simulation::new(def).is_err());
    }

    #[test]
    fn oversized_delta_is_clamped_per_tick() {
        let mut sim = Simulation::from_graph(sample_graph());
        // A ten-second stall advances game time by at most 120 ms worth.
        sim.tick(10_000.0, &InputSnapshot::empty());
        assert_eq!(sim.state().clock().minute_of_day(), 450);
    }

    #[test]
    fn negative_delta_does_not_rewind() {
        let mut sim = Simulation::from_graph(sample_graph());
        let before = sim.state().player().position;
        sim.tick(-500.0, &held(MoveAction::Right));
        assert_eq!(sim.state().clock().minute_of_day(), 450);
        assert!((sim.state().player().position.x - before.x).abs() < 0.0001);
    }

    #[test]
    fn held_input_moves_the_player_deterministically() {
        let mut sim = Simulation::from_graph(sample_graph());
        for _ in 0..10 {
            sim.tick(TICK_MS, &held(MoveAction::Right));
        }
        // 1 second at 100 px/s.
        assert!((sim.state().player().position.x - 200.0).abs() < 0.01);
    }

    #[test]
    fn walking_through_an_exit_changes_rooms() {
        let mut sim = Simulation::from_graph(sample_graph());
        sim.state.player.position = Vec2 { x: 930.0, y: 250.0 };
        for _ in 0..5 {
            sim.tick(TICK_MS, &held(MoveAction::Right));
        }
        assert_eq!(sim.state().room_id(), "gatehouse");
        assert!(sim
            .state()
            .messages()
            .any(|line| line == "You walk east to the gatehouse."));
    }

    #[test]
    fn locked_exit_refuses_once_then_opens_after_unlock() {
        let mut sim = Simulation::from_graph(sample_graph());
        sim.state.room_id = "gatehouse".to_string();
        sim.state.player.position = Vec2 { x: 480.0, y: 30.0 };

        // Push against the locked exit for several ticks.
        for _ in 0..8 {
            sim.tick(TICK_MS, &held(MoveAction::Up));
        }
        assert_eq!(sim.state().room_id(), "gatehouse");
        let refusals = sim
            .state()
            .messages()
            .filter(|line| *line == "The iron gate blocks your path.")
            .count();
        assert_eq!(refusals, 1);

        // Unlock through the gate interactable, then walk through.
        sim.state.inventory.insert("key".to_string());
        sim.state.player.position = Vec2 { x: 460.0, y: 60.0 };
        sim.interact();
        assert!(sim.state().has_flag("gate_unlocked"));

        sim.state.player.position = Vec2 { x: 480.0, y: 30.0 };
        for _ in 0..8 {
            sim.tick(TICK_MS, &held(MoveAction::Up));
        }
        assert_eq!(sim.state().room_id(), "keep");
    }

    #[test]
    fn schedule_lines_fire_once_per_day() {
        let mut sim = Simulation::from_graph(sample_graph());
        sim.state.clock = GameClock::new(1, 539);
        // 120 ms ticks at 3 game-minutes per second: cross the departure
        // threshold and keep going well past it.
        for _ in 0..100 {
            sim.tick(MAX_TICK_DELTA_MS, &InputSnapshot::empty());
        }
        let departures = sim
            .state()
            .messages()
            .filter(|line| *line == "The keeper rides out.")
            .count();
        assert_eq!(departures, 1);
    }

    #[test]
    fn lingering_in_a_high_risk_room_gets_the_player_caught() {
        let mut sim = Simulation::from_graph(sample_graph());
        sim.state.room_id = "keep".to_string();
        sim.state.player.position = Vec2 { x: 200.0, y: 200.0 };
        sim.state.flags.insert("gate_unlocked".to_string());

        // 14/s toward a limit of 100: caught in just over 7 seconds.
        for _ in 0..80 {
            sim.tick(TICK_MS, &InputSnapshot::empty());
        }

        assert_eq!(sim.state().room_id(), "meadow");
        assert_eq!(sim.state().clock().day(), 2);
        // Wake minute plus whatever game time the remaining ticks added.
        let minute = sim.state().clock().minute_of_day();
        assert!((390..400).contains(&minute));
        assert!(!sim.state().has_flag("gate_unlocked"));
        assert!(sim.state().danger_percent() < 100.0);
        assert!(sim
            .state()
            .messages()
            .any(|line| line == "The keeper catches you and drags you home."));
    }

    #[test]
    fn winning_interaction_sets_the_flag_and_stills_the_meter() {
        let mut sim = Simulation::from_graph(sample_graph());
        sim.state.room_id = "keep".to_string();
        sim.state.inventory.insert("charm".to_string());
        sim.state.clock = GameClock::new(1, 600);
        sim.state.player.position = Vec2 { x: 460.0, y: 200.0 };

        sim.interact();
        assert!(sim.state().has_flag("won"));
        assert_eq!(
            sim.state().objective_line(sim.graph()),
            "You escaped with the relic."
        );

        // Even once the keeper is home again, a won run accrues nothing.
        sim.state.clock = GameClock::new(1, 1000);
        for _ in 0..20 {
            sim.tick(TICK_MS, &InputSnapshot::empty());
        }
        assert!(sim.state().danger_percent().abs() < 0.0001);
    }

    #[test]
    fn clock_runs_before_danger_within_a_tick() {
        let mut sim = Simulation::from_graph(sample_graph());
        sim.state.room_id = "keep".to_string();
        sim.state.clock = GameClock::new(1, 539);
        sim.state.danger = 50.0;

        // Crossing the departure minute flips the same-tick danger
        // update to the fall branch; by the end the meter has drained.
        for _ in 0..40 {
            sim.tick(MAX_TICK_DELTA_MS, &InputSnapshot::empty());
        }
        assert!(sim.state().danger_percent().abs() < 0.0001);
        assert_eq!(sim.state().room_id(), "keep");
    }

    #[test]
    fn inspect_logs_the_room_flavor_line() {
        let mut sim = Simulation::from_graph(sample_graph());
        sim.inspect();
        assert_eq!(
            sim.state().messages().next(),
            Some("Grass sways in the wind.")
        );

        sim.state.room_id = "keep".to_string();
        sim.inspect();
        assert_eq!(sim.state().messages().next(), Some("Dust hangs in the air."));
    }

    #[test]
    fn inventory_announcement_lists_labels() {
        let mut sim = Simulation::from_graph(sample_graph());
        sim.announce_inventory();
        assert_eq!(sim.state().messages().next(), Some("Inventory: nothing."));

        sim.state.inventory.insert("key".to_string());
        sim.state.inventory.insert("charm".to_string());
        sim.announce_inventory();
        assert_eq!(
            sim.state().messages().next(),
            Some("Inventory: Moon Charm, Brass Key.")
        );
    }

    #[test]
    fn interact_miss_is_logged_not_an_error() {
        let mut sim = Simulation::from_graph(sample_graph());
        sim.state.player.position = Vec2 { x: 700.0, y: 100.0 };
        sim.interact();
        assert_eq!(sim.state().messages().next(), Some(crate::interact::MISS_LINE));
    }
}
