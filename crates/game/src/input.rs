use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use sim::{InputSnapshot, MoveAction};

/// How long a movement key counts as held after its last press or
/// repeat event. Most terminals never deliver release events, so a
/// held key is inferred from the OS key-repeat stream; release events
/// are honored where the terminal does send them.
pub const KEY_PULSE: Duration = Duration::from_millis(180);

const MOVE_ACTIONS: [MoveAction; 4] = [
    MoveAction::Up,
    MoveAction::Down,
    MoveAction::Left,
    MoveAction::Right,
];

fn move_slot(action: MoveAction) -> usize {
    match action {
        MoveAction::Up => 0,
        MoveAction::Down => 1,
        MoveAction::Left => 2,
        MoveAction::Right => 3,
    }
}

fn move_action_for(code: KeyCode) -> Option<MoveAction> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(MoveAction::Up),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(MoveAction::Down),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(MoveAction::Left),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(MoveAction::Right),
        _ => None,
    }
}

/// Accumulates terminal key events between ticks and exposes them as
/// per-tick snapshots plus one-shot edges for the discrete requests.
#[derive(Debug, Default)]
pub struct InputCollector {
    move_deadlines: [Option<Instant>; 4],
    interact_pressed_edge: bool,
    inspect_pressed_edge: bool,
    inventory_pressed_edge: bool,
    quit_requested: bool,
}

impl InputCollector {
    pub fn handle_key_event(&mut self, event: &KeyEvent, now: Instant) {
        if event.kind == KeyEventKind::Release {
            if let Some(action) = move_action_for(event.code) {
                self.move_deadlines[move_slot(action)] = None;
            }
            return;
        }
        if let Some(action) = move_action_for(event.code) {
            self.move_deadlines[move_slot(action)] = Some(now + KEY_PULSE);
            return;
        }
        match event.code {
            KeyCode::Char('e') | KeyCode::Char('E') => self.interact_pressed_edge = true,
            KeyCode::Char(' ') => self.inspect_pressed_edge = true,
            KeyCode::Char('i') | KeyCode::Char('I') => self.inventory_pressed_edge = true,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.quit_requested = true,
            _ => {}
        }
    }

    /// Held-movement snapshot for one tick. Deadlines in the past are
    /// treated as released.
    pub fn snapshot_for_tick(&self, now: Instant) -> InputSnapshot {
        let mut snapshot = InputSnapshot::empty();
        for action in MOVE_ACTIONS {
            let held = matches!(
                self.move_deadlines[move_slot(action)],
                Some(deadline) if now < deadline
            );
            snapshot.set(action, held);
        }
        snapshot
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn take_interact_pressed(&mut self) -> bool {
        std::mem::take(&mut self.interact_pressed_edge)
    }

    pub fn take_inspect_pressed(&mut self) -> bool {
        std::mem::take(&mut self.inspect_pressed_edge)
    }

    pub fn take_inventory_pressed(&mut self) -> bool {
        std::mem::take(&mut self.inventory_pressed_edge)
    }
}
