/// Held movement actions sampled by the host once per tick. Discrete
/// requests (interact, inspect) are separate entry points on the
/// simulation rather than snapshot fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAction {
    Up,
    Down,
    Left,
    Right,
}

const MOVE_ACTION_COUNT: usize = 4;

fn action_index(action: MoveAction) -> usize {
    match action {
        MoveAction::Up => 0,
        MoveAction::Down => 1,
        MoveAction::Left => 2,
        MoveAction::Right => 3,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    held: [bool; MOVE_ACTION_COUNT],
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_down(&self, action: MoveAction) -> bool {
        self.held[action_index(action)]
    }

    pub fn set(&mut self, action: MoveAction, is_down: bool) {
        self.held[action_index(action)] = is_down;
    }

    pub fn with_action_down(mut self, action: MoveAction, is_down: bool) -> Self {
        self.set(action, is_down);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_no_held_actions() {
        let snapshot = InputSnapshot::empty();
        assert!(!snapshot.is_down(MoveAction::Up));
        assert!(!snapshot.is_down(MoveAction::Down));
        assert!(!snapshot.is_down(MoveAction::Left));
        assert!(!snapshot.is_down(MoveAction::Right));
    }

    #[test]
    fn builder_sets_and_clears_actions() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(MoveAction::Left, true)
            .with_action_down(MoveAction::Up, true)
            .with_action_down(MoveAction::Left, false);
        assert!(snapshot.is_down(MoveAction::Up));
        assert!(!snapshot.is_down(MoveAction::Left));
    }
}
