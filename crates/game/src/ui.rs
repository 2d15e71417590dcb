use std::io::{self, Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::ResetColor,
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use sim::{Rect, Simulation};

/// World pixels per map cell. Terminal cells are roughly twice as tall
/// as they are wide, so the vertical scale doubles the horizontal one.
const CELL_W: f32 = 10.0;
const CELL_H: f32 = 20.0;
const MESSAGE_TAIL: usize = 8;

const FLOOR_GLYPH: char = '.';
const SOLID_GLYPH: char = '#';
const EXIT_GLYPH: char = '=';
const LOCKED_EXIT_GLYPH: char = '+';
const INTERACTABLE_GLYPH: char = '?';
const PLAYER_GLYPH: char = '@';

/// Alternate-screen raw-mode session. Dropping the guard restores the
/// terminal even when the loop bails out with an error.
pub struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;
        Ok(Self { out })
    }

    pub fn out(&mut self) -> &mut Stdout {
        &mut self.out
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
    }
}

pub fn draw(out: &mut Stdout, simulation: &Simulation) -> io::Result<()> {
    queue!(out, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
    for line in status_lines(simulation) {
        write!(out, "{line}\r\n")?;
    }
    write!(out, "\r\n")?;
    for row in render_room(simulation) {
        write!(out, "{row}\r\n")?;
    }
    write!(out, "\r\n")?;
    for line in simulation.state().messages().take(MESSAGE_TAIL) {
        write!(out, "  {line}\r\n")?;
    }
    out.flush()
}

fn status_lines(simulation: &Simulation) -> Vec<String> {
    let state = simulation.state();
    let graph = simulation.graph();
    vec![
        format!("Room: {}    {}", state.room_name(graph), state.clock_line()),
        format!("{}    {}", state.keeper_line(graph), state.danger_line()),
        format!("Objective: {}", state.objective_line(graph)),
        "[wasd/arrows] move  [e] interact  [space] look  [i] inventory  [q] quit".to_string(),
    ]
}

/// Coarse character-cell projection of the current room. Later stamps
/// overwrite earlier ones, so the player always stays visible.
fn render_room(simulation: &Simulation) -> Vec<String> {
    let state = simulation.state();
    let graph = simulation.graph();
    let view = graph.view();
    let cols = (view.w / CELL_W).ceil() as usize;
    let rows = (view.h / CELL_H).ceil() as usize;
    let mut grid = vec![vec![FLOOR_GLYPH; cols]; rows];

    if let Some(room) = graph.room(state.room_id()) {
        for solid in &room.solids {
            stamp(&mut grid, solid, SOLID_GLYPH);
        }
        for exit in &room.exits {
            let locked = exit
                .requires_flag
                .as_deref()
                .is_some_and(|flag| !state.has_flag(flag));
            let glyph = if locked { LOCKED_EXIT_GLYPH } else { EXIT_GLYPH };
            stamp(&mut grid, &exit.zone, glyph);
        }
        for interactable in &room.interactables {
            stamp(&mut grid, &interactable.zone, INTERACTABLE_GLYPH);
        }
    }
    stamp(&mut grid, &state.player().bounds(), PLAYER_GLYPH);

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

fn stamp(grid: &mut [Vec<char>], rect: &Rect, glyph: char) {
    let col_start = (rect.x / CELL_W).floor().max(0.0) as usize;
    let row_start = (rect.y / CELL_H).floor().max(0.0) as usize;
    let col_end = ((rect.x + rect.w) / CELL_W).ceil() as usize;
    let row_end = ((rect.y + rect.h) / CELL_H).ceil() as usize;
    for row in grid.iter_mut().take(row_end).skip(row_start) {
        for cell in row.iter_mut().take(col_end).skip(col_start) {
            *cell = glyph;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::load_world;

    fn sample_simulation() -> Simulation {
        Simulation::new(load_world().expect("content parses")).expect("content validates")
    }

    #[test]
    fn stamp_covers_touched_cells_only() {
        let mut grid = vec![vec![FLOOR_GLYPH; 8]; 4];
        stamp(
            &mut grid,
            &Rect {
                x: 0.0,
                y: 0.0,
                w: 25.0,
                h: 30.0,
            },
            SOLID_GLYPH,
        );

        assert_eq!(grid[0][..4], [SOLID_GLYPH, SOLID_GLYPH, SOLID_GLYPH, FLOOR_GLYPH]);
        assert_eq!(grid[1][0], SOLID_GLYPH);
        assert_eq!(grid[2][0], FLOOR_GLYPH);
    }

    #[test]
    fn stamp_clips_to_grid_bounds() {
        let mut grid = vec![vec![FLOOR_GLYPH; 4]; 2];
        stamp(
            &mut grid,
            &Rect {
                x: 30.0,
                y: 30.0,
                w: 500.0,
                h: 500.0,
            },
            SOLID_GLYPH,
        );
        assert_eq!(grid[1][3], SOLID_GLYPH);
    }

    #[test]
    fn room_projection_has_view_dimensions_and_player() {
        let simulation = sample_simulation();
        let rows = render_room(&simulation);

        assert_eq!(rows.len(), 27);
        assert!(rows.iter().all(|row| row.chars().count() == 96));
        assert!(rows.iter().any(|row| row.contains(PLAYER_GLYPH)));
        // Top border solid spans the first row.
        assert!(rows[0].chars().all(|c| c == SOLID_GLYPH));
    }

    #[test]
    fn starting_room_shows_open_exits() {
        let simulation = sample_simulation();
        let rows = render_room(&simulation);
        let flat: String = rows.concat();
        assert!(flat.contains(EXIT_GLYPH));
        assert!(!flat.contains(LOCKED_EXIT_GLYPH));
    }

    #[test]
    fn status_lines_project_world_state() {
        let simulation = sample_simulation();
        let lines = status_lines(&simulation);

        assert!(lines[0].starts_with("Room: Cottage Yard"));
        assert!(lines[0].contains("Time: Day 1, 07:30"));
        assert!(lines[1].contains("Wizard: Nearby (danger at manor/tower)"));
        assert!(lines[1].contains("Suspicion: Safe"));
        assert_eq!(lines[2], "Objective: Search the cottage for clues.");
    }
}
