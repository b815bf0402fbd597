//! 7x7 ASCII mini-map shown above a room description.
//!
//! The viewer sits in the centre cell. Each compass exit draws a link glyph one
//! cell outward and, unless it loops back to the same room, a room glyph two
//! cells outward. Exits with non-compass names ("up", "portal") swap the centre
//! glyph for an alternate marker instead.
//!
//! ```text
//!   +-----+
//!   ;  $  ;
//!   ;  |  ;
//!   ;$-@  ;
//!   ;     ;
//!   ;     ;
//!   +-----+
//! ```

use crate::world::types::{CharacterRecord, Direction, ExitRecord};

const GRID_SIZE: usize = 7;
const CENTER: usize = 3;

const BASE_GRID: [[char; GRID_SIZE]; GRID_SIZE] = [
    ['+', '-', '-', '-', '-', '-', '+'],
    [';', ' ', ' ', ' ', ' ', ' ', ';'],
    [';', ' ', ' ', ' ', ' ', ' ', ';'],
    [';', ' ', ' ', '@', ' ', ' ', ';'],
    [';', ' ', ' ', ' ', ' ', ' ', ';'],
    [';', ' ', ' ', ' ', ' ', ' ', ';'],
    ['+', '-', '-', '-', '-', '-', '+'],
];

/// Grid offset and link glyph for a compass exit. `dy` grows northward.
pub fn exit_shift(direction: Direction) -> (isize, isize, char) {
    match direction {
        Direction::North => (0, 1, '|'),
        Direction::East => (1, 0, '-'),
        Direction::South => (0, -1, '|'),
        Direction::West => (-1, 0, '-'),
        Direction::Northeast => (1, 1, '/'),
        Direction::Southeast => (1, -1, '\\'),
        Direction::Southwest => (-1, -1, '/'),
        Direction::Northwest => (-1, 1, '\\'),
    }
}

/// Glyphs stamped onto the grid. Markup-aware callers can wrap them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapStyle {
    pub player: String,
    pub player_alt: String,
    pub room: String,
    pub link_open: String,
    pub link_close: String,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            player: "@".to_string(),
            player_alt: ">".to_string(),
            room: "$".to_string(),
            link_open: String::new(),
            link_close: String::new(),
        }
    }
}

/// Whether `looker` should see a mini-map at all: only puppeted characters
/// whose account has not asked for screen-reader friendly output.
pub fn wants_minimap(looker: &CharacterRecord) -> bool {
    match &looker.account {
        Some(account) => !account.uses_screenreader(),
        None => false,
    }
}

/// Stamped grid, row 0 at the bottom (south).
#[derive(Debug, Clone)]
pub struct MiniMap {
    cells: Vec<Vec<String>>,
}

impl MiniMap {
    pub fn build(room_id: &str, exits: &[ExitRecord], style: &MapStyle) -> Self {
        let mut cells: Vec<Vec<String>> = BASE_GRID
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        cells[CENTER][CENTER] = style.player.clone();

        for exit in exits {
            let Some(direction) = Direction::from_exit_key(&exit.key) else {
                cells[CENTER][CENTER] = style.player_alt.clone();
                continue;
            };
            let (dx, dy, glyph) = exit_shift(direction);
            let (x1, y1) = offset(dx, dy, 1);
            cells[y1][x1] = format!("{}{}{}", style.link_open, glyph, style.link_close);
            if exit.destination != room_id {
                let (x2, y2) = offset(dx, dy, 2);
                cells[y2][x2] = style.room.clone();
            }
        }

        Self { cells }
    }

    /// Cell at `(x, y)` with `y` counted northward from the bottom row.
    pub fn cell(&self, x: usize, y: usize) -> Option<&str> {
        self.cells.get(y)?.get(x).map(String::as_str)
    }

    /// Cell relative to the centre.
    pub fn at_offset(&self, dx: isize, dy: isize) -> Option<&str> {
        let x = CENTER.checked_add_signed(dx)?;
        let y = CENTER.checked_add_signed(dy)?;
        self.cell(x, y)
    }

    pub fn center(&self) -> &str {
        &self.cells[CENTER][CENTER]
    }

    /// Rows top to bottom, each indented by two spaces.
    pub fn render(&self) -> String {
        let rows: Vec<String> = self.cells.iter().rev().map(|row| row.concat()).collect();
        format!("  {}", rows.join("\n  "))
    }
}

fn offset(dx: isize, dy: isize, distance: isize) -> (usize, usize) {
    // Shifts are at most 2 cells from the centre of a 7-wide grid.
    let x = (CENTER as isize + dx * distance) as usize;
    let y = (CENTER as isize + dy * distance) as usize;
    (x, y)
}

/// Render the mini-map for `looker`, or an empty string when they should not
/// get one.
pub fn render_minimap(
    looker: &CharacterRecord,
    room_id: &str,
    exits: &[ExitRecord],
    style: &MapStyle,
) -> String {
    if !wants_minimap(looker) {
        return String::new();
    }
    MiniMap::build(room_id, exits, style).render()
}
