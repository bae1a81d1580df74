//! 3x3 board with row-major cell indices
//!
//! ```text
//!  0 | 1 | 2
//! ---+---+---
//!  3 | 4 | 5
//! ---+---+---
//!  6 | 7 | 8
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseBoardError;

/// Number of cells on the board
pub const CELLS: usize = 9;

/// Cells per row/column
pub const SIDE_LEN: usize = 3;

// ============================================================================
// SIDES AND CELLS
// ============================================================================

/// The two players. The human plays `X`, the computer plays `O`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Human,
    Computer,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Human => Side::Computer,
            Side::Computer => Side::Human,
        }
    }

    /// Mark drawn for this side
    pub fn mark(self) -> char {
        match self {
            Side::Human => 'X',
            Side::Computer => 'O',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Human => write!(f, "human"),
            Side::Computer => write!(f, "computer"),
        }
    }
}

/// State of a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Side),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

// ============================================================================
// WIN LINES
// ============================================================================

/// One of the eight three-in-a-row lines
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWinLine")]
pub struct WinLine {
    /// Position in [`WIN_LINES`]
    pub index: usize,
    pub cells: [usize; 3],
}

impl WinLine {
    const fn new(index: usize, cells: [usize; 3]) -> Self {
        Self { index, cells }
    }

    /// Human-readable name ("top row", "anti-diagonal", ...)
    pub fn name(&self) -> &'static str {
        LINE_NAMES.get(self.index).copied().unwrap_or("line")
    }
}

/// Wire form, accepted only if it matches an entry of [`WIN_LINES`]
#[derive(Deserialize)]
struct RawWinLine {
    index: usize,
    cells: [usize; 3],
}

impl TryFrom<RawWinLine> for WinLine {
    type Error = ParseBoardError;

    fn try_from(raw: RawWinLine) -> Result<Self, Self::Error> {
        let line = WinLine::new(raw.index, raw.cells);
        match WIN_LINES.get(raw.index) {
            Some(known) if *known == line => Ok(line),
            _ => Err(ParseBoardError::UnknownLine {
                index: raw.index,
                cells: raw.cells,
            }),
        }
    }
}

/// Rows, then columns, then diagonals. Evaluation reports the first match
/// in this order.
pub const WIN_LINES: [WinLine; 8] = [
    WinLine::new(0, [0, 1, 2]),
    WinLine::new(1, [3, 4, 5]),
    WinLine::new(2, [6, 7, 8]),
    WinLine::new(3, [0, 3, 6]),
    WinLine::new(4, [1, 4, 7]),
    WinLine::new(5, [2, 5, 8]),
    WinLine::new(6, [0, 4, 8]),
    WinLine::new(7, [2, 4, 6]),
];

pub const LINE_NAMES: [&str; 8] = [
    "top row",
    "middle row",
    "bottom row",
    "left column",
    "center column",
    "right column",
    "diagonal",
    "anti-diagonal",
];

// ============================================================================
// BOARD
// ============================================================================

/// A board snapshot. Cheap to copy; the search mutates one in place and
/// restores every cell it touches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Board {
    pub const fn empty() -> Self {
        Self {
            cells: [Cell::Empty; CELLS],
        }
    }

    pub fn from_cells(cells: [Cell; CELLS]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    /// Panics if `index >= 9`.
    pub fn get(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Panics if `index >= 9`.
    pub fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    /// Mark `index` for `side`. Panics if `index >= 9`.
    pub fn place(&mut self, index: usize, side: Side) {
        self.cells[index] = Cell::Occupied(side);
    }

    /// Reset `index` to empty. Panics if `index >= 9`.
    pub fn clear(&mut self, index: usize) {
        self.cells[index] = Cell::Empty;
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(|c| c.is_empty())
    }

    /// Empty cell indices in ascending order
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(i, _)| i)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Number of cells held by `side`
    pub fn count(&self, side: Side) -> usize {
        self.cells
            .iter()
            .filter(|&&c| c == Cell::Occupied(side))
            .count()
    }

    /// Whether `side` holds every cell of `line`
    pub fn owns_line(&self, line: &WinLine, side: Side) -> bool {
        line.cells
            .iter()
            .all(|&i| self.cells[i] == Cell::Occupied(side))
    }

    /// Multi-line grid; empty cells show their index
    pub fn grid(&self) -> String {
        let mut out = String::new();
        for row in 0..SIDE_LEN {
            if row > 0 {
                out.push_str("---+---+---\n");
            }
            for col in 0..SIDE_LEN {
                if col > 0 {
                    out.push('|');
                }
                let index = row * SIDE_LEN + col;
                let symbol = match self.cells[index] {
                    Cell::Occupied(side) => side.mark(),
                    Cell::Empty => char::from(b'0' + index as u8),
                };
                out.push(' ');
                out.push(symbol);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}

/// Compact row-major notation: `X`, `O`, `.` for empty
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            let symbol = match cell {
                Cell::Occupied(side) => side.mark(),
                Cell::Empty => '.',
            };
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Accepts `X`/`x`, `O`/`o`, and `.`, `-`, `_` or the cell's own digit for
    /// empty. Whitespace, `/` and `|` are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/' && *c != '|')
            .collect();
        if symbols.len() != CELLS {
            return Err(ParseBoardError::Length(symbols.len()));
        }

        let mut board = Board::empty();
        for (index, &symbol) in symbols.iter().enumerate() {
            let cell = match symbol {
                'X' | 'x' => Cell::Occupied(Side::Human),
                'O' | 'o' => Cell::Occupied(Side::Computer),
                '.' | '-' | '_' => Cell::Empty,
                d if d.to_digit(10) == Some(index as u32) => Cell::Empty,
                other => return Err(ParseBoardError::InvalidChar(other)),
            };
            board.set(index, cell);
        }
        Ok(board)
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.to_string()
    }
}

impl TryFrom<String> for Board {
    type Error = ParseBoardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let board: Board = "X.O/.X./..O".parse().unwrap();
        assert_eq!(board.get(0), Cell::Occupied(Side::Human));
        assert_eq!(board.get(2), Cell::Occupied(Side::Computer));
        assert_eq!(board.get(1), Cell::Empty);
        assert_eq!(board.to_string(), "X.O.X...O");
    }

    #[test]
    fn test_parse_numbered_empty_cells() {
        let board: Board = "0123456X8".parse().unwrap();
        assert_eq!(board.count(Side::Human), 1);
        assert_eq!(board.get(7), Cell::Occupied(Side::Human));
        assert_eq!(board.empty_cells().count(), 8);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!("X.O".parse::<Board>(), Err(ParseBoardError::Length(3)));
        assert_eq!(
            "X.O.Z....".parse::<Board>(),
            Err(ParseBoardError::InvalidChar('Z'))
        );
        // A digit only stands for empty in its own cell
        assert_eq!(
            "5........".parse::<Board>(),
            Err(ParseBoardError::InvalidChar('5'))
        );
    }

    #[test]
    fn test_empty_cells_ascending() {
        let board: Board = "X...O...X".parse().unwrap();
        let empty: Vec<usize> = board.empty_cells().collect();
        assert_eq!(empty, vec![1, 2, 3, 5, 6, 7]);
        assert!(!board.is_full());
    }

    #[test]
    fn test_win_lines_table() {
        for (i, line) in WIN_LINES.iter().enumerate() {
            assert_eq!(line.index, i);
        }
        assert_eq!(WIN_LINES[7].cells, [2, 4, 6]);
        assert_eq!(WIN_LINES[3].name(), "left column");
    }

    #[test]
    fn test_win_line_deserialize_checks_table() {
        let line: WinLine = serde_json::from_str(r#"{"index":7,"cells":[2,4,6]}"#).unwrap();
        assert_eq!(line, WIN_LINES[7]);

        assert!(serde_json::from_str::<WinLine>(r#"{"index":9,"cells":[0,1,2]}"#).is_err());
        assert!(serde_json::from_str::<WinLine>(r#"{"index":0,"cells":[0,4,8]}"#).is_err());
    }

    #[test]
    fn test_win_line_name_out_of_range() {
        let line = WinLine {
            index: 12,
            cells: [0, 1, 2],
        };
        assert_eq!(line.name(), "line");
    }

    #[test]
    fn test_place_and_clear() {
        let mut board = Board::empty();
        board.place(4, Side::Computer);
        assert!(!board.is_empty_at(4));
        board.clear(4);
        assert_eq!(board, Board::empty());
        assert!(!board.is_empty_at(9));
    }

    #[test]
    fn test_grid_shows_indices() {
        let board: Board = "X...O....".parse().unwrap();
        let grid = board.grid();
        assert!(grid.starts_with(" X | 1 | 2 \n"));
        assert!(grid.contains(" 3 | O | 5 "));
    }

    #[test]
    fn test_serde_as_string() {
        let board: Board = "XO.......".parse().unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, "\"XO.......\"");
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
        assert_eq!(serde_json::to_string(&Side::Computer).unwrap(), "\"computer\"");
    }
}
