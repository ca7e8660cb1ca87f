// Logical test boards and the generator that produces them.
//
// A `LogicalBoard` is the test case handed to a circuit: a 6×7 grid of
// marker states for a gravity-drop game. Row 0 is the top row, so a column
// is full exactly when its row-0 cell is occupied. Boards are immutable once
// generated and owned by the task that verifies them.
//
// `RandomBoardGenerator` plays a random legal game from the empty board:
// markers alternate A, B, A, ... and each lands in the lowest empty row of a
// randomly chosen open column. A drop that would complete a line of four for
// the mover is rejected (the game would already be over), and the board is
// never filled completely, so every generated position has at least one
// legal move left.

use circuit_checker_prng::GameRng;
use serde::{Deserialize, Serialize};

/// Rows on a board.
pub const ROWS: usize = 6;
/// Columns on a board, and output slots on a fixture.
pub const COLS: usize = 7;

/// State of one board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Empty,
    MarkerA,
    MarkerB,
    /// Both markers at once. Not reachable by play, but encodable.
    Both,
}

impl CellState {
    /// Integer code used on the wire: 0 empty, 1 A, 2 B, 3 both.
    pub fn code(self) -> u8 {
        match self {
            CellState::Empty => 0,
            CellState::MarkerA => 1,
            CellState::MarkerB => 2,
            CellState::Both => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellState::Empty),
            1 => Some(CellState::MarkerA),
            2 => Some(CellState::MarkerB),
            3 => Some(CellState::Both),
            _ => None,
        }
    }

    /// Build a state from its two marker bits.
    pub fn from_markers(a: bool, b: bool) -> Self {
        match (a, b) {
            (false, false) => CellState::Empty,
            (true, false) => CellState::MarkerA,
            (false, true) => CellState::MarkerB,
            (true, true) => CellState::Both,
        }
    }

    pub fn has_marker_a(self) -> bool {
        matches!(self, CellState::MarkerA | CellState::Both)
    }

    pub fn has_marker_b(self) -> bool {
        matches!(self, CellState::MarkerB | CellState::Both)
    }
}

/// A 6×7 test board. Row 0 is the top.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalBoard {
    cells: [[CellState; COLS]; ROWS],
}

impl LogicalBoard {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [[CellState; COLS]; ROWS]) -> Self {
        Self { cells }
    }

    /// Parse rows of integer codes. `None` if any code is outside 0..=3.
    pub fn from_codes(codes: [[u8; COLS]; ROWS]) -> Option<Self> {
        let mut board = Self::empty();
        for (row, line) in codes.iter().enumerate() {
            for (col, &code) in line.iter().enumerate() {
                board.cells[row][col] = CellState::from_code(code)?;
            }
        }
        Some(board)
    }

    pub fn get(&self, row: usize, col: usize) -> CellState {
        self.cells[row][col]
    }

    /// Iterate `(row, col, state)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellState)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(move |(col, &state)| (row, col, state))
        })
    }

    /// A column is full when its top cell is occupied.
    pub fn is_column_full(&self, col: usize) -> bool {
        self.cells[0][col] != CellState::Empty
    }

    /// Columns that can still take a marker, left to right.
    pub fn open_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..COLS).filter(|&col| !self.is_column_full(col))
    }

    /// Lowest empty row in `col`, if any.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][col] == CellState::Empty)
    }

    pub fn occupied_count(&self) -> usize {
        self.iter()
            .filter(|&(_, _, state)| state != CellState::Empty)
            .count()
    }

    fn set(&mut self, row: usize, col: usize, state: CellState) {
        self.cells[row][col] = state;
    }

    /// Whether the marker at `(row, col)` is part of a line of four.
    fn completes_line(&self, row: usize, col: usize) -> bool {
        let state = self.cells[row][col];
        if state == CellState::Empty {
            return false;
        }
        const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
        DIRECTIONS.iter().any(|&(dr, dc)| {
            let run = |sign: i32| {
                let mut n = 0;
                let (mut r, mut c) = (row as i32 + dr * sign, col as i32 + dc * sign);
                while (0..ROWS as i32).contains(&r)
                    && (0..COLS as i32).contains(&c)
                    && self.cells[r as usize][c as usize] == state
                {
                    n += 1;
                    r += dr * sign;
                    c += dc * sign;
                }
                n
            };
            1 + run(1) + run(-1) >= 4
        })
    }
}

/// Source of fresh test boards.
pub trait BoardGenerator: Send {
    fn generate(&mut self) -> LogicalBoard;
}

/// Random positions reachable by legal play. See the module docs.
#[derive(Clone, Debug)]
pub struct RandomBoardGenerator {
    rng: GameRng,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(&mut self) -> LogicalBoard {
        let mut board = LogicalBoard::empty();
        // Strictly fewer than ROWS * COLS drops: at least one column stays open.
        let target = self.rng.range_usize(0, ROWS * COLS);
        let mut mover = CellState::MarkerA;

        for _ in 0..target {
            let mut candidates: Vec<usize> = board.open_columns().collect();
            let mut placed = false;
            while !candidates.is_empty() {
                let pick = self.rng.range_usize(0, candidates.len());
                let col = candidates.swap_remove(pick);
                let Some(row) = board.landing_row(col) else {
                    continue;
                };
                board.set(row, col, mover);
                if board.completes_line(row, col) {
                    board.set(row, col, CellState::Empty);
                    continue;
                }
                placed = true;
                break;
            }
            if !placed {
                break;
            }
            mover = match mover {
                CellState::MarkerA => CellState::MarkerB,
                _ => CellState::MarkerA,
            };
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_line_of_four(board: &LogicalBoard) -> bool {
        board
            .iter()
            .any(|(row, col, _)| board.completes_line(row, col))
    }

    #[test]
    fn codes_roundtrip_through_states() {
        for code in 0..4 {
            assert_eq!(CellState::from_code(code).unwrap().code(), code);
        }
        assert_eq!(CellState::from_code(4), None);
    }

    #[test]
    fn marker_bits() {
        assert!(CellState::Both.has_marker_a() && CellState::Both.has_marker_b());
        assert!(CellState::MarkerA.has_marker_a() && !CellState::MarkerA.has_marker_b());
        assert!(!CellState::Empty.has_marker_a() && !CellState::Empty.has_marker_b());
        assert_eq!(CellState::from_markers(true, true), CellState::Both);
        assert_eq!(CellState::from_markers(false, true), CellState::MarkerB);
    }

    #[test]
    fn from_codes_rejects_unknown_state() {
        let mut codes = [[0u8; COLS]; ROWS];
        codes[2][3] = 9;
        assert_eq!(LogicalBoard::from_codes(codes), None);
        codes[2][3] = 3;
        assert_eq!(
            LogicalBoard::from_codes(codes).unwrap().get(2, 3),
            CellState::Both
        );
    }

    #[test]
    fn column_full_checks_top_row() {
        let mut codes = [[0u8; COLS]; ROWS];
        for row in codes.iter_mut() {
            row[3] = 1;
        }
        let board = LogicalBoard::from_codes(codes).unwrap();
        assert!(board.is_column_full(3));
        assert!(!board.is_column_full(2));
        assert_eq!(board.open_columns().count(), COLS - 1);
        assert_eq!(board.landing_row(3), None);
        assert_eq!(board.landing_row(0), Some(ROWS - 1));
    }

    #[test]
    fn generated_boards_are_reachable_positions() {
        let mut generator = RandomBoardGenerator::new(17);
        for _ in 0..300 {
            let board = generator.generate();

            // Gravity: no empty cell below an occupied one.
            for col in 0..COLS {
                let mut seen_marker = false;
                for row in 0..ROWS {
                    let occupied = board.get(row, col) != CellState::Empty;
                    if seen_marker {
                        assert!(occupied, "floating marker in column {col}");
                    }
                    seen_marker |= occupied;
                }
            }

            let a = board
                .iter()
                .filter(|&(_, _, s)| s == CellState::MarkerA)
                .count();
            let b = board
                .iter()
                .filter(|&(_, _, s)| s == CellState::MarkerB)
                .count();
            assert!(a == b || a == b + 1, "turn order broken: {a} A vs {b} B");
            assert!(board.iter().all(|(_, _, s)| s != CellState::Both));
            assert!(board.open_columns().count() > 0);
            assert!(!has_line_of_four(&board));
        }
    }

    #[test]
    fn generator_is_deterministic() {
        let mut a = RandomBoardGenerator::new(5);
        let mut b = RandomBoardGenerator::new(5);
        for _ in 0..20 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn generator_produces_varied_fill_levels() {
        let mut generator = RandomBoardGenerator::new(99);
        let counts: Vec<usize> = (0..50).map(|_| generator.generate().occupied_count()).collect();
        assert!(counts.iter().any(|&n| n < 10));
        assert!(counts.iter().any(|&n| n > 20));
    }
}
