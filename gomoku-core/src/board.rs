mod index_parser;

use index_parser::IndexParser;
use std::fmt::Display;

/// Side length of the board.
pub const BOARD_SIZE: usize = 15;
/// Number of cells on the board.
pub const BOARD_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// Axis directions as `(row_delta, column_delta)`: horizontal, vertical and the two diagonals.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn name(self) -> &'static str {
        match self {
            Cell::Empty => "empty",
            Cell::Black => "black",
            Cell::White => "white",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => 'X',
            Cell::White => 'O',
        }
    }

    /// Small-integer code used by board snapshots: 0 empty, 1 black, 2 white.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Black => 1,
            Cell::White => 2,
        }
    }
}

/// A coordinate on the board. Also serves as the action key of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    pub fn is_valid(self) -> bool {
        self.row < BOARD_SIZE && self.column < BOARD_SIZE
    }

    /// Row-major index of this position. Only meaningful for valid positions.
    pub fn to_index(self) -> usize {
        self.row * BOARD_SIZE + self.column
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if BOARD_CELLS <= index {
            return None;
        }

        Some(Self::new(index / BOARD_SIZE, index % BOARD_SIZE))
    }

    fn offset(self, row_delta: isize, column_delta: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(row_delta)?;
        let column = self.column.checked_add_signed(column_delta)?;
        let position = Self::new(row, column);

        if position.is_valid() {
            Some(position)
        } else {
            None
        }
    }
}

impl Display for Position {
    /// Formats the position as `{column}{row}`, e.g. `A1` for `(0, 0)` and `H8` for `(7, 7)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut x = self.column;
        let mut alpha = String::new();

        loop {
            alpha.insert(0, (b'A' + (x % 26) as u8) as char);
            x /= 26;

            if x == 0 {
                break;
            }
        }

        write!(f, "{}{}", alpha, self.row + 1)
    }
}

/// A contiguous line of same-coloured stones through one cell along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Run {
    /// Number of stones in the line, including the cell it was measured from.
    pub length: usize,
    /// How many of the two cells just past the line are on the board and empty.
    pub open_ends: usize,
}

impl Run {
    pub fn is_open_three(self) -> bool {
        self.length == 3 && self.open_ends == 2
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_CELLS],
        }
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[Cell; BOARD_CELLS] {
        &self.cells
    }

    pub fn get_cell(&self, position: Position) -> Option<Cell> {
        if !position.is_valid() {
            return None;
        }

        Some(self.cells[position.to_index()])
    }

    pub(crate) fn set_cell(&mut self, position: Position, cell: Cell) {
        self.cells[position.to_index()] = cell;
    }

    /// Every empty position, in row-major order.
    pub fn available_moves(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| {
                if cell.is_empty() {
                    Position::from_index(index)
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Read-only row-major view of the board using [`Cell::code`].
    pub fn snapshot(&self) -> [[u8; BOARD_SIZE]; BOARD_SIZE] {
        let mut snapshot = [[0u8; BOARD_SIZE]; BOARD_SIZE];

        for (index, cell) in self.cells.iter().enumerate() {
            snapshot[index / BOARD_SIZE][index % BOARD_SIZE] = cell.code();
        }

        snapshot
    }

    /// Parses a string into a board position.
    ///
    /// The string is in the format of:
    /// - a1
    /// - 3c
    /// - A 10
    /// - 15 O
    /// - 3 15
    pub fn parse_position(&self, input: &str) -> Option<Position> {
        IndexParser::new(BOARD_SIZE, input).parse()
    }

    /// Measures the line of stones through `position` along each of the four axes.
    ///
    /// Returns `None` if the position is off the board or empty. Runs are ordered
    /// horizontal, vertical, diagonal down-right, diagonal down-left.
    pub fn runs_through(&self, position: Position) -> Option<[Run; 4]> {
        let cell = self.get_cell(position)?;

        if cell.is_empty() {
            return None;
        }

        let mut runs = [Run::default(); 4];

        for (run, &(row_delta, column_delta)) in runs.iter_mut().zip(AXES.iter()) {
            let (forward, forward_open) =
                self.walk_from(position, cell, row_delta, column_delta);
            let (backward, backward_open) =
                self.walk_from(position, cell, -row_delta, -column_delta);

            *run = Run {
                length: 1 + forward + backward,
                open_ends: forward_open as usize + backward_open as usize,
            };
        }

        Some(runs)
    }

    /// Length of the longest line through `position`, or zero for an empty cell.
    pub fn longest_run(&self, position: Position) -> usize {
        self.runs_through(position)
            .map(|runs| runs.iter().map(|run| run.length).max().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Whether the stone at `position` sits in an unblocked line of exactly three.
    pub fn forms_open_three(&self, position: Position) -> bool {
        self.runs_through(position)
            .map(|runs| runs.iter().any(|run| run.is_open_three()))
            .unwrap_or(false)
    }

    /// Counts same-coloured stones stepping away from `from` (exclusive) and reports
    /// whether the cell that stopped the walk is on the board and empty.
    fn walk_from(
        &self,
        from: Position,
        cell: Cell,
        row_delta: isize,
        column_delta: isize,
    ) -> (usize, bool) {
        let mut count = 0;
        let mut current = from;

        loop {
            let next = match current.offset(row_delta, column_delta) {
                Some(next) => next,
                None => return (count, false),
            };
            let next_cell = self.cells[next.to_index()];

            if next_cell != cell {
                return (count, next_cell.is_empty());
            }

            count += 1;
            current = next;
        }
    }
}

impl Display for Board {
    /// Returns a string representation of the board with chess-like headers.
    ///
    /// Example output for the top-left corner:
    ///    A B C
    ///  1 . . .
    ///  2 . X .
    ///  3 . . O
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut result = String::with_capacity(BOARD_SIZE * (BOARD_SIZE + 2) * 2);

        result.push_str("   ");
        for x in 0..BOARD_SIZE {
            result.push((b'A' + x as u8) as char);
            result.push(' ');
        }
        result.push('\n');

        for y in 0..BOARD_SIZE {
            result.push_str(&format!("{:2} ", y + 1));

            for x in 0..BOARD_SIZE {
                result.push(self.cells[y * BOARD_SIZE + x].symbol());
                result.push(' ');
            }
            if y < BOARD_SIZE - 1 {
                result.push('\n');
            }
        }

        write!(f, "{}", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, stones: &[(usize, usize)], cell: Cell) {
        for &(row, column) in stones {
            board.set_cell(Position::new(row, column), cell);
        }
    }

    #[test]
    fn test_runs_through() {
        let mut board = Board::new();

        // horizontal black line of four from the corner
        place(&mut board, &[(0, 0), (0, 1), (0, 2), (0, 3)], Cell::Black);
        // vertical white line of three
        place(&mut board, &[(1, 0), (2, 0), (3, 0)], Cell::White);
        // diagonal black line
        place(&mut board, &[(1, 1), (2, 2), (3, 3)], Cell::Black);

        println!("{}", board);

        let runs = board.runs_through(Position::new(0, 0)).unwrap();
        assert_eq!(runs[0], Run { length: 4, open_ends: 1 });
        assert_eq!(runs[1].length, 1);
        assert_eq!(runs[2].length, 4);

        let runs = board.runs_through(Position::new(2, 0)).unwrap();
        assert_eq!(runs[1], Run { length: 3, open_ends: 1 });

        assert_eq!(board.longest_run(Position::new(2, 2)), 4);
        assert_eq!(board.runs_through(Position::new(7, 7)), None);
        assert_eq!(board.runs_through(Position::new(15, 0)), None);
    }

    #[test]
    fn test_open_three_requires_both_ends_empty() {
        let mut board = Board::new();
        place(&mut board, &[(7, 6), (7, 7), (7, 8)], Cell::Black);
        assert!(board.forms_open_three(Position::new(7, 7)));

        board.set_cell(Position::new(7, 9), Cell::White);
        assert!(!board.forms_open_three(Position::new(7, 7)));
    }

    #[test]
    fn test_open_three_against_edge_is_not_open() {
        let mut board = Board::new();
        place(&mut board, &[(0, 0), (0, 1), (0, 2)], Cell::White);
        assert!(!board.forms_open_three(Position::new(0, 1)));

        let mut board = Board::new();
        place(&mut board, &[(2, 14), (3, 13), (4, 12)], Cell::White);
        assert!(!board.forms_open_three(Position::new(3, 13)));

        let mut board = Board::new();
        place(&mut board, &[(3, 13), (4, 12), (5, 11)], Cell::White);
        assert!(board.forms_open_three(Position::new(4, 12)));
    }

    #[test]
    fn test_four_is_not_open_three() {
        let mut board = Board::new();
        place(&mut board, &[(5, 5), (6, 5), (7, 5), (8, 5)], Cell::Black);
        assert!(!board.forms_open_three(Position::new(8, 5)));
    }

    #[test]
    fn test_available_moves_are_row_major() {
        let mut board = Board::new();
        assert_eq!(board.available_moves().len(), BOARD_CELLS);

        place(&mut board, &[(0, 0), (0, 2)], Cell::Black);
        let moves = board.available_moves();
        assert_eq!(moves.len(), BOARD_CELLS - 2);
        assert_eq!(moves[0], Position::new(0, 1));
        assert_eq!(moves[1], Position::new(0, 3));
        assert_eq!(board.stone_count(), 2);
        assert!(!board.is_full());
    }

    #[test]
    fn test_snapshot_uses_cell_codes() {
        let mut board = Board::new();
        board.set_cell(Position::new(3, 4), Cell::Black);
        board.set_cell(Position::new(14, 0), Cell::White);

        let snapshot = board.snapshot();
        assert_eq!(snapshot[3][4], 1);
        assert_eq!(snapshot[14][0], 2);
        assert_eq!(snapshot[0][0], 0);
    }

    #[test]
    fn test_position_display_and_parse_agree() {
        let board = Board::new();

        for position in [Position::new(0, 0), Position::new(7, 7), Position::new(14, 14)] {
            let text = position.to_string();
            assert_eq!(board.parse_position(&text), Some(position));
        }

        assert_eq!(Position::new(7, 7).to_string(), "H8");
        assert_eq!(Position::from_index(BOARD_CELLS), None);
    }
}
