use gomoku_core::board::{Board, Position, BOARD_CELLS};
use std::collections::HashMap;

const BITS_PER_CELL: usize = 2;
const CELLS_PER_WORD: usize = u64::BITS as usize / BITS_PER_CELL;
const STATE_KEY_WORDS: usize = BOARD_CELLS.div_ceil(CELLS_PER_WORD);

/// Row-major packing of every cell code, two bits per cell.
///
/// Two keys are equal exactly when their boards are identical cell for cell.
/// Mirrored or rotated boards produce different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateKey([u64; STATE_KEY_WORDS]);

impl StateKey {
    pub fn from_board(board: &Board) -> Self {
        let mut words = [0u64; STATE_KEY_WORDS];

        for (index, cell) in board.cells().iter().enumerate() {
            let shift = (index % CELLS_PER_WORD) * BITS_PER_CELL;
            words[index / CELLS_PER_WORD] |= u64::from(cell.code()) << shift;
        }

        Self(words)
    }

    /// Cell code stored at a row-major index.
    pub fn cell_code(&self, index: usize) -> Option<u8> {
        if BOARD_CELLS <= index {
            return None;
        }

        let shift = (index % CELLS_PER_WORD) * BITS_PER_CELL;
        Some(((self.0[index / CELLS_PER_WORD] >> shift) & 0b11) as u8)
    }
}

impl From<&Board> for StateKey {
    fn from(board: &Board) -> Self {
        Self::from_board(board)
    }
}

/// Learned action values. Pairs that were never written read as `0.0`.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<(StateKey, Position), f64>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, state: &StateKey, action: Position) -> bool {
        self.values.contains_key(&(*state, action))
    }

    /// Looks up a value, falling back to `0.0` for unseen pairs.
    pub fn get(&self, state: &StateKey, action: Position) -> f64 {
        self.values.get(&(*state, action)).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, state: StateKey, action: Position, value: f64) {
        self.values.insert((state, action), value);
    }

    /// The action with the greatest value among `actions`.
    ///
    /// Ties go to the earliest action in `actions`.
    pub fn best_action(&self, state: &StateKey, actions: &[Position]) -> Option<(Position, f64)> {
        let mut best: Option<(Position, f64)> = None;

        for &action in actions {
            let value = self.get(state, action);

            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((action, value)),
            }
        }

        best
    }

    /// Greatest value among `actions`, or `0.0` when there are none.
    pub fn max_value(&self, state: &StateKey, actions: &[Position]) -> f64 {
        self.best_action(state, actions)
            .map(|(_, value)| value)
            .unwrap_or(0.0)
    }

    /// One-step temporal-difference update, returning the new value:
    ///
    /// `Q(s, a) += learning_rate * (reward + discount_factor * max_next - Q(s, a))`
    pub fn update(
        &mut self,
        state: StateKey,
        action: Position,
        reward: f64,
        max_next: f64,
        learning_rate: f64,
        discount_factor: f64,
    ) -> f64 {
        let current = self.get(&state, action);
        let updated = current + learning_rate * (reward + discount_factor * max_next - current);
        self.set(state, action, updated);
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_core::game::Game;

    const EPSILON: f64 = 1e-12;

    fn board_after(moves: &[(usize, usize)]) -> Board {
        let mut game = Game::new();
        for &(row, column) in moves {
            game.step(Position::new(row, column));
        }
        game.board().clone()
    }

    #[test]
    fn test_state_key_identity() {
        let board = board_after(&[(7, 7), (7, 8)]);
        let same = board_after(&[(7, 7), (7, 8)]);
        let mirrored = board_after(&[(7, 7), (7, 6)]);
        let swapped = board_after(&[(7, 8), (7, 7)]);

        assert_eq!(StateKey::from_board(&board), StateKey::from_board(&same));
        assert_ne!(StateKey::from_board(&board), StateKey::from_board(&mirrored));
        assert_ne!(StateKey::from_board(&board), StateKey::from_board(&swapped));
        assert_ne!(StateKey::from_board(&board), StateKey::from_board(&Board::new()));
    }

    #[test]
    fn test_state_key_is_row_major() {
        let board = board_after(&[(0, 1), (14, 14)]);
        let key = StateKey::from(&board);

        assert_eq!(key.cell_code(0), Some(0));
        assert_eq!(key.cell_code(1), Some(1));
        assert_eq!(key.cell_code(BOARD_CELLS - 1), Some(2));
        assert_eq!(key.cell_code(BOARD_CELLS), None);
    }

    #[test]
    fn test_missing_entries_read_as_zero() {
        let mut table = QTable::new();
        let state = StateKey::from_board(&Board::new());

        assert_eq!(table.get(&state, Position::new(3, 3)), 0.0);
        assert!(!table.contains(&state, Position::new(3, 3)));
        assert!(table.is_empty());

        table.set(state, Position::new(3, 3), 0.25);
        assert_eq!(table.get(&state, Position::new(3, 3)), 0.25);
        assert_eq!(table.get(&state, Position::new(3, 4)), 0.0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_best_action_prefers_first_on_ties() {
        let mut table = QTable::new();
        let state = StateKey::from_board(&Board::new());
        let actions = [Position::new(0, 0), Position::new(0, 1), Position::new(0, 2)];

        assert_eq!(table.best_action(&state, &actions), Some((actions[0], 0.0)));

        table.set(state, actions[1], 0.5);
        table.set(state, actions[2], 0.5);
        assert_eq!(table.best_action(&state, &actions), Some((actions[1], 0.5)));

        table.set(state, actions[0], -1.0);
        table.set(state, actions[1], -0.5);
        table.set(state, actions[2], -0.25);
        assert_eq!(table.best_action(&state, &actions), Some((actions[2], -0.25)));

        assert_eq!(table.best_action(&state, &[]), None);
        assert_eq!(table.max_value(&state, &[]), 0.0);
    }

    #[test]
    fn test_update_rule() {
        let mut table = QTable::new();
        let state = StateKey::from_board(&Board::new());
        let action = Position::new(7, 7);

        let value = table.update(state, action, 1.0, 0.0, 0.1, 0.9);
        assert!((value - 0.1).abs() < EPSILON);

        // 0.1 + 0.1 * (0.0 + 0.9 * 0.5 - 0.1)
        let value = table.update(state, action, 0.0, 0.5, 0.1, 0.9);
        assert!((value - 0.135).abs() < EPSILON);
        assert!((table.get(&state, action) - 0.135).abs() < EPSILON);
    }

    #[test]
    fn test_update_is_fixed_point_without_reward_or_change() {
        let mut table = QTable::new();
        let state = StateKey::from_board(&Board::new());
        let action = Position::new(1, 2);

        let value = table.update(state, action, 0.0, 0.0, 0.1, 0.9);
        assert!(value.abs() < EPSILON);

        table.set(state, action, 0.42);
        let value = table.update(state, action, 0.0, 0.42, 0.1, 1.0);
        assert!((value - 0.42).abs() < EPSILON);
    }
}
