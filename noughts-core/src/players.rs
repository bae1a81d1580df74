//! Non-engine opponents

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::board::Board;

/// Picks a uniformly random empty cell
pub struct RandomMover {
    rng: ChaCha8Rng,
}

impl RandomMover {
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// `None` on a full board
    pub fn pick(&mut self, board: &Board) -> Option<usize> {
        board.empty_cells().choose(&mut self.rng)
    }
}

impl Default for RandomMover {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Side;

    #[test]
    fn test_picks_empty_cells() {
        let mut mover = RandomMover::with_seed(7);
        let board: Board = "XOXOX....".parse().unwrap();
        for _ in 0..50 {
            let index = mover.pick(&board).unwrap();
            assert!(board.is_empty_at(index));
        }
    }

    #[test]
    fn test_full_board() {
        let mut mover = RandomMover::default();
        let mut board = Board::empty();
        for i in 0..9 {
            board.place(i, if i % 2 == 0 { Side::Human } else { Side::Computer });
        }
        assert_eq!(mover.pick(&board), None);
    }

    #[test]
    fn test_seed_is_deterministic() {
        let board = Board::empty();
        let mut a = RandomMover::with_seed(3);
        let mut b = RandomMover::with_seed(3);
        for _ in 0..10 {
            assert_eq!(a.pick(&board), b.pick(&board));
        }
    }
}
