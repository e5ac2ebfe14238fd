
use super::{Board, PlacedTile, Position};
use super::snapshot::Move;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("square {0:?} already holds a tile")]
    SquareOccupied(Position),
    #[error("a tile is already pending on {0:?}")]
    AlreadyPending(Position),
    #[error("no pending tile on {0:?}")]
    NotPending(Position),
}

/// Tiles put on the board this turn but not submitted yet
///
/// The authoritative board is only ever read: it is passed in to check for
/// collisions and to build the preview with [`PendingMove::derived_board`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingMove {
    tiles: Vec<(Position, PlacedTile)>,
}

impl PendingMove {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tiles(&self) -> &[(Position, PlacedTile)] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.tiles.iter().any(|&(p, _)| p == pos)
    }

    pub fn get(&self, pos: Position) -> Option<PlacedTile> {
        self.tiles.iter().find(|&&(p, _)| p == pos).map(|&(_, tile)| tile)
    }

    pub fn place(&mut self, board: &Board, pos: Position, tile: PlacedTile) -> Result<(), PlacementError> {
        if board.is_occupied(pos) {
            return Err(PlacementError::SquareOccupied(pos))
        }
        if self.contains(pos) {
            return Err(PlacementError::AlreadyPending(pos))
        }
        self.tiles.push((pos, tile));
        Ok(())
    }

    pub fn retract(&mut self, pos: Position) -> Result<PlacedTile, PlacementError> {
        let index = self.tiles.iter()
            .position(|&(p, _)| p == pos)
            .ok_or(PlacementError::NotPending(pos))?;
        Ok(self.tiles.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.tiles.clear()
    }

    /// A copy of `board` with the pending tiles on it
    pub fn derived_board(&self, board: &Board) -> Board {
        let mut derived = board.clone();
        for &(pos, tile) in &self.tiles {
            derived.set(pos, Some(tile));
        }
        derived
    }

    pub fn to_move(&self) -> Move {
        Move { tiles: self.tiles.clone() }
    }
}


#[test]
fn place_rejects_collisions() {
    use crate::{pos, Letter};

    let a = PlacedTile::Letter(Letter::new('A').unwrap());
    let mut board = Board::empty();
    board.set(pos(7, 7), Some(a));

    let mut pending = PendingMove::new();
    assert_eq!(pending.place(&board, pos(7, 7), a), Err(PlacementError::SquareOccupied(pos(7, 7))));
    assert_eq!(pending.place(&board, pos(7, 8), a), Ok(()));
    assert_eq!(pending.place(&board, pos(7, 8), a), Err(PlacementError::AlreadyPending(pos(7, 8))));
    assert_eq!(pending.len(), 1);
}

#[test]
fn retract_unknown_square_changes_nothing() {
    use crate::{pos, Letter};

    let a = PlacedTile::Letter(Letter::new('A').unwrap());
    let board = Board::empty();
    let mut pending = PendingMove::new();
    pending.place(&board, pos(1, 1), a).unwrap();
    let before = pending.clone();
    assert_eq!(pending.retract(pos(2, 2)), Err(PlacementError::NotPending(pos(2, 2))));
    assert_eq!(pending, before);
    assert_eq!(pending.retract(pos(1, 1)), Ok(a));
    assert!(pending.is_empty());
}

#[test]
fn derived_board_leaves_the_original_alone() {
    use crate::{pos, Letter};

    let board = Board::empty();
    let e = Letter::new('E').unwrap();
    let mut pending = PendingMove::new();
    pending.place(&board, pos(7, 7), PlacedTile::Blank { letter: e }).unwrap();
    pending.place(&board, pos(8, 7), PlacedTile::Letter(e)).unwrap();

    let derived = pending.derived_board(&board);
    assert_eq!(derived.get(pos(7, 7)), Some(PlacedTile::Blank { letter: e }));
    assert_eq!(derived.get(pos(8, 7)), Some(PlacedTile::Letter(e)));
    assert!(board.is_empty());
    assert_eq!(pending.to_move().tiles, pending.tiles().to_vec());
}
