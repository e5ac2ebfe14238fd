//! The scratch space where the player builds a move: a rack, a pending move,
//! and the click protocol that moves tiles between the two.

use super::{Board, PlacedTile, Position, Tile};
use super::blank::BlankResolver;
use super::pending::PendingMove;
use super::rack::{Rack, Selection};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The selected rack tile went on the square
    Placed(PlacedTile),
    /// A pending tile came back to the rack
    Retracted(Tile),
    /// The blank prompt was dismissed, nothing moved
    Cancelled,
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    rack: Rack,
    pending: PendingMove,
}

impl Composer {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self {
            rack: Rack::new(tiles),
            pending: PendingMove::new(),
        }
    }

    pub fn rack(&self) -> &Rack {
        &self.rack
    }

    pub fn pending(&self) -> &PendingMove {
        &self.pending
    }

    /// Tiles held by the player, on the rack or on the board
    pub fn tile_count(&self) -> usize {
        self.rack.len() + self.pending.len()
    }

    pub fn click_rack(&mut self, index: usize) -> Selection {
        self.rack.select(index)
    }

    pub fn click_square(&mut self, board: &Board, pos: Position, resolver: &mut dyn BlankResolver) -> ClickOutcome {
        let occupied = board.is_occupied(pos) || self.pending.contains(pos);

        match self.rack.selected() {
            Some(index) if !occupied => {
                let outcome = self.place_from_rack(board, pos, index, resolver);
                if outcome != ClickOutcome::Ignored {
                    self.rack.clear_selection();
                }
                outcome
            },
            _ if self.pending.contains(pos) => {
                match self.pending.retract(pos) {
                    Ok(placed) => {
                        let tile = placed.to_tile();
                        self.rack.append(tile);
                        self.rack.clear_selection();
                        ClickOutcome::Retracted(tile)
                    },
                    Err(e) => {
                        log::debug!("{}", e);
                        ClickOutcome::Ignored
                    },
                }
            },
            _ => ClickOutcome::Ignored,
        }
    }

    fn place_from_rack(&mut self, board: &Board, pos: Position, index: usize, resolver: &mut dyn BlankResolver) -> ClickOutcome {
        let tile = match self.rack.tiles().get(index) {
            Some(&tile) => tile,
            None => return ClickOutcome::Ignored,
        };
        let placed = match tile.placed() {
            Some(placed) => placed,
            None => match resolver.resolve_blank() {
                Some(letter) => PlacedTile::Blank { letter },
                None => return ClickOutcome::Cancelled,
            },
        };
        match self.pending.place(board, pos, placed) {
            Ok(()) => {
                self.rack.remove(index);
                ClickOutcome::Placed(placed)
            },
            Err(e) => {
                log::debug!("{}", e);
                ClickOutcome::Ignored
            },
        }
    }

    /// Every tile back on the rack in its current order, pending ones after, blanks bare again
    pub fn gathered_tiles(&self) -> Vec<Tile> {
        self.rack.tiles().iter().copied()
            .chain(self.pending.tiles().iter().map(|&(_, placed)| placed.to_tile()))
            .collect()
    }

    pub fn reset(&mut self, tiles: Vec<Tile>) {
        self.rack.replace_all(tiles);
        self.pending.clear();
    }
}

#[cfg(test)]
fn never_asked() -> Option<crate::Letter> {
    panic!("no blank involved")
}


#[test]
fn blank_scenario() {
    use crate::{pos, Letter};
    use crate::snapshot::fixtures::rack;

    let board = Board::empty();
    let mut composer = Composer::new(rack("A*T"));
    composer.click_rack(1);
    let mut resolver = || Letter::new('e');
    let outcome = composer.click_square(&board, pos(7, 7), &mut resolver);

    let e_blank = PlacedTile::Blank { letter: Letter::new('E').unwrap() };
    assert_eq!(outcome, ClickOutcome::Placed(e_blank));
    assert_eq!(composer.pending().tiles(), &[(pos(7, 7), e_blank)][..]);
    assert_eq!(composer.rack().tiles(), &rack("AT")[..]);
    assert_eq!(composer.rack().selected(), None);
    assert_eq!(composer.pending().derived_board(&board).get(pos(7, 7)).map(PlacedTile::letter), Letter::new('E'));
}

#[test]
fn retracted_blank_comes_back_bare() {
    use crate::{pos, Letter};
    use crate::snapshot::fixtures::rack;

    let board = Board::empty();
    let mut composer = Composer::new(rack("*"));
    composer.click_rack(0);
    composer.click_square(&board, pos(3, 3), &mut || Letter::new('z'));
    assert_eq!(composer.click_square(&board, pos(3, 3), &mut never_asked), ClickOutcome::Retracted(Tile::Blank));
    assert_eq!(composer.rack().tiles(), &[Tile::Blank][..]);
    assert!(composer.pending().is_empty());
}

#[test]
fn cancelled_blank_changes_nothing_but_selection() {
    use crate::pos;
    use crate::snapshot::fixtures::rack;

    let board = Board::empty();
    let mut composer = Composer::new(rack("A*"));
    composer.click_rack(1);
    assert_eq!(composer.click_square(&board, pos(0, 0), &mut || None::<crate::Letter>), ClickOutcome::Cancelled);
    assert_eq!(composer.rack().tiles(), &rack("A*")[..]);
    assert!(composer.pending().is_empty());
    assert_eq!(composer.rack().selected(), None);
}

#[test]
fn clicks_that_do_nothing() {
    use crate::{pos, tile};
    use crate::snapshot::fixtures::rack;

    let mut board = Board::empty();
    board.set(pos(5, 5), tile('Q').placed());
    let mut composer = Composer::new(rack("AB"));

    // empty square, nothing selected
    assert_eq!(composer.click_square(&board, pos(1, 1), &mut never_asked), ClickOutcome::Ignored);
    // authoritative tile, with and without a selection
    assert_eq!(composer.click_square(&board, pos(5, 5), &mut never_asked), ClickOutcome::Ignored);
    composer.click_rack(0);
    assert_eq!(composer.click_square(&board, pos(5, 5), &mut never_asked), ClickOutcome::Ignored);
    assert_eq!(composer.rack().selected(), Some(0));
    assert_eq!(composer.tile_count(), 2);
}

#[test]
fn clicking_a_pending_square_with_a_selection_retracts() {
    use crate::{pos, tile};
    use crate::snapshot::fixtures::rack;

    let board = Board::empty();
    let mut composer = Composer::new(rack("AB"));
    composer.click_rack(0);
    composer.click_square(&board, pos(7, 7), &mut never_asked);
    composer.click_rack(0);
    assert_eq!(composer.click_square(&board, pos(7, 7), &mut never_asked), ClickOutcome::Retracted(tile('A')));
    assert_eq!(composer.rack().tiles(), &rack("BA")[..]);
    assert_eq!(composer.rack().selected(), None);
}

#[test]
fn tile_count_is_preserved() {
    use crate::{pos, Letter};
    use crate::snapshot::fixtures::rack;

    let board = Board::empty();
    let start = rack("AB*DEFG");
    let mut composer = Composer::new(start.clone());
    let squares = [pos(7, 7), pos(8, 7), pos(9, 7), pos(7, 8), pos(7, 9)];
    let mut resolver = || Letter::new('s');

    for (i, &square) in squares.iter().enumerate() {
        composer.click_rack(i % composer.rack().len());
        composer.click_square(&board, square, &mut resolver);
        assert_eq!(composer.tile_count(), start.len());
    }
    for &square in squares.iter().rev().step_by(2) {
        composer.click_square(&board, square, &mut never_asked);
        assert_eq!(composer.tile_count(), start.len());
    }
    let mut gathered = composer.gathered_tiles();
    gathered.sort();
    let mut expected = start;
    expected.sort();
    assert_eq!(gathered, expected);
}
