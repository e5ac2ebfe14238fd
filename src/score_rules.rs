
use super::{Position, Tile, BOARD_SIZE};

/// Point value of the tiles, used where the client has to total tiles itself
/// (penalties for tiles left at the end of the game)
pub trait LetterScoring {
    fn score_for(&self, tile: Tile) -> u32;

    fn total(&self, tiles: &[Tile]) -> u32 {
        tiles.iter().map(|&t| self.score_for(t)).sum()
    }
}

pub struct EnglishScrabbleScoring;
impl LetterScoring for EnglishScrabbleScoring {
    fn score_for(&self, tile: Tile) -> u32 {
        match tile {
            Tile::Blank => 0,
            Tile::Letter(letter) => match letter.as_char() {
                'A' | 'E' | 'I' | 'O' | 'U' | 'L' | 'N' | 'S' | 'T' | 'R' => 1,
                'D' | 'G' => 2,
                'B' | 'C' | 'M' | 'P' => 3,
                'F' | 'H' | 'V' | 'W' | 'Y' => 4,
                'K' => 5,
                'J' | 'X' => 8,
                'Q' | 'Z' => 10,
                other => {
                    log::warn!("unrecognized letter for score {}", other);
                    0
                },
            },
        }
    }
}

/// Premium squares, only used to draw the board
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Modifier {
    DoubleLetter,
    TripleLetter,
    DoubleWord,
    TripleWord,
}

impl Modifier {
    pub fn at(position: Position) -> Option<Modifier> {
        assert_eq!(BOARD_SIZE, 15);

        fn fold_half(a: usize) -> usize {
            if a >= 7 {
                a - 7
            } else {
                7 - a
            }
        }

        // the layout is symetrical from the center
        let row = fold_half(position.row());
        let col = fold_half(position.col());

        match (row, col) {
            | (7, 0) | (0, 7)
            | (7, 7) => Some(Modifier::TripleWord),

            | (1, 1)
            | (4, 0) | (0, 4)
            | (5, 1) | (1, 5)
            | (7, 4) | (4, 7) => Some(Modifier::DoubleLetter),

            | (2, 2)
            | (6, 2) | (2, 6) => Some(Modifier::TripleLetter),

            (row, col) if row == col => Some(Modifier::DoubleWord),

            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Modifier::DoubleLetter => "Double Letter Score",
            Modifier::TripleLetter => "Triple Letter Score",
            Modifier::DoubleWord => "Double Word Score",
            Modifier::TripleWord => "Triple Word Score",
        }
    }
}


#[test]
fn tile_values() {
    use crate::tile;
    let scoring = EnglishScrabbleScoring;
    assert_eq!(scoring.score_for(Tile::Blank), 0);
    assert_eq!(scoring.score_for(tile('c')), 3);
    assert_eq!(scoring.score_for(tile('Q')), 10);
    assert_eq!(scoring.total(&[tile('K'), Tile::Blank, tile('E')]), 6);
    let all: u32 = crate::Letter::alphabet().map(|l| scoring.score_for(Tile::Letter(l))).sum();
    assert_eq!(all, 87);
}

#[test]
fn premium_squares() {
    let at = |col, row| Modifier::at(Position::new(col, row).unwrap());
    assert_eq!(at(0, 0), Some(Modifier::TripleWord));
    assert_eq!(at(7, 0), Some(Modifier::TripleWord));
    assert_eq!(at(14, 14), Some(Modifier::TripleWord));
    assert_eq!(at(7, 7), Some(Modifier::DoubleWord));
    assert_eq!(at(3, 0), Some(Modifier::DoubleLetter));
    assert_eq!(at(5, 5), Some(Modifier::TripleLetter));
    assert_eq!(at(1, 5), Some(Modifier::TripleLetter));
    assert_eq!(at(6, 6), Some(Modifier::DoubleLetter));
    assert_eq!(at(4, 4), Some(Modifier::DoubleWord));
    assert_eq!(at(1, 0), None);
    let count = Position::all().filter(|&p| Modifier::at(p).is_some()).count();
    assert_eq!(count, 61);
}
