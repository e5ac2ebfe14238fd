
pub mod score_rules;
pub mod snapshot;
pub mod protocol;
pub mod rack;
pub mod pending;
pub mod blank;
pub mod compose;
pub mod reconcile;
pub mod projection;
pub mod names;
pub mod session;
pub mod render;

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 15;

pub use score_rules::{LetterScoring, EnglishScrabbleScoring, Modifier};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("not a letter: {0:?}")]
    Letter(String),
    #[error("not a tile: {0:?}")]
    Tile(String),
    #[error("position ({0}, {1}) is outside the board")]
    OutOfBoard(usize, usize),
    #[error("not a board position: {0:?}")]
    Position(String),
    #[error("board must be 15x15, got {cols} columns")]
    BoardShape { cols: usize },
}

// letters are stored as uppercase ascii, which is also their wire form
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Letter(u8);

impl Letter {
    /// Case-insensitive, `None` for anything but an ascii letter
    pub fn new(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            Some(Letter(c.to_ascii_uppercase() as u8))
        } else {
            None
        }
    }

    pub fn as_char(self) -> char {
        self.0 as char
    }

    pub fn alphabet() -> impl Iterator<Item=Letter> {
        (b'A'..=b'Z').map(Letter)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
impl fmt::Debug for Letter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for Letter {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next().and_then(Letter::new), chars.next()) {
            (Some(letter), None) => Ok(letter),
            _ => Err(ParseError::Letter(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Letter {
    type Error = ParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Letter> for String {
    fn from(letter: Letter) -> String {
        letter.to_string()
    }
}

/// A tile as held in a rack
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tile {
    Letter(Letter),
    Blank,
}

impl Tile {
    /// The tile that lands on the board, `None` for a blank: it needs a letter first
    pub fn placed(self) -> Option<PlacedTile> {
        match self {
            Tile::Letter(letter) => Some(PlacedTile::Letter(letter)),
            Tile::Blank => None,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tile::Letter(letter) => write!(f, "{}", letter),
            Tile::Blank => write!(f, "Blank"),
        }
    }
}
impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for Tile {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("blank") || s == "*" {
            Ok(Tile::Blank)
        } else {
            s.parse().map(Tile::Letter).map_err(|_| ParseError::Tile(s.to_owned()))
        }
    }
}

impl TryFrom<String> for Tile {
    type Error = ParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Tile> for String {
    fn from(tile: Tile) -> String {
        tile.to_string()
    }
}

/// A tile on the board (or pending on it). Blanks carry the letter chosen when they were placed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlacedTile {
    Letter(Letter),
    Blank {
        #[serde(rename = "Blank")]
        letter: Letter,
    },
}

impl PlacedTile {
    pub fn letter(self) -> Letter {
        match self {
            PlacedTile::Letter(letter) | PlacedTile::Blank { letter } => letter,
        }
    }

    /// Back to a rack tile, a blank loses its letter
    pub fn to_tile(self) -> Tile {
        match self {
            PlacedTile::Letter(letter) => Tile::Letter(letter),
            PlacedTile::Blank { .. } => Tile::Blank,
        }
    }
}

impl fmt::Debug for PlacedTile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlacedTile::Letter(letter) => write!(f, "{}", letter),
            PlacedTile::Blank { letter } => write!(f, "Blank({})", letter),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct Position {
    col: usize,
    row: usize,
}

impl Position {
    pub fn new(col: usize, row: usize) -> Option<Self> {
        if col < BOARD_SIZE && row < BOARD_SIZE {
            Some(Self { col, row })
        } else {
            None
        }
    }

    pub fn col(self) -> usize {
        self.col
    }

    pub fn row(self) -> usize {
        self.row
    }

    /// Every square, row by row
    pub fn all() -> impl Iterator<Item=Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { col, row }))
    }
}

impl TryFrom<(usize, usize)> for Position {
    type Error = ParseError;
    fn try_from((col, row): (usize, usize)) -> Result<Self, Self::Error> {
        Position::new(col, row).ok_or(ParseError::OutOfBoard(col, row))
    }
}

impl From<Position> for (usize, usize) {
    fn from(pos: Position) -> (usize, usize) {
        (pos.col, pos.row)
    }
}

/// How positions are written for humans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionFormat {
    /// column letter then row number, `H8`
    LetterDigit,
    /// row number then column letter, `8H`
    DigitLetter,
}

impl Default for PositionFormat {
    fn default() -> Self {
        Self::LetterDigit
    }
}

impl PositionFormat {
    pub fn format(self, pos: Position) -> String {
        let col = (b'A' + pos.col as u8) as char;
        match self {
            Self::LetterDigit => format!("{}{}", col, pos.row + 1),
            Self::DigitLetter => format!("{}{}", pos.row + 1, col),
        }
    }

    pub fn parse(self, s: &str) -> Result<Position, ParseError> {
        let err = || ParseError::Position(s.to_owned());
        let s = s.trim();
        let (letter, digits) = match self {
            Self::LetterDigit => {
                let mut chars = s.chars();
                let letter = chars.next().ok_or_else(err)?;
                (letter, chars.as_str())
            },
            Self::DigitLetter => {
                let mut chars = s.chars();
                let letter = chars.next_back().ok_or_else(err)?;
                (letter, chars.as_str())
            },
        };
        let col = Letter::new(letter).ok_or_else(err)?.0 - b'A';
        let row: usize = digits.parse().map_err(|_| err())?;
        if row == 0 {
            return Err(err())
        }
        Position::new(col as usize, row - 1).ok_or_else(err)
    }
}

/// The board: `BOARD_SIZE` columns of `BOARD_SIZE` squares
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<PlacedTile>>>", into = "Vec<Vec<Option<PlacedTile>>>")]
pub struct Board {
    squares: Vec<Vec<Option<PlacedTile>>>,
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: vec![vec![None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn get(&self, pos: Position) -> Option<PlacedTile> {
        self.squares[pos.col][pos.row]
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    pub fn set(&mut self, pos: Position, tile: Option<PlacedTile>) {
        self.squares[pos.col][pos.row] = tile
    }

    pub fn is_empty(&self) -> bool {
        Position::all().all(|pos| !self.is_occupied(pos))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<Vec<Vec<Option<PlacedTile>>>> for Board {
    type Error = ParseError;
    fn try_from(squares: Vec<Vec<Option<PlacedTile>>>) -> Result<Self, Self::Error> {
        if squares.len() != BOARD_SIZE || squares.iter().any(|col| col.len() != BOARD_SIZE) {
            return Err(ParseError::BoardShape { cols: squares.len() })
        }
        Ok(Self { squares })
    }
}

impl From<Board> for Vec<Vec<Option<PlacedTile>>> {
    fn from(board: Board) -> Self {
        board.squares
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                match self.squares[col][row] {
                    Some(PlacedTile::Letter(l)) => write!(f, "{}", l)?,
                    Some(PlacedTile::Blank { letter }) => write!(f, "{}", letter.as_char().to_ascii_lowercase())?,
                    None => write!(f, "_")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Shorthand used by tests: `tile('A')`, `tile('*')` for a blank
#[cfg(test)]
pub(crate) fn tile(c: char) -> Tile {
    if c == '*' {
        Tile::Blank
    } else {
        Tile::Letter(Letter::new(c).unwrap())
    }
}

#[cfg(test)]
pub(crate) fn pos(col: usize, row: usize) -> Position {
    Position::new(col, row).unwrap()
}


#[test]
fn letters_and_tiles_use_the_server_wire_form() {
    let e = Letter::new('e').unwrap();
    assert_eq!(e.as_char(), 'E');
    assert_eq!(serde_json::to_string(&e).unwrap(), r#""E""#);
    assert_eq!(serde_json::to_string(&Tile::Blank).unwrap(), r#""Blank""#);
    assert_eq!(serde_json::from_str::<Tile>(r#""Q""#).unwrap(), tile('Q'));
    assert!(serde_json::from_str::<Tile>(r#""QU""#).is_err());

    let blank_e = PlacedTile::Blank { letter: e };
    assert_eq!(serde_json::to_string(&blank_e).unwrap(), r#"{"Blank":"E"}"#);
    assert_eq!(serde_json::from_str::<PlacedTile>(r#"{"Blank":"E"}"#).unwrap(), blank_e);
    assert_eq!(serde_json::from_str::<PlacedTile>(r#""E""#).unwrap(), PlacedTile::Letter(e));
    assert_eq!(blank_e.to_tile(), Tile::Blank);
}

#[test]
fn positions_are_checked() {
    assert_eq!(Position::new(15, 0), None);
    assert_eq!(serde_json::from_str::<Position>("[7, 8]").unwrap(), pos(7, 8));
    assert!(serde_json::from_str::<Position>("[7, 15]").is_err());
    assert_eq!(serde_json::to_string(&pos(3, 4)).unwrap(), "[3,4]");
}

#[test]
fn position_notation() {
    let f = PositionFormat::LetterDigit;
    assert_eq!(f.format(pos(7, 7)), "H8");
    assert_eq!(f.parse("h8").unwrap(), pos(7, 7));
    assert_eq!(f.parse("O15").unwrap(), pos(14, 14));
    assert!(f.parse("P1").is_err());
    assert!(f.parse("A0").is_err());
    assert!(f.parse("A16").is_err());
    assert!(f.parse("").is_err());

    let f = PositionFormat::DigitLetter;
    assert_eq!(f.format(pos(0, 11)), "12A");
    assert_eq!(f.parse("12A").unwrap(), pos(0, 11));
}

#[test]
fn board_shape_is_validated() {
    let board = Board::empty();
    let json = serde_json::to_string(&board).unwrap();
    assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), board);
    assert!(serde_json::from_str::<Board>("[[null]]").is_err());
}
