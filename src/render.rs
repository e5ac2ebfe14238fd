//! Plain text rendering of a [`SessionView`] for the terminal.

use std::fmt::Write;

use super::{Modifier, PlacedTile, Position, PositionFormat, Tile, BOARD_SIZE};
use super::session::SessionView;
use super::snapshot::TableState;

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub position_format: PositionFormat,
    pub show_premium_squares: bool,
    /// Most recent history lines printed, all of them when `None`
    pub history_shown: Option<usize>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            position_format: PositionFormat::default(),
            show_premium_squares: true,
            history_shown: None,
        }
    }
}

fn premium_char(modifier: Modifier) -> char {
    match modifier {
        Modifier::TripleWord => '#',
        Modifier::DoubleWord => '+',
        Modifier::TripleLetter => '^',
        Modifier::DoubleLetter => '\'',
    }
}

fn tile_char(tile: Tile) -> char {
    match tile {
        Tile::Letter(letter) => letter.as_char(),
        Tile::Blank => '?',
    }
}

impl Renderer {
    fn square_char(&self, pos: Position, tile: Option<PlacedTile>) -> char {
        match tile {
            Some(PlacedTile::Letter(letter)) => letter.as_char(),
            Some(PlacedTile::Blank { letter }) => letter.as_char().to_ascii_lowercase(),
            None if self.show_premium_squares => Modifier::at(pos).map_or('.', premium_char),
            None => '.',
        }
    }

    /// The board with pending tiles, one line per row
    ///
    /// Pending squares are marked with `*` on their left, squares the server
    /// refused with `!`. Blanks show their letter in lower case.
    pub fn board(&self, view: &SessionView<'_>) -> String {
        let board = view.game().map(|g| &g.board);
        let rejected: &[Position] = match view.rejection {
            Some(rejection) => &rejection.positions[..],
            None => &[],
        };

        let mut out = String::from("  ");
        for col in 0..BOARD_SIZE {
            out.push(' ');
            out.push((b'A' + col as u8) as char);
        }
        out.push('\n');

        for row in 0..BOARD_SIZE {
            let _ = write!(out, "{:>2}", row + 1);
            for col in 0..BOARD_SIZE {
                let pos = match Position::new(col, row) {
                    Some(pos) => pos,
                    None => continue,
                };
                let pending = view.pending().get(pos);
                let marker = if rejected.contains(&pos) {
                    '!'
                } else if pending.is_some() {
                    '*'
                } else {
                    ' '
                };
                let tile = pending.or_else(|| board.and_then(|b| b.get(pos)));
                out.push(marker);
                out.push(self.square_char(pos, tile));
            }
            out.push('\n');
        }
        out
    }

    /// What the premium square symbols mean, empty when they are hidden
    pub fn legend(&self) -> String {
        if !self.show_premium_squares {
            return String::new()
        }
        [Modifier::TripleWord, Modifier::DoubleWord, Modifier::TripleLetter, Modifier::DoubleLetter].iter()
            .map(|&m| format!("{} {}", premium_char(m), m.label()))
            .collect::<Vec<_>>()
            .join("  ")
    }

    /// `1:A [2:?] 3:T`, the selected tile in brackets
    pub fn rack(&self, view: &SessionView<'_>) -> String {
        view.rack().iter().enumerate()
            .map(|(i, &tile)| {
                if view.selected() == Some(i) {
                    format!("[{}:{}]", i + 1, tile_char(tile))
                } else {
                    format!("{}:{}", i + 1, tile_char(tile))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn scores(&self, view: &SessionView<'_>) -> String {
        let current = view.game().and_then(|g| g.current_player()).map(|p| p.name.as_str());
        let mut out = String::new();
        for (name, score) in view.scores() {
            let marker = if Some(name) == current { '>' } else { ' ' };
            let you = if Some(name) == view.name { " (you)" } else { "" };
            let _ = writeln!(out, "{} {}{}: {}", marker, name, you, score);
        }
        out
    }

    pub fn history(&self, view: &SessionView<'_>) -> String {
        let lines = view.history();
        let shown = self.history_shown.unwrap_or(lines.len());
        let mut out = String::new();
        for line in lines.iter().take(shown) {
            let _ = writeln!(out, "{}", line);
        }
        out
    }

    /// A line about what the player can do now
    pub fn status(&self, view: &SessionView<'_>) -> String {
        let table = match view.table {
            Some(table) => table,
            None => return "Waiting for the server".to_owned(),
        };
        let mut out = match table.state {
            TableState::Setup if view.can_start() => {
                format!("{} players joined, `start` begins the game", table.game.players.len())
            },
            TableState::Setup => "Waiting for more players".to_owned(),
            TableState::Running if table.game.finished => "The game is over".to_owned(),
            TableState::Running => match view.whose_turn_label() {
                Some(label) => format!("It's {} turn", label),
                None => String::new(),
            },
        };
        if view.name.is_none() {
            out.push_str(" (`join NAME` to take a seat)");
        }
        if let Some(rejection) = view.rejection {
            let positions = rejection.positions.iter()
                .map(|&pos| self.position_format.format(pos))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = write!(out, "\nMove rejected: {}", rejection.explanation);
            if !positions.is_empty() {
                let _ = write!(out, " ({})", positions);
            }
        }
        out
    }

    pub fn render(&self, view: &SessionView<'_>) -> String {
        let mut out = self.board(view);
        let legend = self.legend();
        if !legend.is_empty() {
            let _ = writeln!(out, "{}", legend);
        }
        let _ = writeln!(out, "\nRack: {}\n", self.rack(view));
        out.push_str(&self.scores(view));
        let history = self.history(view);
        if !history.is_empty() {
            out.push('\n');
            out.push_str(&history);
        }
        let _ = writeln!(out, "\n{}", self.status(view));
        out
    }
}


#[cfg(test)]
use crate::compose::Composer;

#[test]
fn empty_board_shows_premium_squares() {
    let composer = Composer::default();
    let view = SessionView { table: None, name: None, composer: &composer, rejection: None };

    let board = Renderer::default().board(&view);
    let lines: Vec<&str> = board.lines().collect();
    assert_eq!(lines.len(), BOARD_SIZE + 1);
    assert_eq!(lines[0], "   A B C D E F G H I J K L M N O");
    assert_eq!(lines[1], " 1 # . . ' . . . # . . . ' . . #");
    assert_eq!(&lines[8][..3], " 8 ");
    assert_eq!(lines[8].chars().nth(17), Some('+'));

    let plain = Renderer { show_premium_squares: false, ..Renderer::default() };
    assert!(plain.board(&view).lines().skip(1).all(|l| l[2..].chars().all(|c| c == ' ' || c == '.')));
    assert_eq!(plain.legend(), "");
    assert!(Renderer::default().legend().starts_with("# Triple Word Score  + Double Word Score"));
}

#[test]
fn pending_and_rejected_squares_are_marked() {
    use crate::{pos, Letter};
    use crate::snapshot::InvalidMove;
    use crate::snapshot::fixtures::rack;

    let mut composer = Composer::new(rack("A*"));
    composer.click_rack(0);
    composer.click_square(&crate::Board::empty(), pos(7, 7), &mut || None::<Letter>);
    composer.click_rack(0);
    composer.click_square(&crate::Board::empty(), pos(8, 7), &mut || Letter::new('q'));
    let rejection = InvalidMove { explanation: "Not a word".to_owned(), positions: vec![pos(8, 7)] };
    let view = SessionView { table: None, name: None, composer: &composer, rejection: Some(&rejection) };

    let renderer = Renderer::default();
    let board = renderer.board(&view);
    let row = board.lines().nth(8).unwrap();
    assert_eq!(&row[16..20], "*A!q");
    assert_eq!(renderer.status(&view), "Waiting for the server");
}

#[test]
fn rack_marks_the_selection() {
    use crate::snapshot::fixtures::rack;

    let mut composer = Composer::new(rack("A*T"));
    composer.click_rack(1);
    let view = SessionView { table: None, name: None, composer: &composer, rejection: None };
    assert_eq!(Renderer::default().rack(&view), "1:A [2:?] 3:T");
}

#[test]
fn scores_history_and_status() {
    use crate::pos;
    use crate::snapshot::{InvalidMove, Turn};
    use crate::snapshot::fixtures::{game, played, player, running};

    let table = running(game(vec![
        player("Ada", "", vec![played("cat", 10), played("dog", 5)]),
        player("Bob", "", vec![Turn::TilesExchanged]),
    ], 1));
    let composer = Composer::default();
    let rejection = InvalidMove { explanation: "Not connected".to_owned(), positions: vec![pos(0, 0), pos(7, 7)] };
    let view = SessionView { table: Some(&table), name: Some("Ada"), composer: &composer, rejection: Some(&rejection) };

    let renderer = Renderer { history_shown: Some(2), ..Renderer::default() };
    assert_eq!(renderer.scores(&view), "  Ada (you): 15\n> Bob: 0\n");
    assert_eq!(renderer.history(&view), "Ada played DOG for 5 points\nBob exchanged their tiles\n");
    assert_eq!(renderer.status(&view), "It's Bob's turn\nMove rejected: Not connected (A1, H8)");

    let digits = Renderer { position_format: PositionFormat::DigitLetter, ..Renderer::default() };
    assert!(digits.status(&view).ends_with("(1A, 8H)"));
    assert!(renderer.render(&view).contains("Rack: \n"));
}

#[test]
fn server_tiles_are_not_marked() {
    use crate::{pos, tile, Letter};
    use crate::snapshot::fixtures::{game, player, rack, running};

    let mut table = running(game(vec![player("Ada", "E", vec![]), player("Bob", "", vec![])], 0));
    table.game.board.set(pos(0, 0), tile('Q').placed());
    let mut composer = Composer::new(rack("E"));
    composer.click_rack(0);
    composer.click_square(&table.game.board, pos(1, 0), &mut || None::<Letter>);
    let view = SessionView { table: Some(&table), name: Some("Ada"), composer: &composer, rejection: None };

    let board = Renderer::default().board(&view);
    assert_eq!(&board.lines().nth(1).unwrap()[2..6], " Q*E");
}
