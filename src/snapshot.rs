
use serde::{Deserialize, Serialize};

use super::{Board, PlacedTile, Position, Tile};

/// Tiles put on the board in one turn, the unit the server accepts or rejects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub tiles: Vec<(Position, PlacedTile)>,
}

/// The server's answer to a move it refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidMove {
    /// Meant for the player, shown as is
    pub explanation: String,
    pub positions: Vec<Position>,
}

/// A move accepted by the server, with the words it formed and what each was worth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMove {
    pub original_move: Move,
    pub word_values: Vec<(String, u32)>,
}

impl PlayedMove {
    pub fn value(&self) -> u32 {
        self.word_values.iter().map(|(_, value)| value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEnd {
    /// Someone else went out; these tiles were left in the rack and count against the player
    RemainingTiles(Vec<Tile>),
    /// The player went out and collects this bonus from the others' racks
    PlayedLastMove(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    PlayedMove(PlayedMove),
    TilesExchanged,
    GameEnd(GameEnd),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub tiles: Vec<Tile>,
    pub turns: Vec<Turn>,
}

/// The authoritative game state, replaced wholesale on every update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub tile_bag: Vec<Tile>,
    pub players: Vec<Player>,
    pub whose_turn: usize,
    #[serde(default)]
    pub finished: bool,
}

impl GameSnapshot {
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// `None` when the index does not resolve to a player (no players yet)
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.whose_turn)
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableState {
    Setup,
    Running,
}

/// What the server pushes: the game and whether it has started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub game: GameSnapshot,
    pub state: TableState,
}

impl TableSnapshot {
    pub fn ready_to_start(&self) -> bool {
        self.state == TableState::Setup && self.game.players.len() >= 2
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::tile;

    pub fn rack(s: &str) -> Vec<Tile> {
        s.chars().map(tile).collect()
    }

    pub fn player(name: &str, tiles: &str, turns: Vec<Turn>) -> Player {
        Player {
            name: name.to_owned(),
            tiles: rack(tiles),
            turns,
        }
    }

    pub fn played(word: &str, value: u32) -> Turn {
        Turn::PlayedMove(PlayedMove {
            original_move: Move::default(),
            word_values: vec![(word.to_owned(), value)],
        })
    }

    pub fn game(players: Vec<Player>, whose_turn: usize) -> GameSnapshot {
        GameSnapshot {
            board: Board::empty(),
            tile_bag: vec![],
            players,
            whose_turn,
            finished: false,
        }
    }

    pub fn running(game: GameSnapshot) -> TableSnapshot {
        TableSnapshot { game, state: TableState::Running }
    }
}


#[test]
fn decodes_the_server_table() {
    let mut json = serde_json::json!({
        "game": {
            "board": vec![vec![serde_json::Value::Null; 15]; 15],
            "tile_bag": ["A", "Blank"],
            "players": [
                {
                    "name": "Ada",
                    "tiles": ["A", "Blank", "T"],
                    "turns": [
                        {"PlayedMove": {
                            "original_move": {"tiles": [[[7, 7], "H"], [[8, 7], {"Blank": "I"}]]},
                            "word_values": [["hi", 8]]
                        }},
                        "TilesExchanged",
                        {"GameEnd": {"PlayedLastMove": 12}}
                    ]
                },
                {"name": "Bob", "tiles": [], "turns": [{"GameEnd": {"RemainingTiles": ["Q", "Blank"]}}]}
            ],
            "whose_turn": 1,
            "finished": true
        },
        "state": "Running"
    });
    json["game"]["board"][7][7] = serde_json::json!("H");
    json["game"]["board"][8][7] = serde_json::json!({"Blank": "I"});

    let table: TableSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(table.state, TableState::Running);
    let game = &table.game;
    assert!(game.finished);
    assert_eq!(game.index_of("Bob"), Some(1));
    assert_eq!(game.current_player().unwrap().name, "Bob");
    assert_eq!(game.board.get(crate::pos(8, 7)), Some(PlacedTile::Blank { letter: crate::Letter::new('i').unwrap() }));
    assert_eq!(game.players[0].tiles, fixtures::rack("A*T"));
    match &game.players[0].turns[0] {
        Turn::PlayedMove(played) => {
            assert_eq!(played.value(), 8);
            assert_eq!(played.original_move.tiles.len(), 2);
        },
        other => panic!("unexpected turn {:?}", other),
    }
    assert_eq!(game.players[1].turns[0], Turn::GameEnd(GameEnd::RemainingTiles(fixtures::rack("Q*"))));
}

#[test]
fn finished_defaults_to_false() {
    let json = serde_json::json!({
        "board": vec![vec![serde_json::Value::Null; 15]; 15],
        "tile_bag": [],
        "players": [],
        "whose_turn": 0
    });
    let game: GameSnapshot = serde_json::from_value(json).unwrap();
    assert!(!game.finished);
    assert!(game.current_player().is_none());
}
