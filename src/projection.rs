//! Values derived from a snapshot for display: scores, whose turn it is, and
//! the move history. Everything here is recomputed from the turn logs.

use super::LetterScoring;
use super::snapshot::{GameEnd, GameSnapshot, Player, Turn};

/// Points a single turn is worth to the player who owns it
pub fn turn_value(turn: &Turn, scoring: &impl LetterScoring) -> i64 {
    match turn {
        Turn::PlayedMove(played) => i64::from(played.value()),
        Turn::TilesExchanged => 0,
        Turn::GameEnd(GameEnd::RemainingTiles(tiles)) => -i64::from(scoring.total(tiles)),
        Turn::GameEnd(GameEnd::PlayedLastMove(bonus)) => i64::from(*bonus),
    }
}

pub fn score_of(player: &Player, scoring: &impl LetterScoring) -> i64 {
    player.turns.iter().map(|turn| turn_value(turn, scoring)).sum()
}

pub fn is_players_turn(game: &GameSnapshot, name: &str) -> bool {
    game.current_player().map_or(false, |p| p.name == name)
}

/// `"your"` or `"Bob's"`, for "It's ... turn"
pub fn whose_turn_label(game: &GameSnapshot, name: Option<&str>) -> Option<String> {
    let current = game.current_player()?;
    if Some(current.name.as_str()) == name {
        Some("your".to_owned())
    } else {
        Some(format!("{}'s", current.name))
    }
}

pub fn turn_description(turn: &Turn, scoring: &impl LetterScoring) -> String {
    match turn {
        Turn::PlayedMove(played) => {
            let words = played.word_values.iter()
                .map(|(word, _)| word.to_uppercase())
                .collect::<Vec<_>>()
                .join(", ");
            format!("played {} for {} points", words, played.value())
        },
        Turn::TilesExchanged => "exchanged their tiles".to_owned(),
        Turn::GameEnd(GameEnd::RemainingTiles(tiles)) if tiles.is_empty() => {
            "had no tiles left at the end".to_owned()
        },
        Turn::GameEnd(GameEnd::RemainingTiles(tiles)) => {
            let names = tiles.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ");
            format!("lost {} points for the remaining tiles {}", scoring.total(tiles), names)
        },
        Turn::GameEnd(GameEnd::PlayedLastMove(bonus)) => {
            format!("played the last tiles and gained {} points", bonus)
        },
    }
}

/// One line per turn, most recent first
///
/// Turn logs are walked round by round, in seating order; the walk stops at
/// the first player who has not played that round yet.
pub fn turn_descriptions(game: &GameSnapshot, scoring: &impl LetterScoring) -> Vec<String> {
    let mut lines = Vec::new();
    if game.players.is_empty() {
        return lines
    }
    'rounds: for round in 0.. {
        for player in &game.players {
            match player.turns.get(round) {
                Some(turn) => lines.push(format!("{} {}", player.name, turn_description(turn, scoring))),
                None => break 'rounds,
            }
        }
    }
    lines.reverse();
    lines
}


#[cfg(test)]
use super::EnglishScrabbleScoring as Scoring;

#[test]
fn scores_add_up() {
    use crate::snapshot::fixtures::{played, player};

    let ada = player("Ada", "", vec![played("fox", 12), Turn::TilesExchanged, played("ox", 5)]);
    assert_eq!(score_of(&ada, &Scoring), 17);

    let ada = player("Ada", "", vec![played("fox", 12), Turn::GameEnd(GameEnd::PlayedLastMove(11))]);
    assert_eq!(score_of(&ada, &Scoring), 23);

    let bob = player("Bob", "", vec![
        played("jab", 4),
        Turn::GameEnd(GameEnd::RemainingTiles(crate::snapshot::fixtures::rack("QK*"))),
    ]);
    assert_eq!(score_of(&bob, &Scoring), -11);
}

#[test]
fn multi_word_moves_sum_their_words() {
    use crate::snapshot::{Move, PlayedMove};

    let turn = Turn::PlayedMove(PlayedMove {
        original_move: Move::default(),
        word_values: vec![("quiz".to_owned(), 22), ("it".to_owned(), 2)],
    });
    assert_eq!(turn_value(&turn, &Scoring), 24);
    assert_eq!(turn_description(&turn, &Scoring), "played QUIZ, IT for 24 points");
}

#[test]
fn whose_turn() {
    use crate::snapshot::fixtures::{game, player};

    let g = game(vec![player("Ada", "", vec![]), player("Bob", "", vec![])], 1);
    assert!(is_players_turn(&g, "Bob"));
    assert!(!is_players_turn(&g, "Ada"));
    assert!(!is_players_turn(&g, "Zed"));
    assert_eq!(whose_turn_label(&g, Some("Bob")).as_deref(), Some("your"));
    assert_eq!(whose_turn_label(&g, Some("Ada")).as_deref(), Some("Bob's"));
    assert_eq!(whose_turn_label(&g, None).as_deref(), Some("Bob's"));

    let nobody = game(vec![], 0);
    assert!(!is_players_turn(&nobody, "Ada"));
    assert_eq!(whose_turn_label(&nobody, None), None);
}

#[test]
fn history_is_most_recent_first() {
    use crate::snapshot::fixtures::{game, played, player};

    let g = game(vec![
        player("Ada", "", vec![played("cat", 10)]),
        player("Bob", "", vec![Turn::TilesExchanged]),
    ], 0);
    assert_eq!(turn_descriptions(&g, &Scoring), vec![
        "Bob exchanged their tiles".to_owned(),
        "Ada played CAT for 10 points".to_owned(),
    ]);
}

#[test]
fn history_keeps_turns_up_to_the_first_gap() {
    use crate::snapshot::fixtures::{game, played, player, rack};

    let g = game(vec![
        player("Ada", "", vec![played("cat", 10), played("dog", 5), Turn::GameEnd(GameEnd::PlayedLastMove(3))]),
        player("Bob", "", vec![Turn::TilesExchanged, Turn::GameEnd(GameEnd::RemainingTiles(rack("Z")))]),
    ], 0);
    assert_eq!(turn_descriptions(&g, &Scoring), vec![
        "Ada played the last tiles and gained 3 points".to_owned(),
        "Bob lost 10 points for the remaining tiles Z".to_owned(),
        "Ada played DOG for 5 points".to_owned(),
        "Bob exchanged their tiles".to_owned(),
        "Ada played CAT for 10 points".to_owned(),
    ]);
    assert!(turn_descriptions(&game(vec![], 0), &Scoring).is_empty());
}
