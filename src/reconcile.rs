//! Bringing the local scratch state in line with a fresh snapshot.
//!
//! After the player's own turn the rack from the server replaces whatever was
//! there. After anyone else's turn the player's arrangement is kept: tiles on
//! the rack stay where they were and pending tiles go back to the end.

use super::Tile;
use super::compose::Composer;
use super::snapshot::GameSnapshot;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The rack was taken from the snapshot
    Reset,
    /// The player's arrangement survived
    Preserved,
    /// The arrangement no longer matched the player's tiles and was dropped
    Resynced,
}

/// Whether the turn that just ended was `my_index`'s
pub fn was_just_my_turn(whose_turn: usize, player_count: usize, my_index: usize) -> bool {
    if player_count == 0 {
        return false
    }
    (whose_turn % player_count + player_count - 1) % player_count == my_index
}

pub fn reconcile(composer: &mut Composer, game: &GameSnapshot, name: Option<&str>) -> Reconciliation {
    let my_index = name.and_then(|name| game.index_of(name));
    let authoritative: Vec<Tile> = my_index
        .map(|i| game.players[i].tiles.clone())
        .unwrap_or_default();

    let just_mine = my_index
        .map(|i| was_just_my_turn(game.whose_turn, game.players.len(), i))
        .unwrap_or(false);

    if just_mine {
        log::debug!("own turn just ended, taking the rack from the server");
        composer.reset(authoritative);
        return Reconciliation::Reset
    }

    let gathered = composer.gathered_tiles();
    if gathered.is_empty() {
        composer.reset(authoritative);
        Reconciliation::Reset
    } else if same_tiles(&gathered, &authoritative) {
        composer.reset(gathered);
        Reconciliation::Preserved
    } else {
        log::debug!("local rack {:?} does not match {:?}, resyncing", gathered, authoritative);
        composer.reset(authoritative);
        Reconciliation::Resynced
    }
}

fn same_tiles(a: &[Tile], b: &[Tile]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}


#[test]
fn last_turn_wraps_around() {
    for me in 0..3 {
        assert_eq!(was_just_my_turn(0, 3, me), me == 2);
        assert_eq!(was_just_my_turn(1, 3, me), me == 0);
        assert_eq!(was_just_my_turn(2, 3, me), me == 1);
    }
    assert!(was_just_my_turn(0, 1, 0));
    assert!(!was_just_my_turn(0, 0, 0));
}

#[test]
fn opponent_turn_preserves_arrangement() {
    use crate::{pos, Board, Letter};
    use crate::snapshot::fixtures::{game, player, rack};

    let board = Board::empty();
    let mut composer = Composer::new(rack("ATE"));
    // rearrange to T A E, then put the E on the board
    composer.click_rack(0);
    composer.click_rack(1);
    composer.click_rack(2);
    composer.click_square(&board, pos(7, 8), &mut || None::<Letter>);
    assert_eq!(composer.rack().tiles(), &rack("TA")[..]);
    composer.click_rack(0);

    // Bob just played, it is Cy's turn
    let snapshot = game(vec![player("Ada", "ATE", vec![]), player("Bob", "", vec![]), player("Cy", "", vec![])], 2);
    assert_eq!(reconcile(&mut composer, &snapshot, Some("Ada")), Reconciliation::Preserved);
    assert_eq!(composer.rack().tiles(), &rack("TAE")[..]);
    assert!(composer.pending().is_empty());
    assert_eq!(composer.rack().selected(), None);
}

#[test]
fn own_turn_takes_the_server_rack() {
    use crate::{pos, Board, Letter};
    use crate::snapshot::fixtures::{game, player, rack};

    let board = Board::empty();
    let mut composer = Composer::new(rack("AT*"));
    composer.click_rack(2);
    composer.click_square(&board, pos(7, 7), &mut || Letter::new('x'));

    let snapshot = game(vec![player("Ada", "QUIZ", vec![]), player("Bob", "", vec![])], 1);
    assert_eq!(reconcile(&mut composer, &snapshot, Some("Ada")), Reconciliation::Reset);
    assert_eq!(composer.rack().tiles(), &rack("QUIZ")[..]);
    assert!(composer.pending().is_empty());
}

#[test]
fn first_snapshot_fills_the_rack() {
    use crate::snapshot::fixtures::{game, player, rack};

    let mut composer = Composer::default();
    let snapshot = game(vec![player("Ada", "HELLO", vec![]), player("Bob", "WORLD", vec![])], 0);
    assert_eq!(reconcile(&mut composer, &snapshot, Some("Ada")), Reconciliation::Reset);
    assert_eq!(composer.rack().tiles(), &rack("HELLO")[..]);
}

#[test]
fn stale_arrangement_is_dropped() {
    use crate::snapshot::fixtures::{game, player, rack};

    // tiles were exchanged while this client was away
    let mut composer = Composer::new(rack("ABC"));
    let snapshot = game(vec![player("Ada", "XYZ", vec![]), player("Bob", "", vec![]), player("Cy", "", vec![])], 2);
    assert_eq!(reconcile(&mut composer, &snapshot, Some("Ada")), Reconciliation::Resynced);
    assert_eq!(composer.rack().tiles(), &rack("XYZ")[..]);
}

#[test]
fn unknown_player_keeps_nothing() {
    use crate::snapshot::fixtures::{game, player, rack};

    let snapshot = game(vec![player("Ada", "ABC", vec![])], 0);
    let mut composer = Composer::new(rack("ABC"));
    assert_eq!(reconcile(&mut composer, &snapshot, None), Reconciliation::Resynced);
    assert!(composer.rack().is_empty());
    let mut composer = Composer::default();
    assert_eq!(reconcile(&mut composer, &snapshot, Some("Zed")), Reconciliation::Reset);
    assert!(composer.rack().is_empty());
}
