//! One player's view of a table.
//!
//! A [`Session`] receives the three kinds of events the client reacts to
//! (server messages, player actions, and the answer to the blank prompt
//! through a [`BlankResolver`]) and applies each of them completely before
//! returning. Listeners registered with [`Session::subscribe`] are called after
//! every change with a [`SessionView`] of the new state.

use super::{Board, EnglishScrabbleScoring, Position, Tile};
use super::blank::BlankResolver;
use super::compose::{ClickOutcome, Composer};
use super::names::NameStore;
use super::pending::PendingMove;
use super::projection;
use super::protocol::{ClientError, ClientMessage, ServerMessage, Transport};
use super::rack::Selection;
use super::reconcile::{self, Reconciliation};
use super::snapshot::{GameSnapshot, InvalidMove, TableSnapshot, TableState};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no table received from the server yet")]
    NoTable,
    #[error("join the game first")]
    NotJoined,
    #[error("already joined as {0}")]
    AlreadyJoined(String),
    #[error("enter a name")]
    EmptyName,
    #[error("the game has not started")]
    NotRunning,
    #[error("the game has already started")]
    AlreadyStarted,
    #[error("at least two players are needed to start")]
    NotEnoughPlayers,
    #[error("the game is over")]
    GameFinished,
    #[error("it's not your turn")]
    NotYourTurn,
    #[error("place some tiles before submitting")]
    EmptyMove,
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StateChanged,
    /// The server refused the submitted move, with its explanation
    MoveRejected(String),
}

type Listener = Box<dyn FnMut(&SessionEvent, &SessionView<'_>)>;

pub struct Session<T: Transport, S: NameStore> {
    transport: T,
    names: S,
    table: Option<TableSnapshot>,
    name: Option<String>,
    composer: Composer,
    rejection: Option<InvalidMove>,
    listeners: Vec<Listener>,
}

impl<T: Transport, S: NameStore> Session<T, S> {
    pub fn new(transport: T, names: S) -> Self {
        Self {
            transport,
            names,
            table: None,
            name: None,
            composer: Composer::default(),
            rejection: None,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent, &SessionView<'_>) + 'static) {
        self.listeners.push(Box::new(listener))
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            table: self.table.as_ref(),
            name: self.name.as_deref(),
            composer: &self.composer,
            rejection: self.rejection.as_ref(),
        }
    }

    fn notify(&mut self, event: SessionEvent) {
        let mut listeners = std::mem::take(&mut self.listeners);
        {
            let view = self.view();
            for listener in listeners.iter_mut() {
                listener(&event, &view);
            }
        }
        // listeners added from inside a callback are kept too
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }

    fn send(&mut self, msg: ClientMessage) -> Result<(), SessionError> {
        self.transport.send(&msg)?;
        Ok(())
    }

    /// A (re)connection was made, ask for the table and reclaim the seat
    pub fn on_connected(&mut self) -> Result<(), SessionError> {
        self.send(ClientMessage::UpdateMe)?;
        if let Some(name) = self.name.clone() {
            self.send(ClientMessage::JoinWithName(name))?;
        }
        Ok(())
    }

    pub fn on_server_message(&mut self, msg: ServerMessage) -> Result<(), SessionError> {
        match msg {
            ServerMessage::Table(table) => self.on_table(table),
            ServerMessage::InvalidMove(invalid) => {
                self.on_rejection(invalid);
                Ok(())
            },
        }
    }

    fn on_table(&mut self, table: TableSnapshot) -> Result<(), SessionError> {
        let mut rejoin = None;
        if self.name.is_none() {
            if let Some(stored) = self.names.get() {
                if table.game.has_player(&stored) {
                    log::info!("picking up stored name {}", stored);
                    self.name = Some(stored.clone());
                    rejoin = Some(stored);
                }
            }
        }

        let outcome = reconcile::reconcile(&mut self.composer, &table.game, self.name.as_deref());
        log::debug!("snapshot reconciled: {:?}", outcome);
        self.table = Some(table);
        self.rejection = None;
        self.notify(SessionEvent::StateChanged);

        if let Some(name) = rejoin {
            self.send(ClientMessage::JoinWithName(name))?;
        }
        Ok(())
    }

    fn on_rejection(&mut self, invalid: InvalidMove) {
        log::info!("move rejected: {}", invalid.explanation);
        let explanation = invalid.explanation.clone();
        self.rejection = Some(invalid);
        self.notify(SessionEvent::MoveRejected(explanation));
    }

    fn reconcile(&mut self) -> Option<Reconciliation> {
        let game = &self.table.as_ref()?.game;
        Some(reconcile::reconcile(&mut self.composer, game, self.name.as_deref()))
    }

    pub fn click_rack(&mut self, index: usize) -> Selection {
        let selection = self.composer.click_rack(index);
        if selection != Selection::Ignored {
            self.notify(SessionEvent::StateChanged);
        }
        selection
    }

    pub fn click_square(&mut self, pos: Position, resolver: &mut dyn BlankResolver) -> ClickOutcome {
        let board = match &self.table {
            Some(table) => &table.game.board,
            None => return ClickOutcome::Ignored,
        };
        let outcome = self.composer.click_square(board, pos, resolver);
        if outcome != ClickOutcome::Ignored {
            self.notify(SessionEvent::StateChanged);
        }
        outcome
    }

    /// Throws away the local arrangement, the rack is the server's again
    pub fn reset_tiles(&mut self) {
        let tiles = self.view().authoritative_rack().to_vec();
        self.composer.reset(tiles);
        self.notify(SessionEvent::StateChanged);
    }

    fn check_can_play(&self) -> Result<(), SessionError> {
        let table = self.table.as_ref().ok_or(SessionError::NoTable)?;
        let name = self.name.as_deref().ok_or(SessionError::NotJoined)?;
        if table.state != TableState::Running {
            return Err(SessionError::NotRunning)
        }
        if table.game.finished {
            return Err(SessionError::GameFinished)
        }
        if !projection::is_players_turn(&table.game, name) {
            return Err(SessionError::NotYourTurn)
        }
        Ok(())
    }

    /// Sends the pending move. It stays on the board until the server's answer arrives.
    pub fn submit(&mut self) -> Result<(), SessionError> {
        self.check_can_play()?;
        if self.composer.pending().is_empty() {
            return Err(SessionError::EmptyMove)
        }
        let play = self.composer.pending().to_move();
        log::info!("submitting {} tiles", play.tiles.len());
        self.send(ClientMessage::PlayMove(play))?;
        self.rejection = None;
        self.notify(SessionEvent::StateChanged);
        Ok(())
    }

    /// Gives up the turn for a whole new rack
    pub fn exchange(&mut self) -> Result<(), SessionError> {
        self.check_can_play()?;
        log::info!("exchanging tiles");
        self.send(ClientMessage::ExchangeTiles)
    }

    pub fn join(&mut self, name: &str) -> Result<(), SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName)
        }
        match &self.name {
            Some(current) if current == name => (),
            Some(current) => return Err(SessionError::AlreadyJoined(current.clone())),
            None => {
                log::info!("joining as {}", name);
                self.name = Some(name.to_owned());
                self.names.set(name);
                self.reconcile();
                self.notify(SessionEvent::StateChanged);
            },
        }
        self.send(ClientMessage::JoinWithName(name.to_owned()))
    }

    /// Leaves the seat locally and forgets the stored name
    pub fn forget_name(&mut self) {
        self.names.clear();
        if self.name.take().is_some() {
            self.reconcile();
            self.notify(SessionEvent::StateChanged);
        }
    }

    pub fn start_game(&mut self) -> Result<(), SessionError> {
        let table = self.table.as_ref().ok_or(SessionError::NoTable)?;
        if table.state != TableState::Setup {
            return Err(SessionError::AlreadyStarted)
        }
        if !table.ready_to_start() {
            return Err(SessionError::NotEnoughPlayers)
        }
        self.send(ClientMessage::StartGame)
    }
}

/// Read-only state handed to renderers
#[derive(Clone, Copy)]
pub struct SessionView<'a> {
    pub table: Option<&'a TableSnapshot>,
    pub name: Option<&'a str>,
    pub composer: &'a Composer,
    /// Last refusal from the server, until the next snapshot or submission
    pub rejection: Option<&'a InvalidMove>,
}

impl<'a> SessionView<'a> {
    pub fn game(&self) -> Option<&'a GameSnapshot> {
        self.table.map(|t| &t.game)
    }

    pub fn rack(&self) -> &'a [Tile] {
        self.composer.rack().tiles()
    }

    pub fn selected(&self) -> Option<usize> {
        self.composer.rack().selected()
    }

    pub fn pending(&self) -> &'a PendingMove {
        self.composer.pending()
    }

    /// The rack the server last sent for this player
    pub fn authoritative_rack(&self) -> &'a [Tile] {
        match (self.game(), self.name) {
            (Some(game), Some(name)) => game.player(name).map(|p| &p.tiles[..]).unwrap_or(&[]),
            _ => &[],
        }
    }

    /// The board with the pending tiles on it
    pub fn board(&self) -> Board {
        match self.game() {
            Some(game) => self.pending().derived_board(&game.board),
            None => self.pending().derived_board(&Board::empty()),
        }
    }

    pub fn is_my_turn(&self) -> bool {
        match (self.game(), self.name) {
            (Some(game), Some(name)) => projection::is_players_turn(game, name),
            _ => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.table.map_or(false, |t| t.state == TableState::Running)
    }

    /// Submit and exchange are only offered on the player's turn of a running game
    pub fn can_play(&self) -> bool {
        self.is_running() && !self.game().map_or(true, |g| g.finished) && self.is_my_turn()
    }

    pub fn can_start(&self) -> bool {
        self.table.map_or(false, TableSnapshot::ready_to_start)
    }

    pub fn whose_turn_label(&self) -> Option<String> {
        projection::whose_turn_label(self.game()?, self.name)
    }

    pub fn scores(&self) -> Vec<(&'a str, i64)> {
        match self.game() {
            Some(game) => game.players.iter()
                .map(|p| (p.name.as_str(), projection::score_of(p, &EnglishScrabbleScoring)))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.game()
            .map(|game| projection::turn_descriptions(game, &EnglishScrabbleScoring))
            .unwrap_or_default()
    }
}


#[cfg(test)]
use crate::names::MemoryNameStore;
#[cfg(test)]
use crate::{pos, Letter, PlacedTile};
#[cfg(test)]
use crate::snapshot::fixtures::{game, played, player, rack, running};

#[cfg(test)]
fn session() -> Session<Vec<ClientMessage>, MemoryNameStore> {
    Session::new(Vec::new(), MemoryNameStore::new())
}

#[cfg(test)]
fn two_players(whose_turn: usize) -> TableSnapshot {
    running(game(vec![player("Ada", "A*T", vec![]), player("Bob", "XYZ", vec![])], whose_turn))
}

#[cfg(test)]
fn no_blank() -> Option<Letter> {
    None
}

#[test]
fn connecting_asks_for_the_table() {
    let mut s = session();
    s.on_connected().unwrap();
    assert_eq!(s.transport(), &vec![ClientMessage::UpdateMe]);

    s.join("  Ada ").unwrap();
    s.on_connected().unwrap();
    assert_eq!(s.transport(), &vec![
        ClientMessage::UpdateMe,
        ClientMessage::JoinWithName("Ada".to_owned()),
        ClientMessage::UpdateMe,
        ClientMessage::JoinWithName("Ada".to_owned()),
    ]);
}

#[test]
fn joining_takes_the_rack() {
    let mut s = session();
    s.on_server_message(ServerMessage::Table(two_players(0))).unwrap();
    assert!(s.view().rack().is_empty());

    s.join("Ada").unwrap();
    assert_eq!(s.view().rack(), &rack("A*T")[..]);
    assert!(matches!(s.join("Bob"), Err(SessionError::AlreadyJoined(_))));
    assert!(matches!(s.join(" "), Err(SessionError::EmptyName)));
}

#[test]
fn stored_name_is_picked_up() {
    let mut s = Session::<Vec<ClientMessage>, _>::new(Vec::new(), MemoryNameStore::with_name("Bob"));
    s.on_server_message(ServerMessage::Table(two_players(0))).unwrap();
    assert_eq!(s.name(), Some("Bob"));
    assert_eq!(s.view().rack(), &rack("XYZ")[..]);
    assert_eq!(s.transport(), &vec![ClientMessage::JoinWithName("Bob".to_owned())]);

    let mut s = Session::<Vec<ClientMessage>, _>::new(Vec::new(), MemoryNameStore::with_name("Cy"));
    s.on_server_message(ServerMessage::Table(two_players(0))).unwrap();
    assert_eq!(s.name(), None);
    assert!(s.transport().is_empty());
}

#[test]
fn ada_places_a_blank() {
    let mut s = session();
    s.join("Ada").unwrap();
    s.on_server_message(ServerMessage::Table(two_players(0))).unwrap();

    s.click_rack(1);
    let outcome = s.click_square(pos(7, 7), &mut || Letter::new('e'));
    let e = Letter::new('E').unwrap();
    assert_eq!(outcome, ClickOutcome::Placed(PlacedTile::Blank { letter: e }));
    let view = s.view();
    assert_eq!(view.pending().tiles(), &[(pos(7, 7), PlacedTile::Blank { letter: e })][..]);
    assert_eq!(view.rack(), &rack("AT")[..]);
    assert_eq!(view.board().get(pos(7, 7)).map(PlacedTile::letter), Some(e));
    assert!(view.table.unwrap().game.board.is_empty());
}

#[test]
fn submitting_sends_the_pending_move() {
    let mut s = session();
    s.join("Ada").unwrap();
    s.on_server_message(ServerMessage::Table(two_players(0))).unwrap();
    assert!(matches!(s.submit(), Err(SessionError::EmptyMove)));

    s.click_rack(0);
    s.click_square(pos(7, 7), &mut no_blank);
    s.submit().unwrap();
    let expected = s.view().pending().to_move();
    assert_eq!(s.transport().last(), Some(&ClientMessage::PlayMove(expected)));
    // kept until the server answers
    assert_eq!(s.view().pending().len(), 1);

    // the server refuses: nothing is rolled back
    s.on_server_message(ServerMessage::InvalidMove(InvalidMove {
        explanation: "That move is disconnected".to_owned(),
        positions: vec![pos(7, 7)],
    })).unwrap();
    assert_eq!(s.view().pending().len(), 1);
    assert_eq!(s.view().rejection.map(|r| r.explanation.as_str()), Some("That move is disconnected"));

    // the server accepts: the next table resets the rack
    let mut after = two_players(1);
    after.game.players[0].tiles = rack("TQE");
    after.game.players[0].turns.push(played("a", 1));
    s.on_server_message(ServerMessage::Table(after)).unwrap();
    assert!(s.view().pending().is_empty());
    assert_eq!(s.view().rack(), &rack("TQE")[..]);
    assert!(s.view().rejection.is_none());
}

#[test]
fn playing_out_of_turn_is_refused() {
    let mut s = session();
    assert!(matches!(s.submit(), Err(SessionError::NoTable)));
    s.on_server_message(ServerMessage::Table(two_players(1))).unwrap();
    assert!(matches!(s.exchange(), Err(SessionError::NotJoined)));
    s.join("Ada").unwrap();
    assert!(!s.view().can_play());
    assert!(matches!(s.submit(), Err(SessionError::NotYourTurn)));
    assert!(matches!(s.exchange(), Err(SessionError::NotYourTurn)));

    let mut finished = two_players(0);
    finished.game.finished = true;
    s.on_server_message(ServerMessage::Table(finished)).unwrap();
    assert!(matches!(s.exchange(), Err(SessionError::GameFinished)));

    let mut setup = two_players(0);
    setup.state = TableState::Setup;
    s.on_server_message(ServerMessage::Table(setup)).unwrap();
    assert!(matches!(s.exchange(), Err(SessionError::NotRunning)));

    s.on_server_message(ServerMessage::Table(two_players(0))).unwrap();
    assert!(s.view().can_play());
    s.exchange().unwrap();
    assert_eq!(s.transport().last(), Some(&ClientMessage::ExchangeTiles));
}

#[test]
fn starting_needs_two_players_in_setup() {
    let mut s = session();
    let mut lonely = two_players(0);
    lonely.state = TableState::Setup;
    lonely.game.players.truncate(1);
    s.on_server_message(ServerMessage::Table(lonely)).unwrap();
    assert!(matches!(s.start_game(), Err(SessionError::NotEnoughPlayers)));

    let mut ready = two_players(0);
    ready.state = TableState::Setup;
    s.on_server_message(ServerMessage::Table(ready)).unwrap();
    assert!(s.view().can_start());
    s.start_game().unwrap();
    assert_eq!(s.transport().last(), Some(&ClientMessage::StartGame));

    s.on_server_message(ServerMessage::Table(two_players(0))).unwrap();
    assert!(matches!(s.start_game(), Err(SessionError::AlreadyStarted)));
}

#[test]
fn reset_restores_the_server_rack() {
    let mut s = session();
    s.join("Ada").unwrap();
    s.on_server_message(ServerMessage::Table(two_players(0))).unwrap();
    s.click_rack(0);
    s.click_rack(2);
    s.click_rack(0);
    s.click_square(pos(0, 0), &mut no_blank);
    assert_eq!(s.view().rack(), &rack("*A")[..]);

    s.reset_tiles();
    assert_eq!(s.view().rack(), &rack("A*T")[..]);
    assert!(s.view().pending().is_empty());
}

#[test]
fn forgetting_the_name_leaves_the_seat() {
    let mut s = Session::<Vec<ClientMessage>, _>::new(Vec::new(), MemoryNameStore::with_name("Ada"));
    s.on_server_message(ServerMessage::Table(two_players(0))).unwrap();
    assert_eq!(s.name(), Some("Ada"));
    s.forget_name();
    assert_eq!(s.name(), None);
    assert!(s.view().rack().is_empty());
    s.on_server_message(ServerMessage::Table(two_players(1))).unwrap();
    assert_eq!(s.name(), None);
}

#[test]
fn listeners_see_every_change() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut s = session();
    let log = Rc::clone(&seen);
    s.subscribe(move |event, view| log.borrow_mut().push((event.clone(), view.rack().len())));

    s.join("Ada").unwrap();
    s.on_server_message(ServerMessage::Table(two_players(0))).unwrap();
    s.click_rack(0);
    s.click_square(pos(7, 7), &mut no_blank);
    s.click_square(pos(3, 3), &mut no_blank);
    s.on_server_message(ServerMessage::InvalidMove(InvalidMove {
        explanation: "'A' is not a word".to_owned(),
        positions: vec![],
    })).unwrap();
    assert!(s.view().rejection.is_some());

    // trying again clears the refusal and tells the listeners
    s.submit().unwrap();
    assert!(s.view().rejection.is_none());

    assert_eq!(*seen.borrow(), vec![
        (SessionEvent::StateChanged, 0),
        (SessionEvent::StateChanged, 3),
        (SessionEvent::StateChanged, 3),
        (SessionEvent::StateChanged, 2),
        (SessionEvent::MoveRejected("'A' is not a word".to_owned()), 2),
        (SessionEvent::StateChanged, 2),
    ]);
}

#[test]
fn view_projections() {
    use crate::snapshot::Turn;

    let mut s = session();
    let mut table = two_players(1);
    table.game.players[0].turns = vec![played("ox", 9)];
    table.game.players[1].turns = vec![Turn::TilesExchanged];
    s.join("Ada").unwrap();
    s.on_server_message(ServerMessage::Table(table)).unwrap();

    let view = s.view();
    assert_eq!(view.scores(), vec![("Ada", 9), ("Bob", 0)]);
    assert_eq!(view.whose_turn_label().as_deref(), Some("Bob's"));
    assert_eq!(view.history(), vec!["Bob exchanged their tiles".to_owned(), "Ada played OX for 9 points".to_owned()]);
}
