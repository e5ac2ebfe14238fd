//! Messages exchanged with the game server, JSON encoded.
//!
//! The connection itself (websocket, reconnection) lives outside this crate,
//! anything that can carry a [`ClientMessage`] implements [`Transport`].

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::snapshot::{InvalidMove, Move, TableSnapshot};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport: {0}")]
    Io(#[from] io::Error),
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerMessage {
    Table(TableSnapshot),
    InvalidMove(InvalidMove),
}

impl ServerMessage {
    pub fn decode(json: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Ask for the current table, harmless to repeat
    UpdateMe,
    StartGame,
    JoinWithName(String),
    PlayMove(Move),
    ExchangeTiles,
}

impl ClientMessage {
    pub fn encode(&self) -> Result<String, ClientError> {
        Ok(serde_json::to_string(self)?)
    }
}

pub trait Transport {
    fn send(&mut self, msg: &ClientMessage) -> Result<(), ClientError>;
}

/// Keeps every message, for callers that forward them later (and for tests)
impl Transport for Vec<ClientMessage> {
    fn send(&mut self, msg: &ClientMessage) -> Result<(), ClientError> {
        self.push(msg.clone());
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, msg: &ClientMessage) -> Result<(), ClientError> {
        (**self).send(msg)
    }
}

/// One JSON document per line
pub struct JsonLinesTransport<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesTransport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Transport for JsonLinesTransport<W> {
    fn send(&mut self, msg: &ClientMessage) -> Result<(), ClientError> {
        let line = msg.encode()?;
        log::debug!("sending {}", line);
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }
}


#[test]
fn client_messages_match_the_server() {
    use crate::{pos, Letter, PlacedTile};

    assert_eq!(ClientMessage::UpdateMe.encode().unwrap(), r#""UpdateMe""#);
    assert_eq!(ClientMessage::ExchangeTiles.encode().unwrap(), r#""ExchangeTiles""#);
    assert_eq!(
        ClientMessage::JoinWithName("Ada".to_owned()).encode().unwrap(),
        r#"{"JoinWithName":"Ada"}"#,
    );

    let e = Letter::new('E').unwrap();
    let play = ClientMessage::PlayMove(Move {
        tiles: vec![(pos(7, 7), PlacedTile::Blank { letter: e }), (pos(7, 8), PlacedTile::Letter(e))],
    });
    assert_eq!(
        play.encode().unwrap(),
        r#"{"PlayMove":{"tiles":[[[7,7],{"Blank":"E"}],[[7,8],"E"]]}}"#,
    );
}

#[test]
fn server_rejection_decodes() {
    let msg = ServerMessage::decode(
        r#"{"InvalidMove":{"explanation":"'QX' is not a word","positions":[[3,4],[4,4]]}}"#,
    ).unwrap();
    match msg {
        ServerMessage::InvalidMove(invalid) => {
            assert_eq!(invalid.explanation, "'QX' is not a word");
            assert_eq!(invalid.positions, vec![crate::pos(3, 4), crate::pos(4, 4)]);
        },
        other => panic!("unexpected message {:?}", other),
    }
    assert!(ServerMessage::decode(r#"{"Chat":"hi"}"#).is_err());
}

#[test]
fn json_lines_transport_writes_one_line_per_message() {
    let mut transport = JsonLinesTransport::new(Vec::new());
    transport.send(&ClientMessage::UpdateMe).unwrap();
    transport.send(&ClientMessage::StartGame).unwrap();
    let out = String::from_utf8(transport.into_inner()).unwrap();
    assert_eq!(out, "\"UpdateMe\"\n\"StartGame\"\n");
}
