
use std::convert::TryFrom;
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use structopt::StructOpt;

use scrabble_client::{
    PositionFormat,
    blank::PromptResolver,
    compose::ClickOutcome,
    names::{self, FileNameStore, MemoryNameStore, NameStore},
    protocol::{ClientError, JsonLinesTransport, ServerMessage, Transport},
    render::Renderer,
    session::{Session, SessionError, SessionEvent},
};

#[derive(Debug)]
enum FileOrString {
    File(PathBuf),
    String(String),
}

impl FileOrString {
    pub fn read_to_string(self) -> io::Result<String> {
        match self {
            Self::String(s) => Ok(s),
            Self::File(f) => std::fs::read_to_string(f),
        }
    }
}

impl<'de> serde::Deserialize<'de> for FileOrString {
    fn deserialize<D>(deserializer: D) -> Result<FileOrString, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{Visitor, MapAccess, Error};
        use std::fmt;

        #[derive(serde::Deserialize)]
        #[serde(field_identifier, rename_all = "snake_case")]
        enum FileKey {
            File,
        }

        struct FileOrStringVisitor;

        impl<'de> Visitor<'de> for FileOrStringVisitor {
            type Value = FileOrString;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON string or { file = ... }")
            }

            fn visit_map<V>(self, mut map: V) -> Result<FileOrString, V::Error>
            where
                V: MapAccess<'de>,
            {
                let _: FileKey = map.next_key()?.ok_or_else(|| V::Error::missing_field("file"))?;
                let file = map.next_value()?;
                Ok(FileOrString::File(file))
            }

            fn visit_str<E>(self, v: &str) -> Result<FileOrString, E> {
                Ok(FileOrString::String(v.to_owned()))
            }
            fn visit_string<E>(self, v: String) -> Result<FileOrString, E> {
                Ok(FileOrString::String(v))
            }
        }

        deserializer.deserialize_any(FileOrStringVisitor)
    }
}

#[derive(Debug, serde::Deserialize)]
struct Settings {
    /// The first message from the server, `{"Table": ...}`, inline or in a file
    snapshot: Option<FileOrString>,

    /// Join the table with this name once the first table arrived
    name: Option<String>,

    /// Where the joined name is kept between runs, not kept at all when absent
    name_file: Option<PathBuf>,

    /// File receiving the messages for the server, one JSON document per line.
    /// They go to the standard error when absent, the table is drawn on the standard output
    outbox: Option<PathBuf>,

    #[serde(default)]
    position_format: PositionFormat,

    /// The number of history lines shown, not present means all of them
    history_shown: Option<usize>,

    #[serde(default = "yes")]
    show_premium_squares: bool,
}

fn yes() -> bool { true }

#[derive(Debug, StructOpt)]
#[structopt(name = "scrabble_client", about = "Play at a scrabble table from the terminal")]
struct Opt {
    /// The config file, if not present, looks for `scrabble-client`
    #[structopt(short = "c", long = "config")]
    config: Option<String>,

    /// A file with the first server message, as the server sends it
    #[structopt(short = "s", long = "snapshot")]
    snapshot_file: Option<String>,

    /// The name to join with
    #[structopt(short = "n", long = "name")]
    name: Option<String>,

    /// The file remembering the joined name
    #[structopt(long = "name-file")]
    name_file: Option<String>,

    /// The file receiving messages for the server, standard error if not present
    #[structopt(short = "o", long = "outbox")]
    outbox: Option<String>,

    /// The number of history lines shown, not present means all of them
    #[structopt(long = "history")]
    history_shown: Option<usize>,

    /// Draw premium squares as empty squares
    #[structopt(long = "no-premium")]
    no_premium: bool,
}

fn load_config(opt: Opt) -> Result<Settings, config::ConfigError> {
    let mut s = config::Config::new();

    match opt.config {
        Some(f) => s.merge(config::File::with_name(&f))?,
        None => s.merge(config::File::with_name("scrabble-client").required(false))?,
    };

    s.merge(config::Environment::with_prefix("SCRABBLE"))?;

    if let Some(f) = opt.snapshot_file {
        s.set("snapshot.file", f)?;
    }
    if let Some(n) = opt.name {
        s.set("name", n)?;
    }
    if let Some(f) = opt.name_file {
        s.set("name_file", f)?;
    }
    if let Some(o) = opt.outbox {
        s.set("outbox", o)?;
    }
    if let Some(n) = opt.history_shown {
        s.set("history_shown", i64::try_from(n).unwrap_or(i64::MAX))?;
    }
    if opt.no_premium {
        s.set("show_premium_squares", false)?;
    }

    s.try_into()
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("cannot read the snapshot: {0}")]
    Snapshot(io::Error),
    #[error("cannot open the outbox {}: {}", .0.display(), .1)]
    Outbox(PathBuf, io::Error),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

const HELP: &str = "\
commands:
  show                 draw the table again
  rack N               select the N-th rack tile, or swap it with the selected one
  click POS            place the selected tile on POS, or take back the tile on POS
  reset                take back every placed tile
  submit               send the placed tiles
  exchange             give up the turn for new tiles
  join [NAME]          take a seat, with a random name if none is given
  forget               forget the stored name
  start                start the game
  recv FILE|JSON       take a message from the server
  quit";

type ClientSession = Session<JsonLinesTransport<Box<dyn Write>>, Box<dyn NameStore>>;

fn receive<T: Transport, S: NameStore>(session: &mut Session<T, S>, source: &str) -> Result<(), AppError> {
    let json = if source.starts_with('{') {
        source.to_owned()
    } else {
        std::fs::read_to_string(source).map_err(AppError::Snapshot)?
    };
    session.on_server_message(ServerMessage::decode(&json)?)?;
    Ok(())
}

/// Only a broken connection to the server ends the session, a bad message or action is reported
fn is_fatal(e: &AppError) -> bool {
    match e {
        AppError::Client(ClientError::Io(_)) | AppError::Session(SessionError::Client(ClientError::Io(_))) => true,
        AppError::Io(_) | AppError::Outbox(..) => true,
        _ => false,
    }
}

fn run(conf: Settings) -> Result<(), AppError> {
    let renderer = Renderer {
        position_format: conf.position_format,
        show_premium_squares: conf.show_premium_squares,
        history_shown: conf.history_shown,
    };

    let outbox: Box<dyn Write> = match conf.outbox {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(&path)
                .map_err(|e| AppError::Outbox(path.clone(), e))?;
            Box::new(file)
        },
        None => Box::new(io::stderr()),
    };
    let names: Box<dyn NameStore> = match conf.name_file {
        Some(path) => Box::new(FileNameStore::new(path)),
        None => Box::new(MemoryNameStore::new()),
    };

    let mut session: ClientSession = Session::new(JsonLinesTransport::new(outbox), names);
    session.subscribe(move |event, view| match event {
        SessionEvent::StateChanged => println!("{}", renderer.render(view)),
        SessionEvent::MoveRejected(explanation) => println!("Move rejected: {}", explanation),
    });

    session.on_connected()?;
    if let Some(snapshot) = conf.snapshot {
        let json = snapshot.read_to_string().map_err(AppError::Snapshot)?;
        session.on_server_message(ServerMessage::decode(&json)?)?;
    }
    if let Some(name) = conf.name {
        if session.name().is_none() {
            session.join(&name)?;
        }
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break
        }
        let mut parts = line.trim().splitn(2, ' ');
        let command = parts.next().unwrap_or("");
        let arg = parts.next().unwrap_or("").trim();

        let result = match command {
            "" | "show" => {
                println!("{}", renderer.render(&session.view()));
                Ok(())
            },
            "help" => {
                println!("{}", HELP);
                Ok(())
            },
            "quit" | "exit" => break,
            "rack" | "select" => match arg.parse::<usize>() {
                Ok(n) if n >= 1 => {
                    session.click_rack(n - 1);
                    Ok(())
                },
                _ => {
                    println!("rack positions start at 1");
                    Ok(())
                },
            },
            "click" | "place" => match conf.position_format.parse(arg) {
                Ok(pos) => {
                    let mut resolver = PromptResolver::new(&mut input, io::stdout());
                    if session.click_square(pos, &mut resolver) == ClickOutcome::Cancelled {
                        println!("blank not placed");
                    }
                    Ok(())
                },
                Err(e) => {
                    println!("{}", e);
                    Ok(())
                },
            },
            "reset" => {
                session.reset_tiles();
                Ok(())
            },
            "submit" => session.submit().map_err(AppError::from),
            "exchange" => session.exchange().map_err(AppError::from),
            "start" => session.start_game().map_err(AppError::from),
            "join" if arg.is_empty() => {
                let name = names::random_name(&mut rand::thread_rng());
                println!("joining as {}", name);
                session.join(&name).map_err(AppError::from)
            },
            "join" => session.join(arg).map_err(AppError::from),
            "forget" => {
                session.forget_name();
                Ok(())
            },
            "recv" => receive(&mut session, arg),
            other => {
                println!("unknown command {:?}, try `help`", other);
                Ok(())
            },
        };

        match result {
            Ok(()) => (),
            Err(e) if is_fatal(&e) => return Err(e),
            Err(e) => println!("{}", e),
        }
    }
    Ok(())
}

fn main() {
    simple_logger::SimpleLogger::from_env().init().unwrap();

    let opt = Opt::from_args();

    let conf = match load_config(opt) {
        Ok(conf) => conf,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            std::process::exit(2)
        },
    };

    if let Err(e) = run(conf) {
        log::error!("{}", e);
        std::process::exit(1)
    }
}


#[cfg(test)]
fn test_session() -> Session<Vec<scrabble_client::protocol::ClientMessage>, MemoryNameStore> {
    Session::new(Vec::new(), MemoryNameStore::new())
}

#[test]
fn malformed_messages_do_not_end_the_session() {
    let mut session = test_session();
    let err = receive(&mut session, "{\"Table\": ").unwrap_err();
    assert!(matches!(err, AppError::Client(ClientError::Json(_))));
    assert!(!is_fatal(&err));

    let err = receive(&mut session, "/nonexistent/table.json").unwrap_err();
    assert!(!is_fatal(&err));

    receive(&mut session, r#"{"InvalidMove": {"explanation": "Not a word", "positions": [[7, 7]]}}"#).unwrap();
    assert_eq!(session.view().rejection.map(|r| r.explanation.as_str()), Some("Not a word"));
}

#[test]
fn transport_failures_end_the_session() {
    let broken = || ClientError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "server gone"));
    assert!(is_fatal(&AppError::Client(broken())));
    assert!(is_fatal(&AppError::Session(SessionError::Client(broken()))));
    assert!(!is_fatal(&AppError::Session(SessionError::NotYourTurn)));
    assert!(!is_fatal(&AppError::Snapshot(io::Error::new(io::ErrorKind::NotFound, "missing"))));
}
