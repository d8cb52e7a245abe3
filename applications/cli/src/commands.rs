//! Text commands and their dispatch onto session players
//!
//! A line is `[@session] <command> [args]`. Track numbers are 1-based.

use crate::announcer::Announcer;
use encore_core::{time::format_length, TrackResolver};
use encore_playback::{PlaybackError, PlaybackState, Player, PlayerRegistry};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

pub const HELP: &str = "\
Commands:
  add <query>        queue the best match for a search term or track id
  next [n]           skip forward n tracks (default 1)
  prev [n]           go back n tracks (default 1)
  goto <n>           jump to track #n
  pause | resume     pause or resume the current track
  remove <n>         remove track #n
  clear [all]        drop upcoming tracks, or every track but the current one
  reset              stop and empty the queue
  list [page]        show the queue (default: page with the current track)
  autoplay [on|off]  show or set auto-discovery
  now                show the current track
  sessions           list active sessions
  leave              stop and close the session
  help               show this help
Prefix a command with @name to target another session.";

const ADD_MUSIC_FIRST: &str = "Add music with `add <query>` first";
const NO_SESSION: &str = "Not playing in this session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Next(usize),
    Prev(usize),
    GoTo(usize),
    Pause,
    Resume,
    Remove(usize),
    Clear { all: bool },
    Reset,
    List(usize),
    Autoplay(Option<bool>),
    Now,
    Sessions,
    Leave,
    Help,
}

/// A parsed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Explicit `@session` target
    pub session: Option<String>,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Type a command, or `help`")]
    Empty,

    #[error("Unknown command `{0}`, try `help`")]
    Unknown(String),

    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("`{0}` is not a number")]
    InvalidNumber(String),

    #[error("Expected `on` or `off`, got `{0}`")]
    InvalidToggle(String),
}

/// Parse one input line
pub fn parse(line: &str) -> Result<Request, ParseError> {
    let mut rest = line.trim();

    let mut session = None;
    if let Some(stripped) = rest.strip_prefix('@') {
        let (name, tail) = stripped
            .split_once(char::is_whitespace)
            .unwrap_or((stripped, ""));
        if !name.is_empty() {
            session = Some(name.to_string());
        }
        rest = tail.trim_start();
    }

    let (word, args) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(w, a)| (w, a.trim()));

    let command = match word.to_lowercase().as_str() {
        "" => return Err(ParseError::Empty),
        "add" | "play" => {
            if args.is_empty() {
                return Err(ParseError::MissingArgument {
                    command: "add",
                    what: "a search term",
                });
            }
            Command::Add(args.to_string())
        }
        "next" | "skip" => Command::Next(optional_number(args, 1)?),
        "prev" | "back" => Command::Prev(optional_number(args, 1)?),
        "goto" => Command::GoTo(required_number("goto", args)?),
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "remove" | "rm" => Command::Remove(required_number("remove", args)?),
        "clear" => match args {
            "" => Command::Clear { all: false },
            "all" => Command::Clear { all: true },
            other => return Err(ParseError::Unknown(format!("clear {}", other))),
        },
        "reset" => Command::Reset,
        "list" | "ls" | "queue" => Command::List(optional_number(args, 0)?),
        "autoplay" => Command::Autoplay(match args {
            "" => None,
            "on" => Some(true),
            "off" => Some(false),
            other => return Err(ParseError::InvalidToggle(other.to_string())),
        }),
        "now" => Command::Now,
        "sessions" => Command::Sessions,
        "leave" => Command::Leave,
        "help" | "?" => Command::Help,
        other => return Err(ParseError::Unknown(other.to_string())),
    };

    Ok(Request { session, command })
}

fn optional_number(args: &str, default: usize) -> Result<usize, ParseError> {
    if args.is_empty() {
        return Ok(default);
    }
    args.parse()
        .map_err(|_| ParseError::InvalidNumber(args.to_string()))
}

fn required_number(command: &'static str, args: &str) -> Result<usize, ParseError> {
    if args.is_empty() {
        return Err(ParseError::MissingArgument {
            command,
            what: "a track number",
        });
    }
    optional_number(args, 0)
}

/// Routes requests to session players
pub struct Dispatcher {
    registry: Arc<PlayerRegistry>,
    resolver: Arc<dyn TrackResolver>,
    announcer: Option<Announcer>,
    default_session: String,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<PlayerRegistry>,
        resolver: Arc<dyn TrackResolver>,
        default_session: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            resolver,
            announcer: None,
            default_session: default_session.into(),
        }
    }

    /// Announce playback of every session this dispatcher creates
    pub fn with_announcer(mut self, announcer: Announcer) -> Self {
        self.announcer = Some(announcer);
        self
    }

    pub fn registry(&self) -> &Arc<PlayerRegistry> {
        &self.registry
    }

    /// Parse and run one line, returning the reply
    pub async fn handle_line(&self, line: &str) -> String {
        match parse(line) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => e.to_string(),
        }
    }

    pub async fn dispatch(&self, request: Request) -> String {
        let session = request
            .session
            .unwrap_or_else(|| self.default_session.clone());
        debug!(session = %session, command = ?request.command, "Dispatching");

        match request.command {
            Command::Help => HELP.to_string(),
            Command::Sessions => self.sessions().await,
            Command::Add(query) => self.add(&session, &query).await,
            command => match self.registry.get(&session).await {
                Some(player) => self.run(&session, player, command).await,
                None => match command {
                    Command::Remove(_) | Command::List(_) | Command::Leave => NO_SESSION,
                    _ => ADD_MUSIC_FIRST,
                }
                .to_string(),
            },
        }
    }

    async fn sessions(&self) -> String {
        if self.registry.is_empty().await {
            return "No sessions".to_string();
        }
        format!(
            "Sessions ({}): {}",
            self.registry.len().await,
            self.registry.keys().await.join(", ")
        )
    }

    async fn add(&self, session: &str, query: &str) -> String {
        let track = match self.resolver.search_one(query).await {
            Ok(track) => track,
            Err(e) => {
                debug!(query, error = %e, "Search failed");
                return format!("Cannot get result for: {}", query);
            }
        };

        let (player, created) = self.registry.ensure(session).await;
        if created {
            if let Some(announcer) = &self.announcer {
                announcer.watch(session, &player);
            }
        }

        let name = track.name.clone();
        match player.add(track).await {
            Ok(_) => format!("Added `{}`", name),
            Err(e) => {
                warn!(session, error = %e, "Cannot add track");
                format!("Cannot add `{}`: {}", name, e)
            }
        }
    }

    async fn run(&self, session: &str, player: Player, command: Command) -> String {
        match command {
            Command::Next(n) => match player.next(n).await {
                Ok(()) => position_reply(&player).await,
                Err(_) => "Cannot skip next".to_string(),
            },
            Command::Prev(n) => match player.prev(n).await {
                Ok(()) => position_reply(&player).await,
                Err(_) => "Cannot skip back".to_string(),
            },
            Command::GoTo(n) => {
                // Numbers past isize::MAX still mean "the end of the queue"
                let index = isize::try_from(n).map_or(isize::MAX, |n| n - 1);
                match player.go_to(index).await {
                    Ok(()) => position_reply(&player).await,
                    Err(_) => format!("Cannot skip to track #{}", n),
                }
            }
            Command::Pause => {
                if player.state().await != PlaybackState::Playing {
                    return "No music playing".to_string();
                }
                match player.pause().await {
                    Ok(()) => "Player paused".to_string(),
                    Err(_) => "Cannot pause".to_string(),
                }
            }
            Command::Resume => {
                if player.state().await != PlaybackState::Paused {
                    return "Music is now playing".to_string();
                }
                match player.resume().await {
                    Ok(()) => "Resuming player".to_string(),
                    Err(_) => "Cannot resume".to_string(),
                }
            }
            Command::Remove(n) => {
                let Some(index) = n.checked_sub(1) else {
                    return "Track not found".to_string();
                };
                match player.remove(index).await {
                    Ok(_) => format!("Removed track #{}", n),
                    Err(PlaybackError::CannotRemoveActiveTrack(_)) => {
                        "Cannot remove the playing track".to_string()
                    }
                    Err(PlaybackError::NotFound(_)) => "Track not found".to_string(),
                    Err(e) => e.to_string(),
                }
            }
            Command::Clear { all } => match player.clear(all).await {
                Ok(1) => "Cleared 1 track".to_string(),
                Ok(n) => format!("Cleared {} tracks", n),
                Err(e) => e.to_string(),
            },
            Command::Reset => match player.reset().await {
                Ok(()) => "Player is reset".to_string(),
                Err(e) => e.to_string(),
            },
            Command::List(page) => player.list(page, 0).await.to_string(),
            Command::Autoplay(Some(enabled)) => {
                player.set_auto_discover(enabled).await;
                format!("Auto-discovery {}", on_off(enabled))
            }
            Command::Autoplay(None) => {
                format!("Auto-discovery is {}", on_off(player.auto_discover().await))
            }
            Command::Now => now_reply(&player).await,
            Command::Leave => {
                self.registry.close(session).await;
                "Seeya!".to_string()
            }
            Command::Add(_) | Command::Help | Command::Sessions => HELP.to_string(),
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

async fn position_reply(player: &Player) -> String {
    let cursor = player.cursor().await;
    if cursor >= player.total_tracks().await {
        "End of queue".to_string()
    } else {
        format!("Skipped to track #{}", cursor + 1)
    }
}

async fn now_reply(player: &Player) -> String {
    let state = player.state().await;
    let Some(track) = player.current_track().await.filter(|_| state.is_active()) else {
        return "Nothing is playing".to_string();
    };

    let verb = if state == PlaybackState::Paused {
        "Paused"
    } else {
        "Playing"
    };
    format!(
        "{} `{}` ({}), track #{} of {}",
        verb,
        track.name,
        format_length(track.duration),
        player.cursor().await + 1,
        player.total_tracks().await
    )
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("default_session", &self.default_session)
            .finish_non_exhaustive()
    }
}
