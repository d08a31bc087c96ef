use std::fmt;

/// A command token the dispatcher understands. Every command has a long form
/// and a one-letter alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Search,
    Expand,
    Play,
    Queue,
    Write,
    Restore,
    Help,
}

impl Command {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "search" | "s" => Some(Command::Search),
            "expand" | "e" => Some(Command::Expand),
            "play" | "p" => Some(Command::Play),
            "queue" | "q" => Some(Command::Queue),
            "write" | "w" => Some(Command::Write),
            "restore" | "r" => Some(Command::Restore),
            "help" | "h" => Some(Command::Help),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Search => "search",
            Command::Expand => "expand",
            Command::Play => "play",
            Command::Queue => "queue",
            Command::Write => "write",
            Command::Restore => "restore",
            Command::Help => "help",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits a line into the command token and the rest, both trimmed.
/// The rest is kept whole; only `queue` splits it any further.
pub fn split(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim()),
        None => (input, ""),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayArg {
    Queue,
    Shuffle,
    Item(String),
}

impl PlayArg {
    pub fn parse(arg: &str) -> Self {
        match arg {
            "" => PlayArg::Queue,
            "s" => PlayArg::Shuffle,
            other => PlayArg::Item(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueArg {
    Show,
    Clear,
    Items(Vec<String>),
}

impl QueueArg {
    pub fn parse(arg: &str) -> Self {
        match arg {
            "" => QueueArg::Show,
            "c" => QueueArg::Clear,
            other => QueueArg::Items(other.split_whitespace().map(str::to_string).collect()),
        }
    }
}
