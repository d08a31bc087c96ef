// Terminal output - the face of tunepipe
// The session only talks to `Renderer`, so tests can record what would
// have been drawn and the real thing can live in `terminal`.

mod terminal;

pub use terminal::TerminalRenderer;

use crate::view::View;

pub const HELP: &str = "\
Commands:
s/search search-term: Search for search-term
e/expand 123: Expand item number 123
p/play: Play the current queue
p/play s: Shuffle and play the current queue
p/play 123: Play item number 123
q/queue: Show the current queue
q/queue 123: Add item number 123 to the queue
q/queue 1 2 3: Add items 1, 2, and 3 to the queue
q/queue c: Clear the current queue
w/write playlist-name: Write current queue to playlist playlist-name
r/restore playlist-name: Replace the current queue with a playlist
h/help: Show this help message
Ctrl-D: Exit tunepipe";

pub const HINT: &str = "Enter 'h' or 'help' if you need help.";

/// How many items of each kind fit on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Per category, for search results
    pub search: usize,
    /// Songs and albums in a drill-down view
    pub expand: usize,
    /// Songs shown by `queue`
    pub queue: usize,
}

impl Limits {
    /// When there is no terminal to measure.
    pub const UNBOUNDED: Limits = Limits {
        search: 50,
        expand: usize::MAX,
        queue: usize::MAX,
    };

    /// Derives limits from the terminal height. Three rows are taken by the
    /// message, now-playing and input lines; each category has a header row.
    pub fn from_rows(rows: u16) -> Self {
        let main = usize::from(rows).saturating_sub(3);
        Self {
            search: (main.saturating_sub(3) / 3).max(1),
            expand: (main.saturating_sub(9) / 2).max(1),
            queue: main.saturating_sub(2).max(1),
        }
    }

    pub fn capped(self, max: Option<usize>) -> Self {
        match max {
            Some(max) => Self {
                search: self.search.min(max),
                expand: self.expand.min(max),
                queue: self.queue.min(max),
            },
            None => self,
        }
    }
}

pub trait Renderer {
    /// Redraw the main list. `None` means there is nothing addressable.
    fn display(&mut self, view: Option<&View>);

    /// `None` renders the idle state.
    fn now_playing(&mut self, line: Option<&str>);

    fn message(&mut self, msg: &str);

    fn error(&mut self, msg: &str);

    fn help(&mut self);

    /// Shown before the prompt when no view is present.
    fn hint(&mut self);

    fn limits(&self) -> Limits;
}
