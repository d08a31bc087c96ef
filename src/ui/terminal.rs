use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{self, Clear, ClearType},
};
use std::io::{self, Stdout, Write};
use tracing::debug;

use super::{Limits, Renderer, HELP, HINT};
use crate::catalog::ItemRef;
use crate::config::UiConfig;
use crate::view::View;

/// Line-oriented renderer: the list is redrawn from the top of the screen,
/// the last status and now-playing lines are kept and printed underneath it.
pub struct TerminalRenderer {
    out: Stdout,
    colour: bool,
    max_results: Option<usize>,
    status: Option<(String, bool)>,
    playing: String,
}

/// Shortens `text` to `width` characters, ending in `...` when cut.
pub fn truncate(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }
    let mut cut: String = text.chars().take(width - 3).collect();
    cut.push_str("...");
    cut
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", truncate(text, width), width = width)
}

fn now_playing_line(line: Option<&str>) -> String {
    format!("Now playing: {}", line.unwrap_or("None"))
}

/// Formats one numbered row to fit `width` columns.
pub fn format_row(number: usize, item: ItemRef<'_>, width: usize) -> String {
    let body = width.saturating_sub(6);
    let prefix = format!("{:>4}  ", number);
    match item {
        ItemRef::Song(song) => {
            let title_w = body * 2 / 5;
            let artist_w = body / 4;
            let album_w = body.saturating_sub(title_w + artist_w + 8);
            format!(
                "{}{} {} {} {}",
                prefix,
                pad(&song.title, title_w),
                pad(&song.artist_name, artist_w),
                pad(&song.album_name, album_w),
                song.time()
            )
        }
        ItemRef::Artist(artist) => format!("{}{}", prefix, truncate(&artist.name, body)),
        ItemRef::Album(album) => {
            let name_w = body * 2 / 5;
            format!(
                "{}{} {}",
                prefix,
                pad(&album.name, name_w),
                truncate(&album.artist_name, body.saturating_sub(name_w + 1))
            )
        }
    }
}

impl TerminalRenderer {
    pub fn new(config: &UiConfig) -> Self {
        Self {
            out: io::stdout(),
            colour: config.colour,
            max_results: config.max_results,
            status: None,
            playing: now_playing_line(None),
        }
    }

    fn width(&self) -> usize {
        terminal::size().map(|(cols, _)| usize::from(cols)).unwrap_or(80)
    }

    fn header(&mut self, title: &str) -> io::Result<()> {
        if self.colour {
            queue!(self.out, PrintStyledContent(title.bold().cyan()), Print("\r\n"))
        } else {
            queue!(self.out, Print(title), Print("\r\n"))
        }
    }

    fn draw_view(&mut self, view: Option<&View>) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;

        if let Some(view) = view {
            let width = self.width();
            let mut last_heading = None;
            for (number, item) in view.entries() {
                let heading = match item {
                    ItemRef::Song(_) => "Songs",
                    ItemRef::Artist(_) => "Artists",
                    ItemRef::Album(_) => "Albums",
                };
                if last_heading != Some(heading) {
                    self.header(heading)?;
                    last_heading = Some(heading);
                }
                queue!(self.out, Print(format_row(number, item, width)), Print("\r\n"))?;
            }
        }

        queue!(self.out, Print("\r\n"))?;
        if let Some((text, error)) = self.status.clone() {
            self.line(&text, error)?;
        }
        let playing = self.playing.clone();
        self.line(&playing, false)
    }

    fn draw_help(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        for line in HELP.lines() {
            queue!(self.out, Print(line), Print("\r\n"))?;
        }
        self.out.flush()
    }

    fn line(&mut self, text: &str, error: bool) -> io::Result<()> {
        let text = truncate(text, self.width().saturating_sub(1));
        if error && self.colour {
            queue!(self.out, PrintStyledContent(text.red()), Print("\r\n"))?;
        } else {
            queue!(self.out, Print(text), Print("\r\n"))?;
        }
        self.out.flush()
    }
}

impl Renderer for TerminalRenderer {
    fn display(&mut self, view: Option<&View>) {
        if let Err(e) = self.draw_view(view) {
            debug!("Failed to draw view: {}", e);
        }
    }

    fn now_playing(&mut self, line: Option<&str>) {
        self.playing = now_playing_line(line);
        let text = self.playing.clone();
        if let Err(e) = self.line(&text, false) {
            debug!("Failed to draw now playing: {}", e);
        }
    }

    fn message(&mut self, msg: &str) {
        self.status = Some((msg.to_string(), false));
        if let Err(e) = self.line(msg, false) {
            debug!("Failed to draw message: {}", e);
        }
    }

    fn error(&mut self, msg: &str) {
        self.status = Some((msg.to_string(), true));
        if let Err(e) = self.line(msg, true) {
            debug!("Failed to draw error: {}", e);
        }
    }

    fn help(&mut self) {
        if let Err(e) = self.draw_help() {
            debug!("Failed to draw help: {}", e);
        }
    }

    fn hint(&mut self) {
        self.message(HINT);
    }

    fn limits(&self) -> Limits {
        match terminal::size() {
            Ok((_, rows)) => Limits::from_rows(rows).capped(self.max_results),
            Err(_) => Limits::UNBOUNDED.capped(self.max_results),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{album, artist, song};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("this is far too long", 10), "this is...");
        assert_eq!(truncate("abcdef", 2), "..");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_format_row_fits_width() {
        let s = song("s1", "A Rather Long Song Title That Goes On");
        let row = format_row(12, ItemRef::Song(&s), 80);
        assert!(row.starts_with("  12  "));
        assert!(row.ends_with("03:20"));
        assert!(row.chars().count() <= 80);

        let ar = artist("ar1", "Band");
        assert_eq!(format_row(3, ItemRef::Artist(&ar), 80), "   3  Band");

        let al = album("al1", "Record", "ar1", "Band");
        let row = format_row(4, ItemRef::Album(&al), 80);
        assert!(row.starts_with("   4  Record"));
        assert!(row.ends_with("Band"));
    }

    #[test]
    fn test_now_playing_line() {
        assert_eq!(now_playing_line(None), "Now playing: None");
        assert_eq!(
            now_playing_line(Some("(1/2) One - Artist - Album (03:20)")),
            "Now playing: (1/2) One - Artist - Album (03:20)"
        );
    }
}
