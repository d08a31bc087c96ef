// Session - one user at one prompt
// Owns the catalog, the player, the screen, the current View and the Queue.
// Each line of input is one `transition`; nothing happens in between.

pub mod command;
pub mod error;

pub use command::{Command, PlayArg, QueueArg};
pub use error::SessionError;

use tracing::{debug, info, warn};

use crate::catalog::{CatalogClient, CatalogItem, ItemKind};
use crate::playback::{NowPlaying, PlaybackCoordinator, Player};
use crate::queue::{PlaylistStore, Queue, QueueError};
use crate::ui::Renderer;
use crate::view::View;

fn song_count(count: usize) -> String {
    if count == 1 {
        "1 song".to_string()
    } else {
        format!("{} songs", count)
    }
}

pub struct Session<C, P, R> {
    catalog: C,
    player: P,
    renderer: R,
    store: PlaylistStore,
    now_playing: NowPlaying,
    view: Option<View>,
    queue: Queue,
    last_ok: bool,
}

impl<C, P, R> Session<C, P, R>
where
    C: CatalogClient,
    P: Player,
    R: Renderer,
{
    pub fn new(catalog: C, player: P, renderer: R, store: PlaylistStore, now_playing: NowPlaying) -> Self {
        Self {
            catalog,
            player,
            renderer,
            store,
            now_playing,
            view: None,
            queue: Queue::new(),
            last_ok: true,
        }
    }

    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Whether the last command went through. After a failure the error
    /// stays on the status line instead of the hint.
    pub fn last_ok(&self) -> bool {
        self.last_ok
    }

    /// Draws the starting screen.
    pub fn start(&mut self) {
        self.renderer.display(None);
        self.renderer.now_playing(None);
    }

    /// Called before every prompt. Without a context to pick from, points
    /// at `help`, unless an error is showing.
    pub fn before_prompt(&mut self) {
        if self.last_ok && self.view.as_ref().map_or(true, View::is_empty) {
            self.renderer.hint();
        }
    }

    /// Runs one line of input. Errors are rendered, never returned: the
    /// loop always goes on.
    pub async fn transition(&mut self, input: &str) {
        let (token, arg) = command::split(input);
        if token.is_empty() {
            return;
        }

        let result = match Command::parse(token) {
            Some(command) => {
                debug!(%command, arg, "Dispatching");
                self.dispatch(command, arg).await
            }
            None => Err(SessionError::UnknownCommand(token.to_string())),
        };

        self.last_ok = match result {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "Command failed");
                self.renderer.error(&e.to_string());
                false
            }
        };
    }

    async fn dispatch(&mut self, command: Command, arg: &str) -> Result<(), SessionError> {
        match command {
            Command::Search => self.search(arg).await,
            Command::Expand => self.expand(arg).await,
            Command::Play => match PlayArg::parse(arg) {
                PlayArg::Queue => self.play_queue(false).await,
                PlayArg::Shuffle => self.play_queue(true).await,
                PlayArg::Item(number) => self.play_item(&number).await,
            },
            Command::Queue => match QueueArg::parse(arg) {
                QueueArg::Show => self.show_queue(),
                QueueArg::Clear => {
                    self.queue.clear();
                    self.renderer.message("Cleared queue.");
                    Ok(())
                }
                QueueArg::Items(numbers) => self.enqueue(&numbers).await,
            },
            Command::Write => self.write(arg),
            Command::Restore => self.restore(arg),
            Command::Help => {
                self.view = None;
                self.renderer.help();
                Ok(())
            }
        }
    }

    fn set_view(&mut self, view: View) {
        match self.view.as_mut() {
            Some(current) => current.replace(view),
            None => self.view = Some(view),
        }
        self.renderer.display(self.view.as_ref());
    }

    /// The current view, if it has anything to address.
    fn context(&self, command: Command) -> Result<&View, SessionError> {
        self.view
            .as_ref()
            .filter(|view| !view.is_empty())
            .ok_or(SessionError::WrongContext(command))
    }

    fn number(&self, command: Command, arg: &str) -> Result<usize, SessionError> {
        let view = self.context(command)?;
        let number: usize = arg.parse().map_err(|_| SessionError::InvalidArgument(command))?;
        if number == 0 || number > view.total() {
            return Err(SessionError::OutOfRange { total: view.total() });
        }
        Ok(number)
    }

    fn resolve(&self, command: Command, arg: &str) -> Result<CatalogItem, SessionError> {
        let number = self.number(command, arg)?;
        let view = self.context(command)?;
        view.resolve(number).ok_or(SessionError::OutOfRange { total: view.total() })
    }

    async fn fill(&self, item: &CatalogItem, limit: usize) -> Result<CatalogItem, SessionError> {
        item.fill(&self.catalog, limit).await.map_err(|source| {
            warn!(kind = %item.kind(), id = item.id(), error = %source, "Lookup failed");
            SessionError::Lookup {
                name: item.name().to_string(),
                source,
            }
        })
    }

    async fn search(&mut self, query: &str) -> Result<(), SessionError> {
        if query.is_empty() {
            return Err(SessionError::MissingQuery);
        }

        let limit = self.renderer.limits().search;
        let hits = self.catalog.search(query, limit).await.map_err(|e| {
            warn!(query, error = %e, "Search failed");
            SessionError::Search(e)
        })?;

        if hits.is_empty() {
            self.renderer.message("Search returned 0 results.");
            return Ok(());
        }

        let view = View::from_hits(hits, limit);
        let total = view.total();
        info!(query, total, "Search");
        self.set_view(view);
        self.renderer.message(&format!("Search returned {} results.", total));
        Ok(())
    }

    async fn expand(&mut self, arg: &str) -> Result<(), SessionError> {
        if arg.is_empty() {
            return Err(SessionError::MissingArgument(Command::Expand));
        }

        let item = self.resolve(Command::Expand, arg)?;
        let limit = self.renderer.limits().expand;
        let full = self.fill(&item, limit).await?;
        self.set_view(full.collect(limit));
        Ok(())
    }

    async fn play_item(&mut self, arg: &str) -> Result<(), SessionError> {
        let item = self.resolve(Command::Play, arg)?;
        let limit = self.renderer.limits().expand;
        let full = self.fill(&item, limit).await?;

        let songs = full.songs();
        if songs.is_empty() {
            return Err(SessionError::NothingToPlay(full.name().to_string()));
        }

        info!(kind = %full.kind(), id = full.id(), songs = songs.len(), "Playing item");
        // Only a queue keeps what was left unplayed
        PlaybackCoordinator::new(&self.catalog, &mut self.player, &mut self.renderer, &self.now_playing)
            .play(&songs)
            .await;

        self.renderer.display(self.view.as_ref());
        Ok(())
    }

    async fn play_queue(&mut self, shuffle: bool) -> Result<(), SessionError> {
        if self.queue.is_empty() {
            return Err(SessionError::EmptyQueue);
        }
        if shuffle {
            self.queue.shuffle();
        }

        let mut coordinator =
            PlaybackCoordinator::new(&self.catalog, &mut self.player, &mut self.renderer, &self.now_playing);
        let remainder = self.queue.play(&mut coordinator).await;

        self.renderer.display(self.view.as_ref());
        if remainder.is_some() {
            let left = song_count(self.queue.len());
            self.renderer.message(&format!("Stopped, {} left in the queue.", left));
        }
        Ok(())
    }

    fn show_queue(&mut self) -> Result<(), SessionError> {
        if self.queue.is_empty() {
            return Err(SessionError::EmptyQueue);
        }
        let view = self.queue.collect(self.renderer.limits().queue);
        self.set_view(view);
        Ok(())
    }

    /// Queues every numbered item or none of them.
    async fn enqueue(&mut self, args: &[String]) -> Result<(), SessionError> {
        let mut numbers = Vec::with_capacity(args.len());
        for arg in args {
            numbers.push(self.number(Command::Queue, arg)?);
        }

        let view = self.context(Command::Queue)?;
        if numbers.iter().any(|&n| view.kind_of(n) == Some(ItemKind::Artist)) {
            return Err(QueueError::NotQueueable.into());
        }
        let items: Vec<CatalogItem> = numbers.iter().filter_map(|&n| view.resolve(n)).collect();

        let limit = self.renderer.limits().expand;
        let mut filled = Vec::with_capacity(items.len());
        for item in &items {
            filled.push(self.fill(item, limit).await?);
        }

        let added = self.queue.extend(&filled)?;
        info!(added, total = self.queue.len(), "Queued");
        self.renderer.message(&format!("Added {} to the queue.", song_count(added)));
        Ok(())
    }

    fn write(&mut self, name: &str) -> Result<(), SessionError> {
        if name.is_empty() {
            return Err(SessionError::MissingArgument(Command::Write));
        }
        if self.queue.is_empty() {
            return Err(SessionError::NothingToWrite);
        }

        self.store.write(name, &self.queue)?;
        self.renderer.message(&format!("Wrote queue to {}.", name));
        Ok(())
    }

    fn restore(&mut self, name: &str) -> Result<(), SessionError> {
        if name.is_empty() {
            return Err(SessionError::MissingArgument(Command::Restore));
        }

        let restored = self.store.read(name)?;
        let count = restored.len();
        self.queue.restore(restored);
        self.renderer.message(&format!("Restored {} from playlist.", song_count(count)));
        Ok(())
    }
}
