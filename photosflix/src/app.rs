use anyhow::Result;
use photos_api::{rendition, MediaItem, PhotosApiError};
use photos_auth::SignInOptions;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{Command, ShellLine};
use crate::library::Library;
use crate::session::SessionState;
use crate::slideshow::Slideshow;
use clap::Parser;

pub struct App<W: Write> {
    library: Library,
    session: SessionState,
    force_consent: bool,
    out: W,
}

impl<W: Write> App<W> {
    pub fn new(library: Library, session: SessionState, out: W) -> Self {
        Self {
            library,
            session,
            force_consent: false,
            out,
        }
    }

    pub fn force_consent(mut self, force_consent: bool) -> Self {
        self.force_consent = force_consent;
        self
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// One-shot invocation: signs in first when live data is needed.
    pub async fn run(&mut self, command: Command) -> Result<()> {
        if command.needs_data() && self.library.has_live_api() && !self.library.is_live() {
            self.execute(Command::SignIn).await?;
        }
        self.execute(command).await
    }

    pub async fn execute(&mut self, command: Command) -> Result<()> {
        tracing::debug!(?command, "Executing command");
        match command {
            Command::Albums => self.list_albums().await,
            Command::Items { album_id } => self.list_items(&album_id).await,
            Command::Play {
                album_id,
                interval_secs,
                count,
            } => {
                self.play(&album_id, Duration::from_secs(interval_secs), count)
                    .await
            }
            Command::Favorite { album_id } => {
                let favorite = self.session.toggle_favorite(&album_id).await?;
                let verb = if favorite { "Added to" } else { "Removed from" };
                writeln!(self.out, "{} my list: {}", verb, album_id)?;
                Ok(())
            }
            Command::MyList => {
                if self.session.favorites().is_empty() {
                    writeln!(self.out, "My list is empty")?;
                }
                for album_id in self.session.favorites() {
                    writeln!(self.out, "{}", album_id)?;
                }
                Ok(())
            }
            Command::SignIn => {
                let options = SignInOptions {
                    force_consent: self.force_consent,
                };
                let token = self.library.sign_in(options).await?;
                writeln!(
                    self.out,
                    "Signed in (token valid until {})",
                    token.expires_at().format("%H:%M")
                )?;
                Ok(())
            }
            Command::SignOut => {
                self.library.sign_out().await;
                writeln!(self.out, "Signed out.")?;
                Ok(())
            }
            Command::Shell => anyhow::bail!("Already in the interactive shell"),
        }
    }

    /// Reads commands line by line until EOF or `quit`. Command failures
    /// are reported and the session continues.
    pub async fn shell<R>(&mut self, input: R) -> Result<()>
    where
        R: tokio::io::AsyncRead + Unpin,
    {
        let mut lines = BufReader::new(input).lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if matches!(line, "quit" | "exit") {
                break;
            }

            match ShellLine::try_parse_from(line.split_whitespace()) {
                Ok(parsed) => {
                    if let Err(e) = self.execute(parsed.command).await {
                        self.report(&e)?;
                    }
                }
                Err(e) => writeln!(self.out, "{}", e.render())?,
            }
        }
        Ok(())
    }

    pub fn report(&mut self, error: &anyhow::Error) -> Result<()> {
        writeln!(self.out, "Error: {}", error)?;
        if let Some(remedy) = error
            .downcast_ref::<PhotosApiError>()
            .and_then(PhotosApiError::remedy)
        {
            writeln!(self.out, "{}", remedy)?;
        }
        Ok(())
    }

    async fn list_albums(&mut self) -> Result<()> {
        let albums = self.library.albums().await?;
        let source = if self.library.is_live() { "live" } else { "demo" };
        writeln!(self.out, "{} albums ({})", albums.len(), source)?;

        for album in &albums {
            let marker = if self.session.is_favorite(&album.id) { "*" } else { " " };
            writeln!(
                self.out,
                "{} {:<12} {:<32} {:>5} items",
                marker, album.id, album.title, album.item_count
            )?;
        }
        Ok(())
    }

    async fn list_items(&mut self, album_id: &str) -> Result<()> {
        let live = self.library.is_live();
        let items = self.library.album_items(album_id).await?;
        writeln!(self.out, "{} items in {}", items.len(), album_id)?;

        for item in items {
            writeln!(
                self.out,
                "{:<24} {}x{} {} {}",
                item.id,
                item.width,
                item.height,
                item.mime_type,
                display_url(item, live)
            )?;
        }
        Ok(())
    }

    async fn play(&mut self, album_id: &str, interval: Duration, count: Option<usize>) -> Result<()> {
        let live = self.library.is_live();
        let items = self.library.album_items(album_id).await?.to_vec();
        let start = self.session.resume_index(album_id).unwrap_or(0);
        let mut show = Slideshow::new(items, start);
        if show.is_empty() {
            writeln!(self.out, "Album {} is empty", album_id)?;
            return Ok(());
        }

        let frames = count.unwrap_or(show.len());
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        for frame in 0..frames {
            ticker.tick().await;
            if frame > 0 {
                show.next();
            }
            if let Some(item) = show.current() {
                writeln!(
                    self.out,
                    "[{}/{}] {}",
                    show.position() + 1,
                    show.len(),
                    display_url(item, live)
                )?;
            }
            self.session.set_resume(album_id, show.position()).await?;
        }
        Ok(())
    }
}

fn display_url(item: &MediaItem, live: bool) -> String {
    if live {
        rendition::PLAYER.url(&item.base_url)
    } else {
        item.base_url.clone()
    }
}
