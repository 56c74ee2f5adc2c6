use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Browse your photo albums like a streaming catalog", long_about = None)]
pub struct Cli {
    /// Use the demo catalog even when the live API is configured
    #[arg(long, global = true)]
    pub demo: bool,

    /// Show the provider's consent screen even if access was granted before
    #[arg(long, global = true)]
    pub force_consent: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List albums
    Albums,
    /// List the items of an album
    Items { album_id: String },
    /// Run the slideshow of an album from where it was left
    Play {
        album_id: String,
        /// Seconds between slides
        #[arg(long, default_value_t = 5)]
        interval_secs: u64,
        /// Stop after this many slides (default: one pass)
        #[arg(long)]
        count: Option<usize>,
    },
    /// Add or remove an album from my list
    Favorite { album_id: String },
    /// Show my list
    MyList,
    /// Sign in to the photo library
    SignIn,
    /// Revoke access and fall back to the demo catalog
    SignOut,
    /// Interactive session reading commands from stdin
    Shell,
}

impl Command {
    pub fn needs_data(&self) -> bool {
        matches!(
            self,
            Command::Albums | Command::Items { .. } | Command::Play { .. }
        )
    }
}

/// One line typed in the interactive shell.
#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}
