use anyhow::Result;
use clap::Parser;

use photosflix::cli::{Cli, Command};
use photosflix::library::Library;
use photosflix::session::SessionState;
use photosflix::settings::Settings;
use photosflix::{logging, App};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::new()?;
    if cli.demo {
        settings.use_live_api = false;
    }
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

    let log_path = logging::init_logging()?;
    tracing::info!(log = %log_path.display(), "Photosflix starting");

    let library = Library::from_settings(&settings);
    let session = SessionState::open_default().await?;
    let mut app = App::new(library, session, std::io::stdout()).force_consent(cli.force_consent);

    let result = match cli.command {
        Command::Shell => app.shell(tokio::io::stdin()).await,
        command => app.run(command).await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {:#}", e);
        app.report(&e)?;
        std::process::exit(1);
    }
    Ok(())
}
