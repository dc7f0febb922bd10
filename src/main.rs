// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, build the configuration and the real
//   toolkit, then hand everything to the session loop.
// - Returns `anyhow::Result` so a failed startup exits non-zero with a
//   readable message.

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use vocab_card::config::Config;
use vocab_card::error::Error;
use vocab_card::session::run_session;
use vocab_card::toolkit::Live;
use vocab_card::ui::Terminal;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr and stay quiet unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env();
    let mut toolkit = Live::new(&config).context("Failed to build HTTP client")?;

    // Blocks until the user quits.
    match run_session(&config, &mut Terminal, &mut toolkit) {
        Err(e @ Error::Startup(_)) => Err(anyhow::Error::new(e).context(format!(
            "Cannot reach AnkiConnect at {}. Is Anki running?",
            config.anki_url
        ))),
        other => Ok(other?),
    }
}
