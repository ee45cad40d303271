mod cli;
mod engine;
mod logging;
mod model;
mod orchestrator;
mod render;
mod speed;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_interactive = args.is_interactive();

    let target = if is_interactive {
        logging::LogTarget::File(args.log_file.clone().unwrap_or_else(logging::default_log_path))
    } else {
        logging::LogTarget::Stderr
    };
    logging::init(target)?;
    tracing::debug!(?args, "starting");

    match cli::run(args).await {
        Ok(()) => {
            // Explicitly exit for non-TUI modes so the Ctrl-C listener cannot hold the runtime.
            if !is_interactive {
                std::process::exit(0);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "exiting with error");
            Err(e)
        }
    }
}
