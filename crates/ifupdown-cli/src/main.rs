//! ifupdown interfaces CLI (ifupctl)

use anyhow::Result;
use clap::Parser;
use ifupctl::cli::{Cli, Commands};
use ifupctl::commands::{JsonToIfupCommand, ParseMultiCommand, ParseSingleCommand};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let pretty = !cli.compact;
    let result = match &cli.command {
        Commands::ParseSingle { file } => {
            ParseSingleCommand::new(pretty)
                .execute(file.as_deref())
                .await
        }
        Commands::ParseMulti { file } => {
            ParseMultiCommand::new(pretty)
                .execute(file.as_deref())
                .await
        }
        Commands::JsonToIfup { file } => JsonToIfupCommand::new().execute(file.as_deref()).await,
    };

    // Handle errors with appropriate exit codes
    match result {
        Ok(()) => {
            log::info!("Command completed successfully");
            std::process::exit(0);
        }
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);

                if cli.verbose || cli.debug {
                    let mut source = e.source();
                    while let Some(err) = source {
                        eprintln!("  Caused by: {}", err);
                        source = err.source();
                    }
                }
            }
            std::process::exit(1);
        }
    }
}
