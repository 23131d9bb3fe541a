use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tl_cli::commands::{parse, show, week};
use tl_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let today = Local::now().date_naive();
    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Show { from, to, view }) => {
            let config = load_config(cli.config.as_deref())?;
            show::run(
                &mut stdout,
                &config,
                today,
                from.as_deref(),
                to.as_deref(),
                view,
            )?;
        }
        Some(Commands::Parse { file, view }) => {
            // Parse works on its input alone and needs no log directory.
            parse::run(&mut stdout, file.as_deref(), std::io::stdin().lock(), view)?;
        }
        Some(Commands::Week { date }) => {
            let config = load_config(cli.config.as_deref())?;
            week::run(&mut stdout, &config, today, date)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
