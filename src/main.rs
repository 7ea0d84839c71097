use clap::Parser;
use git_deck::commands::{execute, Commands, Response};
use git_deck::core::{config::ServiceConfig, error::Result};
use git_deck::ops::GitService;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-deck")]
#[command(about = "Manage a registry of git working copies and run git operations against them")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Directory holding repositories.json, settings.json and config.json
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Registered repository id for per-repository commands
    #[arg(short, long, global = true, value_name = "ID")]
    repo: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(debug: bool) {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn open_service(data_dir: Option<PathBuf>) -> Result<GitService> {
    let config = match data_dir {
        Some(dir) => ServiceConfig::load(&dir)?,
        None => ServiceConfig::load_default()?,
    };
    GitService::open(config)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let response = match open_service(cli.data_dir) {
        Ok(service) => execute(&service, cli.repo.as_deref(), cli.command),
        Err(e) => Response::failure(&e),
    };

    response.print();
    std::process::exit(response.exit_code());
}
