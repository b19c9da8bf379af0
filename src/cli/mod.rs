pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    editor::console::ConsoleUi,
    store::progress_store::JsonProgressStore,
    tracker::{challenge::Bonus, run_tracker},
    utils::{
        clock::{Clock, DefaultClock},
        logging::{enable_logging, CLI_PREFIX, TRACK_PREFIX},
        paths,
    },
};

#[derive(Parser, Debug)]
#[command(name = "penpace", version, long_about = None)]
#[command(about = "Daily writing-goal tracker that sits behind your editor", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        short = 'C',
        long,
        default_value = ".",
        help = "Project root to operate on. Progress lives in <project>/.penpace"
    )]
    project: PathBuf,
    #[arg(long, help = "Copy logs to stderr")]
    log: bool,
    #[arg(long, help = "Log level for the file log, overrides RUST_LOG")]
    log_filter: Option<LevelFilter>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Pick a challenge preset or a custom daily goal")]
    StartChallenge,
    #[command(about = "Show the challenge, totals and per-day history")]
    ShowStats,
    #[command(about = "Print the current status line once and exit")]
    Status,
    #[command(about = "Zero today's count, keeping the challenge and history")]
    ResetToday,
    #[command(about = "Discard the challenge, all counts and the history")]
    ResetAll,
    #[command(about = "Stop counting changes until resume")]
    Pause,
    #[command(about = "Start counting changes again")]
    Resume,
    #[command(about = "Subtract characters that shouldn't have counted")]
    CorrectCount,
    #[command(about = "Credit a revision session against a large goal")]
    AddRevisionTime,
    #[command(about = "Credit a finished citation against a large goal")]
    AddCitation,
    #[command(about = "Read editor events from stdin and push status updates to stdout")]
    Track,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let prefix = if matches!(args.commands, Commands::Track) {
        TRACK_PREFIX
    } else {
        CLI_PREFIX
    };
    let log_level = args
        .log_filter
        .or_else(|| args.log.then_some(LevelFilter::TRACE));
    enable_logging(prefix, &paths::logs_path(&args.project), log_level, args.log)?;

    let store = JsonProgressStore::new(&args.project);
    let mut ui = ConsoleUi::terminal();
    let today = DefaultClock.today();

    match args.commands {
        Commands::StartChallenge => commands::start_challenge(&store, &mut ui, today).await,
        Commands::ShowStats => {
            commands::show_stats(&store, &mut ui, &paths::project_name(&args.project), today).await
        }
        Commands::Status => commands::print_status(&store, &mut ui, today).await,
        Commands::ResetToday => commands::reset_today(&store, &mut ui, today).await,
        Commands::ResetAll => commands::reset_all(&store, &mut ui, today).await,
        Commands::Pause => commands::set_paused(&store, &mut ui, today, true).await,
        Commands::Resume => commands::set_paused(&store, &mut ui, today, false).await,
        Commands::CorrectCount => commands::correct_count(&store, &mut ui, today).await,
        Commands::AddRevisionTime => {
            commands::add_bonus(&store, &mut ui, today, Bonus::RevisionTime).await
        }
        Commands::AddCitation => commands::add_bonus(&store, &mut ui, today, Bonus::Citation).await,
        Commands::Track => run_tracker(&args.project).await,
    }
}
