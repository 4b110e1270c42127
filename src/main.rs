use anyhow::Result;
use clap::{Parser, Subcommand};

use ritual::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "ritual")]
#[command(about = "Habit and resolution tracking with streaks and category XP")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file with defaults
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Define a new habit
    Add {
        /// Habit name
        name: String,

        /// Category: body, mind, craft, social or spirit
        #[arg(long)]
        category: String,

        /// Tracking mode: binary, duration or count
        #[arg(long, default_value = "binary")]
        mode: String,

        /// Minutes for duration habits, repetitions for count habits
        #[arg(long)]
        target: Option<u32>,

        /// Due only on these weekdays, e.g. mon,wed,fri
        #[arg(long, value_delimiter = ',')]
        days: Option<Vec<String>>,

        /// Due Monday through Friday
        #[arg(long)]
        weekdays: bool,

        /// Due Saturday and Sunday
        #[arg(long)]
        weekends: bool,

        /// Target completions per week (due every day)
        #[arg(long)]
        per_week: Option<u8>,
    },

    /// Record progress for a habit
    Log {
        /// Habit name or id prefix
        habit: String,

        /// 1/0 for binary, minutes for duration, repetitions for count
        value: Option<f64>,

        /// Log for a day other than today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show today's due habits and the global streak
    Today {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List habits with their streaks
    Habits {
        /// Include archived habits
        #[arg(long)]
        all: bool,
    },

    /// Show lifetime XP and the trailing daily window
    Stats {
        /// Restrict to one category
        #[arg(long)]
        category: Option<String>,

        /// Window length in days
        #[arg(long, default_value_t = 7)]
        days: u32,
    },

    /// Archive a habit (kept in history, no longer due)
    Archive {
        /// Habit name or id prefix
        habit: String,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match args.command {
        // Init writes the config file, so it runs before loading one
        Commands::Init { force } => cli::init::init_command(force),
        command => {
            let config = Config::load()?;
            run_command(&config, command)
        }
    }
}

fn run_command(config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Init { .. } => unreachable!("handled in main"),
        Commands::Add {
            name,
            category,
            mode,
            target,
            days,
            weekdays,
            weekends,
            per_week,
        } => cli::add::add_command(
            config,
            &name,
            &category,
            &mode,
            target,
            cli::add::ScheduleArgs {
                days,
                weekdays,
                weekends,
                per_week,
            },
        ),
        Commands::Log { habit, value, date } => cli::log::log_command(config, &habit, value, date),
        Commands::Today { json } => cli::today::today_command(config, json),
        Commands::Habits { all } => cli::habits::habits_command(config, all),
        Commands::Stats { category, days } => cli::stats::stats_command(config, category, days),
        Commands::Archive { habit } => cli::archive::archive_command(config, &habit),
    }
}
