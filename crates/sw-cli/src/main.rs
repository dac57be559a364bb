//! Command-line frontend for the Streetwise life-sim core.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sw",
    about = "Streetwise: a turn-based life in a city that does not care",
    version,
    propagate_version = true
)]
struct Cli {
    /// Content tables as JSON (default: built-in content)
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output formats shared by the listing commands.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Aligned table
    Table,
    /// JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new game and show where you stand
    New {
        /// Player name
        #[arg(short, long, default_value = "Rook")]
        name: String,

        /// Starting district id
        #[arg(short, long, default_value = "midlands")]
        district: String,

        /// RNG seed (a number, or any text to hash)
        #[arg(short, long)]
        seed: Option<String>,

        /// Save the new game as a JSON snapshot
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Advance a fresh game month by month
    Simulate {
        /// Number of months to advance
        #[arg(short, long, default_value = "12")]
        months: u32,

        /// RNG seed (a number, or any text to hash)
        #[arg(short, long, default_value = "42")]
        seed: String,

        /// Play every story by taking its first choice
        #[arg(long)]
        auto: bool,

        /// Print every log line, not just the summary
        #[arg(short, long)]
        verbose: bool,
    },

    /// Find the shortest route between two districts
    Route {
        /// District to start from
        from: String,

        /// District to reach
        to: String,
    },

    /// Generate NPCs
    Npc {
        /// How many to generate
        #[arg(short = 'n', long, default_value = "5")]
        count: usize,

        /// Only use this template
        #[arg(short, long)]
        template: Option<String>,

        /// Place every NPC in this district
        #[arg(short, long)]
        district: Option<String>,

        /// RNG seed (a number, or any text to hash)
        #[arg(short, long)]
        seed: Option<String>,

        /// Allow hand-authored characters, with this chance per slot
        #[arg(long)]
        uniques: Option<f64>,

        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
    },

    /// Roll a job board
    Jobs {
        /// Month the postings are for
        #[arg(short, long, default_value = "0")]
        month: u32,

        /// Maximum number of postings
        #[arg(long, default_value = "5")]
        max: usize,

        /// RNG seed (a number, or any text to hash)
        #[arg(short, long)]
        seed: Option<String>,

        #[arg(short, long, value_enum, default_value = "table")]
        format: Format,
    },

    /// Play a compiled story script through the narrative bridge
    Story {
        /// Story script (JSON)
        file: PathBuf,

        /// Knot to start in
        #[arg(short, long)]
        knot: Option<String>,

        /// Choices to take in order, 1-based (e.g. --pick 1,2)
        #[arg(short, long, value_delimiter = ',')]
        pick: Vec<usize>,

        /// RNG seed (a number, or any text to hash)
        #[arg(short, long)]
        seed: Option<String>,
    },

    /// Export a game's journal
    Export {
        /// Output format: markdown, text, json
        #[arg(default_value = "markdown")]
        format: String,

        /// Snapshot to export (default: simulate a fresh game)
        #[arg(short, long)]
        load: Option<PathBuf>,

        /// Months to simulate when no snapshot is given
        #[arg(short, long, default_value = "3")]
        months: u32,

        /// RNG seed for the simulated game
        #[arg(short, long, default_value = "42")]
        seed: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Play interactively
    Play {
        /// Player name
        #[arg(short, long, default_value = "Rook")]
        name: String,

        /// RNG seed (a number, or any text to hash)
        #[arg(short, long)]
        seed: Option<String>,

        /// Resume from a snapshot
        #[arg(short, long)]
        load: Option<PathBuf>,

        /// Directory of story scripts (JSON) for the `story` command
        #[arg(long)]
        stories: Option<PathBuf>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = commands::load_content(cli.content.as_deref()).and_then(|content| match cli.command {
        Commands::New {
            name,
            district,
            seed,
            output,
        } => {
            let config = commands::game_config(seed.as_deref(), &name).with_start_district(district);
            commands::new::run(content, config, output.as_deref())
        }
        Commands::Simulate {
            months,
            seed,
            auto,
            verbose,
        } => {
            let config = commands::game_config(Some(&seed), "Rook");
            commands::simulate::run(content, config, months, auto, verbose)
        }
        Commands::Route { from, to } => commands::route::run(&content, &from, &to),
        Commands::Npc {
            count,
            template,
            district,
            seed,
            uniques,
            format,
        } => commands::npc::run(
            &content,
            count,
            template.as_deref(),
            district.as_deref(),
            seed.as_deref(),
            uniques,
            format,
        ),
        Commands::Jobs {
            month,
            max,
            seed,
            format,
        } => commands::jobs::run(&content, month, max, seed.as_deref(), format),
        Commands::Story {
            file,
            knot,
            pick,
            seed,
        } => commands::story::run(&file, knot.as_deref(), &pick, seed.as_deref()),
        Commands::Export {
            format,
            load,
            months,
            seed,
            output,
        } => {
            let config = commands::game_config(Some(&seed), "Rook");
            commands::export::run(content, config, &format, load.as_deref(), months, output.as_deref())
        }
        Commands::Play {
            name,
            seed,
            load,
            stories,
        } => {
            let config = commands::game_config(seed.as_deref(), &name);
            commands::play::run(content, config, load.as_deref(), stories.as_deref())
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
