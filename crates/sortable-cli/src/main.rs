//! sortable CLI: a local workbench for sorting problems.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sortable", version, about = "Sorting problem workbench")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// State directory (overrides the config)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and example problem
    Init,

    /// Validate problem TOML files
    Validate {
        /// Path to problem file or directory
        #[arg(long)]
        problem: PathBuf,
    },

    /// Save a problem definition into the state directory
    Import {
        /// Path to problem file or directory
        #[arg(long)]
        problem: PathBuf,
    },

    /// Edit an installed problem
    Edit {
        #[arg(long)]
        problem_id: String,

        #[arg(long)]
        display_name: Option<String>,

        #[arg(long)]
        question: Option<String>,

        /// Items in their correct order, comma-separated
        #[arg(long)]
        items: Option<String>,

        /// Maximum attempts, 0 for unlimited
        #[arg(long)]
        max_attempts: Option<u32>,

        #[arg(long)]
        weight: Option<f64>,

        #[arg(long)]
        graded: Option<bool>,

        #[arg(long)]
        background: Option<String>,

        #[arg(long)]
        text_color: Option<String>,
    },

    /// Show a problem as a learner sees it
    Show {
        #[arg(long)]
        problem_id: String,

        #[arg(long)]
        learner: String,

        /// Print the view context as JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit an order for grading
    Submit {
        #[arg(long)]
        problem_id: String,

        #[arg(long)]
        learner: String,

        /// Proposed order, comma-separated
        #[arg(long)]
        order: String,

        /// Print the feedback as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sortable_core=info".parse().unwrap())
                .add_directive("sortable_host=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context {
        config: cli.config,
        state_dir: cli.state_dir,
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { problem } => commands::validate::execute(problem),
        Commands::Import { problem } => commands::import::execute(&ctx, problem).await,
        Commands::Edit {
            problem_id,
            display_name,
            question,
            items,
            max_attempts,
            weight,
            graded,
            background,
            text_color,
        } => {
            let edits = commands::edit::Edits {
                display_name,
                question,
                items,
                max_attempts,
                weight,
                graded,
                background,
                text_color,
            };
            commands::edit::execute(&ctx, &problem_id, edits).await
        }
        Commands::Show {
            problem_id,
            learner,
            json,
        } => commands::show::execute(&ctx, &problem_id, &learner, json).await,
        Commands::Submit {
            problem_id,
            learner,
            order,
            json,
        } => commands::submit::execute(&ctx, &problem_id, &learner, &order, json).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
