mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "specstack",
    about = "Install spec-driven prompt templates and pick a technology stack for AI coding agents",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .specstack/ or .git/)
    #[arg(long, global = true, env = "SPECSTACK_ROOT")]
    root: Option<PathBuf>,

    /// Home directory used for user-level agent targets (default: $HOME)
    #[arg(long, global = true, env = "SPECSTACK_HOME")]
    home: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install templates, stacks, and scripts into the project
    Init {
        /// Remove and rewrite every managed file (the command file is backed up first)
        #[arg(long)]
        force: bool,

        /// Register the command with an agent CLI (repeatable)
        #[arg(long = "target", value_name = "ID")]
        targets: Vec<String>,
    },

    /// Regenerate the command file, fill in missing assets, and re-register targets
    Update,

    /// Pick a stack for a project description
    Select {
        /// Free-text project description
        prompt: Vec<String>,

        /// Use this stack instead of matching tags
        #[arg(long)]
        stack: Option<String>,
    },

    /// List the stacks in the installed catalog
    Stacks,

    /// Copy the command file into an agent CLI's prompt directory
    Register {
        /// Target identifier (see `specstack targets`)
        target: String,
    },

    /// List supported registration targets
    Targets,

    /// Inspect the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let home = cli.home.as_deref();

    let result = match cli.command {
        Commands::Init { force, targets } => cmd::init::run(&root, home, force, &targets),
        Commands::Update => cmd::update::run(&root, home),
        Commands::Select { prompt, stack } => {
            cmd::select::run(&root, &prompt, stack.as_deref(), cli.json)
        }
        Commands::Stacks => cmd::stacks::run(&root, cli.json),
        Commands::Register { target } => cmd::register::run(&root, home, &target, cli.json),
        Commands::Targets => cmd::targets::run(cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
