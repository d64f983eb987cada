use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use gitscope::config;
use gitscope::format::OutputFormat;
use gitscope::loader::{self, FileSource};
use gitscope::telemetry;

/// Commit-graph viewer for repository snapshots
///
/// Reads a snapshot (branches with their commits, as JSON) and lays it out
/// as a graph: one horizontal lane per branch, lineage edges between
/// commits and dashed merge edges where branches share a commit.
///
/// EXAMPLES:
///
///   gitscope graph repo.json --format text
///   gitscope view repo.json
#[derive(Parser)]
#[command(name = "gitscope")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(after_help = "See 'gitscope <command> --help' for more information on a specific command.")]
struct Cli {
    /// Config file [default: ./gitscope.toml]
    #[arg(long, global = true, env = "GITSCOPE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph and print it
    ///
    /// JSON output is the data handed to a renderer: positioned nodes,
    /// styled edges and render options.
    Graph {
        /// Snapshot JSON file
        file: PathBuf,

        /// Output format: json or text
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Open the interactive terminal viewer
    ///
    /// Drag or use the arrow keys to pan, scroll or +/- to zoom, double-click
    /// the background to fit. Press ? for all keys.
    View {
        /// Snapshot JSON file
        file: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mode = match cli.command {
        Commands::View { .. } => telemetry::Mode::Tui,
        _ => telemetry::Mode::Cli,
    };
    telemetry::init(mode)?;

    match cli.command {
        Commands::Graph { file, format } => {
            let config = config::load_or_default(cli.config.as_deref())?;
            let snapshot = loader::read_snapshot(&file)?;
            let out = format
                .render(&snapshot, &config.build_options())
                .with_context(|| format!("rendering {}", file.display()))?;
            print!("{out}");
            Ok(())
        }
        Commands::View { file } => {
            let config = config::load_or_default(cli.config.as_deref())?;
            gitscope_view::run(Box::new(FileSource::new(file)), config.view_settings())
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "gitscope", &mut io::stdout());
            Ok(())
        }
    }
}
