mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "folio-kit")]
#[command(version, about = "Static site generator for a personal blog and portfolio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize a new site directory
    Init {
        /// Path to the site directory (must exist)
        path: PathBuf,

        /// Site title shown in the homepage header
        #[arg(long)]
        title: Option<String>,

        /// Author name for the bio and copyright footer
        #[arg(long)]
        author: Option<String>,
    },

    /// Validate site configuration, avatar and posts
    Validate {
        /// Path to site directory
        path: PathBuf,
    },

    /// Preview site locally with hot reload
    Preview {
        /// Path to site directory
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Build the static site
    Build {
        /// Path to site directory
        path: PathBuf,

        /// Output directory for generated site
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Init {
            path,
            title,
            author,
        } => commands::init::run(path, title, author).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Preview { path, port } => commands::preview::run(path, port).await,
        Command::Build { path, output } => commands::build::run(path, output).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "folio-kit", &mut io::stdout());
            Ok(())
        }
    }
}
