use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "helium", version, about = "Helium template tools")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a template and print its structure.
    Parse {
        /// Template file; `${…}` marks a slot
        input: PathBuf,
    },
    /// Render a template and print the resulting markup.
    Render {
        /// Template file; `${…}` marks a slot
        input: PathBuf,
        /// Create elements in the SVG namespace
        #[arg(long)]
        svg: bool,
        /// Value for the next slot, in order
        #[arg(long = "value")]
        values: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = match cli.command {
        Commands::Parse { input } => helium_cli::parse_cmd(&input)?,
        Commands::Render { input, svg, values } => helium_cli::render_cmd(&input, &values, svg)?,
    };
    println!("{output}");
    Ok(())
}
