use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod args;
mod util;

mod commands {
    automod::dir!(pub "src/commands");
}

#[derive(Parser)]
#[command(name = "protolit", about = "Render and format Go message literals")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON-encoded message as a Go composite literal
    Render(commands::render::Args),
    /// Canonicalize a Go composite literal
    Fmt(commands::fmt::Args),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Fmt(args) => commands::fmt::run(args),
    };
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
