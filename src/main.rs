use clap::Parser;
use miette::Result;
use rdftex::cli::{Cli, Commands};
use rdftex::output::Printer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "rdftex=warn",
        1 => "rdftex=info",
        _ => "rdftex=debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let printer = Printer::new();

    match cli.command {
        Commands::Build(args) => {
            rdftex::cli::build::run(args, &printer)?;
        }
        Commands::Check(args) => {
            rdftex::cli::check::run(args, &printer)?;
        }
        Commands::Watch(args) => rdftex::cli::watch::run(args, &printer)?,
        Commands::Inspect(args) => {
            rdftex::cli::inspect::run(args, &printer)?;
        }
        Commands::Init(args) => rdftex::cli::init::run(args, &printer)?,
        Commands::Completions(args) => rdftex::cli::completions::run(args)?,
    }

    Ok(())
}
