use clap::{Parser, Subcommand};

mod generate;
mod list;

pub fn exec() -> miette::Result<()> {
    use Command::*;
    let cli = Cli::parse();
    init_logger(cli.verbose);
    match cli.command {
        Generate(args) => generate::exec(args, cli.verbose),
        List(args) => list::exec(args),
    }
}

#[derive(Parser)]
#[clap(author, about, version, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
    /// Enable verbose diagnostics
    #[clap(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate declaration files and runtime stubs from GIR documents
    Generate(generate::Args),
    /// List the modules found in the gir directories
    List(list::Args),
}

fn init_logger(verbose: bool) {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn };
    env_logger::builder()
        .format_timestamp(None)
        .format_target(false)
        .filter_level(level)
        .init();
}
