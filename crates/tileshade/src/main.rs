mod bindings;
mod cli;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Probe(args)) => run::probe(args),
        Some(Command::Quiz(args)) => run::quiz(args),
        None => run::run(cli.run),
    }
}
