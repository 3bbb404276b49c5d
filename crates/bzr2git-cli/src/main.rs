//! bzr2git - replay Bazaar revisions onto a git repository.

use clap::Parser;

mod commands;
mod logging;
mod operator;
mod output;

use commands::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    if let Err(e) = commands::replay::run(&cli) {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
