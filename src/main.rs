#![forbid(unsafe_code)]

//! app-drawer: inspect how a catalog lays out in the launcher grid.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        eprintln!("app-drawer: {e}");
        std::process::exit(e.exit_code());
    }
}
