//! Waker CLI - wake, stop and check the managed instance

use clap::Parser;

use waker_cli::cli::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
