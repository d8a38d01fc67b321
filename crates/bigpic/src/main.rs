mod app;
mod cli;
mod commands;
mod config;
mod gallery;
mod images;
mod library;
mod overlay;
mod theme;
mod watch;

use clap::Parser;
use colored::Colorize;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}
