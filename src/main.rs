mod cli;
mod clipboard;
mod config;
mod file_scanner;
mod formatter;
mod ignore_rules;
mod logging;
mod selection_tree;
mod session_store;
mod tree_builder;
mod tui;
mod utils;
mod workflow;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // Handle daemon mode first. This should stay in main.rs as it's an early exit.
    if clipboard::check_and_run_daemon_if_requested()? {
        return Ok(());
    }

    let cli_args = cli::Cli::parse();
    logging::init_logging(cli_args.verbose);

    // Delegate the main application logic to the workflow module
    workflow::run_feed_llm(cli_args)
}
