//! dgectl - terminal client for the DGE mission game

use anyhow::Result;
use clap::Parser;
use dge_common::config::DgeConfig;
use dgectl::cli::Cli;
use dgectl::errors::{exit_code_for, EXIT_SUCCESS};
use dgectl::session::Session;
use dgectl::ui::Style;
use dgectl::{commands, logging};

fn run(cli: Cli) -> Result<()> {
    let config = DgeConfig::load()?;
    logging::init(&config.logging.level);

    let style = Style::new(config.output.color);
    let session = Session::new(config, cli.address, cli.data_dir, style)?;
    commands::run(&session, cli.command)
}

fn main() {
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            eprintln!("[ERROR] {:#}", err);
            exit_code_for(&err)
        }
    };
    std::process::exit(code);
}
