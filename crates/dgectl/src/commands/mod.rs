//! Command handlers
//!
//! Each handler loads what it needs through the [`Session`], calls into
//! `dge_common` and prints the result. No game rule lives here.

mod admin;
mod demo;
mod play;
mod records;
mod tutorial;

use crate::cli::Commands;
use crate::session::Session;
use anyhow::Result;

pub fn run(session: &Session, command: Commands) -> Result<()> {
    match command {
        Commands::Start { name, key } => play::start(session, name, key),
        Commands::Status { json } => play::status(session, json),
        Commands::Missions => play::missions(session),
        Commands::Brief => play::brief(session),
        Commands::Complete { answer } => play::complete(session, answer),
        Commands::Select { chain } => play::select(session, &chain),
        Commands::History { limit } => records::history(session, limit),
        Commands::Achievements => records::achievements(session),
        Commands::Tutorial { action } => tutorial::run(session, action),
        Commands::Demo { action } => demo::run(session, action),
        Commands::Reset { yes } => admin::reset(session, yes),
        Commands::Config { set } => admin::config(session, set),
    }
}
