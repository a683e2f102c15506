//! Demo mode: play with a mocked wallet

use crate::cli::DemoCommands;
use crate::session::Session;
use crate::ui::{format_sats, short_id};
use anyhow::Result;
use dge_common::demo::DemoConfig;
use dge_common::progression::initialize_game_state;
use dge_common::tutorial::TutorialProgress;
use dge_common::GameError;
use tracing::info;

pub fn run(session: &Session, action: Option<DemoCommands>) -> Result<()> {
    match action.unwrap_or(DemoCommands::Status) {
        DemoCommands::Enable => enable(session),
        DemoCommands::Disable => disable(session),
        DemoCommands::Status => status(session),
        DemoCommands::Confirm => confirm(session),
    }
}

fn enable(session: &Session) -> Result<()> {
    let existing = session.store.load_demo()?;
    if existing.enabled {
        session
            .style
            .print_note("Demo mode is already enabled");
        return status(session);
    }

    let demo = DemoConfig::enable();
    let state = initialize_game_state(
        &session.catalog,
        &demo.address,
        Some("Demo Agent".to_string()),
        0,
        Some(&demo),
    );
    session.store.save_demo(&demo)?;
    session.save_state(&state)?;
    session
        .store
        .save_tutorial(&state.player_address, &TutorialProgress::default())?;
    session.store.set_active_player(&state.player_address)?;
    info!(address = %demo.address, "demo session started");

    session.style.print_ok(&format!(
        "Demo mode enabled. Mock wallet {} funded with {}",
        demo.address,
        format_sats(demo.balance)
    ));
    Ok(())
}

fn disable(session: &Session) -> Result<()> {
    let demo = session.store.load_demo()?;
    if !demo.enabled {
        session.style.print_note("Demo mode is not enabled");
        return Ok(());
    }
    session.store.clear_demo()?;
    session.style.print_ok(&format!(
        "Demo mode disabled. Progress for {} is kept",
        demo.address
    ));
    Ok(())
}

fn status(session: &Session) -> Result<()> {
    let demo = session.store.load_demo()?;
    let style = &session.style;
    style.print_header("Demo mode");
    if !demo.enabled {
        println!("  Disabled. Run 'dgectl demo enable' to play with a mock wallet.");
        style.print_footer();
        return Ok(());
    }

    style.print_kv("address", &demo.address);
    style.print_kv("balance", &format_sats(demo.balance));
    style.print_kv("unlocked", &demo.unlocked_missions.join(", "));
    style.print_kv("completed", &demo.completed_milestones.len().to_string());
    style.print_kv("transactions", &demo.transactions.len().to_string());

    if !demo.pending_transactions.is_empty() {
        println!();
        style.print_section("pending", "");
        for tx in &demo.pending_transactions {
            let amount = tx.amount.map(format_sats).unwrap_or_default();
            println!(
                "  {:28} {:10} {:12} {}",
                short_id(&tx.txid, 25),
                format!("{:?}", tx.kind).to_lowercase(),
                format!("{:?}", tx.status).to_lowercase(),
                amount
            );
        }
    }
    style.print_footer();
    Ok(())
}

fn confirm(session: &Session) -> Result<()> {
    let mut demo = session.store.load_demo()?;
    if !demo.enabled {
        return Err(GameError::DemoDisabled.into());
    }

    let confirmed = demo.advance_pending();
    session.store.save_demo(&demo)?;
    for tx in &confirmed {
        session
            .style
            .print_ok(&format!("Confirmed {}", short_id(&tx.txid, 25)));
    }
    println!(
        "  {} confirmed, {} still pending",
        confirmed.len(),
        demo.pending_transactions.len()
    );
    Ok(())
}
