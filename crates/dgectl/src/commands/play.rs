//! Core game commands: start, status, missions, brief, complete, select

use crate::session::Session;
use crate::ui::{format_sats, format_xp, short_id};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use dge_common::events::MissionRecord;
use dge_common::ledger::{generate_demo_key, load_key, SimulatedLedger};
use dge_common::progression::{
    complete_current, current_chain, current_milestone, initialize_game_state, select_chain,
    xp_for,
};
use dge_common::tutorial::TutorialProgress;
use dge_common::{CompletionOutcome, GameState, VERSION};
use serde::Serialize;
use tracing::info;

pub fn start(session: &Session, name: Option<String>, key: Option<String>) -> Result<()> {
    let style = &session.style;
    let wif = key.unwrap_or_else(generate_demo_key);
    let loaded = load_key(&wif)?;

    if let Some(existing) = session.store.load(&loaded.address)? {
        session.store.set_active_player(&existing.player_address)?;
        style.print_note(&format!(
            "Agent {} already enlisted, continuing",
            existing.player_address
        ));
        print_status(session, &existing);
        return Ok(());
    }

    let state = initialize_game_state(&session.catalog, &loaded.address, name, loaded.balance, None);
    session.save_state(&state)?;
    session.store.set_active_player(&state.player_address)?;
    let tutorial = TutorialProgress::default();
    session.store.save_tutorial(&state.player_address, &tutorial)?;
    info!(address = %state.player_address, "new game started");

    style.print_header(&format!("dgectl v{}  agent enlisted", VERSION));
    style.print_kv("address", &state.player_address);
    style.print_kv("balance", &format_sats(state.balance));
    if let Some(step) = tutorial.current_step() {
        println!();
        style.print_section("tutorial", step.title);
        println!("  {}", step.content);
    }
    println!();
    println!("  Run 'dgectl brief' to read your first assignment.");
    Ok(())
}

/// Machine-readable status
#[derive(Serialize)]
struct StatusReport<'a> {
    profile: dge_common::PlayerProfile,
    level_progress: u8,
    current_chain_id: Option<&'a str>,
    current_milestone_id: Option<&'a str>,
    completed_milestones: usize,
    total_milestones: usize,
    game_complete: bool,
}

pub fn status(session: &Session, json: bool) -> Result<()> {
    let state = session.load_state()?;
    if json {
        let report = StatusReport {
            profile: state.profile(),
            level_progress: dge_common::progression::progress_percent(state.level, state.xp),
            current_chain_id: state.current_chain_id.as_deref(),
            current_milestone_id: state.current_milestone_id.as_deref(),
            completed_milestones: state.completed_milestones(),
            total_milestones: state.total_milestones(),
            game_complete: state.is_complete(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    print_status(session, &state);
    Ok(())
}

fn print_status(session: &Session, state: &GameState) {
    let style = &session.style;
    style.print_header(&format!("dgectl v{}  agent status", VERSION));

    if let Some(name) = &state.player_name {
        style.print_kv("agent", name);
    }
    style.print_kv("address", &state.player_address);
    style.print_kv(
        "level",
        &format!(
            "{} {} {}",
            state.level,
            style.xp_bar(state.level, state.xp, 20),
            format_xp(state.level, state.xp)
        ),
    );
    style.print_kv("balance", &format_sats(state.balance));
    style.print_kv(
        "milestones",
        &format!("{}/{}", state.completed_milestones(), state.total_milestones()),
    );
    style.print_kv(
        "chains",
        &format!("{}/{}", state.completed_chains(), state.chains.len()),
    );
    if !state.badges.is_empty() {
        style.print_kv("badges", &state.badges.join(", "));
    }

    println!();
    match (current_chain(state), current_milestone(state)) {
        (Ok(chain), Ok(milestone)) => {
            style.print_section("current", &format!("{} / {}", chain.title, milestone.title));
        }
        _ if state.is_complete() => {
            style.print_ok("Every available mission is complete. Goldfinger is finished.");
        }
        _ => style.print_note("No current milestone. Pick a chain with 'dgectl select'."),
    }
    style.print_footer();
}

pub fn missions(session: &Session) -> Result<()> {
    let state = session.load_state()?;
    let style = &session.style;
    style.print_header("Mission chains");

    for chain in &state.chains {
        let marker = if chain.completed {
            style.ok("[done]  ")
        } else if chain.unlocked {
            style.accent("[open]  ")
        } else {
            style.dim("[locked]")
        };
        let side = if chain.side_branch { " (side mission)" } else { "" };
        println!(
            "{} {}{}  {}",
            marker,
            chain.title,
            side,
            style.dim(&format!(
                "{}  {}/{}",
                chain.id,
                chain.completed_count(),
                chain.milestones.len()
            ))
        );

        if !chain.unlocked {
            continue;
        }
        for milestone in &chain.milestones {
            let is_current = state.current_milestone_id.as_deref() == Some(milestone.id.as_str());
            let check = if milestone.completed { "[x]" } else { "[ ]" };
            let pointer = if is_current { ">" } else { " " };
            println!(
                "   {} {} {:32} {:>14}",
                pointer,
                check,
                milestone.title,
                format_sats(milestone.reward)
            );
        }
    }
    style.print_footer();
    Ok(())
}

pub fn brief(session: &Session) -> Result<()> {
    let state = session.load_state()?;
    let style = &session.style;
    let chain = current_chain(&state)?;
    let milestone = current_milestone(&state)?;

    style.print_header(&format!("{}  /  {}", chain.title, milestone.title));
    println!("{}", milestone.description);
    println!();
    style.print_kv("type", &milestone.kind.to_string());
    if let Some(agency) = &milestone.agency {
        style.print_kv("agency", agency);
    }
    if let Some(difficulty) = milestone.difficulty {
        style.print_kv("difficulty", difficulty.label());
    }
    style.print_kv("reward", &format_sats(milestone.reward));
    style.print_kv("xp", &xp_for(milestone, chain).to_string());

    if let Some(activity) = &milestone.activity {
        println!();
        style.print_section(activity.kind.label(), "");
        if let Some(briefing) = &activity.briefing {
            println!("  {}", briefing);
        }
        if let Some(question) = &activity.question {
            println!();
            println!("  {}", style.header(question));
            for (i, option) in activity.options.iter().enumerate() {
                println!("    {}. {}", i + 1, option);
            }
        }
        if let Some(hint) = &activity.hint {
            println!();
            println!("  {} {}", style.dim("hint:"), hint);
        }
    }

    println!();
    if milestone.is_quiz() {
        println!("  Answer with 'dgectl complete --answer N'.");
    } else {
        println!("  Run 'dgectl complete' when the assignment is done.");
    }
    style.print_footer();
    Ok(())
}

/// Check a quiz answer given as a 1-based option number
fn check_quiz(state: &GameState, answer: Option<usize>) -> Result<()> {
    let milestone = current_milestone(state)?;
    let Some(activity) = milestone.activity.as_ref().filter(|_| milestone.is_quiz()) else {
        return Ok(());
    };

    let Some(answer) = answer else {
        bail!(
            "'{}' is a quiz. Read it with 'dgectl brief' and answer with --answer N",
            milestone.title
        );
    };
    if answer == 0 || answer > activity.options.len() {
        bail!("Answer must be between 1 and {}", activity.options.len());
    }
    if activity.check_answer(answer - 1) != Some(true) {
        match &activity.hint {
            Some(hint) => bail!("Incorrect answer. Hint: {}", hint),
            None => bail!("Incorrect answer"),
        }
    }
    Ok(())
}

pub fn complete(session: &Session, answer: Option<usize>) -> Result<()> {
    let mut state = session.load_state()?;
    check_quiz(&state, answer)?;
    let debrief = current_milestone(&state)?
        .activity
        .as_ref()
        .and_then(|a| a.outcome.clone());

    let mut ledger = SimulatedLedger::default();
    let outcome = complete_current(&mut state, &mut ledger, Utc::now())?;

    session.save_state(&state)?;
    if let Some(mut demo) = session.demo_for(&state.player_address)? {
        demo.record_completion(&outcome)?;
        session.store.save_demo(&demo)?;
    }
    session
        .log
        .append(&MissionRecord::from_outcome(&state.player_address, &outcome))
        .context("Failed to write mission log")?;

    let mut book = session.store.load_achievements(&state.player_address)?;
    let unlocked = book.sync(&state);
    if !unlocked.is_empty() {
        session.store.save_achievements(&state.player_address, &book)?;
    }

    print_outcome(session, &state, &outcome, debrief.as_deref(), &unlocked);
    Ok(())
}

fn print_outcome(
    session: &Session,
    state: &GameState,
    outcome: &CompletionOutcome,
    debrief: Option<&str>,
    achievements: &[&str],
) {
    let style = &session.style;
    let title = state
        .find_milestone(&outcome.milestone_id)
        .map(|(_, m)| m.title.as_str())
        .unwrap_or(outcome.milestone_id.as_str());

    println!();
    style.print_ok(&format!("Milestone complete: {}", title));
    if let Some(text) = debrief {
        println!("  {}", text);
    }
    println!();
    style.print_kv("reward", &format!("+{}", format_sats(outcome.reward)));
    style.print_kv("xp", &format!("+{}", outcome.level.xp_gained));
    style.print_kv("hash", &short_id(&outcome.hash, 16));
    style.print_kv("txid", &outcome.milestone_txid);

    if outcome.level.leveled_up() {
        println!();
        println!(
            "  {}",
            style.header(&format!("LEVEL UP! You are now level {}", outcome.level.level_after))
        );
    }
    if let Some(badge) = &outcome.badge {
        style.print_ok(&format!("Badge earned: {}", badge));
    }
    if let Some(chain_id) = &outcome.unlocked_chain {
        let title = state.chain(chain_id).map(|c| c.title.as_str()).unwrap_or(chain_id.as_str());
        style.print_ok(&format!("New mission unlocked: {}", title));
    }
    for id in achievements {
        if let Some(achievement) = dge_common::achievements::find(id) {
            style.print_ok(&format!(
                "Achievement unlocked: {} {}",
                achievement.badge, achievement.title
            ));
        }
    }

    println!();
    if outcome.game_complete {
        println!("  {}", style.header("All missions complete. Thank you, agent."));
    } else if let Ok(next) = current_milestone(state) {
        println!("  Next: {}", next.title);
    }
}

pub fn select(session: &Session, chain_id: &str) -> Result<()> {
    let mut state = session.load_state()?;
    select_chain(&mut state, chain_id)?;
    session.save_state(&state)?;

    let chain = current_chain(&state)?;
    let milestone = current_milestone(&state)?;
    session
        .style
        .print_ok(&format!("Now playing {}: {}", chain.title, milestone.title));
    Ok(())
}
