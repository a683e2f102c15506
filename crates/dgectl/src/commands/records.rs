//! History and achievements

use crate::session::Session;
use crate::ui::{format_sats, short_id};
use anyhow::{Context, Result};
use chrono::Local;
use dge_common::achievements::Category;

pub fn history(session: &Session, limit: usize) -> Result<()> {
    let address = session.address()?;
    let style = &session.style;
    let read_context = || format!("Failed to read {}", session.log.path().display());
    let records = session
        .log
        .read_recent(&address, limit)
        .with_context(read_context)?;

    style.print_header("Mission history");
    if records.is_empty() {
        println!("  No milestones completed yet.");
        style.print_footer();
        return Ok(());
    }

    println!(
        "  {:16} {:20} {:>5} {:>14}  {}",
        "When", "Milestone", "XP", "Reward", "Txid"
    );
    println!("  {}", style.dim(&"-".repeat(76)));
    for record in &records {
        let when = record.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        let mut milestone = short_id(&record.milestone_id, 17);
        if record.chain_completed {
            milestone.push_str(" *");
        }
        println!(
            "  {:16} {:20} {:>5} {:>14}  {}",
            when.to_string(),
            milestone,
            format!("+{}", record.xp),
            format_sats(record.reward),
            style.dim(&record.txids.first().map(|t| short_id(t, 20)).unwrap_or_default())
        );
    }

    let summary = session.log.summary(&address).with_context(read_context)?;
    println!();
    style.print_kv("completions", &summary.completions.to_string());
    style.print_kv("total reward", &format_sats(summary.total_reward));
    style.print_kv("total xp", &summary.total_xp.to_string());
    style.print_kv("chains", &summary.chains_completed.to_string());
    style.print_footer();
    Ok(())
}

pub fn achievements(session: &Session) -> Result<()> {
    let state = session.load_state()?;
    let style = &session.style;
    let mut book = session.store.load_achievements(&state.player_address)?;
    book.sync(&state);

    style.print_header(&format!(
        "Achievements  {}/{}",
        book.unlocked_count(),
        dge_common::achievements::ACHIEVEMENTS.len()
    ));

    if !book.recent.is_empty() {
        style.print_section("new", &book.recent.join(", "));
        println!();
    }

    for category in [
        Category::Gameplay,
        Category::Blockchain,
        Category::Story,
        Category::Special,
    ] {
        style.print_section(category.label(), "");
        for (achievement, record) in book.entries() {
            if achievement.category != category {
                continue;
            }
            match record {
                Some(record) => println!(
                    "  {:6} {:22} {}  {}",
                    style.ok(achievement.badge),
                    achievement.title,
                    style.dim(achievement.rarity.label()),
                    style.dim(&record.unlocked_at.with_timezone(&Local).format("%Y-%m-%d").to_string())
                ),
                None if achievement.secret => {
                    println!("  {:6} {:22} {}", style.dim("(??)"), "???", style.dim("secret"))
                }
                None => println!(
                    "  {:6} {:22} {}",
                    style.dim(achievement.badge),
                    achievement.title,
                    style.dim(achievement.description)
                ),
            }
        }
    }
    style.print_footer();

    book.clear_recent();
    session
        .store
        .save_achievements(&state.player_address, &book)?;
    Ok(())
}
