//! Reset and configuration

use crate::session::Session;
use anyhow::{Context, Result};
use dge_common::config::DgeConfig;
use tracing::info;

pub fn reset(session: &Session, yes: bool) -> Result<()> {
    let address = session.address()?;
    let style = &session.style;
    if !yes {
        style.print_note(&format!(
            "This deletes all progress for {}. Re-run with --yes to confirm.",
            address
        ));
        return Ok(());
    }

    let removed = session.store.remove(&address)?;
    session
        .log
        .remove_player(&address)
        .context("Failed to update mission log")?;
    if session.demo_for(&address)?.is_some() {
        session.store.clear_demo()?;
    }
    if session.store.active_player()?.as_deref() == Some(address.as_str()) {
        session.store.clear_active_player()?;
    }
    info!(address = %address, "progress reset");

    if removed {
        style.print_ok(&format!("Progress for {} deleted", address));
    } else {
        style.print_note(&format!("No saved progress for {}", address));
    }
    Ok(())
}

pub fn config(session: &Session, set: Option<String>) -> Result<()> {
    let style = &session.style;
    let mut config = session.config.clone();

    if let Some(pair) = set {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Expected key=value, got '{}'", pair))?;
        config.set(key.trim(), value.trim())?;
        let path = config.save()?;
        style.print_ok(&format!("Saved {}", path.display()));
    }

    style.print_header("Configuration");
    if let Ok(path) = DgeConfig::writable_path() {
        style.print_kv("config file", &path.display().to_string());
    }
    style.print_kv("data dir", &session.data_dir().display().to_string());
    println!();
    let rendered = toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
    println!("{}", rendered.trim_end());
    style.print_footer();
    Ok(())
}
