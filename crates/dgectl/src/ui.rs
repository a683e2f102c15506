//! Terminal output helpers for consistent styling.
//!
//! ASCII only. Colors are applied through [`Style`] so `output.color` can
//! switch them off.

use dge_common::config::ColorMode;
use dge_common::progression::{progress_percent, xp_needed, MAX_LEVEL};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Horizontal rule
pub const HR: &str =
    "------------------------------------------------------------------------------";

/// Key column width for [`Style::print_kv`]
pub const KEY_WIDTH: usize = 14;

#[derive(Debug, Clone, Copy)]
pub struct Style {
    color: bool,
}

impl Style {
    pub fn new(mode: ColorMode) -> Self {
        let color = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
        };
        Self { color }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn header(&self, text: &str) -> String {
        if self.color {
            text.bright_yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn ok(&self, text: &str) -> String {
        if self.color {
            text.bright_green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn warn(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn accent(&self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", self.header(title));
        println!("{}", self.dim(HR));
    }

    pub fn print_footer(&self) {
        println!("{}", self.dim(HR));
    }

    pub fn print_section(&self, section: &str, description: &str) {
        println!("{} {}", self.dim(&format!("[{}]", section)), description);
    }

    pub fn print_ok(&self, message: &str) {
        println!("  {} {}", self.ok("[OK]"), message);
    }

    pub fn print_note(&self, message: &str) {
        println!("  {} {}", self.warn("[NOTE]"), message);
    }

    pub fn print_kv(&self, key: &str, value: &str) {
        println!("  {:width$} {}", key, value, width = KEY_WIDTH);
    }

    /// `[#######.............]` bar for the current level
    pub fn xp_bar(&self, level: u32, xp: u32, width: usize) -> String {
        let filled = progress_percent(level, xp) as usize * width / 100;
        let empty = width.saturating_sub(filled);
        format!(
            "[{}{}]",
            self.ok(&"#".repeat(filled)),
            self.dim(&".".repeat(empty))
        )
    }
}

/// `1,000 sats`
pub fn format_sats(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{} sats", out)
}

/// `35/100 XP`, or the raw XP at the level cap
pub fn format_xp(level: u32, xp: u32) -> String {
    if level >= MAX_LEVEL {
        format!("{} XP (max level)", xp)
    } else {
        format!("{}/{} XP", xp, xp_needed(level))
    }
}

/// Shorten long identifiers for tables
pub fn short_id(id: &str, keep: usize) -> String {
    if id.chars().count() <= keep {
        id.to_string()
    } else {
        let head: String = id.chars().take(keep).collect();
        format!("{}...", head)
    }
}
