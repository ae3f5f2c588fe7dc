//! Terminal rendering helpers.

use std::time::Duration;

use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn info(message: &str) {
    println!("{} {}", "•".cyan(), message);
}

pub fn warn(message: &str) {
    eprintln!("{} {}", "!".yellow().bold(), message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn heading(title: &str) {
    println!("\n{}", title.bold().underline());
}

pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", format!("{}:", label).bold(), value);
}

pub fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
    table
}

/// Maps a `#RRGGBB` UI color onto the terminal palette.
pub fn hex_cell(text: impl std::fmt::Display, hex: &str) -> Cell {
    let color = match hex {
        "#10B981" => Color::Green,
        "#F59E0B" => Color::Yellow,
        "#EF4444" => Color::Red,
        "#3B82F6" => Color::Blue,
        _ => Color::Grey,
    };
    Cell::new(text).fg(color)
}

pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn yes_no(value: bool) -> String {
    if value {
        "Yes".green().to_string()
    } else {
        "No".dimmed().to_string()
    }
}
