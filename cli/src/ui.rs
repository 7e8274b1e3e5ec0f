//! Shared terminal output helpers.

use colored::Colorize;

pub mod symbols {
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "!";
    pub const BULLET: &str = "•";
}

pub fn print_success(message: &str) {
    println!("{} {}", symbols::SUCCESS.green().bold(), message);
}

pub fn print_failure(message: &str) {
    eprintln!("{} {}", symbols::FAILURE.red().bold(), message);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", symbols::WARNING.yellow().bold(), message);
}

/// A labelled list line, e.g. `  • embeds: card, footer`.
pub fn print_item(label: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    println!("  {} {}: {}", symbols::BULLET.dimmed(), label.bold(), values.join(", "));
}
