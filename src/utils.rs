//! Utility functions shared by the CLI commands

use std::io::{self, Write};

// ===== STRING UTILITIES =====

/// Truncates a string to a maximum number of characters, adding "..." if truncated
pub fn truncate_string(s: &str, max_length: usize) -> String {
    if s.chars().count() <= max_length {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Pads or truncates to an exact display width
pub fn fit(s: &str, width: usize) -> String {
    format!("{:<width$}", truncate_string(s, width), width = width)
}

/// Checks if a string is empty or contains only whitespace
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

// ===== FORMATTING UTILITIES =====

/// Whole percentages print without decimals, the rest with one
pub fn format_percentage(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}%", value as i64)
    } else {
        format!("{:.1}%", value)
    }
}

/// Creates a progress bar string
pub fn create_progress_bar(current: f64, total: f64, width: usize) -> String {
    if total <= 0.0 {
        return format!("[{}]", " ".repeat(width));
    }

    let progress = (current / total).clamp(0.0, 1.0);
    let filled = (progress * width as f64).round() as usize;
    let empty = width - filled;

    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}

// ===== PROMPTS =====

/// Asks a yes/no question on stdin; anything but "y" is a no
pub fn confirm(question: &str) -> io::Result<bool> {
    println!("{} (y/N)", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
