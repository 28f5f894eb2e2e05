//! Terminal output helpers for the blueprint CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Color palette
pub mod colors {
    use console::Color;

    pub const ACCENT: Color = Color::Color256(39); // Sky blue
    pub const WARN: Color = Color::Color256(214); // Amber
    pub const ERROR: Color = Color::Color256(203); // Coral
    pub const OK: Color = Color::Color256(78); // Green
    pub const DIM: Color = Color::Color256(244); // Gray
}

pub mod symbols {
    pub const DIAMOND: &str = "\u{25C6}"; // ◆
    pub const DIAMOND_OUTLINE: &str = "\u{25C7}"; // ◇
    pub const CHECK: &str = "\u{2713}"; // ✓
    pub const TRIANGLE: &str = "\u{25B8}"; // ▸
    pub const ARROW: &str = "\u{2500}\u{25B8}"; // ─▸
}

const BOX_WIDTH: usize = 55;

pub fn header(version: &str) {
    println!(
        "  {} {} {}",
        style(symbols::DIAMOND).fg(colors::ACCENT),
        style("blueprint").fg(colors::ACCENT).bold(),
        style(version).dim()
    );
    println!();
}

pub fn success(msg: &str) {
    println!("  {} {}", style(symbols::CHECK).fg(colors::OK), msg);
}

pub fn warn(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::WARN),
        style(msg).fg(colors::WARN)
    );
}

pub fn info(msg: &str) {
    println!("  {} {}", style(symbols::DIAMOND_OUTLINE).fg(colors::ACCENT), msg);
}

pub fn dim(msg: &str) {
    println!("  {}", style(msg).fg(colors::DIM));
}

/// Spinner shown while a blocking step runs.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("\u{25DC}\u{25DD}\u{25DE}\u{25DF}\u{2713}") // ◜◝◞◟✓
        .template("  {spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub fn box_header(title: &str) {
    let title_padded = format!(" {title} ");
    let dashes = BOX_WIDTH.saturating_sub(title_padded.chars().count() + 4);

    println!(
        "  {}{}{}{}",
        style("\u{256D}\u{2500}").fg(colors::ACCENT), // ╭─
        style(title_padded).fg(colors::ACCENT).bold(),
        style("\u{2500}".repeat(dashes)).fg(colors::ACCENT),
        style("\u{256E}").fg(colors::ACCENT) // ╮
    );
}

pub fn box_line(content: &str) {
    let padding = (BOX_WIDTH - 2).saturating_sub(content.chars().count());
    println!(
        "  {} {}{}{}",
        style("\u{2502}").fg(colors::ACCENT), // │
        content,
        " ".repeat(padding),
        style("\u{2502}").fg(colors::ACCENT)
    );
}

pub fn box_footer() {
    println!(
        "  {}{}{}",
        style("\u{2570}").fg(colors::ACCENT), // ╰
        style("\u{2500}".repeat(BOX_WIDTH - 2)).fg(colors::ACCENT),
        style("\u{256F}").fg(colors::ACCENT) // ╯
    );
}

/// One entry of a file tree listing.
pub fn tree_item(prefix: &str, name: &str, description: Option<&str>, is_last: bool) {
    let connector = if is_last {
        "\u{2570}\u{2500}\u{2500}" // ╰──
    } else {
        "\u{251C}\u{2500}\u{2500}" // ├──
    };

    match description {
        Some(desc) => println!(
            "  {}{}  {}   {}",
            style(prefix).fg(colors::DIM),
            style(connector).fg(colors::DIM),
            style(name).fg(colors::ACCENT),
            style(desc).dim()
        ),
        None => println!(
            "  {}{}  {}",
            style(prefix).fg(colors::DIM),
            style(connector).fg(colors::DIM),
            style(name).fg(colors::ACCENT)
        ),
    }
}

pub fn tree_dir(prefix: &str, name: &str) {
    println!(
        "  {}{} {}/",
        style(prefix).fg(colors::DIM),
        style(symbols::TRIANGLE).fg(colors::ACCENT),
        style(name).fg(colors::ACCENT).bold()
    );
}

/// Planned artifact, as listed by `blueprint check`.
pub fn artifact_line(kind: &str, path: &str) {
    println!(
        "  {}   {:<20} {}",
        style(symbols::TRIANGLE).fg(colors::ACCENT),
        style(kind).dim(),
        path
    );
}

pub fn timing(label: &str, duration_ms: u128) {
    println!(
        "  {} {} in {}ms",
        style(symbols::DIAMOND_OUTLINE).fg(colors::ACCENT),
        label,
        duration_ms
    );
}

/// Header printed above a failure report.
pub fn failure_header(msg: &str) {
    println!();
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::ERROR).bold(),
        style(msg).fg(colors::ERROR).bold()
    );
    println!();
}

/// Pads `label` so that values line up in a box.
pub fn labeled(label: &str, value: &str) -> String {
    format!("{label:<14}{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_aligns_values() {
        assert_eq!(labeled("Database", "postgresql"), "Database      postgresql");
        assert_eq!(labeled("Models", "3").find('3'), Some(14));
    }
}
