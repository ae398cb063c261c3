// src/ui.rs
// 所有界面提示都写到 stderr，stdout 只留给导出内容

use crate::constants;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

pub fn print_header(title: &str) {
    eprintln!("\n{}", "═".repeat(constants::UI_WIDTH));
    eprintln!(" {}", title.cyan().bold());
    eprintln!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn print_sub_header(title: &str) {
    eprintln!("\n--- {} ---", title.bold());
}

pub fn box_message(title: &str, content: &[&str], color_func: fn(ColoredString) -> ColoredString) {
    eprintln!("\n┌{}┐", "─".repeat(constants::UI_WIDTH - 2));
    eprintln!("  {}", color_func(title.bold()));
    eprintln!("├{}┤", "─".repeat(constants::UI_WIDTH - 2));
    for line in content {
        eprintln!("  {}", line);
    }
    eprintln!("└{}┘", "─".repeat(constants::UI_WIDTH - 2));
}

/// 批量任务进度条 (按任务数计数)
pub fn new_tasks_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let pbar = ProgressBar::new(total);
    let style = ProgressStyle::with_template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pbar.set_style(style);
    pbar.set_prefix(prefix.to_string());
    pbar
}
