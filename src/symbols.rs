// src/symbols.rs

use colored::{ColoredString, Colorize};
use std::sync::LazyLock;

// 输出到 stderr 的状态标记，stdout 只留给导出内容

pub static OK: LazyLock<ColoredString> = LazyLock::new(|| "[OK]".green());
pub static ERROR: LazyLock<ColoredString> = LazyLock::new(|| "[X]".red());
pub static INFO: LazyLock<ColoredString> = LazyLock::new(|| "[i]".cyan());
pub static WARN: LazyLock<ColoredString> = LazyLock::new(|| "[!]".yellow());
