// src/cli.rs

use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

// command 属性
#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
#[command(group(
    clap::ArgGroup::new("mode")
        .required(true)
        .args(&["id", "url", "batch_file", "credentials_help"]),
))]
pub struct Cli {
    // --- 运行模式 (Mode) ---
    /// 通过文件 ID 导出单个文件
    #[arg(long, help_heading = "Mode")]
    pub id: Option<String>,
    /// 通过分享链接导出单个文件 (Docs / Sheets / Slides / Drive 链接)
    #[arg(long, help_heading = "Mode")]
    pub url: Option<String>,
    /// 从文本文件批量导出多个链接或ID (每行一个)
    #[arg(short, long, value_name = "FILE", help_heading = "Mode")]
    pub batch_file: Option<PathBuf>,
    /// 显示凭据文件格式说明并退出
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub credentials_help: bool,

    // --- 导出选项 (Options) ---
    /// 凭据 JSON 文件路径 (已授权用户格式)，优先级最高
    #[arg(long, value_name = "FILE", help_heading = "Options")]
    pub credentials: Option<PathBuf>,
    /// 将导出内容保存到此目录，而不是打印到标准输出
    #[arg(short, long, value_name = "DIR", help_heading = "Options")]
    pub output: Option<PathBuf>,
    /// 以 JSON 格式输出完整结果 (包含元数据)
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub json: bool,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 覆盖服务地址，用于调试或私有代理
    #[arg(long, value_name = "URL", global = true, hide = true)]
    pub api_base_url: Option<String>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
