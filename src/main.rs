// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use gdrive_extract::{cli::Cli, logging, run_from_cli, symbols};
use std::{env, sync::Arc, time::Duration};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n{} 用户强制中断程序。", *symbols::WARN);
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::process::exit(130);
        }
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "gdrive-extract".to_string());

    let after_help = format!(
        "示例:\n  # 导出单个文档并打印文本\n  {bin} --id 1AbC... --credentials creds.json\n\n  # 通过分享链接导出并保存到目录\n  {bin} --url \"https://docs.google.com/document/d/.../edit\" -o exports\n\n  # 批量导出，输出 JSON Lines\n  {bin} -b my_files.txt --json\n\n  # 查看凭据格式说明\n  {bin} --credentials-help",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    logging::setup_logging(args.log_level);

    if let Err(e) = run_from_cli(args).await {
        log::error!("程序执行出错: {}", e);
        eprintln!("\n{} {}", *symbols::ERROR, format!("程序执行出错: {}", e).red());
        std::process::exit(1);
    }
}
