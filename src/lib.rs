// src/lib.rs

pub mod batch;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod models;
pub mod output;
pub mod symbols;
pub mod ui;
pub mod utils;

use crate::{
    cli::Cli,
    config::{
        AppConfig,
        credentials::{load_or_create_external_config, resolve_credentials},
    },
    error::{AppError, AppResult},
    extractor::DocumentExporter,
    models::{ExportRequest, ExportResult, ExtractorConfiguration, ExtractorOutput},
};
use colored::*;
use indicatif::ProgressBar;
use log::{debug, info};
use std::sync::Arc;

/// 核心的执行上下文，包含所有任务所需的状态和工具
#[derive(Clone)]
pub struct ExtractJobContext {
    pub exporter: Arc<DocumentExporter>,
    pub args: Arc<Cli>,
}

impl ExtractJobContext {
    /// 导出单个文件并按命令行选项输出结果
    pub async fn export_and_emit(&self, file_id: &str, pbar: Option<&ProgressBar>) -> AppResult<()> {
        let result = self.exporter.export(&ExportRequest::new(file_id)).await?;
        let emit = || emit_result(&result, &self.args, pbar.is_some());
        match pbar {
            Some(pbar) => pbar.suspend(emit),
            None => emit(),
        }
    }
}

fn emit_result(result: &ExportResult, args: &Cli, batch: bool) -> AppResult<()> {
    if let Some(dir) = &args.output {
        let path = output::write_result(dir, result)?;
        eprintln!("{} 已保存: {}", *symbols::OK, path.display());
    }
    if args.json {
        let envelope = ExtractorOutput { result: result.clone() };
        // 批量模式下每个结果一行 (JSON Lines)
        let text = if batch {
            serde_json::to_string(&envelope)?
        } else {
            serde_json::to_string_pretty(&envelope)?
        };
        println!("{}", text);
    } else if args.output.is_none() {
        print!("{}", result.content);
        if !result.content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    if args.credentials_help {
        ui::box_message(
            "凭据文件说明",
            constants::HELP_CREDENTIALS_GUIDE
                .lines()
                .collect::<Vec<_>>()
                .as_slice(),
            |s| s.cyan(),
        );
        eprintln!(
            "\n{} 安全提醒: 请妥善保管你的凭据文件，不要分享给他人。",
            *symbols::INFO
        );
        return Ok(());
    }

    let external_config = load_or_create_external_config()?;
    let mut config = AppConfig::from_external(&external_config);
    if let Some(api_base_url) = &args.api_base_url {
        config = config.with_api_base_url(api_base_url);
    }
    debug!("加载的应用配置: {:?}", config);

    let (credentials, source) =
        resolve_credentials(args.credentials.as_deref(), &external_config)?;
    let credentials = credentials.ok_or_else(|| {
        AppError::Authentication(format!(
            "未找到凭据。请使用 --credentials 指定凭据文件，或设置环境变量 {}。",
            constants::CREDENTIALS_ENV_VAR
        ))
    })?;
    info!("从 {} 加载凭据", source);
    eprintln!("{} 已从 {} 加载凭据。", *symbols::INFO, source);

    let exporter = DocumentExporter::new(&config, ExtractorConfiguration { credentials })?;
    let context = ExtractJobContext {
        exporter: Arc::new(exporter),
        args: args.clone(),
    };

    if let Some(batch_file) = &args.batch_file {
        batch::process_batch_tasks(batch_file, &context).await?;
    } else if let Some(url) = &args.url {
        let file_id = utils::extract_file_id_from_url(url)?;
        info!("从链接中提取到文件 ID: '{}'", file_id);
        context.export_and_emit(&file_id, None).await?;
    } else if let Some(id) = &args.id {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::UserInputError("文件 ID 不能为空。".to_string()));
        }
        if !utils::is_file_id(id) {
            return Err(AppError::UserInputError(format!(
                "无效的文件 ID: '{}' (只能包含字母、数字、'-' 和 '_')",
                id
            )));
        }
        context.export_and_emit(id, None).await?;
    }

    Ok(())
}
