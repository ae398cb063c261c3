// src/batch.rs

use crate::{ExtractJobContext, error::*, symbols, ui, utils};
use anyhow::anyhow;
use colored::*;
use log::{error, info, warn};
use std::{collections::BTreeMap, path::Path};

#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// 批量任务的统计与失败明细
#[derive(Default, Debug)]
pub struct BatchReport {
    stats: BatchStats,
    failed: Vec<(String, String)>,
    skipped: Vec<(String, String)>,
}

impl BatchReport {
    pub fn new(total_tasks: usize) -> Self {
        info!("开始新一批导出任务，总数: {}", total_tasks);
        Self {
            stats: BatchStats {
                total: total_tasks,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn record_success(&mut self) {
        self.stats.success += 1;
    }

    pub fn record_skip(&mut self, task: &str, reason: &str) {
        warn!("跳过任务 '{}'，原因: {}", task, reason);
        self.stats.skipped += 1;
        self.skipped.push((task.to_string(), reason.to_string()));
    }

    pub fn record_failure(&mut self, task: &str, err: &AppError) {
        error!("批量任务 '{}' 失败: {}", task, err);
        self.stats.failed += 1;
        self.failed.push((task.to_string(), failure_category(err).to_string()));
    }

    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }

    pub fn did_all_succeed(&self) -> bool {
        self.stats.failed == 0
    }

    pub fn print_report(&self) {
        let stats = &self.stats;
        info!(
            "导出报告: Total={}, Success={}, Skipped={}, Failed={}",
            stats.total, stats.success, stats.skipped, stats.failed
        );

        if !self.skipped.is_empty() || !self.failed.is_empty() {
            ui::print_sub_header("导出详情报告");
            if !self.skipped.is_empty() {
                eprintln!("\n{} 跳过的任务 ({}个):", *symbols::INFO, stats.skipped);
                print_grouped_report(&self.skipped, |s| s.cyan());
            }
            if !self.failed.is_empty() {
                eprintln!("\n{} 失败的任务 ({}个):", *symbols::ERROR, stats.failed);
                print_grouped_report(&self.failed, |s| s.red());
            }
        }
        ui::print_sub_header("任务总结");
        if stats.total > 0 && stats.failed == 0 {
            eprintln!(
                "{} 所有 {} 个任务均已完成 ({} 个已跳过)。",
                *symbols::OK,
                stats.total,
                stats.skipped
            );
        } else {
            eprintln!(
                "{} | {} | {}",
                format!("成功: {}", stats.success).green(),
                format!("失败: {}", stats.failed).red(),
                format!("跳过: {}", stats.skipped).yellow()
            );
        }
    }
}

/// 报告中按错误类别归类，而不是逐条打印完整错误信息
fn failure_category(err: &AppError) -> &'static str {
    match err {
        AppError::Authentication(_) => "认证失败",
        AppError::NotFound(_) => "文件不存在",
        AppError::UnsupportedType(_) => "不支持的文件类型",
        AppError::Decoding { .. } => "导出内容不是 UTF-8 文本",
        AppError::TransientService(_) => "服务暂时不可用",
        AppError::ServiceRejected { .. } => "服务拒绝了请求",
        AppError::Io(_) | AppError::TempFilePersist(_) => "写入文件失败",
        _ => "其他错误",
    }
}

fn print_grouped_report(items: &[(String, String)], color_fn: fn(ColoredString) -> ColoredString) {
    let mut grouped: BTreeMap<&String, Vec<&String>> = BTreeMap::new();
    for (task, reason) in items {
        grouped.entry(reason).or_default().push(task);
    }
    for (reason, mut tasks) in grouped {
        eprintln!("  - {}", color_fn(format!("原因: {}", reason).into()));
        tasks.sort();
        for task in tasks {
            eprintln!("    - {}", task);
        }
    }
}

/// 读取批量文件中的非空行
pub fn read_batch_file(batch_file: &Path) -> AppResult<Vec<String>> {
    let content = std::fs::read_to_string(batch_file).map_err(|e| {
        error!("读取批量文件 '{}' 失败: {}", batch_file.display(), e);
        AppError::from(e)
    })?;

    Ok(content
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .collect())
}

/// 逐个导出批量文件中的任务。任何一个任务失败，整体返回错误。
pub async fn process_batch_tasks(batch_file: &Path, context: &ExtractJobContext) -> AppResult<()> {
    let tasks = read_batch_file(batch_file)?;
    if tasks.is_empty() {
        warn!("批量文件 '{}' 为空或不含有效行。", batch_file.display());
        eprintln!("{} 批量文件 '{}' 为空。", *symbols::WARN, batch_file.display());
        return Ok(());
    }

    ui::print_header(&format!("开始批量导出 {} 个任务", tasks.len()));
    let mut report = BatchReport::new(tasks.len());
    let pbar = ui::new_tasks_progress_bar(tasks.len() as u64, "导出");

    for task in &tasks {
        pbar.set_message(utils::truncate_text(task, 40));
        match utils::parse_task_input(task) {
            Some(file_id) => match context.export_and_emit(&file_id, Some(&pbar)).await {
                Ok(()) => report.record_success(),
                Err(e) => {
                    pbar.suspend(|| eprintln!("{} 任务 '{}' 失败: {}", *symbols::ERROR, task, e));
                    report.record_failure(task, &e);
                }
            },
            None => report.record_skip(task, "无效条目 (既不是文件 ID 也不是可识别的链接)"),
        }
        pbar.inc(1);
    }
    pbar.finish_and_clear();

    report.print_report();
    if report.did_all_succeed() {
        Ok(())
    } else {
        Err(AppError::Other(anyhow!("{} 个批量任务执行失败。", report.stats().failed)))
    }
}
