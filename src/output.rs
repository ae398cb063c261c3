// src/output.rs

use crate::{error::*, models::ExportResult, utils};
use log::{debug, info, warn};
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

fn named_stem(result: &ExportResult) -> Option<&str> {
    result.metadata.name().filter(|n| !n.trim().is_empty())
}

fn with_extension(result: &ExportResult, stem: &str) -> String {
    let stem = utils::sanitize_filename(stem);
    match result.native_type() {
        Some(native_type) => format!("{}.{}", stem, native_type.extension()),
        None => stem,
    }
}

/// 导出内容写盘时的文件名: 优先使用元数据中的文件名，否则使用文件 ID
pub fn output_filename(result: &ExportResult) -> String {
    with_extension(result, named_stem(result).unwrap_or(&result.document_id))
}

/// 同名文件已存在时使用的文件名，形如 "周报 (1AbC).txt"
pub fn disambiguated_filename(result: &ExportResult) -> String {
    match named_stem(result) {
        Some(name) => with_extension(result, &format!("{} ({})", name, result.document_id)),
        None => output_filename(result),
    }
}

/// 将导出内容写入目标目录。先写入同目录下的临时文件再改名，避免留下半截文件。
///
/// 不同文件可能同名: 目标已存在时改用带文件 ID 的文件名，不会覆盖其他文件的导出结果。
/// 带 ID 的文件名 (或没有文件名、直接以 ID 命名的文件) 只会被同一个文件的再次导出覆盖。
pub fn write_result(output_dir: &Path, result: &ExportResult) -> AppResult<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let target = output_dir.join(output_filename(result));
    debug!("写入文件 '{}' 的导出内容到 {:?}", result.document_id, target);

    let mut temp = tempfile::Builder::new()
        .prefix(".gdrive-extract-")
        .tempfile_in(output_dir)?;
    temp.write_all(result.content.as_bytes())?;
    temp.flush()?;

    let target = if named_stem(result).is_none() {
        temp.persist(&target)?;
        target
    } else {
        match temp.persist_noclobber(&target) {
            Ok(_) => target,
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                let fallback = output_dir.join(disambiguated_filename(result));
                warn!(
                    "'{}' 已存在，文件 '{}' 改为保存到 '{}'",
                    target.display(),
                    result.document_id,
                    fallback.display()
                );
                e.file.persist(&fallback)?;
                fallback
            }
            Err(e) => return Err(e.into()),
        }
    };

    info!("已保存: {}", target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metadata;
    use serde_json::json;

    fn result_with(metadata: serde_json::Value, content: &str) -> ExportResult {
        ExportResult {
            metadata: Metadata::from_json(metadata.as_object().cloned().unwrap()),
            content: content.to_string(),
            document_id: "doc-1".to_string(),
        }
    }

    #[test]
    fn test_output_filename() {
        let r = result_with(
            json!({"name": "Q3: 计划/草稿", "mimeType": "application/vnd.google-apps.document"}),
            "",
        );
        assert_eq!(output_filename(&r), "Q3 计划 草稿.txt");

        let r = result_with(json!({"mimeType": "application/vnd.google-apps.presentation"}), "");
        assert_eq!(output_filename(&r), "doc-1.pptx");

        let r = result_with(json!({"name": "  "}), "");
        assert_eq!(output_filename(&r), "doc-1");
    }

    #[test]
    fn test_write_result_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested");
        let r = result_with(
            json!({"name": "notes", "mimeType": "application/vnd.google-apps.document"}),
            "hello\nworld",
        );

        let path = write_result(&out_dir, &r).unwrap();
        assert_eq!(path, out_dir.join("notes.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\nworld");
        // 不留下临时文件
        assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 1);
    }

    #[test]
    fn test_same_name_documents_do_not_overwrite_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let meta = json!({"name": "Untitled document", "mimeType": "application/vnd.google-apps.document"});
        let first = ExportResult {
            document_id: "id-A".into(),
            ..result_with(meta.clone(), "AAA")
        };
        let second = ExportResult {
            document_id: "id-B".into(),
            ..result_with(meta, "BBB")
        };

        let p1 = write_result(dir.path(), &first).unwrap();
        let p2 = write_result(dir.path(), &second).unwrap();

        assert_eq!(p1, dir.path().join("Untitled document.txt"));
        assert_eq!(p2, dir.path().join("Untitled document (id-B).txt"));
        assert_eq!(fs::read_to_string(&p1).unwrap(), "AAA");
        assert_eq!(fs::read_to_string(&p2).unwrap(), "BBB");

        // 再次导出 id-B 只会刷新它自己的文件
        let refreshed = ExportResult { content: "BBB v2".into(), ..second };
        assert_eq!(write_result(dir.path(), &refreshed).unwrap(), p2);
        assert_eq!(fs::read_to_string(&p1).unwrap(), "AAA");
        assert_eq!(fs::read_to_string(&p2).unwrap(), "BBB v2");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_unnamed_document_is_refreshed_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let r = result_with(json!({"mimeType": "application/vnd.google-apps.document"}), "v1");
        let path = write_result(dir.path(), &r).unwrap();
        assert_eq!(path, dir.path().join("doc-1.txt"));

        let r2 = ExportResult { content: "v2".into(), ..r };
        assert_eq!(write_result(dir.path(), &r2).unwrap(), path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "v2");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
