// src/utils.rs

use crate::{constants, error::*};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use std::{ffi::OsStr, path::Path};
use url::Url;

pub static FILE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());
// 例如 /document/d/<id>/edit, /spreadsheets/u/1/d/<id>, /file/d/<id>/view
static DRIVE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:document|spreadsheets|presentation|file)/(?:u/\d+/)?d/([A-Za-z0-9_-]+)").unwrap()
});
static ILLEGAL_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub fn is_file_id(text: &str) -> bool {
    FILE_ID_PATTERN.is_match(text)
}

/// 从 Drive / Docs 分享链接中提取文件 ID
pub fn extract_file_id_from_url(url_str: &str) -> AppResult<String> {
    let url = Url::parse(url_str)?;
    if let Some(caps) = DRIVE_PATH_RE.captures(url.path()) {
        return Ok(caps[1].to_string());
    }
    if let Some((_, id)) = url.query_pairs().find(|(k, _)| k == "id")
        && is_file_id(&id)
    {
        return Ok(id.into_owned());
    }
    Err(AppError::UserInputError(format!(
        "无法从链接 '{}' 中识别文件 ID。",
        url_str
    )))
}

/// 解析一条任务输入: 可以是文件 ID，也可以是分享链接。无法识别时返回 None。
pub fn parse_task_input(input: &str) -> Option<String> {
    let input = input.trim();
    if is_file_id(input) {
        Some(input.to_string())
    } else if Url::parse(input).is_ok() {
        extract_file_id_from_url(input).ok()
    } else {
        None
    }
}

/// 将 JSON 对象扁平化为字符串键值对: 字符串原样保留，null 丢弃，其余值转为紧凑 JSON 文本
pub fn flatten_json_object(raw: Map<String, Value>) -> impl Iterator<Item = (String, String)> {
    raw.into_iter().filter_map(|(key, value)| match value {
        Value::Null => None,
        Value::String(s) => Some((key, s)),
        other => Some((key, other.to_string())),
    })
}

pub fn sanitize_filename(name: &str) -> String {
    let original_name = name.trim();
    if original_name.is_empty() { return "unknown".to_string(); }

    let stem = Path::new(original_name)
        .file_stem()
        .unwrap_or_else(|| OsStr::new(original_name))
        .to_string_lossy()
        .to_uppercase();
    let windows_reserved = [
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
        "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];

    let mut name = if windows_reserved.contains(&stem.as_ref()) {
        format!("_{}", original_name)
    } else {
        original_name.to_string()
    };

    name = ILLEGAL_CHARS_RE.replace_all(&name, " ").into_owned();
    name = WHITESPACE_RE.replace_all(&name, " ").trim().to_string();
    name = name.trim_matches(|c: char| c == '.' || c.is_whitespace()).to_string();
    if name.is_empty() { return "unnamed".to_string(); }

    if name.len() > constants::MAX_FILENAME_BYTES {
        name = safe_truncate_utf8(&name, constants::MAX_FILENAME_BYTES).to_string();
    }
    name
}

fn safe_truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes { return s; }
    let mut i = max_bytes;
    while i > 0 && !s.is_char_boundary(i) { i -= 1; }
    &s[..i]
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_file_id_from_url() {
        let id = "1AbC-dEf_GhIjKlMnOpQrStUvWxYz0123456789";
        let cases = [
            format!("https://docs.google.com/document/d/{}/edit", id),
            format!("https://docs.google.com/spreadsheets/d/{}/edit#gid=0", id),
            format!("https://docs.google.com/presentation/u/1/d/{}/view", id),
            format!("https://drive.google.com/file/d/{}/view?usp=sharing", id),
            format!("https://drive.google.com/open?id={}", id),
        ];
        for url in &cases {
            assert_eq!(extract_file_id_from_url(url).unwrap(), id, "链接: {}", url);
        }

        assert!(matches!(
            extract_file_id_from_url("https://example.com/nothing/here"),
            Err(AppError::UserInputError(_))
        ));
        assert!(matches!(extract_file_id_from_url("not a url"), Err(AppError::Url(_))));
    }

    #[test]
    fn test_parse_task_input() {
        assert_eq!(parse_task_input("  abc_123-X "), Some("abc_123-X".to_string()));
        assert_eq!(
            parse_task_input("https://docs.google.com/document/d/doc-id/edit"),
            Some("doc-id".to_string())
        );
        assert_eq!(parse_task_input("https://example.com/"), None);
        assert_eq!(parse_task_input("has spaces"), None);
        assert_eq!(parse_task_input(""), None);
    }

    #[test]
    fn test_sanitize_filename() {
        // 测试非法字符
        assert_eq!(sanitize_filename("a\\b/c:d*e?f\"g<h>i|j"), "a b c d e f g h i j".to_string());

        // 测试首尾空格和点
        assert_eq!(sanitize_filename(" . my file. "), "my file".to_string());

        // 测试 Windows 保留字 (大小写不敏感)
        assert_eq!(sanitize_filename("aux"), "_aux".to_string());

        // 测试空或只有非法字符的输入
        assert_eq!(sanitize_filename(""), "unknown".to_string());
        assert_eq!(sanitize_filename("<>|"), "unnamed".to_string());

        // 超长文件名按字节截断且不破坏 UTF-8
        let long_name = "季度报告".repeat(40);
        let truncated = sanitize_filename(&long_name);
        assert!(truncated.len() <= constants::MAX_FILENAME_BYTES);
        assert!(long_name.starts_with(&truncated));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 60), "short");
        assert_eq!(truncate_text("abcdefghij", 8), "abcde...");
    }
}
