// src/models/mod.rs

pub mod api;

use crate::constants::api::{export_formats, native_types};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt};

/// 云端原生文件类型。只有这三种类型可以通过导出接口转换为其他格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    Document,
    Spreadsheet,
    Presentation,
}

impl NativeType {
    pub const ALL: [NativeType; 3] = [
        NativeType::Document,
        NativeType::Spreadsheet,
        NativeType::Presentation,
    ];

    /// 根据元数据中的 mimeType 识别原生类型，未知类型返回 None
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type {
            native_types::DOCUMENT => Some(NativeType::Document),
            native_types::SPREADSHEET => Some(NativeType::Spreadsheet),
            native_types::PRESENTATION => Some(NativeType::Presentation),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            NativeType::Document => native_types::DOCUMENT,
            NativeType::Spreadsheet => native_types::SPREADSHEET,
            NativeType::Presentation => native_types::PRESENTATION,
        }
    }

    /// 导出时请求的目标格式
    pub fn export_mime_type(&self) -> &'static str {
        match self {
            NativeType::Document => export_formats::PLAIN_TEXT,
            NativeType::Spreadsheet => export_formats::XLSX,
            NativeType::Presentation => export_formats::PPTX,
        }
    }

    /// 导出内容写入磁盘时使用的扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            NativeType::Document => "txt",
            NativeType::Spreadsheet => "xlsx",
            NativeType::Presentation => "pptx",
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Document => write!(f, "document"),
            NativeType::Spreadsheet => write!(f, "spreadsheet"),
            NativeType::Presentation => write!(f, "presentation"),
        }
    }
}

/// 扁平化后的文件元数据 (字符串到字符串的映射)。
///
/// 字符串值原样保留，`null` 被丢弃，其余值 (数字、布尔、数组、对象) 以紧凑 JSON 文本保存。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    pub fn from_json(raw: Map<String, Value>) -> Self {
        Metadata(crate::utils::flatten_json_object(raw).collect())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.get(crate::constants::api::MIME_TYPE_FIELD)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(crate::constants::api::NAME_FIELD)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(alias = "file_id")]
    pub document_id: String,
}

impl ExportRequest {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportResult {
    pub metadata: Metadata,
    pub content: String,
    pub document_id: String,
}

impl ExportResult {
    /// 根据元数据中的类型标签推断写盘时的扩展名
    pub fn native_type(&self) -> Option<NativeType> {
        self.metadata.mime_type().and_then(NativeType::from_mime_type)
    }
}

// --- 处理器契约的输入/输出/配置结构 ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorInput {
    pub file_id: String,
}

impl From<ExtractorInput> for ExportRequest {
    fn from(input: ExtractorInput) -> Self {
        ExportRequest::new(input.file_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorOutput {
    pub result: ExportResult,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ExtractorConfiguration {
    pub credentials: std::collections::HashMap<String, String>,
}

// 凭据内容不得出现在日志中
impl fmt::Debug for ExtractorConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.credentials.keys().collect();
        keys.sort();
        f.debug_struct("ExtractorConfiguration")
            .field("credential_keys", &keys)
            .finish()
    }
}
