// src/error.rs

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("认证失败: {0}")]
    Authentication(String),
    #[error("文件不存在 (ID 错误或无访问权限): {0}")]
    NotFound(String),
    #[error("不支持的文件类型: '{0}'")]
    UnsupportedType(String),
    #[error("文件 '{document_id}' 的导出内容不是有效的 UTF-8 文本: {source}")]
    Decoding {
        document_id: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("服务暂时不可用: {0}")]
    TransientService(String),
    #[error("服务拒绝了请求 (HTTP {status}): {message}")]
    ServiceRejected { status: StatusCode, message: String },
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("临时文件持久化失败: {0}")]
    TempFilePersist(#[from] tempfile::PersistError),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),
    #[error("{0}")] // 只打印内部信息，不加任何前缀
    UserInputError(String),
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// 传输层错误 (连接失败、超时、读取响应体失败) 一律视为暂时性错误
    pub fn transient(err: reqwest::Error) -> Self {
        AppError::TransientService(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
