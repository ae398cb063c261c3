// src/models/api.rs

use serde::Deserialize;

// --- Google API 错误响应结构体 ---
// 形如 {"error": {"code": 404, "message": "File not found: xxx.", "errors": [...]}}

#[derive(Deserialize, Debug, Clone)]
pub struct GoogleErrorResponse {
    pub error: GoogleErrorBody,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GoogleErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<GoogleErrorDetail>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GoogleErrorDetail {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl GoogleErrorResponse {
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// 第一个带 reason 的错误明细，例如 "rateLimitExceeded"
    pub fn reason(&self) -> Option<&str> {
        self.error.errors.iter().find_map(|e| e.reason.as_deref())
    }

    /// 组合成可读的错误信息
    pub fn describe(&self) -> Option<String> {
        let message = self
            .error
            .message
            .as_deref()
            .or_else(|| self.error.errors.iter().find_map(|e| e.message.as_deref()))?;
        Some(match self.reason() {
            Some(reason) => format!("{} ({})", message, reason),
            None => message.to_string(),
        })
    }
}
