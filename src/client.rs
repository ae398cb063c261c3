// src/client.rs

use crate::{
    config::{AppConfig, credentials::AccessToken},
    error::*,
    models::api::GoogleErrorResponse,
};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{
    Response, StatusCode,
    header::{AUTHORIZATION, HeaderMap},
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use url::Url;

/// 文档服务的最小接口: 获取元数据、导出内容
#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn get_metadata(&self, file_id: &str, fields: &str) -> AppResult<Map<String, Value>>;

    async fn export_content(&self, file_id: &str, mime_type: &str) -> AppResult<Vec<u8>>;
}

/// 基于 reqwest 的 Drive v3 客户端。构建后只保留带认证头的 HTTP 客户端。
#[derive(Clone)]
pub struct DriveClient {
    client: reqwest::Client,
    files_url: Url,
}

impl DriveClient {
    pub fn new(config: &AppConfig, credentials: &HashMap<String, String>) -> AppResult<Self> {
        let token = AccessToken::from_authorized_user_info(credentials)?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, token.to_header_value()?);

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(AppError::transient)?;

        let files_url = Url::parse(&format!("{}/drive/v3/files", config.api_base_url))?;
        debug!("Drive 客户端已创建, 服务地址: {}", files_url);

        Ok(Self { client, files_url })
    }

    /// 拼接 files/{id}[/suffix]，文件 ID 作为路径段会被正确转义
    fn file_url(&self, file_id: &str, suffix: Option<&str>) -> AppResult<Url> {
        let mut url = self.files_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AppError::UserInputError(format!("无效的服务地址: {}", self.files_url)))?;
            segments.push(file_id);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    async fn get(&self, url: Url, file_id: &str) -> AppResult<Response> {
        debug!("GET {}", url);
        let res = self.client.get(url).send().await.map_err(AppError::transient)?;
        check_status(res, file_id).await
    }
}

/// 将 HTTP 状态码映射为对应的错误类型
async fn check_status(res: Response, file_id: &str) -> AppResult<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    let parsed = GoogleErrorResponse::parse(&body);
    let reason = parsed.as_ref().and_then(|p| p.reason().map(str::to_string));
    let message = parsed
        .and_then(|p| p.describe())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("未知错误").to_string());
    warn!("请求文件 '{}' 失败: HTTP {} - {}", file_id, status, message);

    Err(match status {
        StatusCode::NOT_FOUND => AppError::NotFound(file_id.to_string()),
        StatusCode::UNAUTHORIZED => AppError::Authentication(message),
        StatusCode::FORBIDDEN => match reason.as_deref() {
            Some("rateLimitExceeded" | "userRateLimitExceeded") => AppError::TransientService(message),
            Some("insufficientPermissions" | "authError" | "forbidden") | None => {
                AppError::Authentication(message)
            }
            Some(_) => AppError::ServiceRejected { status, message },
        },
        StatusCode::TOO_MANY_REQUESTS => AppError::TransientService(message),
        s if s.is_server_error() => AppError::TransientService(format!("HTTP {}: {}", s, message)),
        _ => AppError::ServiceRejected { status, message },
    })
}

#[async_trait]
impl DocumentService for DriveClient {
    async fn get_metadata(&self, file_id: &str, fields: &str) -> AppResult<Map<String, Value>> {
        let mut url = self.file_url(file_id, None)?;
        url.query_pairs_mut().append_pair("fields", fields);
        let res = self.get(url, file_id).await?;
        let body = res.bytes().await.map_err(AppError::transient)?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn export_content(&self, file_id: &str, mime_type: &str) -> AppResult<Vec<u8>> {
        let mut url = self.file_url(file_id, Some("export"))?;
        url.query_pairs_mut().append_pair("mimeType", mime_type);
        let res = self.get(url, file_id).await?;
        let body = res.bytes().await.map_err(AppError::transient)?;
        debug!("文件 '{}' 导出为 '{}'，共 {} 字节", file_id, mime_type, body.len());
        Ok(body.to_vec())
    }
}
