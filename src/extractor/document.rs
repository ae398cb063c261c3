// src/extractor/document.rs

use super::Processor;
use crate::{
    client::{DocumentService, DriveClient},
    config::AppConfig,
    constants,
    error::*,
    models::{
        ExportRequest, ExportResult, ExtractorConfiguration, ExtractorInput, ExtractorOutput,
        Metadata, NativeType,
    },
};
use async_trait::async_trait;
use log::{debug, info, warn};

/// 读取文件元数据，按类型选择导出格式，并将导出结果解码为文本
pub struct DocumentExporter<S = DriveClient> {
    service: S,
}

impl DocumentExporter<DriveClient> {
    /// 用凭据构建一个认证过的 Drive 客户端。凭据格式错误时返回认证错误。
    pub fn new(config: &AppConfig, configuration: ExtractorConfiguration) -> AppResult<Self> {
        debug!("构建 DocumentExporter: {:?}", configuration);
        let service = DriveClient::new(config, &configuration.credentials)?;
        Ok(Self::with_service(service))
    }
}

impl<S: DocumentService> DocumentExporter<S> {
    pub fn with_service(service: S) -> Self {
        Self { service }
    }

    pub async fn export(&self, request: &ExportRequest) -> AppResult<ExportResult> {
        let document_id = request.document_id.as_str();
        info!("开始导出文件, ID: {}", document_id);
        ensure_addressable(document_id)?;

        let raw = self
            .service
            .get_metadata(document_id, constants::api::ALL_FIELDS)
            .await?;
        let metadata = Metadata::from_json(raw);

        let mime_type = metadata.mime_type().unwrap_or_default();
        let native_type = select_native_type(mime_type)?;
        let target = native_type.export_mime_type();
        debug!("文件 '{}' 类型为 {}，导出为 '{}'", document_id, native_type, target);

        let bytes = self.service.export_content(document_id, target).await?;
        let content = String::from_utf8(bytes).map_err(|source| AppError::Decoding {
            document_id: document_id.to_string(),
            source,
        })?;

        info!("文件 '{}' 导出完成，共 {} 个字符", document_id, content.chars().count());
        Ok(ExportResult {
            metadata,
            content,
            document_id: request.document_id.clone(),
        })
    }
}

/// 空 ID 以及 "." / ".." 无法作为 files/{id} 的路径段，不可能对应任何文件
fn ensure_addressable(document_id: &str) -> AppResult<()> {
    if matches!(document_id.trim(), "" | "." | "..") {
        warn!("文件 ID '{}' 无法定位任何文件", document_id);
        return Err(AppError::NotFound(document_id.to_string()));
    }
    Ok(())
}

fn select_native_type(mime_type: &str) -> AppResult<NativeType> {
    match NativeType::from_mime_type(mime_type) {
        Some(native_type) => Ok(native_type),
        None => {
            warn!("不支持的文件类型: '{}'", mime_type);
            Err(AppError::UnsupportedType(mime_type.to_string()))
        }
    }
}

#[async_trait]
impl Processor for DocumentExporter<DriveClient> {
    type Configuration = (AppConfig, ExtractorConfiguration);
    type Input = ExtractorInput;
    type Output = ExtractorOutput;

    fn from_configuration((config, configuration): Self::Configuration) -> AppResult<Self> {
        Self::new(&config, configuration)
    }

    async fn process(&self, input: ExtractorInput) -> AppResult<ExtractorOutput> {
        let request = ExportRequest::from(input);
        let result = self.export(&request).await?;
        Ok(ExtractorOutput { result })
    }
}
