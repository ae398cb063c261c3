// src/extractor/mod.rs

pub mod document;

use crate::error::*;
use async_trait::async_trait;

/// 通用处理器契约: 由配置构建，再逐个处理输入
#[async_trait]
pub trait Processor: Send + Sync {
    type Configuration;
    type Input: Send + 'static;
    type Output;

    fn from_configuration(configuration: Self::Configuration) -> AppResult<Self>
    where
        Self: Sized;

    async fn process(&self, input: Self::Input) -> AppResult<Self::Output>;
}

pub use document::DocumentExporter;
