// src/config/credentials.rs

use crate::{
    config::ExternalConfig, // 只需要从父模块导入结构体定义
    constants::{self, api::credential_keys},
    error::{AppError, AppResult},
    utils,
};
use anyhow::{Context, anyhow};
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, info};
use reqwest::header::HeaderValue;
use serde_json::{Map, Value};
use std::{
    collections::HashMap,
    fmt, fs,
    path::{Path, PathBuf},
};

pub(super) fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub(crate) fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("读取配置文件 '{}' 失败", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 '{}' 失败", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}

/// 读取凭据 JSON 文件。非字符串的值 (如 scopes 数组) 以 JSON 文本保存。
pub fn load_credentials_file(path: &Path) -> AppResult<HashMap<String, String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("读取凭据文件 '{}' 失败", path.display()))?;
    let raw: Map<String, Value> = serde_json::from_str(&content).map_err(|e| {
        AppError::Authentication(format!("凭据文件 '{}' 不是有效的 JSON 对象: {}", path.display(), e))
    })?;
    Ok(utils::flatten_json_object(raw).collect())
}

/// 按 命令行参数 > 环境变量 > 本地配置文件 的顺序查找凭据，返回凭据和来源描述
pub fn resolve_credentials(
    cli_path: Option<&Path>,
    external_config: &ExternalConfig,
) -> AppResult<(Option<HashMap<String, String>>, String)> {
    if let Some(path) = cli_path {
        debug!("使用来自命令行参数的凭据文件: {}", path.display());
        return Ok((Some(load_credentials_file(path)?), "命令行参数".to_string()));
    }
    if let Ok(path) = std::env::var(constants::CREDENTIALS_ENV_VAR) && !path.is_empty() {
        debug!("使用来自环境变量 {} 的凭据文件", constants::CREDENTIALS_ENV_VAR);
        return Ok((
            Some(load_credentials_file(Path::new(&path))?),
            format!("环境变量 ({})", constants::CREDENTIALS_ENV_VAR),
        ));
    }
    if let Some(credentials) = &external_config.credentials
        && !credentials.is_empty()
    {
        debug!("使用来自本地配置文件的凭据");
        return Ok((Some(credentials.clone()), "本地配置文件".to_string()));
    }
    debug!("未在任何位置找到可用的凭据");
    Ok((None, "未找到".to_string()))
}

/// 从 "已授权用户" 凭据中取出的 Access Token。
/// 凭据的其余部分在客户端构建完成后即被丢弃。
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn from_authorized_user_info(info: &HashMap<String, String>) -> AppResult<Self> {
        Self::from_authorized_user_info_at(info, Utc::now())
    }

    pub(crate) fn from_authorized_user_info_at(
        info: &HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        let missing: Vec<&str> = [
            credential_keys::CLIENT_ID,
            credential_keys::CLIENT_SECRET,
            credential_keys::REFRESH_TOKEN,
        ]
        .into_iter()
        .filter(|key| info.get(*key).is_none_or(|v| v.trim().is_empty()))
        .collect();
        if !missing.is_empty() {
            return Err(AppError::Authentication(format!(
                "凭据格式错误，缺少字段: {}",
                missing.join(", ")
            )));
        }

        let token = info
            .get(credential_keys::TOKEN)
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Authentication("凭据中没有 Access Token (不支持自动刷新)".to_string())
            })?;

        if let Some(expiry) = info.get(credential_keys::EXPIRY) {
            let expiry = parse_expiry(expiry)?;
            if expiry <= now {
                return Err(AppError::Authentication(format!(
                    "Access Token 已于 {} 过期",
                    expiry.format("%Y-%m-%d %H:%M:%S UTC")
                )));
            }
        }

        Ok(AccessToken(token.to_string()))
    }

    /// 构造 `Authorization: Bearer ...` 头，并标记为敏感以避免被打印
    pub fn to_header_value(&self) -> AppResult<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0))
            .map_err(|_| AppError::Authentication("Access Token 含有非法字符".to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// 解析形如 "2024-01-01T00:00:00Z" 或 "2024-01-01T00:00:00.123456" 的 UTC 时间
fn parse_expiry(raw: &str) -> AppResult<DateTime<Utc>> {
    let trimmed = raw.trim().trim_end_matches('Z');
    let without_fraction = trimmed.split('.').next().unwrap_or(trimmed);
    NaiveDateTime::parse_from_str(without_fraction, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| AppError::Authentication(format!("无法解析凭据过期时间 '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn info(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_info() -> HashMap<String, String> {
        info(&[
            ("client_id", "id.apps.googleusercontent.com"),
            ("client_secret", "secret"),
            ("refresh_token", "1//refresh"),
            ("token", "ya29.access"),
            ("expiry", "2030-06-01T12:00:00.250000Z"),
        ])
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_valid_credentials_produce_bearer_header() {
        let token = AccessToken::from_authorized_user_info_at(&full_info(), now()).unwrap();
        let header = token.to_header_value().unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer ya29.access");
        assert!(header.is_sensitive());
        assert_eq!(format!("{:?}", token), "AccessToken(***)");
    }

    #[test]
    fn test_missing_required_fields_is_authentication_error() {
        let mut creds = full_info();
        creds.remove("client_secret");
        creds.insert("refresh_token".into(), "  ".into());
        match AccessToken::from_authorized_user_info_at(&creds, now()) {
            Err(AppError::Authentication(msg)) => {
                assert!(msg.contains("client_secret"));
                assert!(msg.contains("refresh_token"));
            }
            other => panic!("预期认证错误，实际: {:?}", other),
        }
    }

    #[test]
    fn test_missing_access_token_is_rejected() {
        let mut creds = full_info();
        creds.remove("token");
        assert!(matches!(
            AccessToken::from_authorized_user_info_at(&creds, now()),
            Err(AppError::Authentication(_))
        ));
    }

    #[test]
    fn test_expiry_handling() {
        let mut creds = full_info();
        creds.insert("expiry".into(), "2020-01-01T00:00:00Z".into());
        assert!(matches!(
            AccessToken::from_authorized_user_info_at(&creds, now()),
            Err(AppError::Authentication(_))
        ));

        creds.insert("expiry".into(), "not-a-date".into());
        assert!(matches!(
            AccessToken::from_authorized_user_info_at(&creds, now()),
            Err(AppError::Authentication(_))
        ));

        // 没有 Z 后缀也可以
        creds.insert("expiry".into(), "2030-01-01T00:00:00".into());
        assert!(AccessToken::from_authorized_user_info_at(&creds, now()).is_ok());

        creds.remove("expiry");
        assert!(AccessToken::from_authorized_user_info_at(&creds, now()).is_ok());
    }

    #[test]
    fn test_load_credentials_file_flattens_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        fs::write(
            &path,
            r#"{"client_id":"a","client_secret":"b","refresh_token":"c","token":"d","scopes":["drive.readonly"],"expiry":null}"#,
        )
        .unwrap();
        let creds = load_credentials_file(&path).unwrap();
        assert_eq!(creds.get("token").map(String::as_str), Some("d"));
        assert_eq!(creds.get("scopes").map(String::as_str), Some(r#"["drive.readonly"]"#));
        assert!(!creds.contains_key("expiry"));

        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(load_credentials_file(&path), Err(AppError::Authentication(_))));
    }

    #[test]
    fn test_resolve_credentials_uses_the_given_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        fs::write(&path, r#"{"token":"from-file"}"#).unwrap();

        let external = ExternalConfig {
            credentials: Some(info(&[("token", "from-config")])),
            ..ExternalConfig::default_app_config()
        };

        // 命令行参数优先于配置文件
        let (creds, source) = resolve_credentials(Some(path.as_path()), &external).unwrap();
        assert_eq!(creds.unwrap()["token"], "from-file");
        assert_eq!(source, "命令行参数");

        if std::env::var(constants::CREDENTIALS_ENV_VAR).is_ok() {
            return;
        }
        let (creds, source) = resolve_credentials(None, &external).unwrap();
        assert_eq!(creds.unwrap()["token"], "from-config");
        assert_eq!(source, "本地配置文件");

        let (creds, _) = resolve_credentials(None, &ExternalConfig::default_app_config()).unwrap();
        assert!(creds.is_none());
    }
}
