// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const CREDENTIALS_ENV_VAR: &str = "GDRIVE_CREDENTIALS";
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const USER_AGENT: &str = concat!(clap::crate_name!(), "/", clap::crate_version!());

pub const HELP_CREDENTIALS_GUIDE: &str = r#"
凭据文件是 OAuth "已授权用户" (authorized user) 格式的 JSON，例如：
----------------------------------------------
{
  "client_id": "xxxx.apps.googleusercontent.com",
  "client_secret": "xxxx",
  "refresh_token": "1//xxxx",
  "token": "ya29.xxxx",
  "expiry": "2030-01-01T00:00:00Z"
}
----------------------------------------------
本工具不会刷新 Access Token，"token" 字段必须有效且未过期。
凭据查找顺序: --credentials 参数 > 环境变量 GDRIVE_CREDENTIALS > 本地配置文件。"#;

pub mod api {
    /// 元数据请求时使用的字段选择，'*' 表示全部字段
    pub const ALL_FIELDS: &str = "*";
    pub const MIME_TYPE_FIELD: &str = "mimeType";
    pub const NAME_FIELD: &str = "name";

    pub mod credential_keys {
        pub const CLIENT_ID: &str = "client_id";
        pub const CLIENT_SECRET: &str = "client_secret";
        pub const REFRESH_TOKEN: &str = "refresh_token";
        pub const TOKEN: &str = "token";
        pub const EXPIRY: &str = "expiry";
    }

    pub mod native_types {
        pub const DOCUMENT: &str = "application/vnd.google-apps.document";
        pub const SPREADSHEET: &str = "application/vnd.google-apps.spreadsheet";
        pub const PRESENTATION: &str = "application/vnd.google-apps.presentation";
    }

    pub mod export_formats {
        pub const PLAIN_TEXT: &str = "text/plain";
        pub const XLSX: &str =
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
        pub const PPTX: &str =
            "application/vnd.openxmlformats-officedocument.presentationml.presentation";
    }
}
