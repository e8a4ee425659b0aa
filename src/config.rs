use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// 默认配置文件名（位于工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "persona_dashboard.toml";

/// 程序配置
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 角色服务的基础 URL
    pub api_base_url: String,
    /// 服务端每分钟请求上限（只用于估算一括提问耗时）
    pub rpm_limit: u32,
    /// 用量轮询间隔（秒）
    pub usage_poll_interval_secs: u64,
    /// 连接超时（秒），不限制流式响应体的读取时间
    pub connect_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            rpm_limit: 15,
            usage_poll_interval_secs: 10,
            connect_timeout_secs: 10,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 按 默认值 → 配置文件 → 环境变量 的顺序加载配置
    ///
    /// 配置文件路径取自 `PERSONA_DASHBOARD_CONFIG`，
    /// 未设置时若工作目录下存在 `persona_dashboard.toml` 则读取它
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("PERSONA_DASHBOARD_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };
        base.with_env_overrides()
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// 解析 TOML 文本
    pub fn from_toml_str(content: &str, origin: &str) -> AppResult<Self> {
        let config = toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: origin.to_string(),
            source,
        })?;
        Ok(config)
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> AppResult<Self> {
        Ok(Self {
            api_base_url: std::env::var("PERSONA_API_URL").unwrap_or(self.api_base_url),
            rpm_limit: env_parse("RPM_LIMIT", "u32")?.unwrap_or(self.rpm_limit),
            usage_poll_interval_secs: env_parse("USAGE_POLL_INTERVAL_SECS", "u64")?
                .unwrap_or(self.usage_poll_interval_secs),
            connect_timeout_secs: env_parse("CONNECT_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.connect_timeout_secs),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
        })
    }

    /// 命令行参数覆盖（优先级最高）
    pub fn with_cli_overrides(mut self, api_url: Option<String>, verbose: bool) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        self.verbose_logging |= verbose;
        self
    }

    pub fn usage_poll_interval(&self) -> Duration {
        Duration::from_secs(self.usage_poll_interval_secs.max(1))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn env_parse<T: FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}
