//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，并允许环境变量覆盖密钥

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// 配置文件查找顺序
const CONFIG_PATHS: [&str; 2] = ["config.json", "config/config.json"];

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
    /// 允许跨域访问的来源
    #[serde(default = "default_cors_origin")]
    pub cors_allow_origin: String,
}

/// 上游请求配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// Finnhub 行情数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinnhubConfig {
    /// API Token（环境变量 FINNHUB_API_KEY 优先）
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_finnhub_base_url")]
    pub base_url: String,
    /// 财报日历查询窗口（向前、向后各多少个自然月）
    #[serde(default = "default_earnings_window_months")]
    pub earnings_window_months: u32,
}

/// Gemini 摘要生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API Key（环境变量 GEMINI_API_KEY 优先）
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub finnhub: FinnhubConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_cors_origin() -> String { "*".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_finnhub_base_url() -> String { "https://finnhub.io/api/v1".to_string() }
fn default_earnings_window_months() -> u32 { 12 }
fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_gemini_model() -> String { "gemini-1.5-flash-latest".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
            cors_allow_origin: default_cors_origin(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for FinnhubConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_finnhub_base_url(),
            earnings_window_months: default_earnings_window_months(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 查找存在的配置文件
    pub fn find_file() -> Option<&'static str> {
        CONFIG_PATHS.into_iter().find(|path| Path::new(path).exists())
    }

    /// 加载配置，优先从文件，没有文件则使用默认值，最后应用环境变量覆盖
    ///
    /// 在日志系统初始化之前调用，因此这里不输出日志
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match Self::find_file() {
            Some(path) => Self::from_file(path)
                .with_context(|| format!("加载配置文件 {} 失败", path))?,
            None => Self::default(),
        };

        config.apply_env_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// 用环境变量覆盖密钥配置
    ///
    /// `lookup` 便于测试时注入假的环境
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("FINNHUB_API_KEY").filter(|k| !k.is_empty()) {
            self.finnhub.api_key = key;
        }
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.is_empty()) {
            self.gemini.api_key = key;
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
