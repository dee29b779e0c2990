//! Finnhub 行情数据源
//!
//! 对接 https://finnhub.io/api/v1 的三个只读接口：
//! - /quote            实时行情
//! - /stock/profile2   公司资料
//! - /calendar/earnings 财报日历
//!
//! 返回松散的 JSON 对象，字段规整交给聚合层处理

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::{ApiConfig, FinnhubConfig};

/// 行情数据源
///
/// 聚合层只依赖这个 trait，测试时可替换为假数据源
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 实时行情
    async fn quote(&self, symbol: &str) -> Result<Value>;

    /// 公司资料
    async fn profile(&self, symbol: &str) -> Result<Value>;

    /// 指定日期区间内的财报日历
    async fn earnings_calendar(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<Value>;
}

/// 构建带超时的 HTTP 客户端
pub fn build_http_client(api: &ApiConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(api.timeout_secs))
        .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
        .build()
        .context("创建 HTTP 客户端失败")
}

/// Finnhub HTTP 客户端
pub struct FinnhubClient {
    /// HTTP 客户端
    client: Client,
    /// 接口根地址（末尾不带 /）
    base_url: String,
    /// API Token
    api_key: String,
}

impl FinnhubClient {
    pub fn new(client: Client, base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Url::parse(base_url).with_context(|| format!("无效的 Finnhub 地址: {}", base_url))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(client: Client, config: &FinnhubConfig) -> Result<Self> {
        Self::new(client, &config.base_url, config.api_key.clone())
    }

    /// 发起 GET 请求并要求返回 JSON 对象
    async fn get_object(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("📡 请求 Finnhub 接口: {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("token", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Finnhub {} 请求失败: {}", path, response.status()));
        }

        let data: Value = response
            .json()
            .await
            .with_context(|| format!("Finnhub {} 响应解析失败", path))?;

        if !data.is_object() {
            return Err(anyhow!("Finnhub {} 返回了非对象数据", path));
        }

        Ok(data)
    }
}

#[async_trait]
impl MarketDataProvider for FinnhubClient {
    async fn quote(&self, symbol: &str) -> Result<Value> {
        self.get_object("/quote", &[("symbol", symbol)]).await
    }

    async fn profile(&self, symbol: &str) -> Result<Value> {
        self.get_object("/stock/profile2", &[("symbol", symbol)]).await
    }

    async fn earnings_calendar(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<Value> {
        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();

        self.get_object(
            "/calendar/earnings",
            &[("symbol", symbol), ("from", from.as_str()), ("to", to.as_str())],
        )
        .await
    }
}
