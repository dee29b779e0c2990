//! 行情摘要生成
//!
//! 将简报文本交给生成式模型，得到 2-3 句话的市场摘要。
//! 模型调用失败时返回可展示的错误文本，不向调用方抛出。

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::GeminiConfig;
use crate::models::MarketBrief;
use crate::services::formatter::format_digest;

const PROMPT_PREAMBLE: &str = "You are a financial assistant. Based on the following market data, \
generate a short 2–3 sentence market summary highlighting price trends, \
earnings, and financial sentiment:";

/// 摘要模型
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// 组装完整提示词
pub fn build_prompt(brief: &MarketBrief) -> String {
    format!("{}\n\n{}", PROMPT_PREAMBLE, format_digest(brief))
}

/// 生成行情摘要
///
/// 失败时返回错误描述字符串
pub async fn generate_market_summary(provider: &dyn SummaryProvider, brief: &MarketBrief) -> String {
    let prompt = build_prompt(brief);

    match provider.generate(&prompt).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            log::warn!("生成 {} 摘要失败: {:#}", brief.symbol, e);
            format!("❌ Error generating summary: {:#}", e)
        }
    }
}

// ==================== Gemini 接口 ====================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Gemini generateContent 客户端
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        client: Client,
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        Url::parse(base_url).with_context(|| format!("无效的 Gemini 地址: {}", base_url))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn from_config(client: Client, config: &GeminiConfig) -> Result<Self> {
        Self::new(client, &config.base_url, config.api_key.clone(), config.model.clone())
    }

    fn endpoint(&self) -> String {
        // 兼容配置中带 models/ 前缀的模型名
        let model = self.model.trim_start_matches("models/");
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

/// 取第一个候选结果的全部文本
fn extract_text(response: GenerateResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("模型未返回任何候选结果"))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(anyhow!("模型返回了空文本"));
    }

    Ok(text)
}

#[async_trait]
impl SummaryProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint();
        log::debug!("📡 请求 Gemini 接口: {}", url);

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini 请求失败: {} {}", status, detail));
        }

        let data: GenerateResponse = response.json().await.context("Gemini 响应解析失败")?;
        extract_text(data)
    }
}
