pub mod health;
pub mod market;

use actix_cors::Cors;
use actix_web::web;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::aggregator::Aggregator;
use crate::services::finnhub::{build_http_client, FinnhubClient, MarketDataProvider};
use crate::services::summarizer::{GeminiClient, SummaryProvider};

/// 所有处理器共享的状态
///
/// 只持有无状态的上游客户端，跨请求没有可变数据
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
    pub summarizer: Arc<dyn SummaryProvider>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        summarizer: Arc<dyn SummaryProvider>,
        earnings_window_months: u32,
    ) -> Self {
        Self {
            aggregator: Aggregator::new(provider, earnings_window_months),
            summarizer,
        }
    }

    /// 根据配置创建 Finnhub / Gemini 客户端
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = build_http_client(&config.api)?;
        let finnhub = FinnhubClient::from_config(client.clone(), &config.finnhub)?;
        let gemini = GeminiClient::from_config(client, &config.gemini)?;

        Ok(Self::new(
            Arc::new(finnhub),
            Arc::new(gemini),
            config.finnhub.earnings_window_months,
        ))
    }
}

/// 跨域中间件
///
/// "*" 允许任意来源，否则只允许配置的来源；方法和请求头不限，预检请求由中间件直接应答
pub fn cors(allow_origin: &str) -> Cors {
    let cors = if allow_origin.trim() == "*" {
        Cors::default().allow_any_origin().send_wildcard()
    } else {
        Cors::default()
            .allowed_origin(allow_origin.trim())
            .supports_credentials()
    };

    cors.allow_any_method().allow_any_header().max_age(3600)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::config).configure(market::config);
}
