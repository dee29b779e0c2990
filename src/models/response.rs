//! 通用 API 响应模型
//!
//! 定义统一的 API 响应格式以及各接口的请求/响应载荷

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::MarketBrief;

/// 统一 API 响应结构
///
/// 所有接口返回统一格式，包含：
/// - success: 请求是否成功
/// - data: 响应数据（成功时有值）
/// - message: 响应消息
/// - timestamp: 响应时间戳（UTC）
///
/// 用于首页、健康检查和参数错误；/summary 与 /predict 直接返回载荷
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 请求是否成功
    pub success: bool,
    /// 响应数据
    pub data: Option<T>,
    /// 响应消息
    pub message: String,
    /// 响应时间戳（RFC 3339）
    pub timestamp: String,
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            timestamp: now_rfc3339(),
        }
    }

    /// 创建错误响应
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
            timestamp: now_rfc3339(),
        }
    }
}

/// 股票查询参数
#[derive(Debug, Deserialize)]
pub struct TickerQuery {
    /// 股票代码，如 AAPL、TSLA、GOOGL
    pub ticker: String,
}

/// GET /summary 响应体
#[derive(Debug, Serialize)]
pub struct SummaryPayload {
    pub ticker: String,
    /// 模型生成的摘要（失败时为错误描述）
    pub summary: String,
    pub raw_data: MarketBrief,
}

/// GET /predict 响应体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionPayload {
    pub ticker: String,
    /// 一周后的预估价格，无法计算时为 null
    pub prediction: Option<f64>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionPayload {
    pub fn from_brief(brief: &MarketBrief) -> Self {
        let quote = brief.summary.as_ok().map(|s| &s.quote);
        Self {
            ticker: brief.symbol.clone(),
            prediction: brief.estimation(),
            current_price: quote.and_then(|q| q.current_price),
            previous_close: quote.and_then(|q| q.previous_close),
            error: brief.summary.error().map(str::to_string),
        }
    }
}
