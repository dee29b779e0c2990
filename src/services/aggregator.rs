//! 行情简报聚合
//!
//! 并发拉取行情、公司资料和财报日历，规整成 [`MarketBrief`]，
//! 并基于同一次拉取的行情计算价格预估。
//!
//! 上游任何失败都在这里被转换为 `Fetched::Failed`，不会向调用方抛出。

use chrono::{Months, NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;

use crate::models::{
    EarningsRecord, EarningsReport, Fetched, MarketBrief, ProfileRecord, QuoteRecord,
    StockSummary, DEFAULT_CURRENCY, NOT_AVAILABLE,
};
use crate::services::finnhub::MarketDataProvider;
use crate::services::projection::estimate_from_quote;

/// 简报聚合器
#[derive(Clone)]
pub struct Aggregator {
    provider: Arc<dyn MarketDataProvider>,
    /// 财报日历查询窗口（月）
    earnings_window_months: u32,
}

impl Aggregator {
    pub fn new(provider: Arc<dyn MarketDataProvider>, earnings_window_months: u32) -> Self {
        Self {
            provider,
            earnings_window_months,
        }
    }

    /// 获取单只股票的完整简报
    pub async fn fetch_brief(&self, symbol: &str) -> MarketBrief {
        self.fetch_brief_on(symbol, Utc::now().date_naive()).await
    }

    /// 以指定日期为"今天"获取简报
    pub async fn fetch_brief_on(&self, symbol: &str, today: NaiveDate) -> MarketBrief {
        let upper = symbol.to_uppercase();
        let (from, to) = earnings_window(today, self.earnings_window_months);

        log::info!("获取 {} 行情简报，财报区间 {} ~ {}", upper, from, to);

        // 三个请求之间没有依赖，并发发出
        let (quote, profile, earnings) = futures::join!(
            self.provider.quote(symbol),
            self.provider.profile(symbol),
            self.provider.earnings_calendar(symbol, from, to),
        );

        let summary = match (quote, profile) {
            (Ok(quote), Ok(profile)) => Fetched::Ok(build_summary(&upper, &quote, &profile)),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("获取 {} 行情/公司资料失败: {:#}", upper, e);
                Fetched::failed(format!("Error fetching stock summary for {}: {:#}", symbol, e))
            }
        };

        let earnings = match earnings {
            Ok(calendar) => Fetched::Ok(select_earnings(&calendar)),
            Err(e) => {
                log::warn!("获取 {} 财报日历失败: {:#}", upper, e);
                Fetched::failed(format!("Error fetching earnings for {}: {:#}", symbol, e))
            }
        };

        MarketBrief {
            symbol: upper,
            summary,
            earnings,
        }
    }
}

/// 财报日历查询区间: [today - months, today + months]
///
/// 按自然月计算，12 个月即完整的一年（跨闰日也不会少一天）；
/// 超出日期范围时取 NaiveDate::MIN / MAX
pub fn earnings_window(today: NaiveDate, months: u32) -> (NaiveDate, NaiveDate) {
    let span = Months::new(months);
    let from = today.checked_sub_months(span).unwrap_or(NaiveDate::MIN);
    let to = today.checked_add_months(span).unwrap_or(NaiveDate::MAX);
    (from, to)
}

/// 解析上游行情（c / pc / o / h / l）
pub fn parse_quote(data: &Value) -> QuoteRecord {
    QuoteRecord {
        current_price: data["c"].as_f64(),
        previous_close: data["pc"].as_f64(),
        open: data["o"].as_f64(),
        high: data["h"].as_f64(),
        low: data["l"].as_f64(),
    }
}

/// 解析上游公司资料，缺失字段使用默认值
pub fn parse_profile(data: &Value) -> ProfileRecord {
    ProfileRecord {
        short_name: text_or(data, "name", NOT_AVAILABLE),
        exchange: text_or(data, "exchange", NOT_AVAILABLE),
        industry: text_or(data, "finnhubIndustry", NOT_AVAILABLE),
        currency: text_or(data, "currency", DEFAULT_CURRENCY),
        logo: text_or(data, "logo", ""),
    }
}

/// 取财报日历第一条记录
///
/// 保持上游顺序，不重新排序
pub fn select_earnings(calendar: &Value) -> EarningsRecord {
    match calendar["earningsCalendar"].as_array().and_then(|list| list.first()) {
        Some(entry) => EarningsRecord::Reported(parse_earnings_entry(entry)),
        None => EarningsRecord::no_data(),
    }
}

fn parse_earnings_entry(entry: &Value) -> EarningsReport {
    let eps_estimate = first_number(entry, &["epsEstimate", "estimate"]);
    let actual_eps = first_number(entry, &["epsActual", "actual"]);
    EarningsReport {
        date: text_or(entry, "date", NOT_AVAILABLE),
        eps_estimate,
        actual_eps,
        // 上游未提供时保持缺失，不自行推算
        surprise: entry["surprise"].as_f64(),
    }
}

fn build_summary(symbol: &str, quote: &Value, profile: &Value) -> StockSummary {
    let quote = parse_quote(quote);
    let estimation = estimate_from_quote(&quote);

    StockSummary {
        symbol: symbol.to_string(),
        quote,
        profile: parse_profile(profile),
        estimation,
    }
}

/// 空字符串视同缺失
fn text_or(data: &Value, key: &str, default: &str) -> String {
    data[key]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn first_number(data: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| data[*key].as_f64())
}
