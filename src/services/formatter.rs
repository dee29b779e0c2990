//! 简报文本格式化
//!
//! 把 [`MarketBrief`] 渲染为固定顺序的纯文本，作为摘要模型的输入。
//! 缺失的数值渲染为 "N/A"，前六行始终存在。

use crate::models::{EarningsRecord, Fetched, MarketBrief, ProfileRecord, QuoteRecord, NOT_AVAILABLE};

const NO_EARNINGS_LINE: &str = "No earnings data available.";

/// 生成简报文本
pub fn format_digest(brief: &MarketBrief) -> String {
    let default_quote = QuoteRecord::default();
    let default_profile = ProfileRecord::default();

    let (quote, profile) = match &brief.summary {
        Fetched::Ok(summary) => (&summary.quote, &summary.profile),
        Fetched::Failed { .. } => (&default_quote, &default_profile),
    };

    let mut lines = vec![
        format!("Stock: {} ({})", profile.short_name, brief.symbol),
        format!("Current Price: {} {}", number(quote.current_price), profile.currency),
        format!(
            "Open: {}, High: {}, Low: {}",
            number(quote.open),
            number(quote.high),
            number(quote.low)
        ),
        format!("Previous Close: {}", number(quote.previous_close)),
        format!("Exchange: {}, Industry: {}", profile.exchange, profile.industry),
        String::new(),
    ];

    match &brief.earnings {
        Fetched::Ok(EarningsRecord::Reported(report)) => {
            lines.push("Earnings Report:".to_string());
            lines.push(format!("Date: {}", report.date));
            lines.push(format!(
                "Estimated EPS: {}, Actual EPS: {}",
                number(report.eps_estimate),
                number(report.actual_eps)
            ));
            lines.push(format!("Earnings Surprise: {}", number(report.surprise)));
        }
        // 拉取失败与没有数据在文本中表现一致
        Fetched::Ok(EarningsRecord::NoData { .. }) | Fetched::Failed { .. } => {
            lines.push(NO_EARNINGS_LINE.to_string());
        }
    }

    lines.join("\n")
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}
