//! 价格预估
//!
//! 按"今日涨跌幅线性延续 5 个交易日"的假设估算一周后的价格。
//! 纯函数，无副作用；无法计算时返回 None 而不是报错。

use crate::models::QuoteRecord;

/// 一周的交易日数
pub const TRADING_DAYS_PER_WEEK: f64 = 5.0;

/// 估算一周后的价格
///
/// - 任一输入缺失、非有限数，或昨收为 0 时返回 None
/// - 结果保留两位小数
pub fn estimate(current_price: Option<f64>, previous_close: Option<f64>) -> Option<f64> {
    let current = current_price.filter(|v| v.is_finite())?;
    let previous = previous_close.filter(|v| v.is_finite() && *v != 0.0)?;

    let daily_change = (current - previous) / previous;
    let projected_change = daily_change * TRADING_DAYS_PER_WEEK;
    let estimated = current * (1.0 + projected_change);

    Some(round2(estimated)).filter(|v| v.is_finite())
}

/// 基于一份行情快照估算
pub fn estimate_from_quote(quote: &QuoteRecord) -> Option<f64> {
    estimate(quote.current_price, quote.previous_close)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
