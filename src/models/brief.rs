//! 行情简报数据模型
//!
//! 定义行情、公司资料、财报以及聚合后的简报结构。
//! 所有结构都是请求级别的，不做持久化。

use serde::{Deserialize, Serialize, Serializer};

/// 缺失字段的占位文本
pub const NOT_AVAILABLE: &str = "N/A";
/// 默认计价货币
pub const DEFAULT_CURRENCY: &str = "USD";
/// 无财报数据时的提示
pub const NO_EARNINGS_MESSAGE: &str = "No earnings data available";

/// 实时行情快照
///
/// 上游字段: c / pc / o / h / l
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    /// 当前价格
    pub current_price: Option<f64>,
    /// 昨日收盘价
    pub previous_close: Option<f64>,
    /// 开盘价
    pub open: Option<f64>,
    /// 最高价
    pub high: Option<f64>,
    /// 最低价
    pub low: Option<f64>,
}

/// 公司资料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    /// 公司名称
    pub short_name: String,
    /// 交易所
    pub exchange: String,
    /// 所属行业
    pub industry: String,
    /// 计价货币
    pub currency: String,
    /// Logo 地址
    pub logo: String,
}

impl Default for ProfileRecord {
    fn default() -> Self {
        Self {
            short_name: NOT_AVAILABLE.to_string(),
            exchange: NOT_AVAILABLE.to_string(),
            industry: NOT_AVAILABLE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            logo: String::new(),
        }
    }
}

/// 单条财报记录
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsReport {
    pub date: String,
    #[serde(serialize_with = "number_or_na")]
    pub eps_estimate: Option<f64>,
    #[serde(rename = "actualEPS", serialize_with = "number_or_na")]
    pub actual_eps: Option<f64>,
    #[serde(serialize_with = "number_or_na")]
    pub surprise: Option<f64>,
}

/// 财报数据
///
/// `NoData` 与数值为 0 的财报是两回事
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EarningsRecord {
    Reported(EarningsReport),
    NoData { message: String },
}

impl EarningsRecord {
    pub fn no_data() -> Self {
        EarningsRecord::NoData {
            message: NO_EARNINGS_MESSAGE.to_string(),
        }
    }
}

/// 行情 + 公司资料 + 价格预估
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    /// 股票代码（大写）
    pub symbol: String,
    #[serde(flatten)]
    pub quote: QuoteRecord,
    #[serde(flatten)]
    pub profile: ProfileRecord,
    /// 一周后的线性预估价格
    pub estimation: Option<f64>,
}

/// 单个上游子请求的结果
///
/// 失败时序列化为 `{"error": "..."}`，调用方据此区分"拉取失败"与"没有数据"
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Fetched<T> {
    Ok(T),
    Failed { error: String },
}

impl<T> Fetched<T> {
    pub fn failed(error: impl Into<String>) -> Self {
        Fetched::Failed {
            error: error.into(),
        }
    }

    pub fn as_ok(&self) -> Option<&T> {
        match self {
            Fetched::Ok(value) => Some(value),
            Fetched::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Fetched::Ok(_) => None,
            Fetched::Failed { error } => Some(error),
        }
    }
}

/// 聚合后的行情简报
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketBrief {
    /// 股票代码（大写）
    pub symbol: String,
    pub summary: Fetched<StockSummary>,
    pub earnings: Fetched<EarningsRecord>,
}

impl MarketBrief {
    /// 本次请求的价格预估，行情拉取失败时为 None
    pub fn estimation(&self) -> Option<f64> {
        self.summary.as_ok().and_then(|s| s.estimation)
    }
}

/// 财报缺失字段序列化为 "N/A"
fn number_or_na<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_str(NOT_AVAILABLE),
    }
}
