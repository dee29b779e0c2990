//! 业务逻辑服务模块
//!
//! 封装数据获取、价格预估、文本格式化和摘要生成

pub mod aggregator;  // 行情简报聚合
pub mod finnhub;     // Finnhub 数据源
pub mod formatter;   // 简报文本
pub mod projection;  // 价格预估
pub mod summarizer;  // 模型摘要
