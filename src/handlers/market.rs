//! 行情接口处理器
//!
//! ## API 列表
//! - GET /summary?ticker=AAPL - 行情简报 + 模型摘要
//! - GET /predict?ticker=AAPL - 一周后价格预估
//!
//! 两个接口直接返回载荷本身（不包 ApiResponse），前端按
//! `summary` / `raw_data.summary.*` 读取。
//! 上游拉取失败时仍返回 200，错误信息放在载荷内部；只有 ticker 无效时返回 400 + ApiResponse

use actix_web::{web, HttpResponse, Result};

use super::AppState;
use crate::models::{ApiResponse, PredictionPayload, SummaryPayload, TickerQuery};
use crate::services::summarizer::generate_market_summary;

/// 去除空白，空代码视为无效
fn ticker_param(query: &TickerQuery) -> Option<&str> {
    Some(query.ticker.trim()).filter(|t| !t.is_empty())
}

fn invalid_ticker<T: serde::Serialize>() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<T>::error("ticker 参数不能为空".to_string()))
}

/// 获取行情简报和摘要
///
/// GET /summary?ticker=AAPL
pub async fn get_summary(
    state: web::Data<AppState>,
    query: web::Query<TickerQuery>,
) -> Result<HttpResponse> {
    let Some(ticker) = ticker_param(&query) else {
        return Ok(invalid_ticker::<SummaryPayload>());
    };

    log::info!("生成 {} 行情摘要", ticker);

    let brief = state.aggregator.fetch_brief(ticker).await;
    let summary = generate_market_summary(state.summarizer.as_ref(), &brief).await;

    Ok(HttpResponse::Ok().json(SummaryPayload {
        ticker: brief.symbol.clone(),
        summary,
        raw_data: brief,
    }))
}

/// 获取一周后价格预估
///
/// GET /predict?ticker=AAPL
pub async fn predict_price(
    state: web::Data<AppState>,
    query: web::Query<TickerQuery>,
) -> Result<HttpResponse> {
    let Some(ticker) = ticker_param(&query) else {
        return Ok(invalid_ticker::<PredictionPayload>());
    };

    log::info!("预估 {} 一周后价格", ticker);

    let brief = state.aggregator.fetch_brief(ticker).await;
    Ok(HttpResponse::Ok().json(PredictionPayload::from_brief(&brief)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/summary", web::get().to(get_summary))
        .route("/predict", web::get().to(predict_price));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::finnhub::MarketDataProvider;
    use crate::services::summarizer::SummaryProvider;
    use actix_web::{
        http::{header, Method, StatusCode},
        test, App,
    };
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use std::sync::Arc;

    /// 固定行情；`offline` 时所有请求失败
    struct StaticMarket {
        offline: bool,
    }

    #[async_trait]
    impl MarketDataProvider for StaticMarket {
        async fn quote(&self, symbol: &str) -> anyhow::Result<Value> {
            if self.offline {
                return Err(anyhow!("connection refused for {}", symbol));
            }
            Ok(json!({ "c": 95.0, "pc": 100.0, "o": 99.0, "h": 101.0, "l": 94.5 }))
        }

        async fn profile(&self, symbol: &str) -> anyhow::Result<Value> {
            if self.offline {
                return Err(anyhow!("connection refused for {}", symbol));
            }
            Ok(json!({ "name": "Tesla Inc", "exchange": "NASDAQ", "finnhubIndustry": "Automobiles" }))
        }

        async fn earnings_calendar(&self, symbol: &str, _from: NaiveDate, _to: NaiveDate) -> anyhow::Result<Value> {
            if self.offline {
                return Err(anyhow!("connection refused for {}", symbol));
            }
            Ok(json!({ "earningsCalendar": [] }))
        }
    }

    /// 回显提示词第一行
    struct EchoSummarizer;

    #[async_trait]
    impl SummaryProvider for EchoSummarizer {
        async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
            let digest = prompt.split("\n\n").nth(1).unwrap_or_default();
            Ok(format!(" {} ", digest.lines().next().unwrap_or_default()))
        }
    }

    fn state(offline: bool) -> web::Data<AppState> {
        web::Data::new(AppState::new(
            Arc::new(StaticMarket { offline }),
            Arc::new(EchoSummarizer),
            12,
        ))
    }

    macro_rules! app {
        ($offline:expr) => {
            test::init_service(
                App::new()
                    .app_data(state($offline))
                    .configure(crate::handlers::config),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_summary_endpoint() {
        let app = app!(false);
        let req = test::TestRequest::get().uri("/summary?ticker=tsla").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        // 前端直接读取顶层字段
        assert!(body.get("success").is_none());
        assert_eq!(body["ticker"], "TSLA");
        assert_eq!(body["summary"], "Stock: Tesla Inc (TSLA)");
        assert_eq!(body["raw_data"]["summary"]["currentPrice"], 95.0);
        assert_eq!(body["raw_data"]["summary"]["estimation"], 71.25);
        assert_eq!(body["raw_data"]["summary"]["shortName"], "Tesla Inc");
        assert_eq!(body["raw_data"]["summary"]["currency"], "USD");
        assert_eq!(body["raw_data"]["earnings"]["message"], "No earnings data available");
    }

    #[actix_web::test]
    async fn test_predict_endpoint() {
        let app = app!(false);
        let req = test::TestRequest::get().uri("/predict?ticker=tsla").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["ticker"], "TSLA");
        assert_eq!(body["prediction"], 71.25);
        assert_eq!(body["currentPrice"], 95.0);
        assert_eq!(body["previousClose"], 100.0);
        assert!(body.get("error").is_none());
    }

    #[actix_web::test]
    async fn test_upstream_failure_is_reported_in_payload() {
        let app = app!(true);
        let req = test::TestRequest::get().uri("/summary?ticker=nvda").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        let error = body["raw_data"]["summary"]["error"].as_str().unwrap();
        assert!(error.contains("nvda"));
        assert!(body["raw_data"]["earnings"]["error"].is_string());
        assert_eq!(body["summary"], "Stock: N/A (NVDA)");

        let req = test::TestRequest::get().uri("/predict?ticker=nvda").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["prediction"], Value::Null);
        assert!(body["error"].as_str().unwrap().contains("nvda"));
    }

    #[actix_web::test]
    async fn test_cors_preflight() {
        let app = test::init_service(
            App::new()
                .app_data(state(false))
                .wrap(crate::handlers::cors("*"))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/summary?ticker=aapl")
            .insert_header((header::ORIGIN, "http://localhost:5173"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap().to_str().unwrap(),
            "*"
        );
        assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));

        // 普通 GET 也带上跨域头
        let req = test::TestRequest::get()
            .uri("/predict?ticker=aapl")
            .insert_header((header::ORIGIN, "http://localhost:5173"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[actix_web::test]
    async fn test_cors_specific_origin() {
        let app = test::init_service(
            App::new()
                .app_data(state(false))
                .wrap(crate::handlers::cors("http://localhost:5173"))
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/summary")
            .insert_header((header::ORIGIN, "http://localhost:5173"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap().to_str().unwrap(),
            "http://localhost:5173"
        );
    }

    #[actix_web::test]
    async fn test_missing_or_blank_ticker() {
        let app = app!(false);

        let req = test::TestRequest::get().uri("/summary").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/predict?ticker=%20%20").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn test_home_and_health() {
        let app = app!(false);

        for uri in ["/", "/health"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["success"], true, "{} 应返回成功", uri);
        }
    }
}
