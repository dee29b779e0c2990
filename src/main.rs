//! 行情简报后端服务
//!
//! 聚合 Finnhub 行情、公司资料和财报数据，给出一周后的线性价格预估，
//! 并调用 Gemini 生成简短的市场摘要

mod config;     // 配置加载
mod handlers;   // HTTP 请求处理器
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::io;

use crate::config::AppConfig;
use crate::handlers::AppState;

/// 应用程序入口
#[actix_web::main]
async fn main() -> io::Result<()> {
    // .env 文件不存在时忽略
    dotenvy::dotenv().ok();

    let config = AppConfig::load().map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{:#}", e)))?;

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    match AppConfig::find_file() {
        Some(path) => log::info!("从 {} 加载配置成功", path),
        None => log::info!("使用默认配置"),
    }
    if config.finnhub.api_key.is_empty() {
        log::warn!("未设置 FINNHUB_API_KEY，行情请求将会失败");
    }
    if config.gemini.api_key.is_empty() {
        log::warn!("未设置 GEMINI_API_KEY，摘要生成将会失败");
    }

    let state = AppState::from_config(&config)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{:#}", e)))?;
    let state = web::Data::new(state);
    let cors_origin = config.server.cors_allow_origin.clone();

    log::info!("启动行情简报服务，监听 {}", config.bind_addr());

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())  // 请求日志
            .wrap(handlers::cors(&cors_origin))  // 跨域
            .configure(handlers::config)  // 配置路由
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(config.bind_addr())?.run().await
}
