//! 股票行情看板服务
//!
//! 加载五只美股（AAPL、AMZN、GOOGL、MSFT、NVDA）的历史日线宽表 CSV，
//! 按日期区间和股票筛选后提供关键指标、价格走势、K线、成交量和原始数据的 JSON API

mod config;     // 配置
mod handlers;   // HTTP 请求处理器
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务
mod state;      // 共享状态

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use env_logger::Env;

use crate::config::AppConfig;
use crate::services::cache::DatasetCache;
use crate::state::AppState;

/// 应用程序入口
///
/// 启动前加载数据文件，失败直接退出
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先于配置文件中的级别
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    log::info!("启动股票行情看板服务");

    let cache = DatasetCache::new(&config.data.path);
    cache
        .get()
        .with_context(|| format!("无法加载数据文件 {}", config.data.path))?;

    let state = web::Data::new(AppState::new(cache, config.data.default_tickers.clone()));
    let bind_addr = config.bind_addr();
    log::info!("监听地址: http://{}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())  // 添加请求日志中间件
            .app_data(state.clone())
            .configure(handlers::config)  // 配置路由
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_addr)?.run().await?;
    Ok(())
}
