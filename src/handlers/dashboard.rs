//! 看板接口处理器
//!
//! ## API 列表
//! - GET /tickers - 可选股票及价格类型
//! - GET /dataset - 数据集概要
//! - GET /dashboard - 按筛选条件计算看板（指标、走势图、K线、成交量、原始数据）

use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use std::sync::Arc;

use crate::models::{
    ApiResponse, Dashboard, DashboardQuery, Dataset, DatasetSummary, PriceField, Ticker,
    TickerOptions,
};
use crate::services::dashboard_service::{self, DashboardError, NO_DATA_MESSAGE};
use crate::state::AppState;

/// 从缓存获取数据集，文件 IO 在阻塞线程池中执行
async fn load_dataset(state: &web::Data<AppState>) -> std::result::Result<Arc<Dataset>, HttpResponse> {
    let state = state.clone();
    match web::block(move || state.cache.get()).await {
        Ok(Ok(dataset)) => Ok(dataset),
        Ok(Err(e)) => {
            log::error!("数据集不可用: {}", e);
            Err(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(e.to_string())))
        }
        Err(e) => {
            log::error!("加载任务失败: {}", e);
            Err(HttpResponse::InternalServerError().json(ApiResponse::<()>::error(e.to_string())))
        }
    }
}

/// 获取可选股票列表
///
/// GET /api/v1/tickers
pub async fn list_tickers(state: web::Data<AppState>) -> Result<HttpResponse> {
    let options = TickerOptions {
        tickers: Ticker::ALL.to_vec(),
        default_selection: state.default_tickers.clone(),
        price_types: PriceField::SELECTABLE.to_vec(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(options)))
}

/// 获取数据集概要
///
/// GET /api/v1/dataset
pub async fn get_dataset_summary(state: web::Data<AppState>) -> Result<HttpResponse> {
    let dataset = match load_dataset(&state).await {
        Ok(dataset) => dataset,
        Err(response) => return Ok(response),
    };

    let summary = DatasetSummary {
        rows: dataset.len(),
        min_date: dataset.min_date(),
        max_date: dataset.max_date(),
        tickers: Ticker::ALL.to_vec(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

/// 计算看板
///
/// GET /api/v1/dashboard?tickers=AAPL,NVDA&start_date=2024-01-02&end_date=2024-03-01&price_type=Close&show_raw=true
///
/// # 参数
/// - tickers: 逗号分隔的股票代码，缺省为默认选择
/// - start_date / end_date: 日期区间（YYYY-MM-DD），缺省为数据集完整范围
/// - price_type: Close / Open / High / Low，缺省为 Close
/// - show_raw: 是否返回原始数据表
pub async fn get_dashboard(
    state: web::Data<AppState>,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse> {
    let dataset = match load_dataset(&state).await {
        Ok(dataset) => dataset,
        Err(response) => return Ok(response),
    };

    let result = dashboard_service::resolve_params(&query, &dataset, &state.default_tickers)
        .and_then(|params| dashboard_service::build_dashboard(&dataset, &params));

    match result {
        Ok(dashboard) => Ok(HttpResponse::Ok().json(ApiResponse::success(dashboard))),
        Err(DashboardError::NoData) => {
            let response = ApiResponse::<Dashboard>::warning(NO_DATA_MESSAGE.to_string());
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e @ DashboardError::InvalidParameter(_)) => {
            let response = ApiResponse::<Dashboard>::error(e.to_string());
            Ok(HttpResponse::BadRequest().json(response))
        }
    }
}

/// 查询参数反序列化失败时同样返回统一响应格式
fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("查询参数无效: {}", err);
    let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error(err.to_string()));
    InternalError::from_response(err, response).into()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("/tickers", web::get().to(list_tickers))
        .route("/dataset", web::get().to(get_dataset_summary))
        .route("/dashboard", web::get().to(get_dashboard));
}
