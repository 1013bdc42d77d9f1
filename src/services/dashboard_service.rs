//! 看板计算流程
//!
//! 每次交互都从不可变的数据集重新计算：解析参数 → 日期筛选 → 指标 / 图表 / 原始数据。
//! 整个流程是纯函数，不保存任何状态。

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    Dashboard, DashboardParams, DashboardQuery, Dataset, DateRange, PriceField, Ticker,
};
use super::{charts, filter, loader, metrics};

/// 筛选结果为空或未选择股票时的提示
pub const NO_DATA_MESSAGE: &str = "No data available for the selected filters.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// 可恢复的“无数据”情况，以警告形式返回给用户
    #[error("No data available for the selected filters.")]
    NoData,
    /// 请求参数无效
    #[error("参数无效: {0}")]
    InvalidParameter(String),
}

/// 解析逗号分隔的股票代码，去重并保持输入顺序
pub fn parse_tickers(raw: &str) -> Result<Vec<Ticker>, DashboardError> {
    let mut tickers = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let ticker: Ticker = part.parse().map_err(DashboardError::InvalidParameter)?;
        if !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }
    Ok(tickers)
}

fn parse_bound(
    raw: Option<&str>,
    default: NaiveDate,
    span: DateRange,
    name: &str,
) -> Result<NaiveDate, DashboardError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };
    let date = loader::parse_date(raw)
        .ok_or_else(|| DashboardError::InvalidParameter(format!("{} 日期格式无效: {}", name, raw)))?;
    if !span.contains(date) {
        return Err(DashboardError::InvalidParameter(format!(
            "{} 超出数据范围 {} ~ {}: {}",
            name, span.start, span.end, date
        )));
    }
    Ok(date)
}

/// 把查询参数解析为看板参数，缺省值：
/// - 股票：`default_tickers`
/// - 日期：数据集完整范围
/// - 价格类型：Close
/// - 原始数据：不显示
///
/// 日期必须落在数据集范围内（与日期选择器的上下限一致），但允许开始晚于结束。
pub fn resolve_params(
    query: &DashboardQuery,
    dataset: &Dataset,
    default_tickers: &[Ticker],
) -> Result<DashboardParams, DashboardError> {
    let tickers = match query.tickers.as_deref() {
        Some(raw) => parse_tickers(raw)?,
        None => default_tickers.to_vec(),
    };

    let span = DateRange::of(dataset).ok_or(DashboardError::NoData)?;
    let start = parse_bound(query.start_date.as_deref(), span.start, span, "start_date")?;
    let end = parse_bound(query.end_date.as_deref(), span.end, span, "end_date")?;

    let price_field = match query.price_type.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            PriceField::parse_selectable(raw).map_err(DashboardError::InvalidParameter)?
        }
        _ => PriceField::default(),
    };

    Ok(DashboardParams {
        tickers,
        range: DateRange::new(start, end),
        price_field,
        show_raw: query.show_raw.unwrap_or(false),
    })
}

/// 计算一次交互的完整看板
///
/// 筛选结果为空或未选择任何股票时返回 `DashboardError::NoData`
pub fn build_dashboard(dataset: &Dataset, params: &DashboardParams) -> Result<Dashboard, DashboardError> {
    let view = filter::filter_range(dataset.rows(), params.range);
    if view.is_empty() || params.tickers.is_empty() {
        log::debug!(
            "无可用数据: {} ~ {}, 股票 {:?}",
            params.range.start,
            params.range.end,
            params.tickers
        );
        return Err(DashboardError::NoData);
    }

    let tickers = &params.tickers;
    Ok(Dashboard {
        range: params.range,
        tickers: tickers.clone(),
        row_count: view.len(),
        metrics: metrics::compute_metrics(&view, tickers),
        price_chart: charts::price_chart(&view, tickers, params.price_field),
        candlesticks: tickers
            .iter()
            .map(|&t| charts::candlestick_chart(&view, t))
            .collect(),
        volume_chart: charts::volume_chart(&view, tickers),
        raw: params.show_raw.then(|| charts::raw_table(&view)),
    })
}
