//! 看板数据模型
//!
//! 定义看板查询参数、关键指标以及图表数据结构

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::price::{DateRange, PriceField, Ticker};

/// 看板查询参数（原始字符串形式）
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// 逗号分隔的股票代码；缺省为配置中的默认选择，空字符串表示未选择
    pub tickers: Option<String>,
    /// 开始日期（YYYY-MM-DD）
    pub start_date: Option<String>,
    /// 结束日期（YYYY-MM-DD）
    pub end_date: Option<String>,
    /// 价格类型: Close / Open / High / Low
    pub price_type: Option<String>,
    /// 是否返回原始数据表
    pub show_raw: Option<bool>,
}

/// 解析并补全默认值后的看板参数
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardParams {
    pub tickers: Vec<Ticker>,
    pub range: DateRange,
    pub price_field: PriceField,
    pub show_raw: bool,
}

/// 指标涨跌方向，前端据此选择颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// 单只股票的最新收盘价及相对前一交易日的涨跌幅
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerMetric {
    /// 股票代码
    pub ticker: Ticker,
    /// 最新交易日
    pub date: NaiveDate,
    /// 最新收盘价
    pub latest_close: f64,
    /// 前一交易日收盘价
    pub previous_close: f64,
    /// 涨跌幅（百分比）
    pub delta_pct: f64,
}

/// 指标卡片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    /// 标题，例如 "Latest close - AAPL"
    pub label: String,
    pub ticker: Ticker,
    /// 格式化后的价格，例如 "$110.00"；无法计算时为 "N/A"
    pub value: String,
    /// 格式化后的涨跌幅，例如 "10.00%"；无法计算时为 "N/A"
    pub delta: String,
    pub direction: Direction,
    /// 指标原始数据，无法计算时为空
    pub metric: Option<TickerMetric>,
    /// 无法计算的原因
    pub note: Option<String>,
}

/// 关键指标区域
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MetricsSection {
    /// 每只选中股票一张卡片
    Available { cards: Vec<MetricCard> },
    /// 数据不足两行，仅显示提示信息
    Insufficient { message: String },
}

/// 折线图中的一个点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// 一只股票的价格折线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

/// 价格走势图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub price_field: PriceField,
    pub y_axis_title: String,
    pub series: Vec<LineSeries>,
}

/// K线
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// 单只股票的K线图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlestickChart {
    pub title: String,
    pub ticker: Ticker,
    pub candles: Vec<Candle>,
}

/// 成交量柱
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeBar {
    pub date: NaiveDate,
    pub volume: u64,
}

/// 单只股票的成交量序列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSeries {
    pub name: String,
    pub ticker: Ticker,
    pub bars: Vec<VolumeBar>,
}

/// 成交量图（各股票堆叠显示）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeChart {
    pub stacked: bool,
    pub series: Vec<VolumeSeries>,
}

/// 原始数据表，列顺序与 `columns` 一致
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// 一次交互的完整看板数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub range: DateRange,
    pub tickers: Vec<Ticker>,
    pub row_count: usize,
    pub metrics: MetricsSection,
    pub price_chart: LineChart,
    pub candlesticks: Vec<CandlestickChart>,
    pub volume_chart: VolumeChart,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<RawTable>,
}

/// 数据集概要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub tickers: Vec<Ticker>,
}

/// 可选项列表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerOptions {
    pub tickers: Vec<Ticker>,
    pub default_selection: Vec<Ticker>,
    pub price_types: Vec<PriceField>,
}
