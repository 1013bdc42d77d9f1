//! 行情数据模型
//!
//! 定义股票代码、价格字段以及按日期排列的宽表行情数据

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 数据集中跟踪的股票代码
///
/// 顺序即 CSV 宽表中的规范顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ticker {
    AAPL,
    AMZN,
    GOOGL,
    MSFT,
    NVDA,
}

impl Ticker {
    pub const ALL: [Ticker; 5] = [
        Ticker::AAPL,
        Ticker::AMZN,
        Ticker::GOOGL,
        Ticker::MSFT,
        Ticker::NVDA,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ticker::AAPL => "AAPL",
            Ticker::AMZN => "AMZN",
            Ticker::GOOGL => "GOOGL",
            Ticker::MSFT => "MSFT",
            Ticker::NVDA => "NVDA",
        }
    }

    /// 在 `PriceRow::quotes` 中的下标
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ticker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Ticker::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| format!("未知股票代码: {}", s.trim()))
    }
}

/// CSV 中的行情字段
///
/// `Volume` 只出现在数据文件和成交量图中，不能作为价格类型选择
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
    Volume,
}

impl PriceField {
    /// CSV 列名中的全部字段
    pub const ALL: [PriceField; 5] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
        PriceField::Volume,
    ];

    /// 可选的价格类型，顺序与页面单选框一致
    pub const SELECTABLE: [PriceField; 4] = [
        PriceField::Close,
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
            PriceField::Volume => "Volume",
        }
    }

    /// 宽表列名，例如 `Close_AAPL`
    pub fn column(&self, ticker: Ticker) -> String {
        format!("{}_{}", self.as_str(), ticker)
    }

    /// 解析用户选择的价格类型（不含 Volume）
    pub fn parse_selectable(s: &str) -> Result<Self, String> {
        let field: PriceField = s.parse()?;
        if field == PriceField::Volume {
            return Err("Volume 不是可选的价格类型".to_string());
        }
        Ok(field)
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PriceField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("未知价格类型: {}", trimmed))
    }
}

/// 单只股票单日的 OHLCV 数据
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quote {
    /// 开盘价
    pub open: f64,
    /// 最高价
    pub high: f64,
    /// 最低价
    pub low: f64,
    /// 收盘价
    pub close: f64,
    /// 成交量
    pub volume: u64,
}

impl Quote {
    /// 取指定价格字段的数值，成交量转换为 f64
    pub fn value(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::Volume => self.volume as f64,
        }
    }
}

/// 单个交易日的全部股票行情
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    /// 交易日期
    pub date: NaiveDate,
    /// 按 `Ticker::index()` 排列的行情
    pub quotes: [Quote; 5],
}

impl PriceRow {
    pub fn quote(&self, ticker: Ticker) -> &Quote {
        &self.quotes[ticker.index()]
    }
}

/// 按日期升序排列、无重复日期的行情数据集
///
/// 构造后不可变，所有请求共享同一份数据
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    rows: Vec<PriceRow>,
}

impl Dataset {
    /// 由已排序、无重复日期的行构造数据集
    ///
    /// 排序和去重由加载器负责；这里只在调试构建中检查
    pub fn from_sorted_rows(rows: Vec<PriceRow>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
        Self { rows }
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }
}

/// 日期区间 [start, end]，两端都包含
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 数据集的完整日期范围，空数据集返回 None
    pub fn of(dataset: &Dataset) -> Option<Self> {
        Some(Self::new(dataset.min_date()?, dataset.max_date()?))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
