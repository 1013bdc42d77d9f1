//! 宽表 CSV 加载
//!
//! 文件格式: `Date` 列加上每个 `{Field}_{Ticker}` 组合一列，
//! Field ∈ {Open, High, Low, Close, Volume}，Ticker ∈ {AAPL, AMZN, GOOGL, MSFT, NVDA}。
//! 列顺序不限，多余的列会被忽略。

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::models::{Dataset, PriceField, PriceRow, Quote, Ticker};

/// 数据加载错误
#[derive(Debug, Error)]
pub enum DataError {
    #[error("读取数据文件失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV 解析失败: {0}")]
    Csv(#[from] csv::Error),
    #[error("缺少必需的列: {0}")]
    MissingColumn(String),
    #[error("第 {line} 行日期无效: {value}")]
    InvalidDate { line: u64, value: String },
    #[error("第 {line} 行 {column} 列数值无效: {value}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },
    #[error("日期重复: {0}")]
    DuplicateDate(NaiveDate),
    #[error("数据文件中没有任何行情数据")]
    Empty,
}

/// 各 (字段, 股票) 列在表头中的位置
struct ColumnIndex {
    date: usize,
    fields: HashMap<(PriceField, Ticker), usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, DataError> {
        let re = Regex::new(r"^(Open|High|Low|Close|Volume)_([A-Za-z]+)$")
            .expect("static column pattern");

        let mut date = None;
        let mut fields = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if header.eq_ignore_ascii_case("date") {
                date = Some(idx);
                continue;
            }
            let Some(caps) = re.captures(header) else {
                log::debug!("忽略未识别的列: {}", header);
                continue;
            };
            let (Ok(field), Ok(ticker)) = (caps[1].parse::<PriceField>(), caps[2].parse::<Ticker>())
            else {
                log::debug!("忽略未跟踪的股票列: {}", header);
                continue;
            };
            fields.insert((field, ticker), idx);
        }

        let date = date.ok_or_else(|| DataError::MissingColumn("Date".to_string()))?;
        for ticker in Ticker::ALL {
            for field in PriceField::ALL {
                if !fields.contains_key(&(field, ticker)) {
                    return Err(DataError::MissingColumn(field.column(ticker)));
                }
            }
        }

        Ok(Self { date, fields })
    }

    fn get(&self, field: PriceField, ticker: Ticker) -> usize {
        self.fields[&(field, ticker)]
    }
}

/// 解析日期，兼容带时间部分的写法（如 "2010-01-04 00:00:00"）
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// 价格允许为 0（涨跌幅计算会单独处理），不允许为负
fn parse_price(record: &StringRecord, idx: usize, column: &str, line: u64) -> Result<f64, DataError> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| DataError::InvalidValue {
            line,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

/// 成交量允许写成 "1234" 或 "1234.0"
fn parse_volume(record: &StringRecord, idx: usize, column: &str, line: u64) -> Result<u64, DataError> {
    let raw = record.get(idx).unwrap_or("");
    if let Ok(v) = raw.parse::<u64>() {
        return Ok(v);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as u64)
        .ok_or_else(|| DataError::InvalidValue {
            line,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

fn parse_row(record: &StringRecord, columns: &ColumnIndex) -> Result<PriceRow, DataError> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let raw_date = record.get(columns.date).unwrap_or("");
    let date = parse_date(raw_date).ok_or_else(|| DataError::InvalidDate {
        line,
        value: raw_date.to_string(),
    })?;

    let mut quotes = [Quote::default(); 5];
    for ticker in Ticker::ALL {
        let price = |field: PriceField| {
            parse_price(record, columns.get(field, ticker), &field.column(ticker), line)
        };
        quotes[ticker.index()] = Quote {
            open: price(PriceField::Open)?,
            high: price(PriceField::High)?,
            low: price(PriceField::Low)?,
            close: price(PriceField::Close)?,
            volume: parse_volume(
                record,
                columns.get(PriceField::Volume, ticker),
                &PriceField::Volume.column(ticker),
                line,
            )?,
        };
    }

    Ok(PriceRow { date, quotes })
}

/// 从 CSV 文件加载数据集
pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset, DataError> {
    let path = path.as_ref();
    log::info!("加载行情数据: {}", path.display());
    let file = std::fs::File::open(path)?;
    let dataset = load_from_reader(file)?;

    if let (Some(min), Some(max)) = (dataset.min_date(), dataset.max_date()) {
        log::info!("加载完成: {} 行，日期范围 {} ~ {}", dataset.len(), min, max);
    }
    Ok(dataset)
}

/// 从任意读取器解析数据集
pub fn load_from_reader<R: std::io::Read>(reader: R) -> Result<Dataset, DataError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(rdr.headers()?)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(parse_row(&record, &columns)?);
    }

    rows.sort_by_key(|r| r.date);
    if let Some(dup) = rows.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(DataError::DuplicateDate(dup[0].date));
    }

    let dataset = Dataset::from_sorted_rows(rows);
    if dataset.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(dataset)
}
