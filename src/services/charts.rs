//! 图表数据构建
//!
//! 把筛选结果转换为前端可直接绘制的序列：价格走势、K线、成交量和原始数据表

use serde_json::Value;

use crate::models::{
    Candle, CandlestickChart, LineChart, LineSeries, PriceField, RawTable, SeriesPoint, Ticker,
    VolumeBar, VolumeChart, VolumeSeries,
};
use super::filter::FilteredView;

/// 价格走势图，每只股票一条折线
pub fn price_chart(view: &FilteredView<'_>, tickers: &[Ticker], field: PriceField) -> LineChart {
    let series = tickers
        .iter()
        .map(|&ticker| LineSeries {
            name: ticker.to_string(),
            points: view
                .rows()
                .iter()
                .map(|row| SeriesPoint {
                    date: row.date,
                    value: row.quote(ticker).value(field),
                })
                .collect(),
        })
        .collect();

    LineChart {
        price_field: field,
        y_axis_title: "Price (USD)".to_string(),
        series,
    }
}

/// 单只股票的K线图
pub fn candlestick_chart(view: &FilteredView<'_>, ticker: Ticker) -> CandlestickChart {
    let candles = view
        .rows()
        .iter()
        .map(|row| {
            let q = row.quote(ticker);
            Candle {
                date: row.date,
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
            }
        })
        .collect();

    CandlestickChart {
        title: format!("Candlestick chart - {}", ticker),
        ticker,
        candles,
    }
}

/// 成交量图，各股票堆叠
pub fn volume_chart(view: &FilteredView<'_>, tickers: &[Ticker]) -> VolumeChart {
    let series = tickers
        .iter()
        .map(|&ticker| VolumeSeries {
            name: format!("Volume {}", ticker),
            ticker,
            bars: view
                .rows()
                .iter()
                .map(|row| VolumeBar {
                    date: row.date,
                    volume: row.quote(ticker).volume,
                })
                .collect(),
        })
        .collect();

    VolumeChart {
        stacked: true,
        series,
    }
}

/// 原始数据表：`Date` 加上全部 `{Field}_{Ticker}` 列
pub fn raw_table(view: &FilteredView<'_>) -> RawTable {
    let mut columns = vec!["Date".to_string()];
    for field in PriceField::ALL {
        for ticker in Ticker::ALL {
            columns.push(field.column(ticker));
        }
    }

    let rows = view
        .rows()
        .iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(columns.len());
            cells.push(Value::String(row.date.to_string()));
            for field in PriceField::ALL {
                for ticker in Ticker::ALL {
                    let q = row.quote(ticker);
                    let cell = match field {
                        PriceField::Volume => Value::from(q.volume),
                        _ => Value::from(q.value(field)),
                    };
                    cells.push(cell);
                }
            }
            cells
        })
        .collect();

    RawTable { columns, rows }
}
