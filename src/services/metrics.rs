//! 关键指标计算
//!
//! 最新收盘价及相对前一交易日的涨跌幅。只比较筛选结果中最后两行，
//! 不与区间起点比较。

use thiserror::Error;

use crate::models::{Direction, MetricCard, MetricsSection, Ticker, TickerMetric};
use super::filter::FilteredView;

/// 指标无法计算的原因（提示信息，不是错误）
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Unavailable {
    #[error("数据不足: 需要至少 2 行，当前 {rows} 行")]
    InsufficientData { rows: usize },
    #[error("前一交易日收盘价为 0，无法计算涨跌幅")]
    ZeroPreviousClose,
    #[error("涨跌幅计算结果无效")]
    NotFinite,
}

/// 指标区域中数据不足时的提示
pub const INSUFFICIENT_DATA_MESSAGE: &str = "Not enough data to show metrics.";

/// 计算单只股票的最新收盘价及涨跌幅
pub fn compute_delta(view: &FilteredView<'_>, ticker: Ticker) -> Result<TickerMetric, Unavailable> {
    let (previous, latest) = view
        .last_two()
        .ok_or(Unavailable::InsufficientData { rows: view.len() })?;

    let latest_close = latest.quote(ticker).close;
    let previous_close = previous.quote(ticker).close;
    if previous_close == 0.0 {
        return Err(Unavailable::ZeroPreviousClose);
    }

    let delta_pct = (latest_close - previous_close) / previous_close * 100.0;
    if !delta_pct.is_finite() {
        return Err(Unavailable::NotFinite);
    }

    Ok(TickerMetric {
        ticker,
        date: latest.date,
        latest_close,
        previous_close,
        delta_pct,
    })
}

/// 生成指标卡片
pub fn metric_card(ticker: Ticker, outcome: Result<TickerMetric, Unavailable>) -> MetricCard {
    let label = format!("Latest close - {}", ticker);
    match outcome {
        Ok(metric) => {
            let direction = if metric.delta_pct > 0.0 {
                Direction::Up
            } else if metric.delta_pct < 0.0 {
                Direction::Down
            } else {
                Direction::Flat
            };
            MetricCard {
                label,
                ticker,
                value: format!("${:.2}", metric.latest_close),
                delta: format!("{:.2}%", metric.delta_pct),
                direction,
                metric: Some(metric),
                note: None,
            }
        }
        Err(reason) => MetricCard {
            label,
            ticker,
            value: "N/A".to_string(),
            delta: "N/A".to_string(),
            direction: Direction::Flat,
            metric: None,
            note: Some(reason.to_string()),
        },
    }
}

/// 计算所有选中股票的指标
///
/// 视图不足两行时整个指标区域只返回提示信息
pub fn compute_metrics(view: &FilteredView<'_>, tickers: &[Ticker]) -> MetricsSection {
    if view.len() < 2 {
        return MetricsSection::Insufficient {
            message: INSUFFICIENT_DATA_MESSAGE.to_string(),
        };
    }

    let cards = tickers
        .iter()
        .map(|&ticker| {
            let outcome = compute_delta(view, ticker);
            if let Err(ref reason) = outcome {
                log::debug!("{} 指标不可用: {}", ticker, reason);
            }
            metric_card(ticker, outcome)
        })
        .collect();

    MetricsSection::Available { cards }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dataset, PriceRow, Quote};
    use crate::services::filter::filter;
    use chrono::NaiveDate;

    /// 每个元素为一行的 AAPL 收盘价，其余股票收盘价固定为 1.0
    fn dataset(closes: &[f64]) -> Dataset {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let mut quotes = [Quote { close: 1.0, ..Quote::default() }; 5];
                quotes[Ticker::AAPL.index()].close = close;
                PriceRow {
                    date: base + chrono::Days::new(i as u64),
                    quotes,
                }
            })
            .collect();
        Dataset::from_sorted_rows(rows)
    }

    fn full_view(ds: &Dataset) -> FilteredView<'_> {
        filter(ds.rows(), ds.min_date().unwrap(), ds.max_date().unwrap())
    }

    #[test]
    fn test_delta_ten_percent() {
        let ds = dataset(&[100.0, 110.0]);
        let metric = compute_delta(&full_view(&ds), Ticker::AAPL).unwrap();
        assert_eq!(metric.latest_close, 110.0);
        assert_eq!(metric.previous_close, 100.0);
        assert!((metric.delta_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_delta_uses_last_two_rows_only() {
        // 区间起点 50 -> 终点 99，但涨跌幅只看 90 -> 99
        let ds = dataset(&[50.0, 70.0, 90.0, 99.0]);
        let metric = compute_delta(&full_view(&ds), Ticker::AAPL).unwrap();
        assert_eq!(metric.previous_close, 90.0);
        assert!((metric.delta_pct - 10.0).abs() < 1e-9);
        assert_eq!(metric.date, ds.max_date().unwrap());
    }

    #[test]
    fn test_delta_zero_previous_close_is_unavailable() {
        let ds = dataset(&[0.0, 50.0]);
        assert_eq!(
            compute_delta(&full_view(&ds), Ticker::AAPL),
            Err(Unavailable::ZeroPreviousClose)
        );
    }

    #[test]
    fn test_delta_single_row_is_unavailable() {
        let ds = dataset(&[100.0]);
        assert_eq!(
            compute_delta(&full_view(&ds), Ticker::AAPL),
            Err(Unavailable::InsufficientData { rows: 1 })
        );
    }

    #[test]
    fn test_delta_empty_view_is_unavailable() {
        let ds = dataset(&[100.0, 110.0]);
        let view = filter(ds.rows(), ds.max_date().unwrap(), ds.min_date().unwrap());
        assert_eq!(
            compute_delta(&view, Ticker::AAPL),
            Err(Unavailable::InsufficientData { rows: 0 })
        );
    }

    #[test]
    fn test_metric_card_formatting() {
        let ds = dataset(&[100.0, 95.5]);
        let card = metric_card(Ticker::AAPL, compute_delta(&full_view(&ds), Ticker::AAPL));
        assert_eq!(card.label, "Latest close - AAPL");
        assert_eq!(card.value, "$95.50");
        assert_eq!(card.delta, "-4.50%");
        assert_eq!(card.direction, Direction::Down);

        let card = metric_card(Ticker::MSFT, Err(Unavailable::ZeroPreviousClose));
        assert_eq!(card.value, "N/A");
        assert_eq!(card.delta, "N/A");
        assert!(card.metric.is_none());
        assert!(card.note.is_some());
    }

    #[test]
    fn test_compute_metrics_per_ticker() {
        let ds = dataset(&[0.0, 50.0]);
        let section = compute_metrics(&full_view(&ds), &[Ticker::AAPL, Ticker::NVDA]);
        let MetricsSection::Available { cards } = section else {
            panic!("expected metric cards");
        };
        assert_eq!(cards.len(), 2);
        // AAPL 前值为 0，只影响自己的卡片
        assert!(cards[0].metric.is_none());
        assert_eq!(cards[1].direction, Direction::Flat);
        assert_eq!(cards[1].delta, "0.00%");
    }

    #[test]
    fn test_compute_metrics_insufficient_rows() {
        let ds = dataset(&[100.0]);
        assert_eq!(
            compute_metrics(&full_view(&ds), &[Ticker::AAPL]),
            MetricsSection::Insufficient {
                message: INSUFFICIENT_DATA_MESSAGE.to_string()
            }
        );
    }
}
