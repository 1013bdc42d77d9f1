//! 日期区间筛选

use chrono::NaiveDate;

use crate::models::{DateRange, PriceRow};

/// 数据集中落在某个日期区间内的连续行
///
/// 只借用原始数据，不复制也不修改
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilteredView<'a> {
    rows: &'a [PriceRow],
}

impl<'a> FilteredView<'a> {
    pub fn rows(&self) -> &'a [PriceRow] {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 最后两行（前一行, 最新行），不足两行返回 None
    pub fn last_two(&self) -> Option<(&'a PriceRow, &'a PriceRow)> {
        match self.rows {
            [.., previous, latest] => Some((previous, latest)),
            _ => None,
        }
    }

    /// 在当前视图上再次筛选
    #[cfg(test)]
    pub fn filter(&self, start: NaiveDate, end: NaiveDate) -> FilteredView<'a> {
        filter(self.rows, start, end)
    }
}

/// 返回 `start <= date <= end` 的所有行，保持原有升序
///
/// `start > end` 或区间完全落在数据之外时返回空视图，不视为错误。
/// `rows` 必须已按日期升序排列。
pub fn filter(rows: &[PriceRow], start: NaiveDate, end: NaiveDate) -> FilteredView<'_> {
    let lo = rows.partition_point(|r| r.date < start);
    let hi = rows.partition_point(|r| r.date <= end);
    let rows = if lo < hi { &rows[lo..hi] } else { &rows[..0] };
    FilteredView { rows }
}

/// 按 `DateRange` 筛选
pub fn filter_range(rows: &[PriceRow], range: DateRange) -> FilteredView<'_> {
    filter(rows, range.start, range.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dataset, Quote};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dataset(dates: &[&str]) -> Dataset {
        let rows = dates
            .iter()
            .enumerate()
            .map(|(i, d)| PriceRow {
                date: date(d),
                quotes: [Quote {
                    close: 100.0 + i as f64,
                    ..Quote::default()
                }; 5],
            })
            .collect();
        Dataset::from_sorted_rows(rows)
    }

    fn dates(view: FilteredView<'_>) -> Vec<NaiveDate> {
        view.rows().iter().map(|r| r.date).collect()
    }

    #[test]
    fn test_filter_is_inclusive_on_both_ends() {
        let ds = dataset(&["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"]);
        let view = filter(ds.rows(), date("2024-01-03"), date("2024-01-04"));
        assert_eq!(dates(view), vec![date("2024-01-03"), date("2024-01-04")]);
    }

    #[test]
    fn test_filter_bounds_between_rows() {
        // 周末没有数据，区间端点落在两行之间
        let ds = dataset(&["2024-01-05", "2024-01-08", "2024-01-09"]);
        let view = filter(ds.rows(), date("2024-01-06"), date("2024-01-08"));
        assert_eq!(dates(view), vec![date("2024-01-08")]);
    }

    #[test]
    fn test_filter_reversed_range_is_empty() {
        let ds = dataset(&["2024-01-02", "2024-01-03", "2024-01-04"]);
        assert!(filter(ds.rows(), date("2024-01-04"), date("2024-01-02")).is_empty());
        // 单日倒置区间也为空
        assert!(filter(ds.rows(), date("2024-01-03"), date("2024-01-02")).is_empty());
    }

    #[test]
    fn test_filter_outside_span_is_empty() {
        let ds = dataset(&["2024-01-02", "2024-01-03"]);
        assert!(filter(ds.rows(), date("2023-01-01"), date("2023-12-31")).is_empty());
        assert!(filter(ds.rows(), date("2024-02-01"), date("2024-03-01")).is_empty());
    }

    #[test]
    fn test_filter_full_span_is_identity() {
        let ds = dataset(&["2024-01-02", "2024-01-03", "2024-01-04"]);
        let view = filter(
            ds.rows(),
            ds.min_date().unwrap(),
            ds.max_date().unwrap(),
        );
        assert_eq!(view.rows(), ds.rows());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let ds = dataset(&["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"]);
        let cases = [
            ("2024-01-03", "2024-01-04"),
            ("2024-01-01", "2024-01-10"),
            ("2024-01-05", "2024-01-02"),
        ];
        for (s, e) in cases {
            let once = filter(ds.rows(), date(s), date(e));
            let twice = once.filter(date(s), date(e));
            assert_eq!(once.rows(), twice.rows(), "range {} ~ {}", s, e);
        }
    }

    #[test]
    fn test_filter_empty_dataset() {
        let view = filter(&[], date("2024-01-01"), date("2024-12-31"));
        assert!(view.is_empty());
        assert!(view.last_two().is_none());
    }

    #[test]
    fn test_last_two_uses_date_order() {
        let ds = dataset(&["2024-01-02", "2024-01-03", "2024-01-04"]);
        let view = filter_range(ds.rows(), DateRange::of(&ds).unwrap());
        let (previous, latest) = view.last_two().unwrap();
        assert_eq!(previous.date, date("2024-01-03"));
        assert_eq!(latest.date, date("2024-01-04"));
    }
}
